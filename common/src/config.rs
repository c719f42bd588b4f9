// Harness-wide constants: key names, container layout, ports and the
// default genesis funding formula.

/// Key every validator signs its gentx with
pub const VALIDATOR_KEY_NAME: &str = "validator";
/// Key that funds sequencer accounts on hubs
pub const FAUCET_KEY_NAME: &str = "faucet";
/// Key created on a hub for every attached rollapp
pub const SEQUENCER_KEY_NAME: &str = "sequencer";

// Keyring backend used for every key command; keys are throwaway.
pub const KEYRING_BACKEND: &str = "test";

/// Upper bound on validator monikers accepted by the staking module
pub const MAX_MONIKER_LENGTH: usize = 70;
/// Hostnames of 64 characters or more are rejected by the container runtime
pub const MAX_HOSTNAME_LENGTH: usize = 63;

// ===== Container layout =====

/// Mount point of the shared host volume inside every node container
pub const CONTAINER_HOME_ROOT: &str = "/var/cosmos-chain";
/// Mount point of the celestia bridge store inside hub containers
pub const CELESTIA_HOME_ROOT: &str = "/home/celestia";
/// Host subdirectory bound to [`CELESTIA_HOME_ROOT`]
pub const CELESTIA_HOST_DIR: &str = "celestia";

pub const P2P_PORT: &str = "26656/tcp";
pub const RPC_PORT: &str = "26657/tcp";
pub const GRPC_PORT: &str = "9090/tcp";
pub const API_PORT: &str = "1317/tcp";
pub const PRIVVAL_PORT: &str = "1234/tcp";

/// Ports published for every node container
pub const EXPOSED_PORTS: [&str; 5] = [P2P_PORT, RPC_PORT, GRPC_PORT, API_PORT, PRIVVAL_PORT];

/// P2P port number used in peer strings
pub const P2P_PORT_NUMBER: u16 = 26656;
/// RPC port number used in `--node tcp://host:26657`
pub const RPC_PORT_NUMBER: u16 = 26657;

/// Consensus timeouts written into config.toml
pub const BLOCK_TIME: &str = "2s";

// ===== Genesis =====

/// Bond denom emitted by freshly initialized chain binaries
pub const DEFAULT_BOND_DENOM: &str = "stake";
pub const DEFAULT_COIN_DECIMALS: u32 = 6;
/// Genesis balance of every validator before decimal scaling
pub const GENESIS_AMOUNT_BASE: u128 = 100_000_000_000_000;
/// Self delegation of every validator before decimal scaling
pub const SELF_DELEGATION_BASE: u128 = 50_000_000_000_000;
/// Amount granted to hub validator0 in each rollapp's genesis accounts file
pub const GENESIS_EVENT_AMOUNT: u128 = 100_000_000_000_000;
/// Hub funds sent to a freshly created sequencer key
pub const SEQUENCER_FUNDING_AMOUNT: u128 = 10_000_000_000_000;

// ===== Block waits =====

/// Blocks a chain must produce before `start` returns
pub const LIVENESS_BLOCKS: u64 = 5;
/// Blocks waited after a successful transaction
pub const TX_SETTLE_BLOCKS: u64 = 5;

// ===== Environment =====

/// Path the final genesis of [`ENV_EXPORT_GENESIS_CHAIN`] is written to
pub const ENV_EXPORT_GENESIS_FILE_PATH: &str = "EXPORT_GENESIS_FILE_PATH";
pub const ENV_EXPORT_GENESIS_CHAIN: &str = "EXPORT_GENESIS_CHAIN";
/// Non-empty value keeps containers and volumes of failed tests
pub const ENV_SKIP_FAILURE_CLEANUP: &str = "E2E_SKIP_FAILURE_CLEANUP";
