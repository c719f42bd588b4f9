// In-process stand-ins for the container runtime, the chain binary and the
// node RPC, so chain lifecycles can run against a temp directory.

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use parking_lot::Mutex;
use rollup_e2e_common::config::{CELESTIA_HOME_ROOT, CELESTIA_HOST_DIR, CONTAINER_HOME_ROOT};
use rollup_e2e_common::naming::fnv1_32;
use rollup_e2e_common::{ChainConfig, ChainType, DockerImage, ExecError, HubVendor, RollAppVendor};
use rollup_e2e_testing::docker::{
    CommandExecutor, ContainerRuntime, ContainerSpec, ExecJob, ExecOutput, HostVolumeBridge,
};
use rollup_e2e_testing::orchestrator::{BlockWaitPolicy, HealthCheckPolicy, TestEnv};
use rollup_e2e_testing::rpc::{NodeRpc, NodeStatus, RpcConnector};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

// ============================================================================
// Chain binary
// ============================================================================

fn fail(command: &[String], stderr: &str) -> ExecError {
    ExecError::NonZeroExit {
        command: command.to_vec(),
        exit_code: 1,
        stderr: stderr.to_string(),
    }
}

fn ok(stdout: impl Into<Vec<u8>>) -> Result<ExecOutput, ExecError> {
    Ok(ExecOutput {
        stdout: stdout.into(),
        stderr: Vec::new(),
    })
}

fn flag<'a>(command: &'a [String], name: &str) -> Option<&'a str> {
    command
        .iter()
        .position(|a| a == name)
        .and_then(|i| command.get(i + 1))
        .map(String::as_str)
}

/// `123adym` into `(123, "adym")`
fn parse_coin(coin: &str) -> Option<(u128, String)> {
    let split = coin.find(|c: char| !c.is_ascii_digit())?;
    let amount = coin[..split].parse().ok()?;
    Some((amount, coin[split..].to_string()))
}

/// A scripted Cosmos SDK binary working on real files under a host root
///
/// Genesis assembly (`init`, `add-genesis-account`, `gentx`,
/// `collect-gentxs`) and the keyring are modelled on disk; transactions
/// answer from a script and balances are derived from genesis plus sends.
pub struct FakeChainBinary {
    root: PathBuf,
    prefixes: Mutex<HashMap<String, String>>,
    tx_results: Mutex<VecDeque<Value>>,
    queries: Mutex<HashMap<String, Value>>,
    transfers: Mutex<HashMap<(String, String), i128>>,
    history: Mutex<Vec<Vec<String>>>,
    envs: Mutex<Vec<(Vec<String>, Vec<String>)>>,
    tx_counter: AtomicU64,
}

impl FakeChainBinary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            prefixes: Mutex::new(HashMap::new()),
            tx_results: Mutex::new(VecDeque::new()),
            queries: Mutex::new(HashMap::new()),
            transfers: Mutex::new(HashMap::new()),
            history: Mutex::new(Vec::new()),
            envs: Mutex::new(Vec::new()),
            tx_counter: AtomicU64::new(0),
        }
    }

    /// Addresses created by `bin` use `prefix`
    pub fn register_chain(&self, config: &ChainConfig) {
        self.prefixes
            .lock()
            .insert(config.bin.clone(), config.bech32_prefix.clone());
    }

    /// Next transaction answers with `result` instead of success
    pub fn push_tx_result(&self, result: Value) {
        self.tx_results.lock().push_back(result);
    }

    /// `query <path..>` answers with `value`, e.g. `script_query("rollapp state", ..)`
    pub fn script_query(&self, path: &str, value: Value) {
        self.queries.lock().insert(path.to_string(), value);
    }

    pub fn history(&self) -> Vec<Vec<String>> {
        self.history.lock().clone()
    }

    /// Command and environment of the most recent exec
    pub fn last_exec(&self) -> Option<(Vec<String>, Vec<String>)> {
        self.envs.lock().last().cloned()
    }

    /// Arguments following `tx` of every transaction, in broadcast order
    pub fn tx_history(&self) -> Vec<Vec<String>> {
        self.history()
            .into_iter()
            .filter_map(|cmd| {
                let start = cmd.iter().position(|a| a == "tx")?;
                Some(cmd[start + 1..].to_vec())
            })
            .collect()
    }

    fn host_path(&self, container_path: &str) -> Result<PathBuf> {
        if let Some(rest) = container_path.strip_prefix(CONTAINER_HOME_ROOT) {
            return Ok(self.root.join(rest.trim_start_matches('/')));
        }
        if let Some(rest) = container_path.strip_prefix(CELESTIA_HOME_ROOT) {
            return Ok(self
                .root
                .join(CELESTIA_HOST_DIR)
                .join(rest.trim_start_matches('/')));
        }
        Err(anyhow!("path {} is outside the mounted volumes", container_path))
    }

    fn prefix(&self, bin: &str) -> String {
        self.prefixes
            .lock()
            .get(bin)
            .cloned()
            .unwrap_or_else(|| "cosmos".to_string())
    }

    fn seed(path: &Path) -> u32 {
        fnv1_32(path.to_string_lossy().as_bytes())
    }

    fn key_bytes(seed: u32) -> Vec<u8> {
        (0..64u32)
            .map(|i| ((seed.rotate_left(i % 32)) as u8) ^ (i as u8))
            .collect()
    }

    fn init(&self, home: &Path, command: &[String]) -> Result<ExecOutput, ExecError> {
        let chain_id = flag(command, "--chain-id").unwrap_or_default();
        let genesis = json!({
            "chain_id": chain_id,
            "app_state": {
                "bank": { "balances": [], "supply": [] },
                "staking": { "params": { "bond_denom": "stake" } },
                "genutil": { "gen_txs": [] },
            },
            "consensus": { "validators": [] },
        });
        let seed = Self::seed(home);
        let node_key = json!({
            "priv_key": {
                "type": "tendermint/PrivKeyEd25519",
                "value": BASE64.encode(Self::key_bytes(seed)),
            }
        });
        let priv_validator = json!({
            "address": format!("{:08X}", seed),
            "pub_key": { "type": "tendermint/PubKeyEd25519", "value": BASE64.encode(&Self::key_bytes(seed)[32..]) },
            "priv_key": { "type": "tendermint/PrivKeyEd25519", "value": BASE64.encode(Self::key_bytes(seed)) },
        });
        let config = home.join("config");
        let files = [
            ("genesis.json", render(&genesis)),
            ("node_key.json", render(&node_key)),
            ("priv_validator_key.json", render(&priv_validator)),
            (
                "config.toml",
                b"[p2p]\npersistent_peers = \"\"\n\n[consensus]\ntimeout_commit = \"5s\"\n\n[rpc]\nladdr = \"tcp://127.0.0.1:26657\"\n".to_vec(),
            ),
            ("app.toml", b"minimum-gas-prices = \"\"\n\n[api]\nenable = false\n".to_vec()),
        ];
        write_all(&config, &files).map_err(|e| fail(command, &e.to_string()))?;
        ok(Vec::new())
    }

    fn keyring(&self, command: &[String], home: Option<&Path>) -> Result<PathBuf, ExecError> {
        if let Some(dir) = flag(command, "--keyring-dir") {
            return self
                .host_path(dir)
                .map(|p| p.join("keyring-test"))
                .map_err(|e| fail(command, &e.to_string()));
        }
        home.map(|h| h.join("keyring-test"))
            .ok_or_else(|| fail(command, "no home"))
    }

    fn key_address(&self, keyring: &Path, name: &str) -> Option<String> {
        std::fs::read_to_string(keyring.join(format!("{}.address", name))).ok()
    }

    fn keys(&self, home: Option<&Path>, args: &[String], command: &[String]) -> Result<ExecOutput, ExecError> {
        let keyring = self.keyring(command, home)?;
        match args.first().map(String::as_str) {
            Some("add") => {
                let name = &args[1];
                let file = keyring.join(format!("{}.address", name));
                if file.exists() {
                    return Err(fail(command, &format!("Error: {} already exists", name)));
                }
                let address = format!(
                    "{}1{:08x}",
                    self.prefix(&command[0]),
                    fnv1_32(file.to_string_lossy().as_bytes())
                );
                let file_name = format!("{}.address", name);
                write_all(&keyring, &[(file_name.as_str(), address.into_bytes())])
                    .map_err(|e| fail(command, &e.to_string()))?;
                ok(Vec::new())
            }
            Some("show") => {
                let name = flag(command, "--address").unwrap_or_default();
                let address = self
                    .key_address(&keyring, name)
                    .ok_or_else(|| fail(command, &format!("Error: {}: key not found", name)))?;
                let address = match flag(command, "--bech") {
                    Some(kind) => address.replacen('1', &format!("{}oper1", kind), 1),
                    None => address,
                };
                ok(format!("{}\n", address))
            }
            _ => ok(Vec::new()),
        }
    }

    fn genesis(home: &Path) -> Result<Value> {
        Ok(serde_json::from_slice(&std::fs::read(home.join("config/genesis.json"))?)?)
    }

    fn save_genesis(home: &Path, genesis: &Value) -> Result<()> {
        std::fs::write(home.join("config/genesis.json"), render(genesis))?;
        Ok(())
    }

    fn add_genesis_account(home: &Path, address: &str, coins: &str) -> Result<()> {
        let mut genesis = Self::genesis(home)?;
        let bank = &mut genesis["app_state"]["bank"];
        let balances = bank["balances"]
            .as_array_mut()
            .ok_or_else(|| anyhow!("no balances"))?;
        if balances.iter().any(|b| b["address"] == address) {
            return Err(anyhow!("Error: cannot add account at existing address {}", address));
        }
        let mut parsed = Vec::new();
        for coin in coins.split(',') {
            let (amount, denom) = parse_coin(coin).ok_or_else(|| anyhow!("invalid coin {}", coin))?;
            parsed.push(json!({ "denom": denom, "amount": amount.to_string() }));
        }
        balances.push(json!({ "address": address, "coins": parsed.clone() }));

        let supply = bank["supply"]
            .as_array_mut()
            .ok_or_else(|| anyhow!("no supply"))?;
        for coin in parsed {
            let amount: u128 = coin["amount"].as_str().unwrap_or("0").parse()?;
            match supply.iter_mut().find(|s| s["denom"] == coin["denom"]) {
                Some(entry) => {
                    let current: u128 = entry["amount"].as_str().unwrap_or("0").parse()?;
                    entry["amount"] = Value::String((current + amount).to_string());
                }
                None => supply.push(coin),
            }
        }
        Self::save_genesis(home, &genesis)
    }

    fn gentx(&self, home: &Path, key: &str, amount: &str) -> Result<()> {
        let address = self
            .key_address(&home.join("keyring-test"), key)
            .ok_or_else(|| anyhow!("Error: {}: key not found", key))?;
        let genesis = Self::genesis(home)?;
        let funded = genesis["app_state"]["bank"]["balances"]
            .as_array()
            .map(|b| b.iter().any(|e| e["address"] == address.as_str()))
            .unwrap_or(false);
        if !funded {
            return Err(anyhow!("Error: account {} not in genesis", address));
        }
        let node_id = rollup_e2e_common::genesis::node_id(&std::fs::read(home.join("config/node_key.json"))?)?;
        let gentx = json!({ "delegator_address": address, "amount": amount, "node_id": node_id });
        let file_name = format!("gentx-{}.json", node_id);
        write_all(&home.join("config/gentx"), &[(file_name.as_str(), render(&gentx))])?;
        Ok(())
    }

    fn collect_gentxs(home: &Path) -> Result<()> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(home.join("config/gentx"))?
            .filter_map(|e| e.ok().map(|e| e.path()))
            .collect();
        files.sort();
        let mut gentxs = Vec::new();
        for file in files {
            gentxs.push(serde_json::from_slice::<Value>(&std::fs::read(file)?)?);
        }
        let mut genesis = Self::genesis(home)?;
        genesis["app_state"]["genutil"]["gen_txs"] = Value::Array(gentxs);
        Self::save_genesis(home, &genesis)
    }

    fn balance(&self, home: &Path, address: &str, denom: &str) -> Result<u128> {
        let genesis = Self::genesis(home)?;
        let mut balance: i128 = 0;
        for entry in genesis["app_state"]["bank"]["balances"].as_array().into_iter().flatten() {
            if entry["address"] != address {
                continue;
            }
            for coin in entry["coins"].as_array().into_iter().flatten() {
                if coin["denom"] == denom {
                    balance += coin["amount"].as_str().unwrap_or("0").parse::<i128>()?;
                }
            }
        }
        for gentx in genesis["app_state"]["genutil"]["gen_txs"].as_array().into_iter().flatten() {
            if gentx["delegator_address"] != address {
                continue;
            }
            if let Some((amount, coin_denom)) = gentx["amount"].as_str().and_then(parse_coin) {
                if coin_denom == denom {
                    balance -= amount as i128;
                }
            }
        }
        balance += self
            .transfers
            .lock()
            .get(&(address.to_string(), denom.to_string()))
            .copied()
            .unwrap_or(0);
        Ok(balance.max(0) as u128)
    }

    fn tx(&self, home: Option<&Path>, args: &[String], command: &[String]) -> Result<ExecOutput, ExecError> {
        if args.len() >= 5 && args[0] == "bank" && args[1] == "send" {
            let from = home
                .and_then(|h| self.key_address(&h.join("keyring-test"), &args[2]))
                .ok_or_else(|| fail(command, "Error: key not found"))?;
            if let Some((amount, denom)) = parse_coin(&args[4]) {
                let mut transfers = self.transfers.lock();
                *transfers.entry((from, denom.clone())).or_default() -= amount as i128;
                *transfers.entry((args[3].clone(), denom)).or_default() += amount as i128;
            }
        }
        let n = self.tx_counter.fetch_add(1, Ordering::SeqCst);
        let result = self
            .tx_results
            .lock()
            .pop_front()
            .unwrap_or_else(|| json!({ "txhash": format!("TX{:04}", n), "code": 0, "raw_log": "" }));
        ok(render(&result))
    }

    fn query(&self, home: Option<&Path>, args: &[String], command: &[String]) -> Result<ExecOutput, ExecError> {
        if args.len() >= 3 && args[0] == "bank" && args[1] == "balances" {
            let home = home.ok_or_else(|| fail(command, "no home"))?;
            let denom = flag(command, "--denom").unwrap_or_default();
            let amount = self
                .balance(home, &args[2], denom)
                .map_err(|e| fail(command, &e.to_string()))?;
            return ok(render(&json!({ "denom": denom, "amount": amount.to_string() })));
        }
        let positional: Vec<&str> = args
            .iter()
            .take_while(|a| !a.starts_with("--"))
            .map(String::as_str)
            .collect();
        let queries = self.queries.lock();
        for len in (1..=positional.len()).rev() {
            if let Some(value) = queries.get(&positional[..len].join(" ")) {
                return ok(render(value));
            }
        }
        Err(fail(command, "Error: unscripted query"))
    }
}

fn render(value: &Value) -> Vec<u8> {
    serde_json::to_vec_pretty(value).unwrap_or_default()
}

fn write_all(dir: &Path, files: &[(&str, Vec<u8>)]) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    for (name, content) in files {
        std::fs::write(dir.join(name), content)?;
    }
    Ok(())
}

#[async_trait]
impl CommandExecutor for FakeChainBinary {
    async fn exec(&self, job: &ExecJob) -> Result<ExecOutput, ExecError> {
        let command = job.command.clone();
        self.history.lock().push(command.clone());
        self.envs.lock().push((command.clone(), job.env.clone()));
        if job.detached || command.is_empty() {
            return ok(Vec::new());
        }

        let home = match flag(&command, "--home") {
            Some(h) => Some(self.host_path(h).map_err(|e| fail(&command, &e.to_string()))?),
            None => None,
        };
        let home = home.as_deref();
        let mut args: Vec<String> = command[1..].to_vec();
        if args.first().map(String::as_str) == Some("genesis") {
            if args.get(1).map(String::as_str) == Some("--help") {
                return ok(b"Application's genesis-related subcommands".to_vec());
            }
            args.remove(0);
        }
        let need_home = || home.ok_or_else(|| fail(&command, "missing --home"));

        match args.first().map(String::as_str) {
            Some("init") => self.init(need_home()?, &command),
            Some("keys") => self.keys(home, &args[1..], &command),
            Some("add-genesis-account") => Self::add_genesis_account(need_home()?, &args[1], &args[2])
                .map(|_| ExecOutput::default())
                .map_err(|e| fail(&command, &e.to_string())),
            Some("gentx") => self
                .gentx(need_home()?, &args[1], &args[2])
                .map(|_| ExecOutput::default())
                .map_err(|e| fail(&command, &e.to_string())),
            Some("collect-gentxs") => Self::collect_gentxs(need_home()?)
                .map(|_| ExecOutput::default())
                .map_err(|e| fail(&command, &e.to_string())),
            Some("tx") => self.tx(home, &args[1..], &command),
            Some("query") => self.query(home, &args[1..], &command),
            Some("dymint") => ok(format!(
                "{{\"@type\":\"/cosmos.crypto.ed25519.PubKey\",\"key\":\"{:08x}\"}}\n",
                home.map(Self::seed).unwrap_or_default()
            )),
            Some("export") => std::fs::read(need_home()?.join("config/genesis.json"))
                .map(|g| ExecOutput { stdout: g, stderr: Vec::new() })
                .map_err(|e| fail(&command, &e.to_string())),
            _ => ok(Vec::new()),
        }
    }
}

// ============================================================================
// Container runtime
// ============================================================================

/// Containers that only exist as records
#[derive(Default)]
pub struct FakeRuntime {
    next_id: AtomicU32,
    refuse_start: Mutex<Option<String>>,
    specs: Mutex<HashMap<String, ContainerSpec>>,
    events: Mutex<Vec<String>>,
}

impl FakeRuntime {
    /// `create|start|stop|remove <container name>` in call order
    pub fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }

    /// Starting the container named `name` fails
    pub fn refuse_start(&self, name: &str) {
        *self.refuse_start.lock() = Some(name.to_string());
    }

    pub fn spec(&self, name: &str) -> Option<ContainerSpec> {
        self.specs.lock().values().find(|s| s.name == name).cloned()
    }

    fn record(&self, op: &str, id: &str) -> Result<()> {
        let name = self
            .specs
            .lock()
            .get(id)
            .map(|s| s.name.clone())
            .ok_or_else(|| anyhow!("no such container {}", id))?;
        self.events.lock().push(format!("{} {}", op, name));
        Ok(())
    }
}

#[async_trait]
impl ContainerRuntime for FakeRuntime {
    async fn create_container(&self, spec: &ContainerSpec) -> Result<String> {
        let id = format!("c{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.specs.lock().insert(id.clone(), spec.clone());
        self.events.lock().push(format!("create {}", spec.name));
        Ok(id)
    }

    async fn start_container(&self, id: &str) -> Result<()> {
        let refused = self.refuse_start.lock().clone();
        if let Some(name) = refused {
            if self.specs.lock().get(id).map(|s| s.name.as_str()) == Some(name.as_str()) {
                self.events.lock().push(format!("refuse {}", name));
                return Err(anyhow!("container {} refused to start", name));
            }
        }
        self.record("start", id)
    }

    async fn host_ports(&self, id: &str, ports: &[&str]) -> Result<Vec<String>> {
        Ok(ports.iter().map(|p| format!("{}:{}", id, p)).collect())
    }

    async fn stop_container(&self, id: &str) -> Result<()> {
        self.record("stop", id)
    }

    async fn remove_container(&self, id: &str) -> Result<()> {
        self.record("remove", id)?;
        self.specs.lock().remove(id);
        Ok(())
    }
}

// ============================================================================
// RPC
// ============================================================================

/// Node that reports catching up for its first `catching_up_polls` status
/// calls and grows one block per call
pub struct ScriptedNode {
    pub polls: AtomicU32,
    catching_up_polls: u32,
    height: AtomicU64,
}

#[async_trait]
impl NodeRpc for ScriptedNode {
    async fn status(&self) -> Result<NodeStatus> {
        let poll = self.polls.fetch_add(1, Ordering::SeqCst);
        Ok(NodeStatus {
            latest_block_height: self.height.fetch_add(1, Ordering::SeqCst) + 1,
            catching_up: poll < self.catching_up_polls,
        })
    }
}

/// Hands out [`ScriptedNode`]s and keeps them for inspection
#[derive(Default)]
pub struct ScriptedRpc {
    catching_up_polls: AtomicU32,
    nodes: Mutex<Vec<(String, Arc<ScriptedNode>)>>,
}

impl ScriptedRpc {
    pub fn with_catching_up_polls(polls: u32) -> Self {
        Self {
            catching_up_polls: AtomicU32::new(polls),
            nodes: Mutex::new(Vec::new()),
        }
    }

    pub fn nodes(&self) -> Vec<(String, Arc<ScriptedNode>)> {
        self.nodes.lock().clone()
    }
}

impl RpcConnector for ScriptedRpc {
    fn connect(&self, host_addr: &str) -> Result<Arc<dyn NodeRpc>> {
        let node = Arc::new(ScriptedNode {
            polls: AtomicU32::new(0),
            catching_up_polls: self.catching_up_polls.load(Ordering::SeqCst),
            height: AtomicU64::new(0),
        });
        self.nodes.lock().push((host_addr.to_string(), node.clone()));
        Ok(node)
    }
}

// ============================================================================
// Harness
// ============================================================================

/// Fast policies for fake nodes on real time
pub fn fast_health() -> HealthCheckPolicy {
    HealthCheckPolicy {
        initial_delay: Duration::ZERO,
        attempts: 5,
        interval: Duration::from_millis(1),
    }
}

pub fn fast_blocks() -> BlockWaitPolicy {
    BlockWaitPolicy {
        poll_interval: Duration::from_millis(1),
        timeout: Duration::from_secs(10),
    }
}

/// Fakes wired into a [`TestEnv`] over a temp host root
pub struct FakeEnv {
    pub dir: TempDir,
    pub env: TestEnv,
    pub binary: Arc<FakeChainBinary>,
    pub runtime: Arc<FakeRuntime>,
    pub rpc: Arc<ScriptedRpc>,
}

impl FakeEnv {
    pub fn new() -> Self {
        Self::with_rpc(ScriptedRpc::default())
    }

    pub fn with_rpc(rpc: ScriptedRpc) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let binary = Arc::new(FakeChainBinary::new(dir.path()));
        let runtime = Arc::new(FakeRuntime::default());
        let rpc = Arc::new(rpc);
        let env = TestEnv::new(
            runtime.clone(),
            binary.clone(),
            Arc::new(HostVolumeBridge::new(dir.path())),
            rpc.clone(),
            "fake-net",
            dir.path(),
        )
        .with_health_policy(fast_health())
        .with_block_wait_policy(fast_blocks());
        Self {
            dir,
            env,
            binary,
            runtime,
            rpc,
        }
    }

    /// Registers the chain's address prefix with the fake binary
    pub fn register(&self, config: ChainConfig) -> ChainConfig {
        self.binary.register_chain(&config);
        config
    }
}

fn image(repository: &str) -> DockerImage {
    DockerImage::new(repository, "e2e")
}

pub fn cosmos_config() -> ChainConfig {
    ChainConfig::new(ChainType::Cosmos, "gaia", "gaia-1", "gaiad", "uatom", "cosmos")
        .with_image(image("ghcr.io/cosmos/gaia"))
        .with_gas_prices("0uatom")
}

pub fn hub_config() -> ChainConfig {
    ChainConfig::new(
        ChainType::Hub(HubVendor::Dymension),
        "dymension",
        "dymension_100-1",
        "dymd",
        "adym",
        "dym",
    )
    .with_image(image("ghcr.io/decentrio/dymension"))
    .with_gas_prices("0adym")
    .with_coin_decimals(18)
}

pub fn rollapp_config() -> ChainConfig {
    ChainConfig::new(
        ChainType::RollApp(RollAppVendor::Dymension),
        "rollapp1",
        "rollappwasm_1234-1",
        "rollappd",
        "urax",
        "rol",
    )
    .with_image(image("ghcr.io/decentrio/rollapp"))
    .with_gas_prices("0urax")
}

pub fn gm_config() -> ChainConfig {
    ChainConfig::new(
        ChainType::RollApp(RollAppVendor::Rollkit),
        "gm",
        "gm-1",
        "gmd",
        "stake",
        "gm",
    )
    .with_image(image("ghcr.io/rollkit/gm"))
    .with_gas_prices("0stake")
}
