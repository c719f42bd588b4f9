use std::time::Duration;
use thiserror::Error;

/// Errors raised while building or applying chain configuration
///
/// Always fatal to the enclosing `configure` call; nothing here is retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Per-file override was not a table of keys
    #[error("provided toml override for file {file} is of type ({kind}). Expected (table)")]
    OverrideNotTable { file: String, kind: &'static str },

    /// Override value cannot be represented in TOML
    #[error("unsupported toml value for key {key}: {reason}")]
    UnsupportedTomlValue { key: String, reason: String },

    /// Existing TOML key is not a table but the override nests into it
    #[error("toml key {key} is not a table")]
    NotATable { key: String },

    /// TOML document failed to parse
    #[error("failed to parse toml file {file}: {reason}")]
    Toml { file: String, reason: String },

    /// Unknown hyphen-delimited chain type tag
    #[error("unknown chain type: {0}")]
    UnknownChainType(String),

    /// JSON document failed to (de)serialize
    #[error("json error in {context}: {reason}")]
    Json { context: String, reason: String },

    /// Required field absent from a genesis document
    #[error("missing genesis field: {0}")]
    MissingGenesisField(String),

    /// Genesis bytes are not UTF-8
    #[error("genesis file is not valid utf-8")]
    InvalidUtf8,

    /// Node key file has an unexpected shape
    #[error("invalid node key: {0}")]
    InvalidNodeKey(String),

    /// Scaled token amount does not fit in 128 bits
    #[error("amount {base} scaled by 10^{decimals} overflows")]
    AmountOverflow { base: u128, decimals: u32 },
}

impl ConfigError {
    /// Wraps a serde_json error with the document it came from
    pub fn json(context: impl Into<String>, err: serde_json::Error) -> Self {
        ConfigError::Json {
            context: context.into(),
            reason: err.to_string(),
        }
    }
}

/// Keyring errors indicate caller logic errors and are never retried
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyringError {
    #[error("key {name} already exists")]
    DuplicateKey { name: String },

    #[error("key {name} not found")]
    MissingKey { name: String },
}

/// Application-level rejection of a broadcast transaction
///
/// The hash is kept so callers can still look the transaction up.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("transaction failed with code {code}: {raw_log}")]
pub struct TxError {
    pub code: u32,
    pub raw_log: String,
    pub txhash: String,
}

/// Failure of a single command run inside a node container
#[derive(Error, Debug)]
pub enum ExecError {
    /// Command ran and exited non-zero
    #[error("command {command:?} exited with code {exit_code}: {stderr}")]
    NonZeroExit {
        command: Vec<String>,
        exit_code: i32,
        stderr: String,
    },

    /// Container runtime could not be invoked at all
    #[error("failed to run command {command:?}: {source}")]
    Spawn {
        command: Vec<String>,
        #[source]
        source: std::io::Error,
    },
}

impl ExecError {
    /// Captured stderr, empty for spawn failures
    pub fn stderr(&self) -> &str {
        match self {
            ExecError::NonZeroExit { stderr, .. } => stderr,
            ExecError::Spawn { .. } => "",
        }
    }
}

/// Awaited condition never became true within the allotted window
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{what} not found within the timeout ({timeout:?})")]
pub struct WaitTimeoutError {
    pub what: String,
    pub timeout: Duration,
}

/// Lifecycle method called out of order
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("chain {chain}: cannot {operation} while {state}")]
pub struct ChainStateError {
    pub chain: String,
    pub operation: &'static str,
    pub state: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tx_error_message_is_verbatim() {
        let err = TxError {
            code: 5,
            raw_log: "insufficient funds: 10stake < 20stake".to_string(),
            txhash: "ABCD".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "transaction failed with code 5: insufficient funds: 10stake < 20stake"
        );
    }

    #[test]
    fn test_override_error_names_file_and_kind() {
        let err = ConfigError::OverrideNotTable {
            file: "config/app.toml".to_string(),
            kind: "string",
        };
        let msg = err.to_string();
        assert!(msg.contains("config/app.toml"));
        assert!(msg.contains("(string)"));
    }

    #[test]
    fn test_wait_timeout_message() {
        let err = WaitTimeoutError {
            what: "rollapp height 42".to_string(),
            timeout: Duration::from_secs(10),
        };
        assert!(err.to_string().starts_with("rollapp height 42 not found within the timeout"));
    }
}
