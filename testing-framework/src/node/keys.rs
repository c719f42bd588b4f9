// File: testing-framework/src/node/keys.rs

use super::Node;
use anyhow::{Context, Result};
use rollup_e2e_common::config::KEYRING_BACKEND;
use rollup_e2e_common::{ExecError, KeyringError};

/// Bech32 flavor of an address lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEncoding {
    Account,
    Validator,
    Consensus,
}

impl KeyEncoding {
    fn flag(self) -> Option<&'static str> {
        match self {
            KeyEncoding::Account => None,
            KeyEncoding::Validator => Some("val"),
            KeyEncoding::Consensus => Some("cons"),
        }
    }
}

/// Variable carrying the mnemonic into `keys add --recover`
pub const MNEMONIC_ENV: &str = "MNEMONIC";

/// Directory keyring entries for a rollapp sequencer are kept in
pub fn sequencer_keyring_dir(key_dir: &str) -> String {
    format!("{}/sequencer_keys", key_dir)
}

fn is_duplicate(e: &ExecError) -> bool {
    let stderr = e.stderr();
    stderr.contains("already exists") || stderr.contains("override the existing name")
}

fn is_missing(e: &ExecError) -> bool {
    e.stderr().contains("key not found")
}

impl Node {
    /// Adds `name` to the node's test keyring
    pub async fn create_key(&self, name: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let command = self.bin_command(&[
            "keys",
            "add",
            name,
            "--coin-type",
            self.config.coin_type.as_str(),
            "--keyring-backend",
            KEYRING_BACKEND,
        ]);
        self.add_key(name, command).await
    }

    /// Adds `name` to the sequencer keyring under `key_dir`
    pub async fn create_key_with_key_dir(&self, name: &str, key_dir: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let keyring_dir = sequencer_keyring_dir(key_dir);
        let command = vec![
            self.config.bin.clone(),
            "keys".to_string(),
            "add".to_string(),
            name.to_string(),
            "--coin-type".to_string(),
            self.config.coin_type.clone(),
            "--keyring-backend".to_string(),
            KEYRING_BACKEND.to_string(),
            "--keyring-dir".to_string(),
            keyring_dir,
        ];
        self.add_key(name, command).await
    }

    async fn add_key(&self, name: &str, command: Vec<String>) -> Result<()> {
        self.add_key_with_env(name, command, Vec::new()).await
    }

    async fn add_key_with_env(&self, name: &str, command: Vec<String>, env: Vec<String>) -> Result<()> {
        match self.exec(command, env).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate(&e) => Err(anyhow::Error::new(KeyringError::DuplicateKey {
                name: name.to_string(),
            })
            .context(format!("node {}", self.name))),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("node {}: creating key {}", self.name, name))),
        }
    }

    /// Restores `name` from a mnemonic
    ///
    /// The mnemonic reaches the shell through [`MNEMONIC_ENV`] and is never
    /// part of the script text.
    pub async fn recover_key(&self, name: &str, mnemonic: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let script = format!(
            "echo \"${}\" | {} keys add {} --recover --keyring-backend {} --coin-type {} --home {} --output json",
            MNEMONIC_ENV,
            self.config.bin,
            name,
            KEYRING_BACKEND,
            self.config.coin_type,
            self.home_dir()
        );
        let command = vec!["sh".to_string(), "-c".to_string(), script];
        let env = vec![format!("{}={}", MNEMONIC_ENV, mnemonic)];
        self.add_key_with_env(name, command, env).await
    }

    /// Address of `name` in the requested encoding
    pub async fn key_bech32(&self, name: &str, encoding: KeyEncoding) -> Result<String> {
        let mut args = vec![
            "keys",
            "show",
            "--address",
            name,
            "--keyring-backend",
            KEYRING_BACKEND,
        ];
        if let Some(flag) = encoding.flag() {
            args.extend_from_slice(&["--bech", flag]);
        }
        self.show_key(name, self.bin_command(&args)).await
    }

    /// Account address of `name`
    pub async fn account_key_bech32(&self, name: &str) -> Result<String> {
        self.key_bech32(name, KeyEncoding::Account).await
    }

    /// Account address of `name` in the sequencer keyring under `key_dir`
    pub async fn key_bech32_with_key_dir(&self, name: &str, key_dir: &str) -> Result<String> {
        let command = vec![
            self.config.bin.clone(),
            "keys".to_string(),
            "show".to_string(),
            "--address".to_string(),
            name.to_string(),
            "--keyring-backend".to_string(),
            KEYRING_BACKEND.to_string(),
            "--keyring-dir".to_string(),
            sequencer_keyring_dir(key_dir),
        ];
        self.show_key(name, command).await
    }

    async fn show_key(&self, name: &str, command: Vec<String>) -> Result<String> {
        match self.exec(command, Vec::new()).await {
            Ok(output) => {
                let address = output.stdout_trimmed();
                if address.is_empty() {
                    return Err(KeyringError::MissingKey {
                        name: name.to_string(),
                    })
                    .with_context(|| format!("node {}: empty key lookup", self.name));
                }
                Ok(address)
            }
            Err(e) if is_missing(&e) => Err(anyhow::Error::new(KeyringError::MissingKey {
                name: name.to_string(),
            })
            .context(format!("node {}", self.name))),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("node {}: showing key {}", self.name, name))),
        }
    }
}
