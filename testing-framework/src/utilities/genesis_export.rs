// File: testing-framework/src/utilities/genesis_export.rs
//
// Setting EXPORT_GENESIS_FILE_PATH and EXPORT_GENESIS_CHAIN dumps the genesis
// the named chain distributes to its nodes, which is the quickest way to see
// why a chain refuses to start.

use anyhow::{Context, Result};
use rollup_e2e_common::config::{ENV_EXPORT_GENESIS_CHAIN, ENV_EXPORT_GENESIS_FILE_PATH};
use std::path::{Path, PathBuf};

/// Writes `genesis` to `path` when `target_chain` names `chain_name`
///
/// Returns the written path, `None` when the export does not apply.
pub fn export_genesis(
    path: Option<&Path>,
    target_chain: Option<&str>,
    chain_name: &str,
    genesis: &[u8],
) -> Result<Option<PathBuf>> {
    let (Some(path), Some(target)) = (path, target_chain) else {
        return Ok(None);
    };
    if target != chain_name {
        return Ok(None);
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    std::fs::write(path, genesis)
        .with_context(|| format!("exporting genesis of {} to {}", chain_name, path.display()))?;
    restrict_permissions(path)?;
    log::info!("exported genesis of {} to {}", chain_name, path.display());
    Ok(Some(path.to_path_buf()))
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .with_context(|| format!("restricting permissions of {}", path.display()))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

/// [`export_genesis`] driven by the process environment
pub fn export_genesis_from_env(chain_name: &str, genesis: &[u8]) -> Result<Option<PathBuf>> {
    let path = std::env::var_os(ENV_EXPORT_GENESIS_FILE_PATH).map(PathBuf::from);
    let target = std::env::var(ENV_EXPORT_GENESIS_CHAIN).ok();
    export_genesis(path.as_deref(), target.as_deref(), chain_name, genesis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_only_for_named_chain() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/genesis.json");

        let skipped = export_genesis(Some(&path), Some("rollapp1"), "dymension", b"{}").unwrap();
        assert!(skipped.is_none());
        assert!(!path.exists());

        let written = export_genesis(Some(&path), Some("dymension"), "dymension", b"{\"a\":1}").unwrap();
        assert_eq!(written.as_deref(), Some(path.as_path()));
        assert_eq!(std::fs::read(&path).unwrap(), b"{\"a\":1}");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn test_export_needs_both_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genesis.json");
        assert!(export_genesis(Some(&path), None, "hub", b"{}").unwrap().is_none());
        assert!(export_genesis(None, Some("hub"), "hub", b"{}").unwrap().is_none());
    }
}
