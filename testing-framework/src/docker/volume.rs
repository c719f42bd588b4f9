// File: testing-framework/src/docker/volume.rs
//
// Host directory backed volumes
//
// Node homes live under one host directory that is bind-mounted into every
// container, so files can be read and written from the host without going
// through the container runtime.

use super::FileBridge;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

/// [`FileBridge`] over `<root>/<volume>/<rel_path>` on the host
#[derive(Debug, Clone)]
pub struct HostVolumeBridge {
    root: PathBuf,
}

impl HostVolumeBridge {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a volume path, refusing anything that climbs out of the volume
    pub fn resolve(&self, volume: &str, rel_path: &str) -> Result<PathBuf> {
        let rel = Path::new(rel_path);
        for part in Path::new(volume).components().chain(rel.components()) {
            match part {
                Component::Normal(_) | Component::CurDir => {}
                _ => bail!("path {}/{} escapes the volume root", volume, rel_path),
            }
        }
        Ok(self.root.join(volume).join(rel))
    }
}

#[async_trait]
impl FileBridge for HostVolumeBridge {
    async fn write_file(&self, volume: &str, rel_path: &str, content: &[u8]) -> Result<()> {
        let path = self.resolve(volume, rel_path)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        tokio::fs::write(&path, content)
            .await
            .with_context(|| format!("writing {}", path.display()))
    }

    async fn read_file(&self, volume: &str, rel_path: &str) -> Result<Vec<u8>> {
        let path = self.resolve(volume, rel_path)?;
        tokio::fs::read(&path)
            .await
            .with_context(|| format!("reading {}", path.display()))
    }

    async fn copy_dir(
        &self,
        src_volume: &str,
        src_rel: &str,
        dst_volume: &str,
        dst_rel: &str,
    ) -> Result<()> {
        let src = self.resolve(src_volume, src_rel)?;
        let dst = self.resolve(dst_volume, dst_rel)?;
        tokio::task::spawn_blocking(move || copy_tree(&src, &dst))
            .await
            .context("copy task panicked")?
    }
}

fn copy_tree(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst).with_context(|| format!("creating {}", dst.display()))?;
    for entry in std::fs::read_dir(src).with_context(|| format!("listing {}", src.display()))? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)
                .with_context(|| format!("copying to {}", target.display()))?;
        }
    }
    Ok(())
}
