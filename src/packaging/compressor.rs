//! Artifact compressor
//!
//! Archives the package directory into a single gzip-compressed tarball.

use anyhow::Context;
use async_trait::async_trait;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Compressor collaborator contract
#[async_trait]
pub trait Compressor: Send + Sync {
    /// Produce a single compressed file at `dest` from `package_dir`
    async fn compress(&self, package_dir: &Path, dest: &Path) -> anyhow::Result<()>;
}

/// tar + gzip compressor
#[derive(Debug, Default)]
pub struct TarGzCompressor;

impl TarGzCompressor {
    pub fn new() -> Self {
        Self
    }

    fn compress_blocking(package_dir: PathBuf, dest: PathBuf) -> anyhow::Result<()> {
        let file =
            File::create(&dest).with_context(|| format!("creating {}", dest.display()))?;
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = tar::Builder::new(encoder);

        builder
            .append_dir_all(".", &package_dir)
            .with_context(|| format!("archiving {}", package_dir.display()))?;
        builder.into_inner()?.finish()?;

        Ok(())
    }
}

#[async_trait]
impl Compressor for TarGzCompressor {
    async fn compress(&self, package_dir: &Path, dest: &Path) -> anyhow::Result<()> {
        let package_dir = package_dir.to_path_buf();
        let dest = dest.to_path_buf();
        tokio::task::spawn_blocking(move || Self::compress_blocking(package_dir, dest)).await?
    }
}
