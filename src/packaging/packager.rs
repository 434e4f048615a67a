//! Component packager
//!
//! Turns a component source directory into a publish-ready package directory
//! at the conventional `_package` location and reads the component manifest
//! back from the packaged tree.

use super::{COMPRESSED_FILE_NAME, PACKAGE_DIR_NAME, package_dir};
use anyhow::{Context, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use walkdir::WalkDir;

/// Component manifest file name
pub const MANIFEST_FILE_NAME: &str = "component.json";

/// Metadata read back from the packaged component's manifest
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentManifest {
    pub name: String,
    pub version: String,
}

/// Packager collaborator contract
#[async_trait]
pub trait Packager: Send + Sync {
    /// Produce the package directory and return the component metadata
    async fn package(&self, component_path: &Path) -> anyhow::Result<ComponentManifest>;
}

/// Filesystem packager copying the component tree into `_package`
#[derive(Debug, Default)]
pub struct DirPackager;

impl DirPackager {
    pub fn new() -> Self {
        Self
    }

    fn validate_manifest(manifest: &ComponentManifest) -> anyhow::Result<()> {
        if manifest.name.trim().is_empty() {
            bail!("component name is empty");
        }
        semver::Version::parse(&manifest.version)
            .with_context(|| format!("invalid component version '{}'", manifest.version))?;
        Ok(())
    }

    fn copy_tree(component_path: PathBuf, dest: PathBuf) -> anyhow::Result<()> {
        if dest.exists() {
            std::fs::remove_dir_all(&dest)
                .with_context(|| format!("removing stale {}", dest.display()))?;
        }
        std::fs::create_dir_all(&dest)?;

        for entry in WalkDir::new(&component_path)
            .min_depth(1)
            .into_iter()
            .filter_entry(|e| {
                let name = e.file_name().to_string_lossy();
                name != PACKAGE_DIR_NAME && name != COMPRESSED_FILE_NAME && name != ".git"
            })
        {
            let entry = entry?;
            let relative = entry.path().strip_prefix(&component_path)?;
            let target = dest.join(relative);

            if entry.file_type().is_dir() {
                std::fs::create_dir_all(&target)?;
            } else if entry.file_type().is_file() {
                if let Some(parent) = target.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::copy(entry.path(), &target)
                    .with_context(|| format!("copying {}", entry.path().display()))?;
            }
        }

        Ok(())
    }
}

#[async_trait]
impl Packager for DirPackager {
    async fn package(&self, component_path: &Path) -> anyhow::Result<ComponentManifest> {
        let metadata = fs::metadata(component_path)
            .await
            .with_context(|| format!("component path {}", component_path.display()))?;
        if !metadata.is_dir() {
            bail!("{} is not a directory", component_path.display());
        }

        let dest = package_dir(component_path);
        let source = component_path.to_path_buf();
        let copy_dest = dest.clone();
        tokio::task::spawn_blocking(move || Self::copy_tree(source, copy_dest)).await??;

        // Metadata is read back from the packaged tree, not the source tree.
        let manifest_path = dest.join(MANIFEST_FILE_NAME);
        let content = fs::read_to_string(&manifest_path)
            .await
            .with_context(|| format!("reading {}", manifest_path.display()))?;
        let manifest: ComponentManifest = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", manifest_path.display()))?;

        Self::validate_manifest(&manifest)?;
        Ok(manifest)
    }
}
