//! Packaging stage: package directory layout, compression and cleanup

pub mod compressor;
pub mod packager;

pub use compressor::*;
pub use packager::*;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Package directory created under the component path
pub const PACKAGE_DIR_NAME: &str = "_package";

/// Compressed artifact created under the component path
pub const COMPRESSED_FILE_NAME: &str = "package.tar.gz";

/// Conventional package directory location for a component
pub fn package_dir(component_path: &Path) -> PathBuf {
    component_path.join(PACKAGE_DIR_NAME)
}

/// Conventional compressed artifact location for a component
pub fn compressed_path(component_path: &Path) -> PathBuf {
    component_path.join(COMPRESSED_FILE_NAME)
}

/// Best-effort removal of the compressed artifact
///
/// A missing file is not an error: cleanup runs unconditionally at the end of
/// a publish run, including runs that failed before the artifact was created.
pub async fn remove_artifact(path: &Path) -> std::io::Result<()> {
    match fs::remove_file(path).await {
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
