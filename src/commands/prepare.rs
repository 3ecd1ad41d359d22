//! Prepare a per-document output folder (`-n`).
//!
//! Only the output directory is reset; nothing is transcribed in this mode yet.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};

/// Resets `<output_root>/<document>_data` to an existing, empty directory.
///
/// Only the file name of `document` is used, so paths cannot escape the
/// output root.
///
/// # Errors
/// - If `document` has no file name component
/// - If the directory cannot be removed or created
pub fn handle_prepare(document: &Path, output_root: &Path) -> Result<PathBuf, anyhow::Error> {
    tracing::info!("=== imgscribe Prepare Command ===");

    let output_path = output_dir_for(document, output_root)?;
    reset_output_dir(&output_path)?;

    tracing::info!("Output directory ready: {}", output_path.display());
    Ok(output_path)
}

/// Returns `<output_root>/<file name>_data` for a document.
///
/// # Errors
/// - If `document` has no file name component (e.g. `..` or `/`)
pub fn output_dir_for(document: &Path, output_root: &Path) -> Result<PathBuf, anyhow::Error> {
    let name = document
        .file_name()
        .ok_or_else(|| anyhow!("Invalid document name: '{}'", document.display()))?
        .to_string_lossy();
    Ok(output_root.join(format!("{name}_data")))
}

/// Removes `path` if present, then recreates it empty.
///
/// # Errors
/// - If an existing directory cannot be removed
/// - If the directory cannot be created
pub fn reset_output_dir(path: &Path) -> Result<(), anyhow::Error> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => tracing::debug!("Removed existing output directory {}", path.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to clear {}", path.display()));
        }
    }

    create_private_dir(path).with_context(|| format!("Failed to create {}", path.display()))
}

#[cfg(unix)]
fn create_private_dir(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    std::fs::DirBuilder::new()
        .recursive(true)
        .mode(0o700)
        .create(path)
}

#[cfg(not(unix))]
fn create_private_dir(path: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(path)
}
