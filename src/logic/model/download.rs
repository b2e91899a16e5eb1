//! Model acquisition
//!
//! Makes sure the model file exists before the session is built:
//! downloads it when missing and a source URL is configured, then
//! optionally verifies its SHA-256.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use super::inference::ModelLoadError;

/// Ensure `path` holds the model, fetching it from `url` if needed.
pub fn ensure_model(
    path: &Path,
    url: Option<&str>,
    expected_sha256: Option<&str>,
) -> Result<(), ModelLoadError> {
    if !path.exists() {
        let url = url.ok_or_else(|| ModelLoadError::NotFound(path.to_path_buf()))?;
        download(url, path)?;
    }

    if let Some(expected) = expected_sha256 {
        let actual = file_sha256(path)?;
        if !actual.eq_ignore_ascii_case(expected.trim()) {
            return Err(ModelLoadError::Checksum {
                expected: expected.to_string(),
                actual,
            });
        }
        tracing::info!("Model checksum verified");
    }

    Ok(())
}

/// Download to a sibling temp file, then rename into place so a partial
/// download never looks like a model.
fn download(url: &str, path: &Path) -> Result<(), ModelLoadError> {
    tracing::info!("Model not found at {}, downloading from {}", path.display(), url);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let response = ureq::get(url)
        .call()
        .map_err(|e| ModelLoadError::Download(e.to_string()))?;

    let partial = partial_path(path);
    let written = {
        let mut file = File::create(&partial)?;
        io::copy(&mut response.into_reader(), &mut file)
    };

    match written {
        Ok(bytes) => {
            fs::rename(&partial, path)?;
            tracing::info!("Downloaded model ({} bytes) to {}", bytes, path.display());
            Ok(())
        }
        Err(e) => {
            let _ = fs::remove_file(&partial);
            Err(ModelLoadError::Download(e.to_string()))
        }
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".part");
    path.with_file_name(name)
}

/// Hex SHA-256 of a file
pub fn file_sha256(path: &Path) -> Result<String, ModelLoadError> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}
