//! API key storage in a plain-text key file.

use std::fs;
use std::path::{Path, PathBuf};

use datalink_types::DataLinkError;

/// Key file location relative to the home directory.
pub const DEFAULT_KEY_FILE: &str = ".nasdaq/data_link_apikey";

/// `~/.nasdaq/data_link_apikey`, or `None` when no home directory is known.
#[must_use]
pub fn default_key_path() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .filter(|h| !h.is_empty())
        .map(|home| PathBuf::from(home).join(DEFAULT_KEY_FILE))
}

fn resolve(path: Option<&Path>) -> Result<PathBuf, DataLinkError> {
    path.map(Path::to_path_buf)
        .or_else(default_key_path)
        .ok_or_else(|| DataLinkError::invalid_arg("no key file given and no home directory found"))
}

/// Write `key` to `path` (default: [`default_key_path`]), creating parent
/// directories as needed.
///
/// # Errors
/// Returns `InvalidArg` for an empty key or when the file cannot be written.
pub fn save_key(key: &str, path: Option<&Path>) -> Result<PathBuf, DataLinkError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(DataLinkError::invalid_arg("refusing to save an empty API key"));
    }
    let path = resolve(path)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            DataLinkError::invalid_arg(format!("cannot create '{}': {e}", parent.display()))
        })?;
    }
    fs::write(&path, key)
        .map_err(|e| DataLinkError::invalid_arg(format!("cannot write '{}': {e}", path.display())))?;
    Ok(path)
}

/// Read the key stored at `path` (default: [`default_key_path`]).
///
/// Surrounding whitespace is trimmed.
///
/// # Errors
/// Returns `InvalidArg` when the file is missing, unreadable, or empty.
pub fn read_key(path: Option<&Path>) -> Result<String, DataLinkError> {
    let path = resolve(path)?;
    let raw = fs::read_to_string(&path).map_err(|e| {
        DataLinkError::invalid_arg(format!(
            "cannot read '{}': {e}; save a key with save_key first",
            path.display()
        ))
    })?;
    let key = raw.trim();
    if key.is_empty() {
        return Err(DataLinkError::invalid_arg(format!(
            "'{}' is empty; save a key with save_key first",
            path.display()
        )));
    }
    Ok(key.to_string())
}
