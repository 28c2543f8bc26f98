//! Path resolution for configured files.
//!
//! Paths in a config file are relative to the directory holding that file.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::ConfigError;

/// Resolves a configured path against the directory of the config file that set it.
///
/// `~` and `~/...` expand to the home directory, relative paths join onto
/// `config_dir`, and absolute paths pass through. The target need not exist yet:
/// a missing database is reported by validation, not here.
pub fn resolve_path(path: &str, config_dir: &Path) -> Result<PathBuf, ConfigError> {
    let expanded = match path {
        "~" => home_dir()?,
        _ => match path.strip_prefix("~/") {
            Some(rest) => home_dir()?.join(rest),
            None => PathBuf::from(path),
        },
    };

    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        Ok(config_dir.join(expanded))
    }
}

/// Returns the home directory.
fn home_dir() -> Result<PathBuf, ConfigError> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or(ConfigError::NoHomeDirectory)
}
