//! Configuration file discovery.
//!
//! Collects `.sift.toml` files from the working directory upwards, then the global
//! `~/.sift.toml`.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::parse::is_root_config;

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".sift.toml";

/// Discovers all configuration files relevant to the given directory.
///
/// Returns paths in precedence order: closest to `cwd` first, global last. Discovery
/// stops at the first file with `root = true`; the global file is skipped in that case.
pub fn discover_config_files(cwd: &Path) -> Vec<PathBuf> {
    let mut configs = Vec::new();

    for dir in cwd.ancestors() {
        let candidate = dir.join(CONFIG_FILENAME);
        if !candidate.is_file() {
            continue;
        }
        let is_root = is_root_config(&candidate);
        configs.push(candidate);
        if is_root {
            return configs;
        }
    }

    if let Some(global) = global_config_path()
        && global.is_file()
        && !configs.contains(&global)
    {
        configs.push(global);
    }

    configs
}

/// Returns the path to the global configuration file (`~/.sift.toml`).
///
/// Returns `None` if the home directory cannot be determined.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME))
}

/// Checks if a path is the global configuration file.
pub fn is_global_config(path: &Path) -> bool {
    global_config_path().is_some_and(|global| path == global)
}
