//! Scratch directory trees for sift-config unit tests.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::TempDir;

use crate::discovery::CONFIG_FILENAME;

/// A temporary directory tree, removed on drop. All paths are relative to its root.
pub struct TestDir(TempDir);

impl TestDir {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self(tempfile::tempdir().unwrap())
    }

    /// Root of the tree.
    pub fn path(&self) -> &Path {
        self.0.path()
    }

    /// Creates `rel` and any missing parents.
    pub fn dir(&self, rel: &str) -> PathBuf {
        let dir = self.path().join(rel);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Writes `contents` to the file `rel`, creating parent directories.
    pub fn file(&self, rel: &str, contents: &str) -> PathBuf {
        let file = self.path().join(rel);
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&file, contents).unwrap();
        file
    }

    /// Writes `.sift.toml` into directory `rel`; `""` is the tree root.
    pub fn config(&self, rel: &str, contents: &str) -> PathBuf {
        let config = self.dir(rel).join(CONFIG_FILENAME);
        fs::write(&config, contents).unwrap();
        config
    }
}
