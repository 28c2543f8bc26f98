//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
};

use sift_config::{BackendKind, Config};
use sift_index::{SearchBackend, SearchEngine, open_backend};

/// Engine over whichever backend the configuration selects.
pub type Engine = SearchEngine<Box<dyn SearchBackend>>;

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (may be default if no config files found).
    pub config: Config,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    pub fn load() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = load_config_or_failure(&cwd)?;
        Ok(Self { cwd, config })
    }

    /// Loads only the current directory, skipping configuration parsing.
    ///
    /// Used for `init`, which should work even when an existing config file is
    /// invalid.
    pub fn load_cwd_only() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        Ok(Self {
            cwd,
            config: Config::default(),
        })
    }

    /// Builds a search engine for the configured backend, or `kind` when given.
    pub fn engine(&self, kind: Option<BackendKind>) -> Result<Engine, ExitCode> {
        let kind = kind.unwrap_or(self.config.search.backend);
        match open_backend(&self.config, kind) {
            Ok(backend) => {
                tracing::debug!(backend = backend.name(), "backend ready");
                Ok(SearchEngine::new(backend, &self.config.search))
            }
            Err(e) => {
                eprintln!("error: {e}");
                eprintln!("Run 'sift check' to diagnose the configuration.");
                Err(ExitCode::FAILURE)
            }
        }
    }
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

/// Loads configuration from the provided directory or exits with an error.
fn load_config_or_failure(cwd: &Path) -> Result<Config, ExitCode> {
    Config::load(cwd).map_err(|e| {
        eprintln!("error: failed to load configuration: {e}");
        ExitCode::FAILURE
    })
}
