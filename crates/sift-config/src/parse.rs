//! Configuration file parsing.
//!
//! Parses individual `.sift.toml` files into intermediate `RawConfig` structures
//! that preserve the optional nature of all fields before merging.

use std::{collections::BTreeMap, fs, path::Path};

use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};
#[cfg(test)]
use toml::de::Error as TomlError;

use crate::{BackendKind, ConfigError};

/// Raw configuration as parsed directly from a TOML file.
///
/// All fields are optional to support partial configs that will be merged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawConfig {
    /// When true, stop discovery here - ignore parent and global configs.
    pub root: Option<bool>,
    /// Search settings section.
    pub search: Option<RawSearchSettings>,
    /// Relational backend section.
    pub relational: Option<RawRelationalSettings>,
    /// Solr backend section.
    pub solr: Option<RawSolrSettings>,
    /// HTTP server section.
    pub server: Option<RawServerSettings>,
}

/// Raw search settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawSearchSettings {
    /// Which backend answers queries.
    pub backend: Option<BackendKind>,
    /// Results per page.
    pub page_size: Option<usize>,
    /// Character budget for snippets cut from body text.
    pub snippet_length: Option<usize>,
    /// Marker inserted before each highlighted term.
    pub highlight_open: Option<String>,
    /// Marker inserted after each highlighted term.
    pub highlight_close: Option<String>,
}

/// Raw relational backend settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawRelationalSettings {
    /// Path to the SQLite database, relative to the config file.
    pub database: Option<String>,
}

/// Raw Solr backend settings.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawSolrSettings {
    /// Core URL, e.g. `http://localhost:8983/solr/search_engine`.
    pub url: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Filter queries. Accepts a single string or an array.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub filters: Option<Vec<String>>,
    /// Per-field boost weights.
    pub boost: Option<BTreeMap<String, f32>>,
    /// Document field names.
    pub fields: Option<RawSolrFields>,
}

/// Raw Solr field-name mapping.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawSolrFields {
    /// Unique document identifier field.
    pub id: Option<String>,
    /// Host name field.
    pub host: Option<String>,
    /// URL path field.
    pub path: Option<String>,
    /// Secure-origin (https) flag field.
    pub secure: Option<String>,
    /// Title field.
    pub title: Option<String>,
    /// Short description field.
    pub description: Option<String>,
    /// Full body text field.
    pub body: Option<String>,
}

/// Raw HTTP server settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawServerSettings {
    /// Socket address to listen on.
    pub bind: Option<String>,
}

/// Parses a configuration file from disk.
///
/// Returns a `RawConfig` with all fields as optionals, ready for merging.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    let config: RawConfig = toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })?;
    check_ranges(&config, path)?;
    Ok(config)
}

/// Parses configuration from a TOML string without path context (tests only).
#[cfg(test)]
pub fn parse_config(contents: &str) -> Result<RawConfig, TomlError> {
    toml::from_str(contents)
}

/// Checks if a config file has `root = true` set.
///
/// Returns false if the file cannot be read or parsed.
pub fn is_root_config(path: &Path) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(config) = toml::from_str::<RawConfig>(&contents) else {
        return false;
    };
    config.root == Some(true)
}

/// Rejects values that would make searching impossible.
fn check_ranges(config: &RawConfig, path: &Path) -> Result<(), ConfigError> {
    let invalid = |key: &str, message: &str| ConfigError::InvalidValue {
        path: path.to_path_buf(),
        key: key.to_string(),
        message: message.to_string(),
    };

    if let Some(search) = &config.search
        && search.page_size == Some(0)
    {
        return Err(invalid("search.page_size", "must be at least 1"));
    }
    if let Some(solr) = &config.solr
        && solr.timeout_secs == Some(0)
    {
        return Err(invalid("solr.timeout_secs", "must be at least 1"));
    }
    Ok(())
}
