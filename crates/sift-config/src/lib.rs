//! Configuration system for sift.
//!
//! sift uses TOML configuration files named `.sift.toml`. Configuration is resolved by
//! walking up the directory tree from the current working directory, collecting any
//! `.sift.toml` files found, then loading `~/.sift.toml` as the global config with
//! lowest precedence.

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod resolve;
mod templates;
#[cfg(test)]
mod test_support;
mod validate;

use std::{
    collections::BTreeMap,
    fmt,
    path::{Path, PathBuf},
    time::Duration,
};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawConfig, RawRelationalSettings, RawSearchSettings, RawServerSettings, RawSolrFields,
    RawSolrSettings, parse_config_file, parse_config_str,
};
pub use resolve::resolve_path;
use serde::{Deserialize, Serialize};
use sift_query::{FieldBoost, default_boosts};
pub use templates::{global_template, local_template};
pub use validate::ConfigWarning;
use validate::validate_config;

/// Top-level merged configuration for sift.
///
/// This represents the fully resolved configuration after merging all discovered
/// `.sift.toml` files according to precedence rules.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Search-related settings.
    pub search: SearchSettings,
    /// Relational backend settings.
    pub relational: RelationalSettings,
    /// Solr backend settings.
    pub solr: SolrSettings,
    /// HTTP server settings.
    pub server: ServerSettings,
    /// Directory containing the most specific config file.
    pub config_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.sift.toml` files.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        if files.is_empty() {
            return Ok(Self::default());
        }

        let parsed: Vec<ParsedConfig> = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        merge_configs(&parsed)
    }

    /// Validates the configuration and returns any warnings.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Serializes the effective settings to TOML format.
    pub fn settings_to_toml(&self) -> Result<String, toml::ser::Error> {
        let serializable = SerializableConfig {
            search: self.search.clone(),
            relational: SerializableRelational {
                database: self
                    .relational
                    .database
                    .as_ref()
                    .map(|p| p.display().to_string()),
            },
            solr: SerializableSolr::from(&self.solr),
            server: self.server.clone(),
        };
        toml::to_string_pretty(&serializable)
    }
}

/// Backend answering search queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Keyword-ranking tables in a SQLite database.
    #[default]
    Relational,
    /// An external Solr core.
    Solr,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Relational => write!(f, "relational"),
            Self::Solr => write!(f, "solr"),
        }
    }
}

/// Search-related settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Which backend answers queries.
    pub backend: BackendKind,
    /// Results per page.
    pub page_size: usize,
    /// Character budget for snippets cut from body text.
    pub snippet_length: usize,
    /// Marker inserted before each highlighted term.
    pub highlight_open: String,
    /// Marker inserted after each highlighted term.
    pub highlight_close: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            page_size: 20,
            snippet_length: 350,
            highlight_open: String::from("<b>"),
            highlight_close: String::from("</b>"),
        }
    }
}

/// Relational backend settings.
#[derive(Debug, Clone, Default)]
pub struct RelationalSettings {
    /// Resolved path to the SQLite database.
    pub database: Option<PathBuf>,
}

/// Solr backend settings.
#[derive(Debug, Clone)]
pub struct SolrSettings {
    /// Core URL (including the core name).
    pub url: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
    /// Filter queries applied to every search.
    pub filters: Vec<String>,
    /// Boosted fields, defaults first in canonical order, extra fields after.
    pub boosts: Vec<FieldBoost>,
    /// Document field names.
    pub fields: SolrFields,
}

impl Default for SolrSettings {
    fn default() -> Self {
        Self {
            url: None,
            timeout: Duration::from_secs(10),
            filters: vec![
                String::from("title:[* TO *]"),
                String::from("content:[* TO *]"),
            ],
            boosts: default_boosts(),
            fields: SolrFields::default(),
        }
    }
}

/// Names of the Solr document fields mapped onto a result document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SolrFields {
    /// Unique document identifier.
    pub id: String,
    /// Host name.
    pub host: String,
    /// URL path.
    pub path: String,
    /// Secure-origin (https) flag.
    pub secure: String,
    /// Title.
    pub title: String,
    /// Short description.
    pub description: String,
    /// Full body text.
    pub body: String,
}

impl Default for SolrFields {
    fn default() -> Self {
        Self {
            id: String::from("id"),
            host: String::from("domain"),
            path: String::from("path"),
            secure: String::from("is_https"),
            title: String::from("title"),
            description: String::from("meta_description"),
            body: String::from("content"),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: String::from("127.0.0.1:8080"),
        }
    }
}

/// Internal struct for TOML serialization of settings.
#[derive(Serialize)]
struct SerializableConfig {
    /// Search-related settings.
    search: SearchSettings,
    /// Relational backend settings.
    relational: SerializableRelational,
    /// Solr backend settings.
    solr: SerializableSolr,
    /// HTTP server settings.
    server: ServerSettings,
}

/// Relational settings with the database path rendered as a string.
#[derive(Serialize)]
struct SerializableRelational {
    /// Database path, omitted when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<String>,
}

/// Solr settings with boosts as a sorted table for deterministic TOML output.
#[derive(Serialize)]
struct SerializableSolr {
    /// Core URL, omitted when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    /// Request timeout in seconds.
    timeout_secs: u64,
    /// Filter queries.
    filters: Vec<String>,
    /// Field weights.
    boost: BTreeMap<String, f32>,
    /// Document field names.
    fields: SolrFields,
}

impl From<&SolrSettings> for SerializableSolr {
    fn from(solr: &SolrSettings) -> Self {
        Self {
            url: solr.url.clone(),
            timeout_secs: solr.timeout.as_secs(),
            filters: solr.filters.clone(),
            boost: solr
                .boosts
                .iter()
                .map(|b| (b.field.clone(), b.weight))
                .collect(),
            fields: solr.fields.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_settings_defaults() {
        let search = SearchSettings::default();
        assert_eq!(search.backend, BackendKind::Relational);
        assert_eq!(search.page_size, 20);
        assert_eq!(search.snippet_length, 350);
        assert_eq!(search.highlight_open, "<b>");
        assert_eq!(search.highlight_close, "</b>");
    }

    #[test]
    fn test_solr_settings_defaults() {
        let solr = SolrSettings::default();
        assert!(solr.url.is_none());
        assert_eq!(solr.timeout, Duration::from_secs(10));
        assert_eq!(solr.boosts.len(), 5);
        assert_eq!(solr.boosts[0], FieldBoost::new("url", 15.0));
        assert_eq!(solr.fields.host, "domain");
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.relational.database.is_none());
        assert!(config.config_root.is_none());
        assert_eq!(config.server.bind, "127.0.0.1:8080");
    }

    #[test]
    fn test_backend_kind_display() {
        assert_eq!(BackendKind::Relational.to_string(), "relational");
        assert_eq!(BackendKind::Solr.to_string(), "solr");
    }

    #[test]
    fn test_settings_to_toml() {
        let config = Config::default();
        let toml = config.settings_to_toml().unwrap();

        assert!(toml.contains("[search]"));
        assert!(toml.contains("[solr]"));
        assert!(toml.contains("[solr.boost]"));
        assert!(toml.contains("[server]"));
        assert!(toml.contains("page_size = 20"));
        assert!(toml.contains("backend = \"relational\""));

        let parsed: toml::Value =
            toml::from_str(&toml).expect("settings_to_toml should produce valid TOML");
        assert!(parsed.get("search").is_some());
        assert_eq!(
            parsed["solr"]["boost"]["url"].as_float(),
            Some(15.0),
        );
    }
}
