//! Configuration validation.
//!
//! Validates a loaded configuration and reports warnings for potential issues.

use std::{fmt, net::SocketAddr};

use crate::{BackendKind, Config};

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigWarning {
    /// The relational backend is selected but no database is set.
    DatabaseNotConfigured,
    /// The configured database file does not exist.
    DatabaseMissing {
        /// Resolved database path.
        path: String,
    },
    /// The Solr backend is selected but no core URL is set.
    SolrUrlMissing,
    /// The Solr URL is not an http(s) URL.
    SolrUrlInvalid {
        /// The configured URL.
        url: String,
    },
    /// A boost weight is zero or negative, so the field can never raise a score.
    NonPositiveBoost {
        /// Boosted field.
        field: String,
        /// Configured weight.
        weight: f32,
    },
    /// The server bind address does not parse as a socket address.
    InvalidBindAddress {
        /// The configured address.
        bind: String,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DatabaseNotConfigured => {
                write!(f, "relational backend selected but [relational] database is not set")
            }
            Self::DatabaseMissing { path } => write!(f, "database does not exist: {path}"),
            Self::SolrUrlMissing => write!(f, "solr backend selected but [solr] url is not set"),
            Self::SolrUrlInvalid { url } => write!(f, "solr url is not an http(s) URL: {url}"),
            Self::NonPositiveBoost { field, weight } => {
                write!(f, "boost for '{field}' is {weight}; it will never raise a score")
            }
            Self::InvalidBindAddress { bind } => {
                write!(f, "server bind address is not host:port: {bind}")
            }
        }
    }
}

/// Validates the configuration and returns any warnings.
///
/// Only the selected backend's section is checked for completeness; boosts and the
/// bind address are always checked.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    match config.search.backend {
        BackendKind::Relational => match &config.relational.database {
            None => warnings.push(ConfigWarning::DatabaseNotConfigured),
            Some(path) if !path.is_file() => warnings.push(ConfigWarning::DatabaseMissing {
                path: path.display().to_string(),
            }),
            Some(_) => {}
        },
        BackendKind::Solr => match &config.solr.url {
            None => warnings.push(ConfigWarning::SolrUrlMissing),
            Some(url) if !is_http_url(url) => {
                warnings.push(ConfigWarning::SolrUrlInvalid { url: url.clone() });
            }
            Some(_) => {}
        },
    }

    for boost in &config.solr.boosts {
        if boost.weight <= 0.0 {
            warnings.push(ConfigWarning::NonPositiveBoost {
                field: boost.field.clone(),
                weight: boost.weight,
            });
        }
    }

    if config.server.bind.parse::<SocketAddr>().is_err() {
        warnings.push(ConfigWarning::InvalidBindAddress {
            bind: config.server.bind.clone(),
        });
    }

    warnings
}

/// Checks for an `http://` or `https://` prefix followed by something.
fn is_http_url(url: &str) -> bool {
    url.strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .is_some_and(|rest| !rest.is_empty())
}
