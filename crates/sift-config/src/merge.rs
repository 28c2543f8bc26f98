//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`,
//! applying precedence rules and resolving paths.

use std::{path::PathBuf, time::Duration};

use sift_query::FieldBoost;

use crate::{
    Config, ConfigError, RelationalSettings, SearchSettings, ServerSettings, SolrFields,
    SolrSettings,
    parse::{
        RawConfig, RawRelationalSettings, RawSearchSettings, RawServerSettings, RawSolrFields,
        RawSolrSettings,
    },
    resolve::resolve_path,
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

impl ParsedConfig {
    /// Directory holding the config file, used to resolve relative paths.
    fn dir(&self) -> PathBuf {
        self.path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_default()
    }
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to CWD),
/// lowest precedence last (global config).
///
/// Merge rules:
/// - Scalar settings: first defined value wins (highest precedence)
/// - Boosts: merged per field; a field keeps its position and takes the winning weight
/// - Filters: the highest-precedence list replaces lower ones wholesale
pub fn merge_configs(configs: &[ParsedConfig]) -> Result<Config, ConfigError> {
    let Some(first) = configs.first() else {
        return Ok(Config::default());
    };

    let mut search = SearchSettings::default();
    let mut relational = RelationalSettings::default();
    let mut solr = SolrSettings::default();
    let mut server = ServerSettings::default();

    // Lowest precedence first so later writes win.
    for parsed in configs.iter().rev() {
        let raw = &parsed.config;
        if let Some(section) = &raw.search {
            apply_search(&mut search, section);
        }
        if let Some(section) = &raw.relational {
            apply_relational(&mut relational, section, parsed)?;
        }
        if let Some(section) = &raw.solr {
            apply_solr(&mut solr, section);
        }
        if let Some(section) = &raw.server {
            apply_server(&mut server, section);
        }
    }

    Ok(Config {
        search,
        relational,
        solr,
        server,
        config_root: Some(first.dir()),
    })
}

/// Applies raw search settings to result.
fn apply_search(result: &mut SearchSettings, raw: &RawSearchSettings) {
    if let Some(v) = raw.backend {
        result.backend = v;
    }
    if let Some(v) = raw.page_size {
        result.page_size = v;
    }
    if let Some(v) = raw.snippet_length {
        result.snippet_length = v;
    }
    if let Some(v) = &raw.highlight_open {
        result.highlight_open.clone_from(v);
    }
    if let Some(v) = &raw.highlight_close {
        result.highlight_close.clone_from(v);
    }
}

/// Applies the relational section, resolving the database path against its file.
fn apply_relational(
    result: &mut RelationalSettings,
    raw: &RawRelationalSettings,
    source: &ParsedConfig,
) -> Result<(), ConfigError> {
    if let Some(database) = &raw.database {
        result.database = Some(resolve_path(database, &source.dir())?);
    }
    Ok(())
}

/// Applies raw Solr settings to result.
fn apply_solr(result: &mut SolrSettings, raw: &RawSolrSettings) {
    if let Some(v) = &raw.url {
        result.url = Some(v.clone());
    }
    if let Some(v) = raw.timeout_secs {
        result.timeout = Duration::from_secs(v);
    }
    if let Some(v) = &raw.filters {
        result.filters.clone_from(v);
    }
    if let Some(boosts) = &raw.boost {
        for (field, &weight) in boosts {
            match result.boosts.iter_mut().find(|b| &b.field == field) {
                Some(existing) => existing.weight = weight,
                None => result.boosts.push(FieldBoost::new(field, weight)),
            }
        }
    }
    if let Some(fields) = &raw.fields {
        apply_fields(&mut result.fields, fields);
    }
}

/// Applies raw Solr field names to result.
fn apply_fields(result: &mut SolrFields, raw: &RawSolrFields) {
    let pairs = [
        (&mut result.id, &raw.id),
        (&mut result.host, &raw.host),
        (&mut result.path, &raw.path),
        (&mut result.secure, &raw.secure),
        (&mut result.title, &raw.title),
        (&mut result.description, &raw.description),
        (&mut result.body, &raw.body),
    ];
    for (slot, value) in pairs {
        if let Some(v) = value {
            slot.clone_from(v);
        }
    }
}

/// Applies raw server settings to result.
fn apply_server(result: &mut ServerSettings, raw: &RawServerSettings) {
    if let Some(v) = &raw.bind {
        result.bind.clone_from(v);
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::{BackendKind, parse::parse_config};

    fn parsed(path: &str, toml: &str) -> ParsedConfig {
        ParsedConfig {
            path: PathBuf::from(path),
            config: parse_config(toml).unwrap(),
        }
    }

    #[test]
    fn test_merge_empty() {
        let config = merge_configs(&[]).unwrap();
        assert!(config.config_root.is_none());
        assert_eq!(config.search.page_size, 20);
    }

    #[test]
    fn test_first_scalar_wins() {
        let configs = [
            parsed("/a/b/.sift.toml", "[search]\npage_size = 5\n"),
            parsed(
                "/a/.sift.toml",
                "[search]\npage_size = 50\nbackend = \"solr\"\n",
            ),
        ];
        let config = merge_configs(&configs).unwrap();
        assert_eq!(config.search.page_size, 5);
        assert_eq!(config.search.backend, BackendKind::Solr);
        assert_eq!(config.config_root.as_deref(), Some(Path::new("/a/b")));
    }

    #[test]
    fn test_database_relative_to_defining_file() {
        let configs = [
            parsed("/a/b/.sift.toml", "[search]\npage_size = 5\n"),
            parsed("/a/.sift.toml", "[relational]\ndatabase = \"index.db\"\n"),
        ];
        let config = merge_configs(&configs).unwrap();
        assert_eq!(
            config.relational.database.as_deref(),
            Some(Path::new("/a/index.db"))
        );
    }

    #[test]
    fn test_boost_override_keeps_order() {
        let configs = [
            parsed("/x/.sift.toml", "[solr.boost]\ntitle = 8\nheadings = 3\n"),
            parsed("/.sift.toml", "[solr.boost]\ntitle = 6\nanchors = 1\n"),
        ];
        let config = merge_configs(&configs).unwrap();
        let fields: Vec<&str> = config
            .solr
            .boosts
            .iter()
            .map(|b| b.field.as_str())
            .collect();
        assert_eq!(
            fields,
            [
                "url",
                "meta_keywords",
                "title",
                "meta_description",
                "content",
                "anchors",
                "headings"
            ]
        );
        let title = config.solr.boosts.iter().find(|b| b.field == "title").unwrap();
        assert_eq!(title.weight, 8.0);
    }

    #[test]
    fn test_filters_replaced_and_fields_merged() {
        let configs = [
            parsed(
                "/x/.sift.toml",
                "[solr]\nfilters = \"lang:en\"\n[solr.fields]\nhost = \"site\"\n",
            ),
            parsed("/.sift.toml", "[solr.fields]\ntitle = \"name\"\nhost = \"h\"\n"),
        ];
        let config = merge_configs(&configs).unwrap();
        assert_eq!(config.solr.filters, ["lang:en"]);
        assert_eq!(config.solr.fields.host, "site");
        assert_eq!(config.solr.fields.title, "name");
        assert_eq!(config.solr.fields.body, "content");
    }

    #[test]
    fn test_server_and_timeout() {
        let configs = [parsed(
            "/srv/.sift.toml",
            "[server]\nbind = \"0.0.0.0:80\"\n[solr]\ntimeout_secs = 2\n",
        )];
        let config = merge_configs(&configs).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:80");
        assert_eq!(config.solr.timeout, Duration::from_secs(2));
    }
}
