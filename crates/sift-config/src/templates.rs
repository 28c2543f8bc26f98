//! Starter files written by `sift init`.
//!
//! The sources under `templates/` are live TOML, so they are parsed in tests and
//! cannot drift from the settings they describe. What `init` writes is the same
//! file with every setting commented out: a fresh `.sift.toml` changes nothing
//! until the user uncomments a line.

/// Project template source.
const LOCAL: &str = include_str!("../templates/config.toml");

/// `~/.sift.toml` template source.
const GLOBAL: &str = include_str!("../templates/config-global.toml");

/// Returns the project `.sift.toml` written by `sift init`.
pub fn local_template() -> String {
    disable_settings(LOCAL)
}

/// Returns the `~/.sift.toml` written by `sift init --global`.
pub fn global_template() -> String {
    disable_settings(GLOBAL)
}

/// Prefixes every setting and table header with `# `, keeping prose and blank lines.
fn disable_settings(source: &str) -> String {
    source
        .lines()
        .map(|line| match line {
            "" => String::new(),
            l if l.starts_with('#') => l.to_string(),
            l => format!("# {l}"),
        })
        .map(|line| line + "\n")
        .collect()
}
