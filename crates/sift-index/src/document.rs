//! Result documents.

/// A page returned by a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Backend-unique identifier (path id or Solr document id).
    pub id: String,
    /// Whether the page is served over https.
    pub secure: bool,
    /// Host name, e.g. `example.com`.
    pub host: String,
    /// URL path, e.g. `/about`.
    pub path: String,
    /// Page title. Empty when the page has none.
    pub title: String,
    /// Page description. Empty when the page has none.
    pub description: String,
    /// Full body text, when the backend stores it.
    pub body: Option<String>,
}

impl Document {
    /// Returns the absolute URL: scheme, host, then path.
    pub fn url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{scheme}://{}{}", self.host, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(secure: bool, host: &str, path: &str) -> Document {
        Document {
            id: "1".into(),
            secure,
            host: host.into(),
            path: path.into(),
            title: String::new(),
            description: String::new(),
            body: None,
        }
    }

    #[test]
    fn url_uses_scheme_from_flag() {
        assert_eq!(doc(true, "example.com", "/a").url(), "https://example.com/a");
        assert_eq!(doc(false, "example.com", "/a").url(), "http://example.com/a");
    }

    #[test]
    fn url_with_empty_path() {
        assert_eq!(doc(false, "example.com", "").url(), "http://example.com");
    }
}
