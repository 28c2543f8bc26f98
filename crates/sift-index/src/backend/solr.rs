//! Solr backend using the JSON Request API.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sift_config::{SolrFields, SolrSettings};
use sift_query::{BoostedQuery, FieldBoost, Query};

use super::{Coverage, Retrieval, SearchBackend, Signal, Window};
use crate::{BackendError, Document};

/// Largest row offset Solr accepts (`start` is a 32-bit int).
const MAX_START: usize = i32::MAX as usize;

/// Queries a Solr core with an edismax, any-term query over boosted fields.
///
/// Solr ranks and pages on its side, so retrievals are [`Coverage::Windowed`]
/// with `numFound` as the total.
#[derive(Debug, Clone)]
pub struct SolrBackend {
    /// `{core url}/select`.
    select_url: String,
    /// HTTP client carrying the request timeout.
    client: Client,
    /// Filter queries sent with every request.
    filters: Vec<String>,
    /// Boosted query fields.
    boosts: Vec<FieldBoost>,
    /// Document field names.
    fields: SolrFields,
}

/// Body of a JSON Request API call.
#[derive(Debug, Serialize)]
struct SelectRequest<'a> {
    /// Escaped query text.
    query: &'a str,
    /// Rows to skip.
    offset: usize,
    /// Rows to return.
    limit: usize,
    /// Filter queries.
    filter: &'a [String],
    /// Returned fields.
    fields: Vec<&'a str>,
    /// Sort clause.
    sort: &'static str,
    /// Query parser parameters.
    params: SelectParams<'a>,
}

/// Parser parameters of a select request.
#[derive(Debug, Serialize)]
struct SelectParams<'a> {
    /// Query parser.
    #[serde(rename = "defType")]
    def_type: &'static str,
    /// Boosted query fields, e.g. `title^5 content^2`.
    qf: &'a str,
    /// Default operator between terms.
    #[serde(rename = "q.op")]
    operator: &'static str,
}

/// Top-level select response.
#[derive(Debug, Deserialize)]
struct SelectResponse {
    /// Response header carrying the query time.
    #[serde(rename = "responseHeader")]
    header: Option<ResponseHeader>,
    /// Matching documents, absent on errors.
    response: Option<ResponseBody>,
    /// Error description, present on errors.
    error: Option<ErrorBody>,
}

/// Select response header.
#[derive(Debug, Deserialize)]
struct ResponseHeader {
    /// Query time in milliseconds.
    #[serde(rename = "QTime")]
    qtime: Option<u64>,
}

/// Select response body.
#[derive(Debug, Deserialize)]
struct ResponseBody {
    /// Total number of matching documents.
    #[serde(rename = "numFound")]
    num_found: usize,
    /// Documents in the requested window.
    #[serde(default)]
    docs: Vec<Map<String, Value>>,
}

/// Solr error payload.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    /// Error message.
    msg: Option<String>,
}

impl SolrBackend {
    /// Creates a backend from configuration.
    pub fn from_settings(settings: &SolrSettings) -> Result<Self, BackendError> {
        let url = settings
            .url
            .as_deref()
            .ok_or_else(|| BackendError::NotConfigured {
                backend: "solr",
                message: "set [solr] url".to_string(),
            })?;
        Self::new(
            url,
            settings.timeout,
            settings.filters.clone(),
            settings.boosts.clone(),
            settings.fields.clone(),
        )
    }

    /// Creates a backend for the core at `core_url`.
    pub fn new(
        core_url: &str,
        timeout: Duration,
        filters: Vec<String>,
        boosts: Vec<FieldBoost>,
        fields: SolrFields,
    ) -> Result<Self, BackendError> {
        let select_url = format!("{}/select", core_url.trim_end_matches('/'));
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::http(&select_url, e))?;

        Ok(Self {
            select_url,
            client,
            filters,
            boosts,
            fields,
        })
    }

    /// Returns the URL requests are sent to.
    pub fn select_url(&self) -> &str {
        &self.select_url
    }

    /// Sends the select request and decodes a successful response.
    fn send(&self, request: &SelectRequest<'_>) -> Result<SelectResponse, BackendError> {
        let response = self
            .client
            .post(&self.select_url)
            .json(request)
            .send()
            .map_err(|e| BackendError::http(&self.select_url, e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<SelectResponse>()
                .ok()
                .and_then(|r| r.error)
                .and_then(|e| e.msg)
                .unwrap_or_else(|| status.to_string());
            return Err(BackendError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<SelectResponse>()
            .map_err(|e| BackendError::http(&self.select_url, e))
    }

    /// Maps a Solr document onto a [`Document`] and its score.
    fn document(&self, doc: &Map<String, Value>) -> Result<(Document, f64), BackendError> {
        let f = &self.fields;
        let id = field_text(doc, &f.id).ok_or_else(|| BackendError::MalformedDocument {
            id: "?".to_string(),
            field: f.id.clone(),
        })?;
        let required = |name: &str| {
            field_text(doc, name).ok_or_else(|| BackendError::MalformedDocument {
                id: id.clone(),
                field: name.to_string(),
            })
        };

        let document = Document {
            host: required(&f.host)?,
            path: required(&f.path)?,
            title: required(&f.title)?,
            secure: field_flag(doc, &f.secure),
            description: field_text(doc, &f.description).unwrap_or_default(),
            body: field_text(doc, &f.body),
            id: id.clone(),
        };
        let score = doc
            .get("score")
            .and_then(Value::as_f64)
            .ok_or_else(|| BackendError::MalformedDocument {
                id,
                field: "score".to_string(),
            })?;
        Ok((document, score))
    }
}

impl SearchBackend for SolrBackend {
    fn name(&self) -> &'static str {
        "solr"
    }

    fn retrieve(&self, query: &Query, window: Window) -> Result<Retrieval, BackendError> {
        let boosted = BoostedQuery::any_term(query, &self.boosts);
        let f = &self.fields;
        // Past Solr's range no rows can exist; ask for the total only.
        let (offset, limit) = if window.offset > MAX_START {
            (0, 0)
        } else {
            (window.offset, window.limit.min(MAX_START - window.offset))
        };
        let request = SelectRequest {
            query: boosted.text(),
            offset,
            limit,
            filter: &self.filters,
            fields: vec![
                f.id.as_str(),
                f.host.as_str(),
                f.path.as_str(),
                f.secure.as_str(),
                f.title.as_str(),
                f.description.as_str(),
                f.body.as_str(),
                "score",
            ],
            sort: "score desc",
            params: SelectParams {
                def_type: "edismax",
                qf: boosted.fields(),
                operator: boosted.operator(),
            },
        };

        let response = self.send(&request)?;
        let body = response.response.ok_or_else(|| {
            BackendError::UnexpectedResponse("no 'response' section in reply".to_string())
        })?;
        let qtime = response.header.and_then(|h| h.qtime);
        let elapsed = qtime.map(Duration::from_millis);

        let mut documents = Vec::with_capacity(body.docs.len());
        let mut signals = Vec::with_capacity(body.docs.len());
        for doc in &body.docs {
            let (document, score) = self.document(doc)?;
            signals.push(Signal {
                document: documents.len(),
                term: None,
                rank: score,
            });
            documents.push(document);
        }

        tracing::debug!(
            url = %self.select_url,
            total = body.num_found,
            returned = documents.len(),
            qtime_ms = qtime,
            "solr retrieval"
        );

        Ok(Retrieval {
            documents,
            signals,
            coverage: Coverage::Windowed {
                total: body.num_found,
                elapsed,
            },
        })
    }
}

/// Reads a field as text. Multi-valued fields yield their first value.
fn field_text(doc: &Map<String, Value>, name: &str) -> Option<String> {
    match doc.get(name)? {
        Value::Array(values) => values.first().and_then(scalar_text),
        value => scalar_text(value),
    }
}

/// Renders a scalar JSON value as text.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Reads a boolean flag, accepting `true`, `1` and `"true"`. Absent means false.
fn field_flag(doc: &Map<String, Value>, name: &str) -> bool {
    let value = match doc.get(name) {
        Some(Value::Array(values)) => values.first(),
        other => other,
    };
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_i64() == Some(1),
        Some(Value::String(s)) => s == "true" || s == "1",
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io::{BufRead, BufReader, Read, Write},
        net::TcpListener,
        sync::mpsc,
        thread,
    };

    use serde_json::json;
    use sift_query::default_boosts;

    use super::*;

    /// Serves one HTTP response on a loopback port and reports the request body.
    fn serve_once(status: &'static str, body: String) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/solr/web", listener.local_addr().unwrap());
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut content_length = 0;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                let line = line.trim_end();
                if line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':')
                    && name.eq_ignore_ascii_case("content-length")
                {
                    content_length = value.trim().parse().unwrap();
                }
            }
            let mut request = vec![0; content_length];
            reader.read_exact(&mut request).unwrap();
            tx.send(String::from_utf8(request).unwrap()).unwrap();

            let mut stream = reader.into_inner();
            write!(
                stream,
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();
        });

        (url, rx)
    }

    fn backend(url: &str) -> SolrBackend {
        SolrBackend::new(
            url,
            Duration::from_secs(5),
            vec!["title:[* TO *]".to_string()],
            default_boosts(),
            SolrFields::default(),
        )
        .unwrap()
    }

    #[test]
    fn maps_documents_and_totals() {
        let reply = json!({
            "responseHeader": {"status": 0, "QTime": 7},
            "response": {"numFound": 45, "start": 20, "docs": [
                {"id": "a", "domain": "example.com", "path": ["/cats"], "is_https": true,
                 "title": ["Cats"], "meta_description": "", "content": "Cats purr.", "score": 2.5},
                {"id": "b", "domain": "example.org", "path": "/dogs",
                 "title": "Dogs", "score": 1.0}
            ]}
        });
        let (url, request) = serve_once("200 OK", reply.to_string());

        let query = Query::parse("Cat dog").unwrap();
        let retrieval = backend(&url)
            .retrieve(&query, Window::for_page(2, 20))
            .unwrap();

        assert_eq!(
            retrieval.coverage,
            Coverage::Windowed {
                total: 45,
                elapsed: Some(Duration::from_millis(7))
            }
        );
        assert_eq!(retrieval.documents.len(), 2);
        assert_eq!(retrieval.documents[0].url(), "https://example.com/cats");
        assert_eq!(retrieval.documents[0].title, "Cats");
        assert_eq!(retrieval.documents[0].body.as_deref(), Some("Cats purr."));
        assert_eq!(retrieval.documents[1].url(), "http://example.org/dogs");
        assert_eq!(retrieval.documents[1].description, "");
        assert_eq!(retrieval.signals[0].rank, 2.5);
        assert_eq!(retrieval.signals[1].document, 1);

        let sent: Value = serde_json::from_str(&request.recv().unwrap()).unwrap();
        assert_eq!(sent["query"], "cat dog");
        assert_eq!(sent["offset"], 20);
        assert_eq!(sent["limit"], 20);
        assert_eq!(sent["sort"], "score desc");
        assert_eq!(sent["filter"][0], "title:[* TO *]");
        assert_eq!(sent["params"]["defType"], "edismax");
        assert_eq!(sent["params"]["q.op"], "OR");
        assert_eq!(
            sent["params"]["qf"],
            "url^15 meta_keywords^10 title^5 meta_description^4 content^2"
        );
    }

    #[test]
    fn offset_past_solr_range_asks_for_total_only() {
        let reply = json!({"response": {"numFound": 45, "start": 0, "docs": []}});
        let (url, request) = serve_once("200 OK", reply.to_string());

        let window = Window::for_page(200_000_000, 20);
        assert!(window.offset > MAX_START);
        let retrieval = backend(&url)
            .retrieve(&Query::parse("cat").unwrap(), window)
            .unwrap();

        assert!(retrieval.documents.is_empty());
        assert_eq!(
            retrieval.coverage,
            Coverage::Windowed {
                total: 45,
                elapsed: None
            }
        );
        let sent: Value = serde_json::from_str(&request.recv().unwrap()).unwrap();
        assert_eq!(sent["offset"], 0);
        assert_eq!(sent["limit"], 0);
    }

    #[test]
    fn missing_title_is_malformed() {
        let reply = json!({
            "response": {"numFound": 1, "docs": [
                {"id": "a", "domain": "example.com", "path": "/", "score": 1.0}
            ]}
        });
        let (url, _request) = serve_once("200 OK", reply.to_string());
        let err = backend(&url)
            .retrieve(&Query::parse("x").unwrap(), Window::for_page(1, 20))
            .unwrap_err();
        match err {
            BackendError::MalformedDocument { id, field } => {
                assert_eq!(id, "a");
                assert_eq!(field, "title");
            }
            other => panic!("expected MalformedDocument, got {other:?}"),
        }
    }

    #[test]
    fn error_status_carries_solr_message() {
        let reply = json!({"error": {"msg": "undefined field foo", "code": 400}});
        let (url, _request) = serve_once("400 Bad Request", reply.to_string());
        let err = backend(&url)
            .retrieve(&Query::parse("x").unwrap(), Window::for_page(1, 20))
            .unwrap_err();
        match err {
            BackendError::Status { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "undefined field foo");
            }
            other => panic!("expected Status, got {other:?}"),
        }
    }

    #[test]
    fn unreachable_core_is_http_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/solr/web", listener.local_addr().unwrap());
        drop(listener);

        let err = backend(&url)
            .retrieve(&Query::parse("x").unwrap(), Window::for_page(1, 20))
            .unwrap_err();
        assert!(matches!(err, BackendError::Http { .. }));
    }

    #[test]
    fn select_url_strips_trailing_slash() {
        let backend = backend("http://localhost:8983/solr/web/");
        assert_eq!(backend.select_url(), "http://localhost:8983/solr/web/select");
    }

    #[test]
    fn flag_parsing() {
        let doc = json!({"a": 1, "b": "true", "c": [false], "d": "no"});
        let doc = doc.as_object().unwrap();
        assert!(field_flag(doc, "a"));
        assert!(field_flag(doc, "b"));
        assert!(!field_flag(doc, "c"));
        assert!(!field_flag(doc, "d"));
        assert!(!field_flag(doc, "missing"));
    }
}
