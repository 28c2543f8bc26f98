//! Implementation of `sift serve`.
//!
//! Serves `GET /search?q=...&page=...` as JSON. Searches run on the blocking pool
//! since both backends do blocking I/O.

use std::{process::ExitCode, sync::Arc};

use axum::{Extension, Json, Router, extract::Query, http::StatusCode, routing::get};
use serde::Deserialize;
use serde_json::{Value, json};
use sift_index::{SearchError, SearchOutcome, SearchRequest};
use tokio::{net::TcpListener, runtime::Builder, task};

use crate::cli::{
    args::ServeCommand,
    context::{CommandContext, Engine},
    output::JsonSearchOutput,
};

/// Query string of a search request.
#[derive(Debug, Deserialize)]
struct SearchParams {
    /// Query text.
    q: Option<String>,
    /// Requested page; anything unparseable means page 1.
    page: Option<String>,
}

/// Highlight markers used in JSON responses.
#[derive(Debug, Clone)]
struct Markers {
    /// Inserted before each match.
    open: String,
    /// Inserted after each match.
    close: String,
}

/// Starts the HTTP server and blocks until it stops.
pub fn run(ctx: &CommandContext, cmd: &ServeCommand) -> ExitCode {
    let engine = match ctx.engine(cmd.backend.map(Into::into)) {
        Ok(engine) => Arc::new(engine),
        Err(code) => return code,
    };
    let bind = cmd
        .bind
        .clone()
        .unwrap_or_else(|| ctx.config.server.bind.clone());
    let markers = Markers {
        open: ctx.config.search.highlight_open.clone(),
        close: ctx.config.search.highlight_close.clone(),
    };

    let runtime = match Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    // The engine may own a blocking HTTP client, which must not be dropped inside
    // the runtime; this handle outlives it.
    let app = router(Arc::clone(&engine), markers);
    let result = runtime.block_on(async move {
        let listener = TcpListener::bind(&bind).await?;
        tracing::info!(addr = %listener.local_addr()?, "listening");
        axum::serve(listener, app).await
    });
    drop(runtime);
    drop(engine);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: server failed: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Builds the HTTP routes.
fn router(engine: Arc<Engine>, markers: Markers) -> Router {
    Router::new()
        .route("/search", get(handle_search))
        .layer(Extension(engine))
        .layer(Extension(markers))
}

/// Answers one search request.
async fn handle_search(
    Query(params): Query<SearchParams>,
    Extension(engine): Extension<Arc<Engine>>,
    Extension(markers): Extension<Markers>,
) -> (StatusCode, Json<Value>) {
    let request = SearchRequest::from_params(params.q.as_deref(), params.page.as_deref());
    let (status, body) = match task::spawn_blocking(move || engine.search(&request)).await {
        Ok(result) => respond(result, &markers.open, &markers.close),
        Err(e) => {
            tracing::error!(error = %e, "search task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "search task failed" }),
            )
        }
    };
    (status, Json(body))
}

/// Maps a search result onto a status code and JSON body.
fn respond(result: Result<SearchOutcome, SearchError>, open: &str, close: &str) -> (StatusCode, Value) {
    match result {
        Ok(SearchOutcome::Results(page)) => {
            let output = JsonSearchOutput::new(&page, open, close);
            match serde_json::to_value(&output) {
                Ok(body) => (StatusCode::OK, body),
                Err(e) => {
                    tracing::error!(error = %e, "failed to serialize results");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        json!({ "error": "failed to serialize results" }),
                    )
                }
            }
        }
        Ok(SearchOutcome::NoQuery) => (StatusCode::OK, json!({ "query": null })),
        Err(SearchError::Unavailable(e)) => {
            tracing::warn!(error = %e, "backend unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "error": format!("search unavailable: {e}") }),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "search failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": e.to_string() }),
            )
        }
    }
}
