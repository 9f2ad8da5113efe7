//! HTTP exposition endpoint.
//!
//! Scrape handlers only read the snapshot store; they never block on external
//! commands. The root path serves a static page linking to the metrics path.

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::response::Html;
use axum::routing::get;

use crate::snapshot::SnapshotStore;

/// Builds the exporter router: the metrics document at `metrics_path`, an
/// informational page at `/`.
pub fn build_router(store: Arc<SnapshotStore>, metrics_path: &str) -> Router {
    let index = index_page(metrics_path);
    Router::new()
        .route(metrics_path, get(handle_metrics))
        .route("/", get(move || async move { Html(index) }))
        .with_state(store)
}

/// Serves the current snapshot verbatim.
async fn handle_metrics(State(store): State<Arc<SnapshotStore>>) -> String {
    store.read()
}

fn index_page(metrics_path: &str) -> String {
    format!(
        "<html>\n\
         <head><title>Supervisor Exporter</title></head>\n\
         <body>\n\
         <h1>Supervisor Exporter</h1>\n\
         <p><a href='{metrics_path}'>Metrics</a></p>\n\
         </body>\n\
         </html>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_page_links_to_configured_metrics_path() {
        let page = index_page("/telemetry");
        assert!(page.contains("href='/telemetry'"));
    }
}
