//! Single-page-app style fallback: unmatched GET paths get the site's root
//! document with a 404 status.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::warn;

use crate::adapters::http::app_state::AppState;

pub(crate) async fn spa_fallback(State(app_state): State<AppState>) -> Response {
    let index = app_state.config.static_dir.join("index.html");

    match tokio::fs::read_to_string(&index).await {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => {
            warn!(error = %e, path = %index.display(), "Root document unavailable for fallback");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}
