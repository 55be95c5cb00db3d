use axum::{Router, handler::Handler, http, middleware};
use tower_http::{services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::{
    adapters::{
        self,
        http::{
            app_state::AppState, middleware::attribution_middleware, routes::static_site,
        },
    },
    infra::setup::init_tracing,
};

pub fn create_app(app_state: AppState) -> Router {
    init_tracing();

    // Static marketing site with SPA-style fallback: unresolved paths get the
    // root document, served with a 404.
    let static_site = ServeDir::new(&app_state.config.static_dir)
        .not_found_service(static_site::spa_fallback.with_state(app_state.clone()));

    Router::new()
        .merge(adapters::http::routes::router())
        .fallback_service(static_site)
        .with_state(app_state.clone())
        .layer(middleware::from_fn_with_state(
            app_state,
            attribution_middleware,
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            http::header::X_CONTENT_TYPE_OPTIONS,
            http::HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            http::header::X_FRAME_OPTIONS,
            http::HeaderValue::from_static("DENY"),
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &http::Request<_>| {
                let request_id = Uuid::new_v4();
                tracing::info_span!(
                    "http-request",
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                    request_id = %request_id
                )
            }),
        )
}
