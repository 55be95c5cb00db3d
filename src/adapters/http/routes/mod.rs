pub mod checkout;
pub mod static_site;
pub mod webhook;

use axum::{Router, routing::post};

use crate::adapters::http::app_state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/create-checkout-session",
            post(checkout::create_checkout_session),
        )
        .route("/stripe/webhook", post(webhook::handle_webhook))
}
