//! POST /stripe/webhook
//!
//! The raw body must reach signature verification unparsed and unmodified.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use secrecy::ExposeSecret;
use tracing::{error, warn};

use crate::{
    adapters::http::app_state::AppState, app_error::AppError,
    infra::stripe_client::verify_webhook_signature,
};

/// Verify, then dispatch inside an error boundary.
///
/// Signature failures are rejected with 400 before any processing. Once the
/// signature has passed, the event is acknowledged with 200 on every exit
/// path - the provider retries unacknowledged deliveries indefinitely, and
/// redelivery cannot fix an internal fault. Failures go to the log instead.
pub(crate) async fn handle_webhook(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let signature = match headers.get("stripe-signature").and_then(|v| v.to_str().ok()) {
        Some(sig) => sig,
        None => {
            warn!("Webhook request without a stripe-signature header");
            return AppError::InvalidSignature("missing signature header".into()).into_response();
        }
    };

    if let Err(e) = verify_webhook_signature(
        &body,
        signature,
        app_state.config.stripe_webhook_secret.expose_secret(),
    ) {
        return e.into_response();
    }

    // Verified from here on: always acknowledge.
    match serde_json::from_str::<serde_json::Value>(&body) {
        Ok(event) => {
            let event_type = event["type"].as_str().unwrap_or("unknown").to_string();
            let event_id = event["id"].as_str().unwrap_or("unknown").to_string();

            if let Err(e) = app_state.webhook_use_cases.process_event(&event).await {
                error!(
                    error = %e,
                    event_type,
                    event_id,
                    "Webhook processing failed; acknowledging anyway"
                );
            }
        }
        Err(e) => {
            error!(error = %e, "Verified webhook body is not valid JSON");
        }
    }

    StatusCode::OK.into_response()
}
