//! POST /create-checkout-session

use axum::{
    Extension, Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use serde::Serialize;
use tracing::error;

use crate::{
    adapters::http::{app_state::AppState, middleware::request_host},
    application::use_cases::checkout::CheckoutForm,
    domain::entities::attribution::{AFFILIATE_COOKIE, AffiliateContext},
};

#[derive(Serialize)]
struct CheckoutResponse {
    url: String,
}

#[derive(Serialize)]
struct CheckoutErrorResponse {
    error: &'static str,
}

/// Creates a hosted checkout session and returns its URL. Provider failures
/// surface as a generic retry-later message; the provider's error
/// classification only goes to the log.
pub(crate) async fn create_checkout_session(
    State(app_state): State<AppState>,
    affiliate: Option<Extension<AffiliateContext>>,
    cookies: CookieJar,
    headers: HeaderMap,
    Json(form): Json<CheckoutForm>,
) -> Response {
    let attributed = affiliate.as_ref().and_then(|ext| ext.0.as_deref());
    let cookie_value = cookies.get(AFFILIATE_COOKIE).map(|c| c.value().to_string());

    let host = request_host(&headers)
        .unwrap_or_else(|| format!("www.{}", app_state.config.primary_domain));

    match app_state
        .checkout_use_cases
        .start_checkout(&form, attributed, cookie_value.as_deref(), &host)
        .await
    {
        Ok(result) => (
            StatusCode::OK,
            Json(CheckoutResponse {
                url: result.checkout_url,
            }),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Checkout session creation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(CheckoutErrorResponse {
                    error: "Unable to start checkout. Please try again later.",
                }),
            )
                .into_response()
        }
    }
}
