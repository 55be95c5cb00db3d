//! Attribution middleware: HTTPS enforcement, affiliate slug capture and
//! canonical-host redirection for every GET request.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};

use crate::{
    adapters::http::app_state::AppState,
    application::helpers::slug::{PathClass, classify_path},
    domain::entities::attribution::{AFFILIATE_COOKIE, AffiliateContext},
    infra::config::AppConfig,
};

/// Request host without any port suffix. Returns `None` when the Host header
/// is absent or unreadable.
pub(crate) fn request_host(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(':').next())
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
}

/// Per-request attribution state machine. Exactly one of: HTTPS redirect,
/// slug redirect, canonical-host redirect, or pass-through. Non-GET traffic
/// (checkout POST, webhooks) bypasses all redirect rules.
pub async fn attribution_middleware(
    State(app_state): State<AppState>,
    cookies: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let config = &app_state.config;

    // Typed affiliate context for downstream handlers, on every method.
    let context = AffiliateContext::from_cookie(cookies.get(AFFILIATE_COOKIE).map(|c| c.value()));
    request.extensions_mut().insert(context);

    if request.method() != Method::GET {
        return next.run(request).await;
    }

    let host = request_host(request.headers());
    let path = request.uri().path().to_string();
    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| path.clone());

    // 1. Plaintext behind the trusted proxy: bounce to HTTPS before anything else.
    if config.trust_proxy
        && forwarded_proto(request.headers()) == Some("http")
        && let Some(host) = host.as_deref()
    {
        return permanent_redirect(&format!("https://{host}{path_and_query}"));
    }

    // 2. Affiliate slug: set the cookie and strip the slug from the URL in one hop.
    if let PathClass::Slug(slug) = classify_path(&path) {
        tracing::info!(slug = %slug, "Captured affiliate slug");
        return slug_redirect(config, &slug);
    }

    // 3. Bare apex: normalize onto the www host, preserving path and query.
    if host.as_deref() == Some(config.primary_domain.as_str()) {
        return permanent_redirect(&format!(
            "https://www.{}{}",
            config.primary_domain, path_and_query
        ));
    }

    next.run(request).await
}

fn forwarded_proto(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
}

fn permanent_redirect(target: &str) -> Response {
    redirect(StatusCode::MOVED_PERMANENTLY, target)
}

fn redirect(status: StatusCode, target: &str) -> Response {
    match HeaderValue::from_str(target) {
        Ok(location) => (status, [(header::LOCATION, location)]).into_response(),
        Err(_) => StatusCode::BAD_REQUEST.into_response(),
    }
}

/// 302 to the canonical site root, carrying the attribution cookie. The
/// cookie is scoped to the leading-dot domain so apex and www share it, and
/// stays readable by client script.
fn slug_redirect(config: &AppConfig, slug: &str) -> Response {
    let cookie = Cookie::build((AFFILIATE_COOKIE, slug.to_string()))
        .http_only(false)
        .secure(true)
        .same_site(SameSite::Lax)
        .domain(format!(".{}", config.primary_domain))
        .path("/")
        .max_age(time::Duration::days(config.affiliate_cookie_ttl_days))
        .build();

    let mut response = redirect(
        StatusCode::FOUND,
        &format!("https://www.{}/", config.primary_domain),
    );
    if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}
