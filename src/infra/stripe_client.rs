//! Minimal Stripe API client over reqwest: hosted checkout sessions, metadata
//! reads/writes on billing objects, and webhook signature verification.

use reqwest::Client;
use serde::Deserialize;

use crate::{
    app_error::{AppError, AppResult},
    domain::entities::metadata::MetadataBag,
};

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

/// Tolerated clock skew between Stripe's signature timestamp and ours.
const SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Inputs for a hosted checkout session, in Stripe's vocabulary.
#[derive(Debug)]
pub struct CheckoutSessionParams<'a> {
    /// "subscription" or "payment".
    pub mode: &'a str,
    pub product_name: &'a str,
    pub unit_amount: i64,
    pub currency: &'a str,
    /// Billing interval for subscription mode; None for one-time payments.
    pub recurring_interval: Option<&'a str>,
    pub quantity: i64,
    /// (min, max) when the hosted page should allow quantity adjustment.
    pub adjustable_quantity: Option<(i64, i64)>,
    pub customer_email: Option<&'a str>,
    pub success_url: &'a str,
    pub cancel_url: &'a str,
    pub metadata: &'a MetadataBag,
}

#[derive(Clone)]
pub struct StripeClient {
    client: Client,
    secret_key: String,
}

impl StripeClient {
    pub fn new(secret_key: String) -> Self {
        Self {
            client: Client::new(),
            secret_key,
        }
    }

    // ========================================================================
    // Checkout Sessions
    // ========================================================================

    pub async fn create_checkout_session(
        &self,
        params: &CheckoutSessionParams<'_>,
    ) -> AppResult<StripeCheckoutSession> {
        let form = checkout_session_form(params);
        self.post_form("/checkout/sessions", &form).await
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    pub async fn get_subscription(&self, subscription_id: &str) -> AppResult<StripeSubscription> {
        self.get(&format!("/subscriptions/{subscription_id}")).await
    }

    pub async fn update_subscription_metadata(
        &self,
        subscription_id: &str,
        metadata: &MetadataBag,
    ) -> AppResult<StripeSubscription> {
        let mut form = Vec::new();
        append_metadata(&mut form, "metadata", metadata);
        self.post_form(&format!("/subscriptions/{subscription_id}"), &form)
            .await
    }

    // ========================================================================
    // Customers
    // ========================================================================

    pub async fn get_customer(&self, customer_id: &str) -> AppResult<StripeCustomer> {
        self.get(&format!("/customers/{customer_id}")).await
    }

    // ========================================================================
    // Invoices
    // ========================================================================

    pub async fn update_invoice_metadata(
        &self,
        invoice_id: &str,
        metadata: &MetadataBag,
    ) -> AppResult<StripeInvoice> {
        let mut form = Vec::new();
        append_metadata(&mut form, "metadata", metadata);
        self.post_form(&format!("/invoices/{invoice_id}"), &form)
            .await
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    async fn get<T: for<'de> Deserialize<'de>>(&self, path: &str) -> AppResult<T> {
        let response = self
            .client
            .get(format!("{STRIPE_API_BASE}{path}"))
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| AppError::PaymentProvider(format!("Stripe request failed: {e}")))?;

        handle_response(response).await
    }

    async fn post_form<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        form: &[(String, String)],
    ) -> AppResult<T> {
        let response = self
            .client
            .post(format!("{STRIPE_API_BASE}{path}"))
            .bearer_auth(&self.secret_key)
            .form(form)
            .send()
            .await
            .map_err(|e| AppError::PaymentProvider(format!("Stripe request failed: {e}")))?;

        handle_response(response).await
    }
}

/// Build the form-encoded body for a checkout session. The metadata bag fans
/// out three ways: the session itself, the subscription (subscription mode)
/// or the payment intent plus the auto-generated invoice (payment mode), so
/// every related object carries matching attribution.
fn checkout_session_form(params: &CheckoutSessionParams<'_>) -> Vec<(String, String)> {
    let mut form: Vec<(String, String)> = vec![
        ("mode".into(), params.mode.into()),
        ("success_url".into(), params.success_url.into()),
        ("cancel_url".into(), params.cancel_url.into()),
        ("line_items[0][quantity]".into(), params.quantity.to_string()),
        (
            "line_items[0][price_data][currency]".into(),
            params.currency.to_lowercase(),
        ),
        (
            "line_items[0][price_data][unit_amount]".into(),
            params.unit_amount.to_string(),
        ),
        (
            "line_items[0][price_data][product_data][name]".into(),
            params.product_name.into(),
        ),
    ];

    if let Some(interval) = params.recurring_interval {
        form.push((
            "line_items[0][price_data][recurring][interval]".into(),
            interval.into(),
        ));
    }

    if let Some((min, max)) = params.adjustable_quantity {
        form.push(("line_items[0][adjustable_quantity][enabled]".into(), "true".into()));
        form.push((
            "line_items[0][adjustable_quantity][minimum]".into(),
            min.to_string(),
        ));
        form.push((
            "line_items[0][adjustable_quantity][maximum]".into(),
            max.to_string(),
        ));
    }

    if let Some(email) = params.customer_email {
        form.push(("customer_email".into(), email.into()));
    }

    append_metadata(&mut form, "metadata", params.metadata);

    if params.recurring_interval.is_some() {
        append_metadata(&mut form, "subscription_data[metadata]", params.metadata);
    } else {
        append_metadata(&mut form, "payment_intent_data[metadata]", params.metadata);
        form.push(("invoice_creation[enabled]".into(), "true".into()));
        append_metadata(
            &mut form,
            "invoice_creation[invoice_data][metadata]",
            params.metadata,
        );
    }

    form
}

fn append_metadata(form: &mut Vec<(String, String)>, prefix: &str, metadata: &MetadataBag) {
    for (key, value) in metadata.iter() {
        form.push((format!("{prefix}[{key}]"), value.to_string()));
    }
}

async fn handle_response<T: for<'de> Deserialize<'de>>(response: reqwest::Response) -> AppResult<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| AppError::PaymentProvider(format!("Failed to read response: {e}")))?;

    if !status.is_success() {
        // Log the provider's error classification; the caller surfaces a
        // generic failure without it.
        if let Ok(error) = serde_json::from_str::<StripeErrorResponse>(&body) {
            tracing::error!(
                status = %status,
                error_type = %error.error.error_type,
                code = ?error.error.code,
                message = ?error.error.message,
                "Stripe API error"
            );
            return Err(AppError::PaymentProvider(format!(
                "Stripe error {}: {}",
                status, error.error.error_type
            )));
        }

        tracing::error!(status = %status, body = %body, "Unparseable Stripe API error");
        return Err(AppError::PaymentProvider(format!("Stripe error {status}")));
    }

    serde_json::from_str(&body).map_err(|e| {
        tracing::error!(error = %e, "Failed to parse Stripe response");
        AppError::PaymentProvider(format!("Failed to parse Stripe response: {e}"))
    })
}

// ============================================================================
// Webhook Signature Verification
// ============================================================================

/// Parsed `stripe-signature` header: "t=<timestamp>,v1=<hex>,v1=<hex>,..."
struct SignatureHeader {
    timestamp: i64,
    signatures: Vec<String>,
}

impl SignatureHeader {
    fn parse(header: &str) -> AppResult<Self> {
        let mut timestamp: Option<i64> = None;
        let mut signatures = Vec::new();

        for part in header.split(',') {
            match part.trim().split_once('=') {
                Some(("t", value)) => {
                    timestamp = Some(value.parse().map_err(|_| {
                        AppError::InvalidSignature("invalid timestamp".into())
                    })?);
                }
                Some(("v1", value)) => signatures.push(value.to_string()),
                _ => {}
            }
        }

        let timestamp =
            timestamp.ok_or_else(|| AppError::InvalidSignature("missing timestamp".into()))?;

        if signatures.is_empty() {
            return Err(AppError::InvalidSignature("missing v1 signature".into()));
        }

        Ok(Self {
            timestamp,
            signatures,
        })
    }
}

/// Verify a Stripe webhook payload against its signature header. The payload
/// must be the raw, unmodified request body.
pub fn verify_webhook_signature(
    payload: &str,
    signature_header: &str,
    webhook_secret: &str,
) -> AppResult<()> {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    let header = SignatureHeader::parse(signature_header)?;

    let signed_payload = format!("{}.{}", header.timestamp, payload);
    let mut mac = Hmac::<Sha256>::new_from_slice(webhook_secret.as_bytes())
        .map_err(|_| AppError::Internal("HMAC error".into()))?;
    mac.update(signed_payload.as_bytes());
    let expected = hex::encode(mac.finalize().into_bytes());

    if !header
        .signatures
        .iter()
        .any(|sig| constant_time_compare(sig, &expected))
    {
        return Err(AppError::InvalidSignature("no matching v1 signature".into()));
    }

    let now = chrono::Utc::now().timestamp();
    if (now - header.timestamp).abs() > SIGNATURE_TOLERANCE_SECS {
        return Err(AppError::InvalidSignature("timestamp outside tolerance".into()));
    }

    Ok(())
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

// ============================================================================
// Stripe Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StripeCheckoutSession {
    pub id: String,
    pub url: Option<String>,
    #[serde(default)]
    pub metadata: MetadataBag,
}

#[derive(Debug, Deserialize)]
pub struct StripeSubscription {
    pub id: String,
    #[serde(default)]
    pub metadata: MetadataBag,
}

#[derive(Debug, Deserialize)]
pub struct StripeCustomer {
    pub id: String,
    pub email: Option<String>,
    #[serde(default)]
    pub metadata: MetadataBag,
}

#[derive(Debug, Deserialize)]
pub struct StripeInvoice {
    pub id: String,
    #[serde(default)]
    pub metadata: MetadataBag,
}

#[derive(Debug, Deserialize)]
pub struct StripeErrorResponse {
    pub error: StripeError,
}

#[derive(Debug, Deserialize)]
pub struct StripeError {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: Option<String>,
    pub code: Option<String>,
}


#[cfg(test)]
mod form_tests {
    use super::*;

    fn params<'a>(
        recurring: Option<&'a str>,
        metadata: &'a MetadataBag,
    ) -> CheckoutSessionParams<'a> {
        CheckoutSessionParams {
            mode: if recurring.is_some() { "subscription" } else { "payment" },
            product_name: "Mynd Matters Pack",
            unit_amount: 25800,
            currency: "USD",
            recurring_interval: recurring,
            quantity: 2,
            adjustable_quantity: Some((1, 10)),
            customer_email: Some("jane@example.com"),
            success_url: "https://www.myndmatterspack.com/success.html",
            cancel_url: "https://www.myndmatterspack.com/cancel.html",
            metadata,
        }
    }

    fn value_of<'a>(form: &'a [(String, String)], key: &str) -> Option<&'a str> {
        form.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    #[test]
    fn subscription_mode_fans_metadata_to_session_and_subscription() {
        let metadata = MetadataBag::from([("affiliate", "partnerxyz")]);
        let form = checkout_session_form(&params(Some("month"), &metadata));

        assert_eq!(value_of(&form, "mode"), Some("subscription"));
        assert_eq!(value_of(&form, "metadata[affiliate]"), Some("partnerxyz"));
        assert_eq!(
            value_of(&form, "subscription_data[metadata][affiliate]"),
            Some("partnerxyz")
        );
        assert_eq!(
            value_of(&form, "line_items[0][price_data][recurring][interval]"),
            Some("month")
        );
        assert!(value_of(&form, "invoice_creation[enabled]").is_none());
    }

    #[test]
    fn payment_mode_fans_metadata_to_payment_intent_and_invoice() {
        let metadata = MetadataBag::from([("affiliate", "partnerxyz")]);
        let form = checkout_session_form(&params(None, &metadata));

        assert_eq!(value_of(&form, "mode"), Some("payment"));
        assert_eq!(
            value_of(&form, "payment_intent_data[metadata][affiliate]"),
            Some("partnerxyz")
        );
        assert_eq!(value_of(&form, "invoice_creation[enabled]"), Some("true"));
        assert_eq!(
            value_of(&form, "invoice_creation[invoice_data][metadata][affiliate]"),
            Some("partnerxyz")
        );
        assert!(
            value_of(&form, "line_items[0][price_data][recurring][interval]").is_none()
        );
    }

    #[test]
    fn currency_is_lowercased_and_quantity_bounds_included() {
        let metadata = MetadataBag::new();
        let form = checkout_session_form(&params(Some("month"), &metadata));

        assert_eq!(
            value_of(&form, "line_items[0][price_data][currency]"),
            Some("usd")
        );
        assert_eq!(
            value_of(&form, "line_items[0][adjustable_quantity][minimum]"),
            Some("1")
        );
        assert_eq!(
            value_of(&form, "line_items[0][adjustable_quantity][maximum]"),
            Some("10")
        );
    }
}
