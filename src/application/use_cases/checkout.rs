//! Checkout session builder: form input + attributed affiliate -> provider
//! checkout session request.

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::{
    app_error::AppResult,
    application::ports::payment_provider::{
        CheckoutOrder, CheckoutResult, CheckoutUrls, PaymentProviderPort,
    },
    domain::entities::{checkout::CheckoutPlan, metadata::MetadataBag},
};

/// Customer-entered form fields. Transient - forwarded to the provider as
/// opaque metadata, never persisted server-side.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address1: String,
    pub address2: String,
    pub postal_code: String,
    pub affiliate: Option<String>,
    pub quantity: Option<i64>,
}

/// Resolve the affiliate for a checkout by explicit priority: form field,
/// then the value the attribution middleware attached to the request, then
/// the raw `aff` cookie. Empty string when none apply.
pub fn resolve_affiliate(
    form_value: Option<&str>,
    context_value: Option<&str>,
    cookie_value: Option<&str>,
) -> String {
    [form_value, context_value, cookie_value]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_lowercase)
        .unwrap_or_default()
}

/// Build the metadata bag attached identically to the checkout session, the
/// payment/subscription object and the invoice. Blank fields are omitted.
pub fn build_metadata(affiliate: &str, form: &CheckoutForm) -> MetadataBag {
    let mut bag = MetadataBag::new();
    bag.insert_non_empty("affiliate", affiliate);
    bag.insert_non_empty("name", &form.name);
    bag.insert_non_empty("email", &form.email);
    bag.insert_non_empty("phone", &form.phone);
    bag.insert_non_empty("address1", &form.address1);
    bag.insert_non_empty("address2", &form.address2);
    bag.insert_non_empty("postal_code", &form.postal_code);
    bag
}

fn checkout_urls(host: &str) -> CheckoutUrls {
    CheckoutUrls {
        success_url: format!("https://{host}/success.html"),
        cancel_url: format!("https://{host}/cancel.html"),
    }
}

pub struct CheckoutUseCases {
    plan: CheckoutPlan,
    payment_provider: Arc<dyn PaymentProviderPort>,
}

impl CheckoutUseCases {
    pub fn new(plan: CheckoutPlan, payment_provider: Arc<dyn PaymentProviderPort>) -> Self {
        Self {
            plan,
            payment_provider,
        }
    }

    /// Assemble and create a provider checkout session. `attributed` is the
    /// value the attribution middleware resolved for this request,
    /// `cookie_value` the raw `aff` cookie, `host` the request host used for
    /// the success/cancel redirects.
    pub async fn start_checkout(
        &self,
        form: &CheckoutForm,
        attributed: Option<&str>,
        cookie_value: Option<&str>,
        host: &str,
    ) -> AppResult<CheckoutResult> {
        let affiliate = resolve_affiliate(form.affiliate.as_deref(), attributed, cookie_value);
        let quantity = self.plan.clamp_quantity(form.quantity);

        let email = form.email.trim();
        let order = CheckoutOrder {
            plan: self.plan.clone(),
            quantity,
            customer_email: (!email.is_empty()).then(|| email.to_string()),
            metadata: build_metadata(&affiliate, form),
        };

        info!(
            affiliate = %affiliate,
            quantity,
            mode = %order.plan.mode,
            "Creating checkout session"
        );

        self.payment_provider
            .create_checkout(&order, &checkout_urls(host))
            .await
    }
}
