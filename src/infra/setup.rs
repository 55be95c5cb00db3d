use std::fs::File;
use std::sync::Arc;

use secrecy::ExposeSecret;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    adapters::http::app_state::AppState,
    application::ports::payment_provider::PaymentProviderPort,
    infra::{config::AppConfig, stripe_payment_adapter::StripePaymentAdapter},
    use_cases::{checkout::CheckoutUseCases, webhook::WebhookUseCases},
};

pub fn init_app_state() -> anyhow::Result<AppState> {
    let config = AppConfig::from_env();

    let payment_provider = Arc::new(StripePaymentAdapter::new(
        config.stripe_secret_key.expose_secret().to_string(),
    )) as Arc<dyn PaymentProviderPort>;

    let checkout_use_cases = CheckoutUseCases::new(config.plan.clone(), payment_provider.clone());
    let webhook_use_cases = WebhookUseCases::new(payment_provider);

    Ok(AppState {
        config: Arc::new(config),
        checkout_use_cases: Arc::new(checkout_use_cases),
        webhook_use_cases: Arc::new(webhook_use_cases),
    })
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "myndmatters_site=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .pretty();

    // File (structured JSON logs)
    let file = File::create("app.log").expect("cannot create log file");
    let json_layer = fmt::layer()
        .json()
        .with_writer(file)
        .with_current_span(true)
        .with_span_list(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();
}
