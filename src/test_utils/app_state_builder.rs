//! Test app state builder for HTTP-level testing.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use secrecy::SecretString;

use crate::{
    adapters::http::app_state::AppState,
    application::{
        ports::payment_provider::PaymentProviderPort,
        use_cases::{checkout::CheckoutUseCases, webhook::WebhookUseCases},
    },
    domain::entities::checkout::{CheckoutMode, CheckoutPlan},
    infra::config::AppConfig,
    test_utils::{MockPaymentProvider, webhook_mocks::TEST_WEBHOOK_SECRET},
};

/// Builder for creating `AppState` backed by the in-memory payment provider.
///
/// # Example
///
/// ```ignore
/// let provider = Arc::new(MockPaymentProvider::new());
/// let app_state = TestAppStateBuilder::new()
///     .with_payment_provider(provider.clone())
///     .build();
/// ```
pub struct TestAppStateBuilder {
    payment_provider: Option<Arc<dyn PaymentProviderPort>>,
    trust_proxy: bool,
    primary_domain: String,
    static_dir: PathBuf,
    plan: CheckoutPlan,
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self {
            payment_provider: None,
            trust_proxy: true,
            primary_domain: "myndmatterspack.com".to_string(),
            static_dir: PathBuf::from("public"),
            plan: CheckoutPlan {
                product_name: "Mynd Matters Pack".to_string(),
                unit_amount: 25800,
                currency: "usd".to_string(),
                mode: CheckoutMode::Subscription,
                billing_interval: "month".to_string(),
                min_quantity: 1,
                max_quantity: 10,
            },
        }
    }

    pub fn with_payment_provider(mut self, provider: Arc<dyn PaymentProviderPort>) -> Self {
        self.payment_provider = Some(provider);
        self
    }

    pub fn with_trust_proxy(mut self, trust_proxy: bool) -> Self {
        self.trust_proxy = trust_proxy;
        self
    }

    pub fn with_primary_domain(mut self, domain: impl Into<String>) -> Self {
        self.primary_domain = domain.into();
        self
    }

    pub fn with_plan(mut self, plan: CheckoutPlan) -> Self {
        self.plan = plan;
        self
    }

    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = dir.into();
        self
    }

    pub fn build(self) -> AppState {
        let config = AppConfig {
            stripe_secret_key: SecretString::new("sk_test_xxx".to_string().into()),
            stripe_webhook_secret: SecretString::new(TEST_WEBHOOK_SECRET.to_string().into()),
            bind_addr: "127.0.0.1:0".parse::<SocketAddr>().unwrap(),
            primary_domain: self.primary_domain,
            trust_proxy: self.trust_proxy,
            affiliate_cookie_ttl_days: 365,
            static_dir: self.static_dir,
            plan: self.plan.clone(),
        };

        let payment_provider = self
            .payment_provider
            .unwrap_or_else(|| Arc::new(MockPaymentProvider::new()));

        AppState {
            config: Arc::new(config),
            checkout_use_cases: Arc::new(CheckoutUseCases::new(
                self.plan,
                payment_provider.clone(),
            )),
            webhook_use_cases: Arc::new(WebhookUseCases::new(payment_provider)),
        }
    }
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
