use std::sync::Arc;

use crate::{
    application::use_cases::{checkout::CheckoutUseCases, webhook::WebhookUseCases},
    infra::config::AppConfig,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub checkout_use_cases: Arc<CheckoutUseCases>,
    pub webhook_use_cases: Arc<WebhookUseCases>,
}
