//! In-memory mock of the payment provider port, recording every call.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::payment_provider::{
        CheckoutOrder, CheckoutResult, CheckoutUrls, CustomerId, PaymentProviderPort,
        SubscriptionId,
    },
    domain::entities::metadata::MetadataBag,
};

/// Records checkout orders and metadata writes; serves seeded metadata for
/// subscription/customer lookups. `failing()` makes every operation fail the
/// way a provider outage would.
#[derive(Default)]
pub struct MockPaymentProvider {
    pub checkouts: Mutex<Vec<(CheckoutOrder, CheckoutUrls)>>,
    pub subscription_meta_writes: Mutex<Vec<(String, MetadataBag)>>,
    pub invoice_meta_writes: Mutex<HashMap<String, MetadataBag>>,
    subscription_metadata: Mutex<HashMap<String, MetadataBag>>,
    customer_metadata: Mutex<HashMap<String, MetadataBag>>,
    fail: bool,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn seed_subscription_metadata(&self, subscription_id: &str, metadata: MetadataBag) {
        self.subscription_metadata
            .lock()
            .unwrap()
            .insert(subscription_id.to_string(), metadata);
    }

    pub fn seed_customer_metadata(&self, customer_id: &str, metadata: MetadataBag) {
        self.customer_metadata
            .lock()
            .unwrap()
            .insert(customer_id.to_string(), metadata);
    }

    fn check_failure(&self) -> AppResult<()> {
        if self.fail {
            Err(AppError::PaymentProvider(
                "Stripe error 402: card_declined".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PaymentProviderPort for MockPaymentProvider {
    async fn create_checkout(
        &self,
        order: &CheckoutOrder,
        urls: &CheckoutUrls,
    ) -> AppResult<CheckoutResult> {
        self.check_failure()?;
        self.checkouts
            .lock()
            .unwrap()
            .push((order.clone(), urls.clone()));
        Ok(CheckoutResult {
            session_id: "cs_test_1".to_string(),
            checkout_url: "https://checkout.stripe.test/session".to_string(),
        })
    }

    async fn subscription_metadata(
        &self,
        subscription_id: &SubscriptionId,
    ) -> AppResult<MetadataBag> {
        self.check_failure()?;
        Ok(self
            .subscription_metadata
            .lock()
            .unwrap()
            .get(subscription_id.as_str())
            .cloned()
            .unwrap_or_default())
    }

    async fn customer_metadata(&self, customer_id: &CustomerId) -> AppResult<MetadataBag> {
        self.check_failure()?;
        Ok(self
            .customer_metadata
            .lock()
            .unwrap()
            .get(customer_id.as_str())
            .cloned()
            .unwrap_or_default())
    }

    async fn set_subscription_metadata(
        &self,
        subscription_id: &SubscriptionId,
        metadata: &MetadataBag,
    ) -> AppResult<()> {
        self.check_failure()?;
        self.subscription_meta_writes
            .lock()
            .unwrap()
            .push((subscription_id.as_str().to_string(), metadata.clone()));
        Ok(())
    }

    async fn set_invoice_metadata(
        &self,
        invoice_id: &str,
        metadata: &MetadataBag,
    ) -> AppResult<()> {
        self.check_failure()?;
        self.invoice_meta_writes
            .lock()
            .unwrap()
            .insert(invoice_id.to_string(), metadata.clone());
        Ok(())
    }
}
