use async_trait::async_trait;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::payment_provider::{
        CheckoutOrder, CheckoutResult, CheckoutUrls, CustomerId, PaymentProviderPort,
        SubscriptionId,
    },
    domain::entities::metadata::MetadataBag,
    infra::stripe_client::{CheckoutSessionParams, StripeClient},
};

/// Adapter that wraps StripeClient to implement PaymentProviderPort.
///
/// Translates domain-level checkout and reconciliation actions into Stripe
/// API calls.
#[derive(Clone)]
pub struct StripePaymentAdapter {
    client: StripeClient,
}

impl StripePaymentAdapter {
    pub fn new(secret_key: String) -> Self {
        Self {
            client: StripeClient::new(secret_key),
        }
    }
}

#[async_trait]
impl PaymentProviderPort for StripePaymentAdapter {
    async fn create_checkout(
        &self,
        order: &CheckoutOrder,
        urls: &CheckoutUrls,
    ) -> AppResult<CheckoutResult> {
        let plan = &order.plan;
        let params = CheckoutSessionParams {
            mode: plan.mode.as_str(),
            product_name: &plan.product_name,
            unit_amount: plan.unit_amount,
            currency: &plan.currency,
            recurring_interval: plan
                .mode
                .is_recurring()
                .then_some(plan.billing_interval.as_str()),
            quantity: order.quantity,
            adjustable_quantity: plan
                .adjustable_quantity()
                .then_some((plan.min_quantity, plan.max_quantity)),
            customer_email: order.customer_email.as_deref(),
            success_url: &urls.success_url,
            cancel_url: &urls.cancel_url,
            metadata: &order.metadata,
        };

        let session = self.client.create_checkout_session(&params).await?;

        let checkout_url = session.url.ok_or_else(|| {
            AppError::PaymentProvider(format!("Checkout session {} has no URL", session.id))
        })?;

        Ok(CheckoutResult {
            session_id: session.id,
            checkout_url,
        })
    }

    async fn subscription_metadata(
        &self,
        subscription_id: &SubscriptionId,
    ) -> AppResult<MetadataBag> {
        let subscription = self.client.get_subscription(subscription_id.as_str()).await?;
        Ok(subscription.metadata)
    }

    async fn customer_metadata(&self, customer_id: &CustomerId) -> AppResult<MetadataBag> {
        let customer = self.client.get_customer(customer_id.as_str()).await?;
        Ok(customer.metadata)
    }

    async fn set_subscription_metadata(
        &self,
        subscription_id: &SubscriptionId,
        metadata: &MetadataBag,
    ) -> AppResult<()> {
        self.client
            .update_subscription_metadata(subscription_id.as_str(), metadata)
            .await?;
        Ok(())
    }

    async fn set_invoice_metadata(
        &self,
        invoice_id: &str,
        metadata: &MetadataBag,
    ) -> AppResult<()> {
        self.client
            .update_invoice_metadata(invoice_id, metadata)
            .await?;
        Ok(())
    }
}
