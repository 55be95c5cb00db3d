//! Webhook reconciler: propagates attribution metadata onto billing objects
//! after checkout, driven by verified provider events.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    app_error::AppResult,
    application::ports::payment_provider::{CustomerId, PaymentProviderPort, SubscriptionId},
    domain::entities::metadata::MetadataBag,
};

/// Merge metadata for an invoice: start from what the invoice already
/// carries, let the subscription's metadata overwrite conflicting keys, and
/// let the customer's metadata fill only the keys absent from both.
pub fn merge_invoice_metadata(
    invoice: &MetadataBag,
    subscription: &MetadataBag,
    customer: &MetadataBag,
) -> MetadataBag {
    let mut merged = invoice.clone();
    merged.overwrite_with(subscription);
    merged.fill_missing_from(customer);
    merged
}

pub struct WebhookUseCases {
    payment_provider: Arc<dyn PaymentProviderPort>,
}

impl WebhookUseCases {
    pub fn new(payment_provider: Arc<dyn PaymentProviderPort>) -> Self {
        Self { payment_provider }
    }

    /// Dispatch a single verified provider event.
    ///
    /// Errors bubble up to the route's error boundary, which logs them and
    /// still acknowledges the event - redelivery would not help once the
    /// signature check has passed.
    pub async fn process_event(&self, event: &serde_json::Value) -> AppResult<()> {
        let event_type = event["type"].as_str().unwrap_or("");
        let event_id = event["id"].as_str().unwrap_or("");
        let object = &event["data"]["object"];

        match event_type {
            "checkout.session.completed" => {
                self.handle_session_completed(object, event_id).await
            }
            "invoice.created" => self.handle_invoice_created(object, event_id).await,
            "invoice.payment_succeeded" | "invoice.paid" => {
                info!(
                    event_id,
                    invoice_id = object["id"].as_str().unwrap_or("unknown"),
                    "Invoice payment succeeded"
                );
                Ok(())
            }
            _ => {
                debug!(event_id, event_type, "Unhandled webhook event type");
                Ok(())
            }
        }
    }

    /// Copy the session's metadata onto the subscription it created. Stripe
    /// does not carry session metadata over to the subscription on its own
    /// unless it was set via subscription_data, so this keeps both in sync
    /// either way.
    async fn handle_session_completed(
        &self,
        session: &serde_json::Value,
        event_id: &str,
    ) -> AppResult<()> {
        let is_recurring = session["mode"].as_str() == Some("subscription");
        let subscription_id = session["subscription"].as_str();

        let subscription_id = match (is_recurring, subscription_id) {
            (true, Some(id)) => id,
            _ => {
                debug!(event_id, "Completed session is not a subscription purchase");
                return Ok(());
            }
        };

        let metadata = MetadataBag::from_json_object(&session["metadata"]);
        if metadata.is_empty() {
            debug!(event_id, subscription_id, "Session carries no metadata");
            return Ok(());
        }

        info!(
            event_id,
            subscription_id,
            keys = metadata.len(),
            "Propagating session metadata onto subscription"
        );

        self.payment_provider
            .set_subscription_metadata(&SubscriptionId::new(subscription_id), &metadata)
            .await
    }

    async fn handle_invoice_created(
        &self,
        invoice: &serde_json::Value,
        event_id: &str,
    ) -> AppResult<()> {
        let invoice_id = match invoice["id"].as_str() {
            Some(id) => id,
            None => {
                warn!(event_id, "invoice.created event without an invoice id");
                return Ok(());
            }
        };

        let existing = MetadataBag::from_json_object(&invoice["metadata"]);

        let subscription = match invoice["subscription"].as_str() {
            Some(id) => {
                self.payment_provider
                    .subscription_metadata(&SubscriptionId::new(id))
                    .await?
            }
            None => MetadataBag::new(),
        };

        let customer = match invoice["customer"].as_str() {
            Some(id) => {
                self.payment_provider
                    .customer_metadata(&CustomerId::new(id))
                    .await?
            }
            None => MetadataBag::new(),
        };

        let merged = merge_invoice_metadata(&existing, &subscription, &customer);
        if merged.is_empty() {
            debug!(event_id, invoice_id, "No metadata to reconcile onto invoice");
            return Ok(());
        }

        info!(
            event_id,
            invoice_id,
            keys = merged.len(),
            "Writing reconciled metadata onto invoice"
        );

        self.payment_provider
            .set_invoice_metadata(invoice_id, &merged)
            .await
    }
}
