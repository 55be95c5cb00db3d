use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    app_error::AppResult,
    domain::entities::{checkout::CheckoutPlan, metadata::MetadataBag},
};

// ============================================================================
// Port Types - Provider-agnostic domain types
// ============================================================================

/// Unique identifier for a customer in a payment provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub String);

impl CustomerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a subscription in a payment provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub String);

impl SubscriptionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// URLs for checkout redirects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutUrls {
    pub success_url: String,
    pub cancel_url: String,
}

/// A fully assembled checkout request: the configured plan, the bounded
/// quantity, and the metadata bag that must land identically on the session,
/// the payment/subscription object and the invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutOrder {
    pub plan: CheckoutPlan,
    pub quantity: i64,
    pub customer_email: Option<String>,
    pub metadata: MetadataBag,
}

/// Result of creating a checkout session
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutResult {
    /// Session ID for webhook correlation
    pub session_id: String,
    /// Hosted checkout page to redirect the customer to
    pub checkout_url: String,
}

// ============================================================================
// Payment Provider Port
// ============================================================================

/// Abstracts the hosted payment provider.
///
/// The trait defines the domain-level actions the funnel needs - creating a
/// checkout session and reading/writing metadata on billing objects during
/// webhook reconciliation. Implementations map these to provider APIs.
#[async_trait]
pub trait PaymentProviderPort: Send + Sync {
    /// Create a hosted checkout session and return its redirect URL.
    async fn create_checkout(
        &self,
        order: &CheckoutOrder,
        urls: &CheckoutUrls,
    ) -> AppResult<CheckoutResult>;

    /// Metadata currently attached to a subscription. Empty bag if none.
    async fn subscription_metadata(
        &self,
        subscription_id: &SubscriptionId,
    ) -> AppResult<MetadataBag>;

    /// Metadata currently attached to a customer. Empty bag if none.
    async fn customer_metadata(&self, customer_id: &CustomerId) -> AppResult<MetadataBag>;

    /// Replace a subscription's metadata.
    async fn set_subscription_metadata(
        &self,
        subscription_id: &SubscriptionId,
        metadata: &MetadataBag,
    ) -> AppResult<()>;

    /// Replace an invoice's metadata.
    async fn set_invoice_metadata(&self, invoice_id: &str, metadata: &MetadataBag)
    -> AppResult<()>;
}
