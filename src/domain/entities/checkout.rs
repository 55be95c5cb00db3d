use serde::{Deserialize, Serialize};

/// How checkout charges the customer: a recurring subscription or a single
/// one-time payment. Stripe calls these checkout session modes "subscription"
/// and "payment".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutMode {
    #[default]
    Subscription,
    Payment,
}

impl CheckoutMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutMode::Subscription => "subscription",
            CheckoutMode::Payment => "payment",
        }
    }

    pub fn is_recurring(&self) -> bool {
        matches!(self, CheckoutMode::Subscription)
    }
}

impl std::fmt::Display for CheckoutMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CheckoutMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "subscription" => Ok(CheckoutMode::Subscription),
            "payment" | "one_time" | "one-time" => Ok(CheckoutMode::Payment),
            _ => Err(format!(
                "Invalid checkout mode: {}. Must be 'subscription' or 'payment'",
                s
            )),
        }
    }
}

/// The single product sold by the funnel. Price, mode and quantity bounds are
/// product decisions supplied through configuration, not constants in code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutPlan {
    pub product_name: String,
    /// Unit price in the currency's minor units (cents).
    pub unit_amount: i64,
    pub currency: String,
    pub mode: CheckoutMode,
    /// Billing interval for subscription mode ("month", "year").
    pub billing_interval: String,
    pub min_quantity: i64,
    pub max_quantity: i64,
}

impl CheckoutPlan {
    /// Bound a requested quantity into the configured range. Absent or
    /// nonsensical requests fall back to the minimum.
    pub fn clamp_quantity(&self, requested: Option<i64>) -> i64 {
        requested
            .unwrap_or(self.min_quantity)
            .clamp(self.min_quantity, self.max_quantity)
    }

    /// Whether the customer may adjust the quantity on the hosted page.
    pub fn adjustable_quantity(&self) -> bool {
        self.max_quantity > self.min_quantity
    }
}
