//! Shared test utilities: in-memory payment provider, app state builder and
//! webhook signing helpers.

pub mod app_state_builder;
pub mod payment_mocks;
pub mod webhook_mocks;

pub use app_state_builder::TestAppStateBuilder;
pub use payment_mocks::MockPaymentProvider;
pub use webhook_mocks::{TEST_WEBHOOK_SECRET, stripe_signature, stripe_signature_at};
