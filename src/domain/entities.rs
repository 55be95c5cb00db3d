pub mod attribution;
pub mod checkout;
pub mod metadata;
