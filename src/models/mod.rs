pub mod checkout;
pub mod event;
