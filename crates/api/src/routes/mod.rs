pub mod cart;
pub mod checkout;
pub mod health;
pub mod menu;
pub mod metrics;
