pub mod gateways;
pub mod health;
pub mod payments;
pub mod transactions;
