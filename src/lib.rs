//! Guest booking security-deposit payments
//!
//! Charges the guest's card through Merchant Warrior, tokenizes it and keeps
//! a minimal transaction record for later lookups.

use actix_web::web;

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

// Re-export commonly used types
pub use modules::gateways;
pub use modules::payments;
pub use modules::transactions;

/// Register every HTTP route of the service
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(modules::health::controllers::configure)
        .configure(modules::payments::controllers::configure);
}
