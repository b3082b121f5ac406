pub mod card_lookup;
pub mod payment_orchestrator;

pub use card_lookup::CardLookupService;
pub use payment_orchestrator::PaymentOrchestrator;
