pub mod controllers;
pub mod models;
pub mod services;

pub use models::{
    BookingCharges, BookingQuote, ChargeSummary, PaymentDetails, PaymentOutcome, PaymentRequest,
};
pub use services::{CardLookupService, PaymentOrchestrator};
