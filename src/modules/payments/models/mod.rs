pub mod booking;
pub mod payment_outcome;
pub mod payment_request;

pub use booking::{Addon, BookingCharges, BookingQuote, BookingType, DEPOSIT_PRESETS};
pub use payment_outcome::{
    ChargeSummary, FailureReason, PaymentDetails, PaymentOutcome, PaymentState,
};
pub use payment_request::{CardExpiry, CustomerDetails, PaymentRequest, ValidatedPayment};
