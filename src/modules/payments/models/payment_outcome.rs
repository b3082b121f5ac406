use serde::{Deserialize, Serialize};
use std::fmt;

use crate::modules::gateways::models::{CardMetadata, ChargeResult};
use crate::modules::transactions::models::TransactionRecord;

/// Result of a completed payment as returned to the booking form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeSummary {
    #[serde(rename = "transactionID")]
    pub transaction_id: String,
    pub response_code: String,
    pub response_message: String,
    pub auth_code: String,
    pub auth_message: String,
    pub auth_response_code: String,
    pub auth_settled_date: String,
    #[serde(rename = "paymentCardNumber")]
    pub masked_card_number: String,
    pub card_token: String,
}

impl ChargeSummary {
    pub fn new(charge: ChargeResult, card_token: String) -> Self {
        Self {
            transaction_id: charge.transaction_id,
            response_code: charge.response_code,
            response_message: charge.response_message,
            auth_code: charge.auth_code,
            auth_message: charge.auth_message,
            auth_response_code: charge.auth_response_code,
            auth_settled_date: charge.auth_settled_date,
            masked_card_number: charge.masked_card_number,
            card_token,
        }
    }
}

/// Business outcome of a payment attempt.
///
/// A decline is a normal answer from the bank, not a system error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    Completed(ChargeSummary),
    Declined { code: String, message: String },
}

impl PaymentOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, PaymentOutcome::Completed(_))
    }
}

/// Why a payment attempt stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    Validation,
    Token,
    ChargeError,
    Declined,
    TokenizeAfterCharge,
    PersistAfterCharge,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::Validation => "validation",
            FailureReason::Token => "token",
            FailureReason::ChargeError => "charge-error",
            FailureReason::Declined => "declined",
            FailureReason::TokenizeAfterCharge => "tokenize-after-charge",
            FailureReason::PersistAfterCharge => "persist-after-charge",
        }
    }
}

/// Steps of one payment attempt, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentState {
    Init,
    TokenRequested,
    Charging,
    Tokenizing,
    Persisting,
    Completed,
    Failed(FailureReason),
}

impl PaymentState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PaymentState::Completed | PaymentState::Failed(_))
    }
}

impl fmt::Display for PaymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentState::Init => f.write_str("init"),
            PaymentState::TokenRequested => f.write_str("token-requested"),
            PaymentState::Charging => f.write_str("charging"),
            PaymentState::Tokenizing => f.write_str("tokenizing"),
            PaymentState::Persisting => f.write_str("persisting"),
            PaymentState::Completed => f.write_str("completed"),
            PaymentState::Failed(reason) => write!(f, "failed({})", reason.as_str()),
        }
    }
}

/// Stored record merged with the gateway's live card view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentDetails {
    #[serde(flatten)]
    pub record: TransactionRecord,
    #[serde(flatten)]
    pub card: CardMetadata,
}
