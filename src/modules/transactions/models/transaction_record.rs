use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Lifecycle flag of a stored card token.
///
/// Set by operators or external jobs; the payment flow only reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Active,
    Expired,
}

impl Default for RecordStatus {
    fn default() -> Self {
        RecordStatus::Active
    }
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordStatus::Active => write!(f, "active"),
            RecordStatus::Expired => write!(f, "expired"),
        }
    }
}

impl std::str::FromStr for RecordStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "active" => Ok(RecordStatus::Active),
            "expired" => Ok(RecordStatus::Expired),
            _ => Err(format!(
                "Invalid record status '{}', expected 'active' or 'expired'",
                s
            )),
        }
    }
}

impl TryFrom<String> for RecordStatus {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

/// Persisted outcome of a successful payment.
///
/// Written once by the payment orchestrator and never updated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TransactionRecord {
    /// Gateway transaction id (unique)
    pub transaction_id: String,

    /// Gateway card token issued by `addCard`
    pub card_token: String,

    /// Charged amount, two decimal places
    pub amount: Decimal,

    pub customer_name: String,

    pub customer_email: Option<String>,

    #[sqlx(try_from = "String")]
    pub status: RecordStatus,

    pub created_at: DateTime<Utc>,
}

impl TransactionRecord {
    pub fn new(
        transaction_id: String,
        card_token: String,
        amount: Decimal,
        customer_name: String,
        customer_email: Option<String>,
    ) -> Self {
        Self {
            transaction_id,
            card_token,
            amount,
            customer_name,
            customer_email,
            status: RecordStatus::Active,
            created_at: Utc::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.status == RecordStatus::Expired
    }
}
