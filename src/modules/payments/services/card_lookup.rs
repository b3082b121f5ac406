use std::sync::Arc;

use tracing::{info, warn};

use crate::core::{AppError, Result};
use crate::modules::gateways::models::GatewayOutcome;
use crate::modules::gateways::services::CardGateway;
use crate::modules::payments::models::PaymentDetails;
use crate::modules::transactions::models::TransactionRecord;
use crate::modules::transactions::repositories::TransactionStore;

/// Read path for stored payments and their tokenized cards
pub struct CardLookupService {
    gateway: Arc<dyn CardGateway>,
    store: Arc<dyn TransactionStore>,
}

impl CardLookupService {
    pub fn new(gateway: Arc<dyn CardGateway>, store: Arc<dyn TransactionStore>) -> Self {
        Self { gateway, store }
    }

    /// Stored record for `transaction_id` merged with the gateway's card view
    pub async fn get_payment_details(&self, transaction_id: &str) -> Result<PaymentDetails> {
        let transaction_id = transaction_id.trim();
        if transaction_id.is_empty() {
            return Err(AppError::validation("Transaction ID is required"));
        }

        let record = self.store.get_by_transaction_id(transaction_id).await?;
        self.with_card_info(record).await
    }

    /// Same view, looked up by the card token instead
    pub async fn get_card_details(&self, card_token: &str) -> Result<PaymentDetails> {
        let card_token = card_token.trim();
        if card_token.is_empty() {
            return Err(AppError::validation("Card token is required"));
        }

        let record = self.store.get_by_card_token(card_token).await?;
        self.with_card_info(record).await
    }

    async fn with_card_info(&self, record: TransactionRecord) -> Result<PaymentDetails> {
        // Expired tokens are never sent to the gateway
        if record.is_expired() {
            info!(
                transaction_id = %record.transaction_id,
                "Card lookup refused for expired record"
            );
            return Err(AppError::AlreadyExpired(
                "This payment link has already expired".to_string(),
            ));
        }

        match self.gateway.get_card_info(&record.card_token).await? {
            GatewayOutcome::Approved(card) => Ok(PaymentDetails { record, card }),
            GatewayOutcome::Declined { code, message } => {
                warn!(
                    transaction_id = %record.transaction_id,
                    response_code = %code,
                    gateway_message = %message,
                    "Gateway refused card info"
                );
                Err(AppError::GatewayRejected {
                    step: "cardInfo",
                    message,
                })
            }
        }
    }
}
