use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::transaction_store::TransactionStore;
use crate::core::{AppError, Result};
use crate::modules::transactions::models::{RecordStatus, TransactionRecord};

/// A thread-safe in-memory transaction store.
///
/// Keyed by transaction id. Used by tests and by local runs without MySQL.
#[derive(Default, Clone)]
pub struct InMemoryTransactionStore {
    records: Arc<RwLock<HashMap<String, TransactionRecord>>>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flag a stored record as expired, the way an operator job would
    pub async fn mark_expired(&self, transaction_id: &str) -> Result<()> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(transaction_id)
            .ok_or_else(|| AppError::not_found(format!("Payment '{}' not found", transaction_id)))?;
        record.status = RecordStatus::Expired;
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn insert(&self, record: TransactionRecord) -> Result<TransactionRecord> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.transaction_id) {
            return Err(AppError::Conflict(format!(
                "Payment record for transaction '{}' already exists",
                record.transaction_id
            )));
        }
        records.insert(record.transaction_id.clone(), record.clone());
        Ok(record)
    }

    async fn get_by_transaction_id(&self, transaction_id: &str) -> Result<TransactionRecord> {
        let records = self.records.read().await;
        records
            .get(transaction_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Payment '{}' not found", transaction_id)))
    }

    async fn get_by_card_token(&self, card_token: &str) -> Result<TransactionRecord> {
        let records = self.records.read().await;
        records
            .values()
            .filter(|r| r.card_token == card_token)
            .max_by_key(|r| r.created_at)
            .cloned()
            .ok_or_else(|| AppError::not_found("Card token not found"))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
