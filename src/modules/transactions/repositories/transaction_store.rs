use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::transactions::models::TransactionRecord;

/// Persistence port for payment records
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Insert a new record. A duplicate transaction id is a `Conflict`.
    async fn insert(&self, record: TransactionRecord) -> Result<TransactionRecord>;

    /// Fetch by gateway transaction id, `NotFound` when absent
    async fn get_by_transaction_id(&self, transaction_id: &str) -> Result<TransactionRecord>;

    /// Fetch by gateway card token, `NotFound` when absent
    async fn get_by_card_token(&self, card_token: &str) -> Result<TransactionRecord>;

    /// Connectivity probe for readiness checks
    async fn ping(&self) -> Result<()>;
}

/// MySQL-backed transaction store over the `payments` table
pub struct MySqlTransactionStore {
    pool: MySqlPool,
}

impl MySqlTransactionStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Get the database connection pool
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

#[async_trait]
impl TransactionStore for MySqlTransactionStore {
    async fn insert(&self, record: TransactionRecord) -> Result<TransactionRecord> {
        let result = sqlx::query(
            r#"
            INSERT INTO payments (
                transaction_id, card_token, amount, customer_name,
                customer_email, status, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.transaction_id)
        .bind(&record.card_token)
        .bind(record.amount)
        .bind(&record.customer_name)
        .bind(&record.customer_email)
        .bind(record.status.to_string())
        .bind(record.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                tracing::info!(
                    transaction_id = %record.transaction_id,
                    "Payment record stored"
                );
                Ok(record)
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(AppError::Conflict(format!(
                    "Payment record for transaction '{}' already exists",
                    record.transaction_id
                )))
            }
            Err(e) => Err(AppError::Database(e)),
        }
    }

    async fn get_by_transaction_id(&self, transaction_id: &str) -> Result<TransactionRecord> {
        sqlx::query_as::<_, TransactionRecord>(
            r#"
            SELECT
                transaction_id, card_token, amount, customer_name,
                customer_email, status, created_at
            FROM payments
            WHERE transaction_id = ?
            "#,
        )
        .bind(transaction_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| decode_failure(e, "transaction_id", transaction_id))?
        .ok_or_else(|| {
            AppError::not_found(format!("Payment '{}' not found", transaction_id))
        })
    }

    async fn get_by_card_token(&self, card_token: &str) -> Result<TransactionRecord> {
        sqlx::query_as::<_, TransactionRecord>(
            r#"
            SELECT
                transaction_id, card_token, amount, customer_name,
                customer_email, status, created_at
            FROM payments
            WHERE card_token = ?
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(card_token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| decode_failure(e, "card_token", card_token))?
        .ok_or_else(|| AppError::not_found("Card token not found"))
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Logs rows that exist but cannot be read back, e.g. an unknown `status`
fn decode_failure(err: sqlx::Error, key: &'static str, value: &str) -> AppError {
    if let sqlx::Error::ColumnDecode { index, source } = &err {
        tracing::warn!(
            lookup = key,
            value = %value,
            column = %index,
            error = %source,
            "Stored payment record could not be decoded"
        );
    }
    AppError::Database(err)
}
