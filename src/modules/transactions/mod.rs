pub mod models;
pub mod repositories;

pub use models::{RecordStatus, TransactionRecord};
pub use repositories::{InMemoryTransactionStore, MySqlTransactionStore, TransactionStore};
