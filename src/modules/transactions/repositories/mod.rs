pub mod in_memory;
pub mod transaction_store;

pub use in_memory::InMemoryTransactionStore;
pub use transaction_store::{MySqlTransactionStore, TransactionStore};
