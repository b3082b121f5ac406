pub mod transaction_record;

pub use transaction_record::{RecordStatus, TransactionRecord};
