pub mod currency;
pub mod error;

pub use currency::{Currency, MAX_AMOUNT};
pub use error::{AppError, PostChargeStage, Result};
