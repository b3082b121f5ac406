pub mod gateway_trait;
pub mod hash_generator;
pub mod merchant_warrior;
pub mod response_parser;

pub use gateway_trait::{CardGateway, GatewayResult};
pub use hash_generator::compute_hash;
pub use merchant_warrior::MerchantWarriorClient;
pub use response_parser::{parse, ParseError, ACCEPTED_ROOTS};
