pub mod models;
pub mod services;

pub use models::{
    AccessTokenResult, CardMetadata, CardParams, ChargeParams, ChargeResult, CustomerFields,
    GatewayError, GatewayFields, GatewayMethod, GatewayOutcome, TokenizeResult,
};
pub use services::{compute_hash, CardGateway, GatewayResult, MerchantWarriorClient};
