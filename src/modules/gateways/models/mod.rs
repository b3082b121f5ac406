pub mod gateway_fields;
pub mod gateway_results;

pub use gateway_fields::GatewayFields;
pub use gateway_results::{
    AccessTokenResult, CardMetadata, CardParams, ChargeParams, ChargeResult, CustomerFields,
    FromGatewayFields, GatewayError, GatewayMethod, GatewayOutcome, TokenizeResult,
};
