use async_trait::async_trait;

use crate::modules::gateways::models::{
    AccessTokenResult, CardMetadata, CardParams, ChargeParams, ChargeResult, GatewayError,
    GatewayOutcome, TokenizeResult,
};

/// Result of a single gateway round trip
pub type GatewayResult<T> = std::result::Result<GatewayOutcome<T>, GatewayError>;

/// Card payment gateway operations used by the payment flow.
///
/// Each call is one request and one response with no retries: a repeated
/// charge with the same parameters is a second charge.
#[async_trait]
pub trait CardGateway: Send + Sync {
    /// `getAccessToken`
    async fn get_access_token(&self) -> GatewayResult<AccessTokenResult>;

    /// `processCard`
    async fn charge_card(&self, params: &ChargeParams) -> GatewayResult<ChargeResult>;

    /// `addCard`
    async fn tokenize_card(&self, params: &CardParams) -> GatewayResult<TokenizeResult>;

    /// `cardInfo`
    async fn get_card_info(&self, card_token: &str) -> GatewayResult<CardMetadata>;

    /// Get gateway name
    fn name(&self) -> &str;
}
