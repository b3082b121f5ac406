use crate::core::{AppError, Result};
use std::env;
use std::fmt;
use std::time::Duration;

const DEFAULT_ENDPOINT: &str = "https://base.merchantwarrior.com/post/";
const DEFAULT_CARD_INFO_ENDPOINT: &str = "https://base.merchantwarrior.com/token/";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Card gateway credentials and endpoints.
///
/// Loaded once at startup and shared read-only. Empty credentials are
/// tolerated here; the gateway rejects the calls at request time.
#[derive(Clone)]
pub struct GatewayCredentials {
    pub merchant_id: String,
    pub api_key: String,
    pub api_passphrase: String,
    /// Endpoint for `getAccessToken`, `processCard` and `addCard`
    pub endpoint: String,
    /// Endpoint for `cardInfo`
    pub card_info_endpoint: String,
    /// Upper bound for a single gateway round trip
    pub timeout: Duration,
}

impl GatewayCredentials {
    pub fn from_env() -> Result<Self> {
        let credentials = GatewayCredentials {
            merchant_id: env::var("MW_MERCHANT_UUID").unwrap_or_default(),
            api_key: env::var("MW_API_KEY").unwrap_or_default(),
            api_passphrase: env::var("MW_API_PASSPHRASE").unwrap_or_default(),
            endpoint: env::var("MW_API_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string()),
            card_info_endpoint: env::var("MW_TOKEN_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_CARD_INFO_ENDPOINT.to_string()),
            timeout: Duration::from_secs(
                env::var("GATEWAY_TIMEOUT_SECS")
                    .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::Configuration("Invalid GATEWAY_TIMEOUT_SECS".to_string())
                    })?,
            ),
        };

        if !credentials.is_complete() {
            tracing::warn!(
                "Gateway credentials incomplete (MW_MERCHANT_UUID, MW_API_KEY, MW_API_PASSPHRASE); \
                 gateway calls will fail authentication"
            );
        }

        Ok(credentials)
    }

    /// True when merchant id, api key and passphrase are all present
    pub fn is_complete(&self) -> bool {
        !self.merchant_id.trim().is_empty()
            && !self.api_key.trim().is_empty()
            && !self.api_passphrase.trim().is_empty()
    }
}

impl fmt::Debug for GatewayCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayCredentials")
            .field("merchant_id", &self.merchant_id)
            .field("api_key", &"***")
            .field("api_passphrase", &"***")
            .field("endpoint", &self.endpoint)
            .field("card_info_endpoint", &self.card_info_endpoint)
            .field("timeout", &self.timeout)
            .finish()
    }
}
