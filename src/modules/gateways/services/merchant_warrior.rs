use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, info, warn};

use super::gateway_trait::{CardGateway, GatewayResult};
use super::response_parser;
use crate::config::GatewayCredentials;
use crate::core::{AppError, Result};
use crate::modules::gateways::models::{
    AccessTokenResult, CardMetadata, CardParams, ChargeParams, ChargeResult, FromGatewayFields,
    GatewayError, GatewayMethod, GatewayOutcome, TokenizeResult,
};

/// Bytes of an unparsable response body kept in logs
const BODY_EXCERPT_LEN: usize = 512;

type FormFields = Vec<(&'static str, String)>;

/// Merchant Warrior card gateway client
///
/// Form-encoded POSTs answered with XML. Holds no per-request state; one
/// instance is shared by every payment attempt.
pub struct MerchantWarriorClient {
    client: Client,
    credentials: Arc<GatewayCredentials>,
}

impl MerchantWarriorClient {
    /// Create a new client with the configured per-call timeout
    pub fn new(credentials: Arc<GatewayCredentials>) -> Result<Self> {
        let client = Client::builder()
            .timeout(credentials.timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            credentials,
        })
    }

    async fn call<T: FromGatewayFields>(
        &self,
        method: GatewayMethod,
        url: &str,
        form: FormFields,
    ) -> GatewayResult<T> {
        let mut body: FormFields = Vec::with_capacity(form.len() + 3);
        body.push(("method", method.as_str().to_string()));
        body.push(("merchantUUID", self.credentials.merchant_id.trim().to_string()));
        body.push(("apiKey", self.credentials.api_key.trim().to_string()));
        body.extend(form);

        debug!(gateway = self.name(), method = %method, "Sending gateway request");

        let response = self
            .client
            .post(url)
            .form(&body)
            .send()
            .await
            .map_err(|e| {
                let reason = if e.is_timeout() {
                    format!("timeout after {}s", self.credentials.timeout.as_secs())
                } else if e.is_connect() {
                    format!("connection failed ({})", e)
                } else {
                    format!("request failed ({})", e)
                };
                warn!(gateway = self.name(), method = %method, reason = %reason, "Gateway unreachable");
                GatewayError::Unreachable { method, reason }
            })?;

        let status = response.status();
        let raw = response.bytes().await.map_err(|e| {
            warn!(gateway = self.name(), method = %method, error = %e, "Failed to read gateway response");
            GatewayError::Unreachable {
                method,
                reason: format!("failed to read response body ({})", e),
            }
        })?;

        let fields = response_parser::parse(&raw).map_err(|e| {
            error!(
                gateway = self.name(),
                method = %method,
                http_status = status.as_u16(),
                error = %e,
                body = %excerpt(&raw),
                "Unparsable gateway response"
            );
            let reason = if status.is_success() {
                e.to_string()
            } else {
                format!("HTTP {} ({})", status.as_u16(), e)
            };
            GatewayError::Protocol { method, reason }
        })?;

        let code = match fields.response_code() {
            Some(code) => code.to_string(),
            None => {
                error!(
                    gateway = self.name(),
                    method = %method,
                    http_status = status.as_u16(),
                    body = %excerpt(&raw),
                    "Gateway response has no responseCode"
                );
                return Err(GatewayError::Protocol {
                    method,
                    reason: "response has no responseCode".to_string(),
                });
            }
        };

        if code != "0" {
            let message = fields
                .response_message()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .unwrap_or("Request declined by gateway")
                .to_string();
            info!(
                gateway = self.name(),
                method = %method,
                response_code = %code,
                response_message = %message,
                "Gateway declined request"
            );
            return Ok(GatewayOutcome::Declined { code, message });
        }

        T::from_fields(method, fields)
            .map(GatewayOutcome::Approved)
            .map_err(|e| {
                error!(
                    gateway = self.name(),
                    method = %method,
                    error = %e,
                    body = %excerpt(&raw),
                    "Approved gateway response is incomplete"
                );
                e
            })
    }
}

#[async_trait]
impl CardGateway for MerchantWarriorClient {
    async fn get_access_token(&self) -> GatewayResult<AccessTokenResult> {
        self.call(GatewayMethod::GetAccessToken, &self.credentials.endpoint, Vec::new())
            .await
    }

    async fn charge_card(&self, params: &ChargeParams) -> GatewayResult<ChargeResult> {
        self.call(
            GatewayMethod::ProcessCard,
            &self.credentials.endpoint,
            charge_form(params),
        )
        .await
    }

    async fn tokenize_card(&self, params: &CardParams) -> GatewayResult<TokenizeResult> {
        self.call(
            GatewayMethod::AddCard,
            &self.credentials.endpoint,
            tokenize_form(params),
        )
        .await
    }

    async fn get_card_info(&self, card_token: &str) -> GatewayResult<CardMetadata> {
        self.call(
            GatewayMethod::CardInfo,
            &self.credentials.card_info_endpoint,
            vec![("cardID", card_token.to_string())],
        )
        .await
    }

    fn name(&self) -> &str {
        "merchant_warrior"
    }
}

fn charge_form(params: &ChargeParams) -> FormFields {
    let customer = &params.customer;
    vec![
        ("transactionAmount", params.amount.clone()),
        ("transactionCurrency", params.currency.to_string()),
        ("transactionProduct", params.product.clone()),
        ("customerName", customer.name.clone()),
        ("customerCountry", customer.country.clone()),
        ("customerState", customer.state.clone()),
        ("customerCity", customer.city.clone()),
        ("customerAddress", customer.address.clone()),
        ("customerPostCode", customer.post_code.clone()),
        ("customerEmail", customer.email.clone()),
        ("paymentCardNumber", params.card_number.clone()),
        ("paymentCardName", params.card_name.clone()),
        ("paymentCardExpiry", params.card_expiry.clone()),
        ("paymentCardCSC", params.cvc.clone()),
        ("hash", params.hash.clone()),
    ]
}

fn tokenize_form(params: &CardParams) -> FormFields {
    vec![
        ("cardName", params.card_name.clone()),
        ("cardNumber", params.card_number.clone()),
        ("cardExpiryMonth", params.expiry_month.clone()),
        ("cardExpiryYear", params.expiry_year.clone()),
        ("paymentCardCSC", params.cvc.clone()),
        ("verifyCard", "1".to_string()),
    ]
}

fn excerpt(raw: &[u8]) -> String {
    let end = raw.len().min(BODY_EXCERPT_LEN);
    String::from_utf8_lossy(&raw[..end]).into_owned()
}
