use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::gateway_fields::GatewayFields;
use crate::core::{AppError, Currency};

/// Operation selector sent in the `method` form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayMethod {
    GetAccessToken,
    ProcessCard,
    AddCard,
    CardInfo,
}

impl GatewayMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayMethod::GetAccessToken => "getAccessToken",
            GatewayMethod::ProcessCard => "processCard",
            GatewayMethod::AddCard => "addCard",
            GatewayMethod::CardInfo => "cardInfo",
        }
    }
}

impl fmt::Display for GatewayMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// System-level failure of a gateway call
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    /// Transport failure or timeout
    #[error("{method}: gateway unreachable: {reason}")]
    Unreachable { method: GatewayMethod, reason: String },

    /// Unparsable or incomplete response
    #[error("{method}: protocol error: {reason}")]
    Protocol { method: GatewayMethod, reason: String },
}

impl GatewayError {
    pub fn method(&self) -> GatewayMethod {
        match self {
            GatewayError::Unreachable { method, .. } | GatewayError::Protocol { method, .. } => {
                *method
            }
        }
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Unreachable { .. } => AppError::GatewayUnreachable(err.to_string()),
            GatewayError::Protocol { .. } => AppError::GatewayProtocol(err.to_string()),
        }
    }
}

/// Classified result of a well-formed gateway reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayOutcome<T> {
    /// `responseCode` was "0"
    Approved(T),
    /// Any other `responseCode`
    Declined { code: String, message: String },
}

impl<T> GatewayOutcome<T> {
    pub fn is_approved(&self) -> bool {
        matches!(self, GatewayOutcome::Approved(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> GatewayOutcome<U> {
        match self {
            GatewayOutcome::Approved(value) => GatewayOutcome::Approved(f(value)),
            GatewayOutcome::Declined { code, message } => GatewayOutcome::Declined { code, message },
        }
    }
}

/// Typed view over an approved reply's fields
pub trait FromGatewayFields: Sized {
    fn from_fields(method: GatewayMethod, fields: GatewayFields) -> Result<Self, GatewayError>;
}

fn required(
    method: GatewayMethod,
    fields: &mut GatewayFields,
    key: &'static str,
) -> Result<String, GatewayError> {
    fields.take(key).ok_or_else(|| GatewayError::Protocol {
        method,
        reason: format!("approved response is missing {}", key),
    })
}

fn optional(fields: &mut GatewayFields, key: &str) -> String {
    fields.take(key).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResult {
    pub response_code: String,
    pub response_message: String,
    pub token: Option<String>,
}

impl FromGatewayFields for AccessTokenResult {
    fn from_fields(_method: GatewayMethod, mut fields: GatewayFields) -> Result<Self, GatewayError> {
        Ok(Self {
            response_code: optional(&mut fields, "responseCode"),
            response_message: optional(&mut fields, "responseMessage"),
            token: fields.take("token"),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeResult {
    pub response_code: String,
    pub response_message: String,
    #[serde(rename = "transactionID")]
    pub transaction_id: String,
    pub auth_code: String,
    pub auth_message: String,
    pub auth_response_code: String,
    pub auth_settled_date: String,
    /// Masked PAN echoed back as `paymentCardNumber`
    pub masked_card_number: String,
}

impl FromGatewayFields for ChargeResult {
    fn from_fields(method: GatewayMethod, mut fields: GatewayFields) -> Result<Self, GatewayError> {
        Ok(Self {
            transaction_id: required(method, &mut fields, "transactionID")?,
            response_code: optional(&mut fields, "responseCode"),
            response_message: optional(&mut fields, "responseMessage"),
            auth_code: optional(&mut fields, "authCode"),
            auth_message: optional(&mut fields, "authMessage"),
            auth_response_code: optional(&mut fields, "authResponseCode"),
            auth_settled_date: optional(&mut fields, "authSettledDate"),
            masked_card_number: optional(&mut fields, "paymentCardNumber"),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenizeResult {
    pub response_code: String,
    pub response_message: String,
    pub card_token: String,
}

impl FromGatewayFields for TokenizeResult {
    fn from_fields(method: GatewayMethod, mut fields: GatewayFields) -> Result<Self, GatewayError> {
        Ok(Self {
            card_token: required(method, &mut fields, "cardID")?,
            response_code: optional(&mut fields, "responseCode"),
            response_message: optional(&mut fields, "responseMessage"),
        })
    }
}

/// Gateway's live view of a tokenized card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardMetadata {
    #[serde(rename = "cardID")]
    pub card_token: String,
    #[serde(rename = "cardName", skip_serializing_if = "Option::is_none")]
    pub card_name: Option<String>,
    /// Issuer digits
    #[serde(rename = "cardNumberFirst", skip_serializing_if = "Option::is_none")]
    pub card_number_first: Option<String>,
    #[serde(rename = "cardNumberLast", skip_serializing_if = "Option::is_none")]
    pub card_number_last: Option<String>,
    #[serde(rename = "cardExpiryMonth", skip_serializing_if = "Option::is_none")]
    pub card_expiry_month: Option<String>,
    #[serde(rename = "cardExpiryYear", skip_serializing_if = "Option::is_none")]
    pub card_expiry_year: Option<String>,
    /// Remaining gateway fields, passed through untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl CardMetadata {
    /// e.g. `4564XXXXXXXX1234`, when both ends are known
    pub fn masked_number(&self) -> Option<String> {
        let first = self.card_number_first.as_deref()?;
        let last = self.card_number_last.as_deref()?;
        let hidden = 16usize.saturating_sub(first.len() + last.len());
        Some(format!("{}{}{}", first, "X".repeat(hidden), last))
    }
}

impl FromGatewayFields for CardMetadata {
    fn from_fields(method: GatewayMethod, mut fields: GatewayFields) -> Result<Self, GatewayError> {
        Ok(Self {
            card_token: required(method, &mut fields, "cardID")?,
            card_name: fields.take("cardName"),
            card_number_first: fields.take("cardNumberFirst"),
            card_number_last: fields.take("cardNumberLast"),
            card_expiry_month: fields.take("cardExpiryMonth"),
            card_expiry_year: fields.take("cardExpiryYear"),
            extra: fields.into_inner(),
        })
    }
}

/// Customer fields as sent on `processCard`, fallbacks already applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerFields {
    pub name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub post_code: String,
}

/// Inputs for `processCard`
#[derive(Clone)]
pub struct ChargeParams {
    /// Two-decimal amount, identical to the hash input
    pub amount: String,
    pub currency: Currency,
    pub product: String,
    pub customer: CustomerFields,
    /// Digits only
    pub card_number: String,
    pub card_name: String,
    /// `MMYY`
    pub card_expiry: String,
    pub cvc: String,
    pub hash: String,
}

impl fmt::Debug for ChargeParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChargeParams")
            .field("amount", &self.amount)
            .field("currency", &self.currency)
            .field("product", &self.product)
            .field("customer", &self.customer.name)
            .field("card_number", &"***")
            .field("cvc", &"***")
            .field("hash", &self.hash)
            .finish()
    }
}

/// Inputs for `addCard`
#[derive(Clone)]
pub struct CardParams {
    pub card_name: String,
    /// Digits only
    pub card_number: String,
    /// `MM`
    pub expiry_month: String,
    /// `YY`
    pub expiry_year: String,
    pub cvc: String,
}

impl fmt::Debug for CardParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardParams")
            .field("card_name", &self.card_name)
            .field("card_number", &"***")
            .field("expiry_month", &self.expiry_month)
            .field("expiry_year", &self.expiry_year)
            .field("cvc", &"***")
            .finish()
    }
}
