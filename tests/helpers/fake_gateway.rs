// In-process card gateway with scripted replies
//
// Records every call so tests can assert which gateway steps ran.

use std::sync::Mutex;

use async_trait::async_trait;
use guestpay::core::AppError;
use guestpay::gateways::models::{
    AccessTokenResult, CardMetadata, CardParams, ChargeParams, ChargeResult, GatewayError,
    GatewayMethod, GatewayOutcome, TokenizeResult,
};
use guestpay::gateways::services::{CardGateway, GatewayResult};
use guestpay::transactions::{TransactionRecord, TransactionStore};

use super::test_data::{TEST_CARD_TOKEN, TEST_TRANSACTION_ID};

/// Scripted answer for one gateway method
#[derive(Debug, Clone)]
pub enum Reply {
    Approve,
    Decline(&'static str, &'static str),
    Unreachable,
    Protocol,
}

pub struct ScriptedGateway {
    token: Reply,
    charge: Reply,
    tokenize: Reply,
    card_info: Reply,
    transaction_id: String,
    card_token: String,
    calls: Mutex<Vec<GatewayMethod>>,
    last_charge: Mutex<Option<ChargeParams>>,
    last_card: Mutex<Option<CardParams>>,
}

impl ScriptedGateway {
    /// Gateway that approves every call
    pub fn approving() -> Self {
        Self {
            token: Reply::Approve,
            charge: Reply::Approve,
            tokenize: Reply::Approve,
            card_info: Reply::Approve,
            transaction_id: TEST_TRANSACTION_ID.to_string(),
            card_token: TEST_CARD_TOKEN.to_string(),
            calls: Mutex::new(Vec::new()),
            last_charge: Mutex::new(None),
            last_card: Mutex::new(None),
        }
    }

    pub fn with_token(mut self, reply: Reply) -> Self {
        self.token = reply;
        self
    }

    pub fn with_charge(mut self, reply: Reply) -> Self {
        self.charge = reply;
        self
    }

    pub fn with_tokenize(mut self, reply: Reply) -> Self {
        self.tokenize = reply;
        self
    }

    pub fn with_card_info(mut self, reply: Reply) -> Self {
        self.card_info = reply;
        self
    }

    pub fn with_transaction_id(mut self, transaction_id: &str) -> Self {
        self.transaction_id = transaction_id.to_string();
        self
    }

    /// Number of calls made for `method`
    pub fn calls(&self, method: GatewayMethod) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|m| **m == method)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Methods in the order they were called
    pub fn call_log(&self) -> Vec<GatewayMethod> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_charge(&self) -> Option<ChargeParams> {
        self.last_charge.lock().unwrap().clone()
    }

    pub fn last_card(&self) -> Option<CardParams> {
        self.last_card.lock().unwrap().clone()
    }

    fn answer<T>(
        &self,
        method: GatewayMethod,
        reply: &Reply,
        approved: impl FnOnce() -> T,
    ) -> GatewayResult<T> {
        self.calls.lock().unwrap().push(method);

        match reply {
            Reply::Approve => Ok(GatewayOutcome::Approved(approved())),
            Reply::Decline(code, message) => Ok(GatewayOutcome::Declined {
                code: code.to_string(),
                message: message.to_string(),
            }),
            Reply::Unreachable => Err(GatewayError::Unreachable {
                method,
                reason: "timeout after 30s".to_string(),
            }),
            Reply::Protocol => Err(GatewayError::Protocol {
                method,
                reason: "unexpected root element <html>".to_string(),
            }),
        }
    }
}

#[async_trait]
impl CardGateway for ScriptedGateway {
    async fn get_access_token(&self) -> GatewayResult<AccessTokenResult> {
        self.answer(GatewayMethod::GetAccessToken, &self.token, || AccessTokenResult {
            response_code: "0".to_string(),
            response_message: "Operation successful".to_string(),
            token: Some("3f7f1a36e1f0d1b4".to_string()),
        })
    }

    async fn charge_card(&self, params: &ChargeParams) -> GatewayResult<ChargeResult> {
        *self.last_charge.lock().unwrap() = Some(params.clone());

        let transaction_id = self.transaction_id.clone();
        self.answer(GatewayMethod::ProcessCard, &self.charge, || ChargeResult {
            response_code: "0".to_string(),
            response_message: "Transaction approved".to_string(),
            transaction_id,
            auth_code: "731357".to_string(),
            auth_message: "Approved or completed successfully".to_string(),
            auth_response_code: "08".to_string(),
            auth_settled_date: "2024-05-01".to_string(),
            masked_card_number: "411111XXXXXX1111".to_string(),
        })
    }

    async fn tokenize_card(&self, params: &CardParams) -> GatewayResult<TokenizeResult> {
        *self.last_card.lock().unwrap() = Some(params.clone());

        let card_token = self.card_token.clone();
        self.answer(GatewayMethod::AddCard, &self.tokenize, || TokenizeResult {
            response_code: "0".to_string(),
            response_message: "Operation successful".to_string(),
            card_token,
        })
    }

    async fn get_card_info(&self, card_token: &str) -> GatewayResult<CardMetadata> {
        let card_token = card_token.to_string();
        self.answer(GatewayMethod::CardInfo, &self.card_info, || CardMetadata {
            card_token,
            card_name: Some("Jane Guest".to_string()),
            card_number_first: Some("4111".to_string()),
            card_number_last: Some("1111".to_string()),
            card_expiry_month: Some("05".to_string()),
            card_expiry_year: Some("27".to_string()),
            extra: Default::default(),
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Store whose writes always fail
pub struct FailingStore;

#[async_trait]
impl TransactionStore for FailingStore {
    async fn insert(&self, _record: TransactionRecord) -> guestpay::core::Result<TransactionRecord> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn get_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> guestpay::core::Result<TransactionRecord> {
        Err(AppError::not_found(format!("Payment '{}' not found", transaction_id)))
    }

    async fn get_by_card_token(&self, _card_token: &str) -> guestpay::core::Result<TransactionRecord> {
        Err(AppError::not_found("Card token not found"))
    }

    async fn ping(&self) -> guestpay::core::Result<()> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }
}
