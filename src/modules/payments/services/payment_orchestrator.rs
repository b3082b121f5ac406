use std::sync::Arc;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::{GatewayCredentials, PaymentConfig};
use crate::core::currency::GATEWAY_AMOUNT_SCALE;
use crate::core::{AppError, PostChargeStage, Result, MAX_AMOUNT};
use crate::modules::gateways::models::{
    CardParams, ChargeParams, CustomerFields, GatewayOutcome,
};
use crate::modules::gateways::services::{compute_hash, CardGateway};
use crate::modules::payments::models::{
    BookingCharges, BookingQuote, ChargeSummary, CustomerDetails, FailureReason, PaymentOutcome,
    PaymentRequest, PaymentState, ValidatedPayment,
};
use crate::modules::transactions::models::TransactionRecord;
use crate::modules::transactions::repositories::TransactionStore;

/// Progress of a single payment attempt
struct Attempt {
    id: Uuid,
    state: PaymentState,
}

impl Attempt {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: PaymentState::Init,
        }
    }

    fn advance(&mut self, next: PaymentState) {
        debug_assert!(
            !self.state.is_terminal(),
            "attempt {} already finished as {}",
            self.id,
            self.state
        );
        debug!(attempt_id = %self.id, from = %self.state, to = %next, "Payment state transition");
        self.state = next;
    }

    fn fail(&mut self, reason: FailureReason) {
        self.advance(PaymentState::Failed(reason));
    }
}

/// Drives a card payment through access token, charge, tokenization and
/// persistence.
///
/// Holds only shared, immutable collaborators; one instance serves every
/// request concurrently.
pub struct PaymentOrchestrator {
    gateway: Arc<dyn CardGateway>,
    store: Arc<dyn TransactionStore>,
    credentials: Arc<GatewayCredentials>,
    payment: PaymentConfig,
}

impl PaymentOrchestrator {
    pub fn new(
        gateway: Arc<dyn CardGateway>,
        store: Arc<dyn TransactionStore>,
        credentials: Arc<GatewayCredentials>,
        payment: PaymentConfig,
    ) -> Self {
        Self {
            gateway,
            store,
            credentials,
            payment,
        }
    }

    /// Charge the card, tokenize it and record the transaction.
    ///
    /// A gateway decline comes back as `Ok(PaymentOutcome::Declined)`. Once the
    /// charge has been approved, any later failure is a `PostChargeFailure`
    /// and the charge is not reversed.
    pub async fn submit_payment(&self, request: PaymentRequest) -> Result<PaymentOutcome> {
        let mut attempt = Attempt::new();

        let payment = match request.validate(self.payment.currency) {
            Ok(payment) => payment,
            Err(e) => {
                attempt.fail(FailureReason::Validation);
                info!(attempt_id = %attempt.id, error = %e, "Payment request rejected");
                return Err(e);
            }
        };

        info!(
            attempt_id = %attempt.id,
            amount = %payment.amount,
            currency = %self.payment.currency,
            gateway = self.gateway.name(),
            "Starting payment attempt"
        );

        attempt.advance(PaymentState::TokenRequested);
        match self.gateway.get_access_token().await {
            Ok(GatewayOutcome::Approved(_)) => {}
            Ok(GatewayOutcome::Declined { code, message }) => {
                attempt.fail(FailureReason::Token);
                error!(
                    attempt_id = %attempt.id,
                    response_code = %code,
                    gateway_message = %message,
                    "Gateway refused access token"
                );
                return Err(AppError::GatewayRejected {
                    step: "getAccessToken",
                    message,
                });
            }
            Err(e) => {
                attempt.fail(FailureReason::Token);
                error!(attempt_id = %attempt.id, error = %e, "Access token request failed");
                return Err(e.into());
            }
        }

        attempt.advance(PaymentState::Charging);
        let charge_params = self.charge_params(&payment, attempt.id);
        let charge = match self.gateway.charge_card(&charge_params).await {
            Ok(GatewayOutcome::Approved(charge)) => charge,
            Ok(GatewayOutcome::Declined { code, message }) => {
                attempt.fail(FailureReason::Declined);
                info!(
                    attempt_id = %attempt.id,
                    response_code = %code,
                    gateway_message = %message,
                    "Payment declined"
                );
                return Ok(PaymentOutcome::Declined { code, message });
            }
            Err(e) => {
                attempt.fail(FailureReason::ChargeError);
                error!(attempt_id = %attempt.id, error = %e, "Charge request failed");
                return Err(e.into());
            }
        };

        info!(
            attempt_id = %attempt.id,
            transaction_id = %charge.transaction_id,
            auth_code = %charge.auth_code,
            "Charge approved"
        );

        attempt.advance(PaymentState::Tokenizing);
        let card_params = CardParams {
            card_name: payment.cardholder_name.clone(),
            card_number: payment.card_number.clone(),
            expiry_month: payment.expiry.month_str(),
            expiry_year: payment.expiry.short_year(),
            cvc: payment.cvc.clone(),
        };
        let card_token = match self.gateway.tokenize_card(&card_params).await {
            Ok(GatewayOutcome::Approved(tokenized)) => tokenized.card_token,
            Ok(GatewayOutcome::Declined { code, message }) => {
                attempt.fail(FailureReason::TokenizeAfterCharge);
                return Err(post_charge_failure(
                    &attempt,
                    PostChargeStage::Tokenize,
                    &charge.transaction_id,
                    format!("addCard declined ({}): {}", code, message),
                ));
            }
            Err(e) => {
                attempt.fail(FailureReason::TokenizeAfterCharge);
                return Err(post_charge_failure(
                    &attempt,
                    PostChargeStage::Tokenize,
                    &charge.transaction_id,
                    e.to_string(),
                ));
            }
        };

        attempt.advance(PaymentState::Persisting);
        let record = TransactionRecord::new(
            charge.transaction_id.clone(),
            card_token.clone(),
            payment.amount,
            charge_params.customer.name.clone(),
            Some(charge_params.customer.email.clone()),
        );
        if let Err(e) = self.store.insert(record).await {
            attempt.fail(FailureReason::PersistAfterCharge);
            return Err(post_charge_failure(
                &attempt,
                PostChargeStage::Persist,
                &charge.transaction_id,
                e.to_string(),
            ));
        }

        attempt.advance(PaymentState::Completed);
        info!(
            attempt_id = %attempt.id,
            transaction_id = %charge.transaction_id,
            "Payment completed"
        );

        Ok(PaymentOutcome::Completed(ChargeSummary::new(charge, card_token)))
    }

    /// Price a booking with the configured hourly rate
    pub fn quote_booking(&self, charges: &BookingCharges) -> Result<BookingQuote> {
        let currency = self.payment.currency;
        let total = currency.round(charges.total(self.payment.extra_hour_rate)?);
        if total.scale() != GATEWAY_AMOUNT_SCALE || total > MAX_AMOUNT {
            return Err(AppError::validation("Booking total is too large"));
        }

        Ok(BookingQuote {
            booking_type: charges.booking_type,
            total: total.to_string(),
            currency,
            payment_required: !total.is_zero(),
        })
    }

    fn charge_params(&self, payment: &ValidatedPayment, attempt_id: Uuid) -> ChargeParams {
        let currency = self.payment.currency;
        let amount = currency.format_amount(payment.amount);
        let merchant_id = self.credentials.merchant_id.trim();
        let hash = compute_hash(
            &self.credentials.api_passphrase,
            merchant_id,
            &amount,
            &currency.to_string(),
        );

        ChargeParams {
            amount,
            currency,
            product: self.payment.product_description.clone(),
            customer: self.resolve_customer(&payment.customer, attempt_id),
            card_number: payment.card_number.clone(),
            card_name: payment.cardholder_name.clone(),
            card_expiry: payment.expiry.mmyy(),
            cvc: payment.cvc.clone(),
            hash,
        }
    }

    /// Fill the optional customer fields the gateway requires from the
    /// configured fallbacks.
    fn resolve_customer(&self, customer: &CustomerDetails, attempt_id: Uuid) -> CustomerFields {
        let defaults = &self.payment.customer_defaults;

        let state = match non_blank(&customer.state) {
            Some(state) => state,
            None => {
                warn!(
                    attempt_id = %attempt_id,
                    fallback = %defaults.state,
                    "Customer state missing, using default"
                );
                defaults.state.clone()
            }
        };

        CustomerFields {
            name: customer.name.trim().to_string(),
            email: non_blank(&customer.email).unwrap_or_else(|| defaults.email.clone()),
            address: non_blank(&customer.address).unwrap_or_else(|| defaults.address.clone()),
            city: non_blank(&customer.city).unwrap_or_else(|| defaults.city.clone()),
            state,
            country: non_blank(&customer.country).unwrap_or_else(|| defaults.country.clone()),
            post_code: non_blank(&customer.post_code)
                .unwrap_or_else(|| defaults.post_code.clone()),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn post_charge_failure(
    attempt: &Attempt,
    stage: PostChargeStage,
    transaction_id: &str,
    message: String,
) -> AppError {
    error!(
        attempt_id = %attempt.id,
        transaction_id = %transaction_id,
        stage = %stage,
        error = %message,
        reconciliation_required = true,
        "Card charged but payment could not be finalised"
    );

    AppError::PostChargeFailure {
        stage,
        transaction_id: transaction_id.to_string(),
        message,
    }
}
