use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{AppError, Currency, Result};

/// Customer block of a payment request. Only the name is mandatory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub post_code: Option<String>,
}

/// Card payment as submitted by the booking form
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    /// Decimal string, e.g. "600" or "49.999"
    pub amount: String,
    pub card_number: String,
    #[serde(alias = "cardName")]
    pub cardholder_name: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub cvc: String,
    #[serde(alias = "customerDetails")]
    pub customer: CustomerDetails,
}

impl fmt::Debug for PaymentRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentRequest")
            .field("amount", &self.amount)
            .field("card_number", &"***")
            .field("cardholder_name", &self.cardholder_name)
            .field("expiry_month", &self.expiry_month)
            .field("expiry_year", &self.expiry_year)
            .field("cvc", &"***")
            .field("customer", &self.customer.name)
            .finish()
    }
}

/// Card expiry normalized to a month and a four-digit year
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardExpiry {
    pub month: u8,
    pub year: u16,
}

impl CardExpiry {
    /// Accepts month `1`..`12` (optionally zero-padded) and a two- or
    /// four-digit year.
    pub fn parse(month: &str, year: &str) -> Result<Self> {
        let month = month.trim();
        let year = year.trim();

        let month: u8 = match month.len() {
            1 | 2 if month.chars().all(|c| c.is_ascii_digit()) => month
                .parse()
                .map_err(|_| AppError::validation("Invalid expiry month"))?,
            _ => return Err(AppError::validation("Invalid expiry month")),
        };
        if !(1..=12).contains(&month) {
            return Err(AppError::validation("Expiry month must be between 1 and 12"));
        }

        if !year.chars().all(|c| c.is_ascii_digit()) {
            return Err(AppError::validation("Invalid expiry year"));
        }
        let year: u16 = match year.len() {
            2 => 2000 + year.parse::<u16>().map_err(|_| AppError::validation("Invalid expiry year"))?,
            4 => year
                .parse()
                .map_err(|_| AppError::validation("Invalid expiry year"))?,
            _ => return Err(AppError::validation("Expiry year must have 2 or 4 digits")),
        };

        Ok(Self { month, year })
    }

    /// `MM`
    pub fn month_str(&self) -> String {
        format!("{:02}", self.month)
    }

    /// `YY`
    pub fn short_year(&self) -> String {
        format!("{:02}", self.year % 100)
    }

    /// Combined `MMYY` as used by `processCard`
    pub fn mmyy(&self) -> String {
        format!("{}{}", self.month_str(), self.short_year())
    }
}

/// A payment request that passed input validation
#[derive(Clone)]
pub struct ValidatedPayment {
    /// Rounded to two decimal places
    pub amount: Decimal,
    /// Digits only
    pub card_number: String,
    pub cardholder_name: String,
    pub expiry: CardExpiry,
    pub cvc: String,
    pub customer: CustomerDetails,
}

impl fmt::Debug for ValidatedPayment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedPayment")
            .field("amount", &self.amount)
            .field("card_number", &"***")
            .field("cardholder_name", &self.cardholder_name)
            .field("expiry", &self.expiry)
            .field("cvc", &"***")
            .finish()
    }
}

impl PaymentRequest {
    /// Checks every field and normalizes amount, card number and expiry.
    ///
    /// Runs before any gateway call; nothing leaves the process on failure.
    pub fn validate(&self, currency: Currency) -> Result<ValidatedPayment> {
        let amount = currency.parse_amount(&self.amount).map_err(AppError::Validation)?;

        let card_number = Self::validate_card_number(&self.card_number)?;
        let expiry = CardExpiry::parse(&self.expiry_month, &self.expiry_year)?;
        let cvc = Self::validate_cvc(&self.cvc)?;

        let cardholder_name = self.cardholder_name.trim();
        if cardholder_name.is_empty() {
            return Err(AppError::validation("Cardholder name is required"));
        }

        if self.customer.name.trim().is_empty() {
            return Err(AppError::validation("Customer name is required"));
        }

        Ok(ValidatedPayment {
            amount,
            card_number,
            cardholder_name: cardholder_name.to_string(),
            expiry,
            cvc,
            customer: self.customer.clone(),
        })
    }

    fn validate_card_number(raw: &str) -> Result<String> {
        let digits: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

        if digits.is_empty() {
            return Err(AppError::validation("Card number is required"));
        }
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(AppError::validation("Card number must contain only digits"));
        }
        if !(12..=19).contains(&digits.len()) {
            return Err(AppError::validation("Card number must be 12 to 19 digits"));
        }

        Ok(digits)
    }

    fn validate_cvc(raw: &str) -> Result<String> {
        let cvc = raw.trim();
        if !(3..=4).contains(&cvc.len()) || !cvc.chars().all(|c| c.is_ascii_digit()) {
            return Err(AppError::validation("CVC must be 3 or 4 digits"));
        }
        Ok(cvc.to_string())
    }
}
