use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The gateway expects every amount with exactly two decimal places
pub const GATEWAY_AMOUNT_SCALE: u32 = 2;

/// Largest amount the `payments.amount` column (`DECIMAL(12, 2)`) can hold
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2); // 9_999_999_999.99

/// Settlement currencies accepted by the card gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Australian Dollar
    AUD,
    /// New Zealand Dollar
    NZD,
    /// US Dollar
    USD,
}

impl Currency {
    /// Rounds to two decimal places, half away from zero, and pins the scale
    /// so that `50` renders as `50.00`.
    pub fn round(&self, amount: Decimal) -> Decimal {
        let mut rounded =
            amount.round_dp_with_strategy(GATEWAY_AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(GATEWAY_AMOUNT_SCALE);
        rounded
    }

    /// Amount string as sent in `transactionAmount` and fed to the hash
    pub fn format_amount(&self, amount: Decimal) -> String {
        self.round(amount).to_string()
    }

    /// Parses a caller-supplied amount and rounds it to gateway precision.
    ///
    /// Rejects anything that is not strictly positive, before or after rounding,
    /// and anything larger than [`MAX_AMOUNT`].
    pub fn parse_amount(&self, raw: &str) -> Result<Decimal, String> {
        let amount = Decimal::from_str(raw.trim())
            .map_err(|_| format!("Invalid amount '{}'", raw))?;

        if amount <= Decimal::ZERO {
            return Err("Payment amount must be greater than 0".to_string());
        }

        let rounded = self.round(amount);
        if rounded <= Decimal::ZERO {
            return Err(format!(
                "Payment amount must be at least 0.01 {}",
                self
            ));
        }

        if rounded.scale() != GATEWAY_AMOUNT_SCALE || rounded > MAX_AMOUNT {
            return Err(format!(
                "Payment amount cannot exceed {} {}",
                MAX_AMOUNT, self
            ));
        }

        Ok(rounded)
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::AUD
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::AUD => write!(f, "AUD"),
            Currency::NZD => write!(f, "NZD"),
            Currency::USD => write!(f, "USD"),
        }
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AUD" => Ok(Currency::AUD),
            "NZD" => Ok(Currency::NZD),
            "USD" => Ok(Currency::USD),
            _ => Err(format!("Invalid currency: {}", s)),
        }
    }
}
