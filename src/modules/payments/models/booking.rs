use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Currency, Result};

/// Security deposit amounts offered by the booking form
pub const DEPOSIT_PRESETS: [i64; 3] = [600, 800, 1000];

/// Where the booking came from. Airbnb collects its own deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingType {
    Airbnb,
    Ota,
    Direct,
}

/// Optional extra charged per stay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addon {
    pub name: String,
    pub price: Decimal,
}

impl Addon {
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }

    /// Add-ons offered to every guest
    pub fn default_catalog() -> Vec<Addon> {
        vec![
            Addon::new("Cot", Decimal::new(99, 0)),
            Addon::new("Sofabed", Decimal::new(99, 0)),
            Addon::new("High chair", Decimal::new(60, 0)),
            Addon::new("Pet fee", Decimal::new(130, 0)),
        ]
    }
}

/// Charges selected for one booking
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCharges {
    pub booking_type: BookingType,
    pub security_deposit: Decimal,
    #[serde(default)]
    pub accommodation_fee: Option<Decimal>,
    #[serde(default)]
    pub addons: Vec<Addon>,
    #[serde(default)]
    pub early_check_in_hours: u32,
    #[serde(default)]
    pub late_check_out_hours: u32,
}

impl BookingCharges {
    /// Amount to collect from the guest.
    ///
    /// Airbnb bookings are settled elsewhere and always total zero. Every other
    /// booking pays deposit, accommodation fee, add-ons and extra hours at
    /// `hourly_rate`.
    pub fn total(&self, hourly_rate: Decimal) -> Result<Decimal> {
        self.validate()?;

        if self.booking_type == BookingType::Airbnb {
            return Ok(Decimal::ZERO);
        }

        let addons = self
            .addons
            .iter()
            .try_fold(Decimal::ZERO, |acc, a| acc.checked_add(a.price));
        let hours = Decimal::from(self.early_check_in_hours)
            .checked_add(Decimal::from(self.late_check_out_hours))
            .and_then(|h| h.checked_mul(hourly_rate));

        addons
            .zip(hours)
            .and_then(|(addons, hours)| {
                self.security_deposit
                    .checked_add(self.accommodation_fee.unwrap_or(Decimal::ZERO))?
                    .checked_add(addons)?
                    .checked_add(hours)
            })
            .ok_or_else(|| AppError::validation("Booking total is too large"))
    }

    /// Whether the deposit is one of the form's presets rather than a custom value
    pub fn is_preset_deposit(&self) -> bool {
        DEPOSIT_PRESETS
            .iter()
            .any(|preset| Decimal::from(*preset) == self.security_deposit)
    }

    fn validate(&self) -> Result<()> {
        if self.security_deposit < Decimal::ZERO {
            return Err(AppError::validation("Security deposit cannot be negative"));
        }

        if matches!(self.accommodation_fee, Some(fee) if fee < Decimal::ZERO) {
            return Err(AppError::validation("Accommodation fee cannot be negative"));
        }

        if let Some(addon) = self.addons.iter().find(|a| a.price < Decimal::ZERO) {
            return Err(AppError::validation(format!(
                "Add-on '{}' has a negative price",
                addon.name
            )));
        }

        Ok(())
    }
}

/// Priced booking as shown before payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingQuote {
    pub booking_type: BookingType,
    /// Two-decimal amount string, ready to submit as a payment amount
    pub total: String,
    pub currency: Currency,
    /// False when nothing has to be charged
    pub payment_required: bool,
}
