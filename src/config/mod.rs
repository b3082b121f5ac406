use crate::core::{AppError, Currency, Result};
use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;

pub mod database;
pub mod gateway;
pub mod server;

pub use database::DatabaseConfig;
pub use gateway::GatewayCredentials;
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub gateway: GatewayCredentials,
    pub payment: PaymentConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    /// `LOG_FORMAT=json` selects JSON lines, anything else human-readable output
    pub fn from_env() -> Self {
        match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Per-deployment payment settings
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    /// Single settlement currency used for every charge
    pub currency: Currency,
    /// Sent as `transactionProduct`
    pub product_description: String,
    /// Fallbacks for optional customer fields the gateway requires
    pub customer_defaults: CustomerDefaults,
    /// Price per hour of early check-in or late check-out
    pub extra_hour_rate: Decimal,
}

#[derive(Debug, Clone)]
pub struct CustomerDefaults {
    pub country: String,
    pub state: String,
    pub city: String,
    pub address: String,
    pub post_code: String,
    pub email: String,
}

impl Default for CustomerDefaults {
    fn default() -> Self {
        Self {
            country: "AU".to_string(),
            state: "QLD".to_string(),
            city: "Brisbane".to_string(),
            address: "Unknown".to_string(),
            post_code: "4000".to_string(),
            email: "payments@example.com".to_string(),
        }
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            currency: Currency::AUD,
            product_description: "Accommodation Payment".to_string(),
            customer_defaults: CustomerDefaults::default(),
            extra_hour_rate: Decimal::new(60, 0),
        }
    }
}

impl PaymentConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = PaymentConfig::default();
        let fallback = defaults.customer_defaults;

        Ok(PaymentConfig {
            currency: env::var("PAYMENT_CURRENCY")
                .map(|c| Currency::from_str(&c))
                .unwrap_or(Ok(defaults.currency))
                .map_err(AppError::Configuration)?,
            product_description: env::var("PAYMENT_PRODUCT_DESCRIPTION")
                .unwrap_or(defaults.product_description),
            customer_defaults: CustomerDefaults {
                country: env::var("DEFAULT_CUSTOMER_COUNTRY").unwrap_or(fallback.country),
                state: env::var("DEFAULT_CUSTOMER_STATE").unwrap_or(fallback.state),
                city: env::var("DEFAULT_CUSTOMER_CITY").unwrap_or(fallback.city),
                address: env::var("DEFAULT_CUSTOMER_ADDRESS").unwrap_or(fallback.address),
                post_code: env::var("DEFAULT_CUSTOMER_POST_CODE").unwrap_or(fallback.post_code),
                email: env::var("DEFAULT_CUSTOMER_EMAIL").unwrap_or(fallback.email),
            },
            extra_hour_rate: match env::var("EXTRA_HOUR_RATE") {
                Ok(rate) => Decimal::from_str(rate.trim()).map_err(|_| {
                    AppError::Configuration("Invalid EXTRA_HOUR_RATE".to_string())
                })?,
                Err(_) => defaults.extra_hour_rate,
            },
        })
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                log_format: LogFormat::from_env(),
            },
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
            gateway: GatewayCredentials::from_env()?,
            payment: PaymentConfig::from_env()?,
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.gateway.timeout.is_zero() {
            return Err(AppError::Configuration(
                "Gateway timeout must be greater than 0".to_string(),
            ));
        }

        if self.gateway.endpoint.trim().is_empty() || self.gateway.card_info_endpoint.trim().is_empty()
        {
            return Err(AppError::Configuration(
                "Gateway endpoints must not be empty".to_string(),
            ));
        }

        if self.payment.extra_hour_rate < Decimal::ZERO {
            return Err(AppError::Configuration(
                "Extra hour rate cannot be negative".to_string(),
            ));
        }

        if self.database.max_connections < self.database.pool_size {
            return Err(AppError::Configuration(
                "DATABASE_MAX_CONNECTIONS must be >= DATABASE_POOL_SIZE".to_string(),
            ));
        }

        Ok(())
    }
}
