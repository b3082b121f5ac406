use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};

/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Step of a payment attempt that failed after the card was already charged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostChargeStage {
    Tokenize,
    Persist,
}

impl PostChargeStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostChargeStage::Tokenize => "tokenize-after-charge",
            PostChargeStage::Persist => "persist-after-charge",
        }
    }
}

impl std::fmt::Display for PostChargeStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main application error type
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Bad input, rejected before any gateway call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Gateway could not be reached or timed out (retryable)
    #[error("Gateway unreachable: {0}")]
    GatewayUnreachable(String),

    /// Gateway replied with something we could not interpret
    #[error("Gateway protocol error: {0}")]
    GatewayProtocol(String),

    /// Gateway answered with a non-zero response code outside of a charge
    #[error("Gateway rejected {step}: {message}")]
    GatewayRejected { step: &'static str, message: String },

    /// Tokenization or persistence failed after money was captured.
    /// Requires manual reconciliation against `transaction_id`.
    #[error("{stage} failure for charged transaction {transaction_id}: {message}")]
    PostChargeFailure {
        stage: PostChargeStage,
        transaction_id: String,
        message: String,
    },

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Stored card token is flagged as expired
    #[error("Already expired: {0}")]
    AlreadyExpired(String),

    /// Duplicate record
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database operation errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Message safe to show to the end user.
    ///
    /// System errors collapse to a generic sentence so no internal
    /// diagnostics reach the client.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::NotFound(msg) | AppError::AlreadyExpired(msg) => {
                msg.clone()
            }
            AppError::GatewayRejected { message, .. } => message.clone(),
            AppError::GatewayUnreachable(_) => {
                "Payment gateway is temporarily unavailable, please try again".to_string()
            }
            AppError::GatewayProtocol(_) => {
                "Payment gateway returned an unexpected response".to_string()
            }
            AppError::PostChargeFailure { .. } => {
                "Your payment was received but could not be finalised. Please contact support"
                    .to_string()
            }
            AppError::Conflict(_) => "Payment has already been recorded".to_string(),
            AppError::Database(_) | AppError::Configuration(_) | AppError::Internal(_) => {
                "An unexpected error occurred while processing the payment".to_string()
            }
        }
    }

    /// Whether the caller may retry the same request unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::GatewayUnreachable(_))
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "success": false,
            "error": self.public_message(),
        }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::GatewayUnreachable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::GatewayProtocol(_) => StatusCode::BAD_GATEWAY,
            AppError::GatewayRejected { .. } => StatusCode::BAD_GATEWAY,
            AppError::PostChargeFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyExpired(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Helper functions for common error scenarios
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        AppError::NotFound(resource.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
