use actix_web::{error::JsonPayloadError, HttpRequest, HttpResponse};

use crate::core::AppError;

/// Turns malformed JSON bodies into the standard `{success, error}` envelope
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(path = %req.path(), error = %err, "Rejected JSON payload");

    let message = match &err {
        JsonPayloadError::ContentType => "Content type must be application/json".to_string(),
        JsonPayloadError::Deserialize(e) => format!("Invalid request body: {}", e),
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            "Request body is too large".to_string()
        }
        _ => "Invalid request body".to_string(),
    };

    AppError::Validation(message).into()
}

/// Fallback for unknown routes
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "success": false,
        "error": "Resource not found",
    }))
}
