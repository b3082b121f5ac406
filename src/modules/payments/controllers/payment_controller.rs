use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::core::error::AppError;
use crate::modules::payments::models::{
    Addon, BookingCharges, PaymentOutcome, PaymentRequest, DEPOSIT_PRESETS,
};
use crate::modules::payments::services::{CardLookupService, PaymentOrchestrator};

fn success<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "data": data,
    }))
}

/// Submit a card payment
/// POST /api/payment
pub async fn submit_payment(
    orchestrator: web::Data<Arc<PaymentOrchestrator>>,
    request: web::Json<PaymentRequest>,
) -> Result<HttpResponse, AppError> {
    match orchestrator.submit_payment(request.into_inner()).await? {
        PaymentOutcome::Completed(summary) => Ok(success(summary)),
        PaymentOutcome::Declined { code, message } => {
            Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": message,
                "responseCode": code,
            })))
        }
    }
}

/// Stored payment merged with live card details
/// GET /api/payment/{transaction_id}
pub async fn get_payment_details(
    lookup: web::Data<Arc<CardLookupService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let transaction_id = path.into_inner();
    let details = lookup.get_payment_details(&transaction_id).await?;

    Ok(success(details))
}

/// GET /api/cards/{card_token}
pub async fn get_card_details(
    lookup: web::Data<Arc<CardLookupService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let card_token = path.into_inner();
    let details = lookup.get_card_details(&card_token).await?;

    Ok(success(details))
}

/// Price a booking before payment
/// POST /api/bookings/quote
pub async fn quote_booking(
    orchestrator: web::Data<Arc<PaymentOrchestrator>>,
    charges: web::Json<BookingCharges>,
) -> Result<HttpResponse, AppError> {
    let quote = orchestrator.quote_booking(&charges)?;

    Ok(success(quote))
}

/// Add-on catalog and deposit presets for the booking form
/// GET /api/bookings/options
pub async fn booking_options() -> HttpResponse {
    success(serde_json::json!({
        "addons": Addon::default_catalog(),
        "depositPresets": DEPOSIT_PRESETS,
    }))
}

/// Configure payment routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/payment", web::post().to(submit_payment))
            .route("/payment/{transaction_id}", web::get().to(get_payment_details))
            .route("/cards/{card_token}", web::get().to(get_card_details))
            .route("/bookings/quote", web::post().to(quote_booking))
            .route("/bookings/options", web::get().to(booking_options)),
    );
}
