use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use guestpay::config::{Config, LogFormat};
use guestpay::gateways::{CardGateway, MerchantWarriorClient};
use guestpay::middleware::{json_error_handler, not_found, RequestId};
use guestpay::payments::{CardLookupService, PaymentOrchestrator};
use guestpay::transactions::{MySqlTransactionStore, TransactionStore};

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "guestpay=debug,actix_web=info".into());

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before the subscriber so RUST_LOG and LOG_FORMAT apply
    dotenvy::dotenv().ok();
    init_tracing(LogFormat::from_env());

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;

    tracing::info!("Starting guest payment service");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    let db_pool = config
        .database
        .create_pool()
        .await
        .context("Failed to create database pool")?;

    tracing::info!(
        "Database pool initialized ({} connections)",
        config.database.max_connections
    );

    let credentials = Arc::new(config.gateway.clone());
    let gateway: Arc<dyn CardGateway> = Arc::new(
        MerchantWarriorClient::new(credentials.clone())
            .context("Failed to create gateway client")?,
    );
    let store: Arc<dyn TransactionStore> = Arc::new(MySqlTransactionStore::new(db_pool));

    let orchestrator = Arc::new(PaymentOrchestrator::new(
        gateway.clone(),
        store.clone(),
        credentials,
        config.payment.clone(),
    ));
    let lookup = Arc::new(CardLookupService::new(gateway, store.clone()));

    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestId)
            .wrap(TracingLogger::default())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::Data::new(orchestrator.clone()))
            .app_data(web::Data::new(lookup.clone()))
            .app_data(web::Data::new(store.clone()))
            .configure(guestpay::routes)
            .default_service(web::route().to(not_found))
    })
    .workers(config.server.workers)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await.context("Server terminated with an error")
}
