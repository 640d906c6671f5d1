//! TripNest backend server entrypoint.

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tripnest::adapters::http::booking::{booking_routes, BookingAppState};
use tripnest::adapters::postgres::PostgresBookingRepository;
use tripnest::adapters::stripe::StripeClient;
use tripnest::config::AppConfig;
use tripnest::domain::payment::CurrencyCode;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    config.validate()?;

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        tracing::info!("running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    let stripe_client = StripeClient::new(
        config.payment.stripe_secret_key.clone(),
        config.payment.api_timeout(),
    )?;

    let state = BookingAppState {
        booking_repository: Arc::new(PostgresBookingRepository::new(pool)),
        payment_processor: Arc::new(stripe_client),
        default_currency: CurrencyCode::parse(&config.booking.default_currency)?,
        webhook_secret: config.payment.stripe_webhook_secret.clone(),
    };

    let app = Router::new()
        .nest("/api", booking_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    tracing::info!(%addr, "starting TripNest server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
