use std::sync::{Arc, Mutex};

use axum::routing::{delete, get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use branchbook::config::AppConfig;
use branchbook::db;
use branchbook::handlers;
use branchbook::services::schedule::SlotCatalog;
use branchbook::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    let catalog = SlotCatalog::new(config.slot_times.clone(), config.slot_capacity);
    tracing::info!(
        slots = config.slot_times.len(),
        capacity = config.slot_capacity,
        "slot catalog loaded"
    );

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        catalog,
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/bookings", post(handlers::bookings::create_booking))
        .route("/api/bookings", get(handlers::bookings::get_bookings))
        .route("/api/bookings/:id", get(handlers::bookings::get_booking))
        .route("/api/bookings/:id", patch(handlers::bookings::update_booking))
        .route(
            "/api/bookings/:id",
            delete(handlers::bookings::delete_booking),
        )
        .route(
            "/api/users/:user_id/bookings",
            get(handlers::bookings::get_user_bookings),
        )
        .route("/api/slots", get(handlers::slots::get_available_slots))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
