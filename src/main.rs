//! Hotel Booking Session Server
//!
//! Serves the booking websocket channel and the health probe.
//!
//! # Usage
//!
//! ```bash
//! HOTEL_BOOKING__SESSION__SEED_FILE=reservations.json cargo run
//! ```

use std::sync::Arc;

use axum::http::HeaderValue;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hotel_booking_session::adapters::{booking_router, InMemoryReservationService, WebSocketState};
use hotel_booking_session::application::{
    BookingSessionGateway, ErrorActionRegistry, HeartbeatConfig, HeartbeatRegistry,
};
use hotel_booking_session::config::{AppConfig, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config.server);
    info!(
        environment = ?config.server.environment,
        heartbeat_interval_secs = config.session.heartbeat_interval_secs,
        payment_time_limit_secs = config.session.payment_time_limit_secs,
        "Configuration loaded"
    );

    let reservations = match &config.session.seed_file {
        Some(path) => InMemoryReservationService::from_seed_file(path)?,
        None => InMemoryReservationService::new(),
    };

    let registry = HeartbeatRegistry::new(
        HeartbeatConfig {
            interval: config.session.heartbeat_interval(),
            default_locale: config.session.default_locale,
        },
        Arc::new(ErrorActionRegistry::with_default_handlers()),
    );
    let gateway = BookingSessionGateway::new(
        registry.clone(),
        Arc::new(reservations),
        config.session.payment_time_limit_secs,
    );

    let app = booking_router()
        .with_state(WebSocketState::new(Arc::new(gateway)))
        .layer(cors_layer(&config.server))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, "Server listening");

    // Open sockets are closed first so graceful shutdown does not wait on them.
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            registry.shutdown().await;
        })
        .await?;

    info!("Server stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    if server.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::new().allow_origin(Any)
    } else {
        CorsLayer::new().allow_origin(origins)
    }
}

/// Waits for Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C signal, shutting down gracefully..."),
        () = terminate => info!("Received SIGTERM signal, shutting down gracefully..."),
    }
}
