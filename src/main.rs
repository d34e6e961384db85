//! Group Trips HTTP server

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use group_trips::adapters::auth::JwtSessionValidator;
use group_trips::adapters::codes::RandomInviteCodes;
use group_trips::adapters::http::{build_router, TripAppState};
use group_trips::adapters::memory::InMemoryTripStore;
use group_trips::adapters::postgres::{
    run_migrations, PostgresExpenseRepository, PostgresMemberRepository, PostgresPollRepository,
    PostgresTripReader, PostgresTripRepository,
};
use group_trips::config::{AppConfig, StorageBackend};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    init_tracing(&config);

    config.validate()?;
    tracing::info!(
        environment = ?config.server.environment,
        storage = ?config.trips.storage,
        "Starting group-trips"
    );

    let state = build_state(&config).await?;
    let validator = Arc::new(JwtSessionValidator::new(config.jwt_config()));
    let app = build_router(state, validator, config.router_options());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// `RUST_LOG` wins over the configured level; production logs are JSON.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn build_state(config: &AppConfig) -> Result<TripAppState, Box<dyn std::error::Error>> {
    let codes = Arc::new(RandomInviteCodes);

    let state = match config.trips.storage {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; trips are lost on restart");
            TripAppState::from_store(Arc::new(InMemoryTripStore::new()), codes)
                .with_invite_code_attempts(config.trips.invite_code_max_attempts)
        }
        StorageBackend::Postgres => {
            let pool = config
                .database
                .pool_options()
                .connect(&config.database.url)
                .await
                .map_err(|e| {
                    tracing::error!(
                        url = %config.database.masked_url(),
                        error = %e,
                        "Failed to connect to database"
                    );
                    e
                })?;
            tracing::info!(url = %config.database.masked_url(), "Database connection established");

            if config.database.run_migrations {
                run_migrations(&pool).await?;
                tracing::info!("Migrations applied");
            }

            TripAppState {
                trips: Arc::new(PostgresTripRepository::new(pool.clone())),
                members: Arc::new(PostgresMemberRepository::new(pool.clone())),
                expenses: Arc::new(PostgresExpenseRepository::new(pool.clone())),
                polls: Arc::new(PostgresPollRepository::new(pool.clone())),
                reader: Arc::new(PostgresTripReader::new(pool)),
                codes,
                invite_code_max_attempts: config.trips.invite_code_max_attempts,
            }
        }
    };

    Ok(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}
