// Load configuration
// Set up logging
// Create database connection pool
// Build counter store, rate limiter and upstream client
// Create shared state
// Start HTTP server, stop on Ctrl-C / SIGTERM

use btc_lookup_service::{
    api, blockchain::BlockCypherClient, cache, config::Config, db, logging,
    rate_limit::RateLimiter, state::AppState,
};

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    logging::init_logging(&config);

    info!(
        "Starting btc-lookup-service (environment: {}, debug: {})",
        config.environment.as_str(),
        config.debug
    );

    let db_pool = db::connection::establish_connection(&config).await?;
    let store = Arc::new(db::SqliteStore::new(db_pool.clone()));

    let counters = Arc::new(cache::init_counter_store(&config));
    info!(
        "Rate limiter initialized: {} requests per {:?}",
        config.rate_limit_max_requests, config.rate_limit_window
    );
    let limiter = RateLimiter::from_config(counters, &config);

    let upstream = Arc::new(BlockCypherClient::new(&config)?);

    let app_state = Arc::new(AppState::new(config.clone(), store, limiter, upstream));

    let shutdown = CancellationToken::new();
    tokio::spawn(wait_for_signal(shutdown.clone()));

    let app = api::create_router(app_state);
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Application is ready to accept new connections on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    db_pool.close().await;
    info!("Shutdown complete");
    Ok(())
}

async fn wait_for_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("Shutdown signal received");
    shutdown.cancel();
}
