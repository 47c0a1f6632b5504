use crate::{api::error::ApiError, models::{Address, Transaction}, state::AppState};
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

#[derive(Serialize)]
pub struct PingResponse {
    timestamp: DateTime<Utc>,
    environment: &'static str,
    database_url: String,
    upstream_url: String,
}

// Create router with all routes
pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ping", get(health_check))
        .route("/address/{bitcoin_address}", get(get_address))
        .route("/transaction/{transaction_hash}", get(get_transaction))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

// GET /ping handler
async fn health_check(State(state): State<Arc<AppState>>) -> Json<PingResponse> {
    Json(PingResponse {
        timestamp: Utc::now(),
        environment: state.config.environment.as_str(),
        database_url: state.config.database_url.clone(),
        upstream_url: state.config.blockcypher_url.clone(),
    })
}

// GET /address/{bitcoin_address} handler
async fn get_address(
    State(state): State<Arc<AppState>>,
    Path(bitcoin_address): Path<String>,
) -> Result<Json<Address>, ApiError> {
    info!("Processing address lookup for {}", bitcoin_address);
    let address = state.addresses.lookup(&bitcoin_address).await?;
    Ok(Json(address))
}

// GET /transaction/{transaction_hash} handler
async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Path(transaction_hash): Path<String>,
) -> Result<Json<Transaction>, ApiError> {
    info!("Processing transaction lookup for {}", transaction_hash);
    let transaction = state.transactions.lookup(&transaction_hash).await?;
    Ok(Json(transaction))
}
