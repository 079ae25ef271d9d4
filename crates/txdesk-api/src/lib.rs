//! HTTP API server with HTMX support
//!
//! Routes are organized into modules:
//! - routes::transactions: Transaction list, employee filter, view more, approvals
//! - routes::employees: Employee directory

pub mod error;
pub mod routes;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use txdesk_config::Config;
use txdesk_core::TransactionBoard;

pub use error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub board: Arc<TransactionBoard>,
    pub config: Config,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::employees::api_employees;
    use routes::transactions::{
        api_set_approval, api_transaction_detail, api_transactions, htmx_transaction_approval,
        htmx_transactions_filter, htmx_transactions_list, htmx_transactions_more, page_transactions,
    };

    Router::new()
        // API endpoints
        .route("/api/health", get(health_check))
        .route("/api/employees", get(api_employees))
        .route("/api/transactions", get(api_transactions))
        .route("/api/transactions/:id", get(api_transaction_detail))
        .route("/api/transactions/:id/approval", post(api_set_approval))
        // HTMX page routes
        .route("/", get(page_transactions))
        // HTMX partial routes
        .route("/transactions/list", get(htmx_transactions_list))
        .route("/transactions/filter", post(htmx_transactions_filter))
        .route("/transactions/more", post(htmx_transactions_more))
        .route("/transactions/:id/approval", post(htmx_transaction_approval))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - txdesk</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-gray-50 text-gray-900">
    {}
</body>
</html>"#,
        title, content
    )
}

/// Start the HTTP server
///
/// Binds to the configured address and serves until ctrl-c.
///
/// # Arguments
///
/// * `config` - The application configuration
/// * `board` - The shared transaction board
pub async fn start_server(config: Config, board: Arc<TransactionBoard>) -> anyhow::Result<()> {
    let addr = config.bind_addr();
    let state = AppState { board, config };

    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting txdesk server on http://{}", addr);
    log::info!("Available routes:");
    log::info!("  - / (Transactions)");
    log::info!("  - /api/* (JSON API endpoints)");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!("Server stopped gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }
}

// ==================== Tests ====================
