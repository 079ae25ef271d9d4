//! Transactions API endpoints - JSON API and HTMX partial responses
//!
//! Endpoints:
//! - api_transactions: Board snapshot (JSON)
//! - api_transaction_detail: Single transaction from the current view (JSON)
//! - api_set_approval: Persist an approval flag (JSON)
//! - htmx_transactions_list: Transaction panel (HTML fragment)
//! - htmx_transactions_filter: Change employee filter (HTML fragment)
//! - htmx_transactions_more: Load the next page (HTML fragment)
//! - htmx_transaction_approval: Toggle approval (HTML fragment)

use crate::routes::transactions::page::render_panel;
use crate::{ApiError, AppState};
use axum::extract::{Form, Path};
use axum::response::Html;
use axum::Json;
use serde::Deserialize;
use txdesk_core::{BoardSnapshot, CoreError, Transaction};

#[derive(Debug, Deserialize)]
pub struct ApprovalRequest {
    pub value: bool,
}

#[derive(Debug, Deserialize)]
pub struct FilterForm {
    /// Empty selects all employees
    #[serde(default)]
    pub employee_id: String,
}

/// Banner text for a failed action
fn failure_notice(action: &str, error: &CoreError) -> String {
    if error.is_retryable() {
        format!("Could not {}: {}. Please try again.", action, error)
    } else {
        format!("Could not {}: {}", action, error)
    }
}

/// Get the board snapshot (JSON API)
pub async fn api_transactions(state: axum::extract::State<AppState>) -> Json<BoardSnapshot> {
    Json(state.board.snapshot())
}

/// Get single transaction detail (JSON API)
pub async fn api_transaction_detail(
    state: axum::extract::State<AppState>,
    path: Path<String>,
) -> Result<Json<Transaction>, ApiError> {
    let transaction = state.board.transaction(&path.0)?;
    Ok(Json(transaction))
}

/// Persist an approval flag (JSON API); 502 when the backend rejects it
pub async fn api_set_approval(
    state: axum::extract::State<AppState>,
    path: Path<String>,
    Json(request): Json<ApprovalRequest>,
) -> Result<Json<BoardSnapshot>, ApiError> {
    state.board.set_approval(&path.0, request.value).await?;
    Ok(Json(state.board.snapshot()))
}

/// HTMX: Transaction panel - Partial page update
pub async fn htmx_transactions_list(state: axum::extract::State<AppState>) -> Html<String> {
    Html(render_panel(&state.board.snapshot(), None))
}

/// HTMX: Employee filter changed
pub async fn htmx_transactions_filter(
    state: axum::extract::State<AppState>,
    Form(form): Form<FilterForm>,
) -> Html<String> {
    let notice = state
        .board
        .select_employee_by_id(&form.employee_id)
        .await
        .err()
        .map(|e| failure_notice("load transactions", &e));
    Html(render_panel(&state.board.snapshot(), notice.as_deref()))
}

/// HTMX: View more
pub async fn htmx_transactions_more(state: axum::extract::State<AppState>) -> Html<String> {
    let notice = state
        .board
        .load_next_page()
        .await
        .err()
        .map(|e| failure_notice("load more transactions", &e));
    Html(render_panel(&state.board.snapshot(), notice.as_deref()))
}

/// HTMX: Approval checkbox toggled.
///
/// On failure the list is re-rendered unchanged with an error banner, so
/// the checkbox snaps back to the persisted value.
pub async fn htmx_transaction_approval(
    state: axum::extract::State<AppState>,
    path: Path<String>,
    Form(request): Form<ApprovalRequest>,
) -> Html<String> {
    let notice = state
        .board
        .set_approval(&path.0, request.value)
        .await
        .err()
        .map(|e| failure_notice("update approval", &e));
    Html(render_panel(&state.board.snapshot(), notice.as_deref()))
}
