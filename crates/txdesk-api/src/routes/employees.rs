//! Employee directory endpoint

use crate::AppState;
use axum::Json;
use txdesk_core::Employee;

/// Loaded employees (JSON API); empty while the directory is unavailable
pub async fn api_employees(state: axum::extract::State<AppState>) -> Json<Vec<Employee>> {
    let employees = state
        .board
        .employees()
        .map(|e| e.as_ref().clone())
        .unwrap_or_default();
    Json(employees)
}
