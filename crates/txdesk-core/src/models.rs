//! Core data models exchanged with the backend

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Employee information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Unique employee identifier; empty for the "all employees" sentinel
    pub id: String,
    pub first_name: String,
    pub last_name: String,
}

impl Employee {
    pub fn new(id: impl Into<String>, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// The reserved "show all" pseudo-employee
    pub fn all() -> Self {
        Self::new("", "All", "Employees")
    }

    /// Check if this is the "show all" pseudo-employee
    pub fn is_sentinel(&self) -> bool {
        self.id.is_empty()
    }

    /// Get the display name ("First Last")
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Transaction information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique transaction identifier
    pub id: String,
    /// Amount in dollars
    pub amount: f64,
    /// Employee who made the transaction
    pub employee: Employee,
    /// Merchant name
    pub merchant: String,
    /// Transaction date (YYYY-MM-DD format)
    pub date: String,
    /// Approval flag
    pub approved: bool,
}

impl Transaction {
    /// Date for display ("Mar 1, 2024"); unparseable dates are shown as sent
    pub fn display_date(&self) -> String {
        match NaiveDate::parse_from_str(&self.date, "%Y-%m-%d") {
            Ok(date) => date.format("%b %-d, %Y").to_string(),
            Err(_) => self.date.clone(),
        }
    }

    /// Copy of this transaction with a different approval flag
    pub fn with_approval(&self, approved: bool) -> Self {
        Self {
            approved,
            ..self.clone()
        }
    }
}

/// One page of a paginated listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub data: T,
    /// Cursor for the following page; `None` once the listing is exhausted
    pub next_page: Option<u32>,
}

/// Parameters for `paginatedTransactions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedRequestParams {
    pub page: Option<u32>,
}

/// Parameters for `transactionsByEmployee`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestByEmployeeParams {
    pub employee_id: String,
}

/// Parameters for `setTransactionApproval`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetTransactionApprovalParams {
    pub transaction_id: String,
    pub value: bool,
}
