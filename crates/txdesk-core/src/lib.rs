//! Transaction sources, transport cache and reconciliation logic
//!
//! - transport: `Transport` trait and the caching `CustomFetch` adapter
//! - http: reqwest-backed `Transport`
//! - sources: employee directory, paginated and per-employee transactions
//! - board: `TransactionBoard`, which merges pages, picks the displayed
//!   list and applies approval edits

pub mod board;
pub mod error;
pub mod http;
pub mod models;
pub mod sources;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use board::{merge_page, patch_approval, select_view, show_view_more, BoardSnapshot, TransactionBoard};
pub use error::{CoreError, CoreResult};
pub use http::HttpTransport;
pub use models::{
    Employee, PaginatedRequestParams, PaginatedResponse, RequestByEmployeeParams,
    SetTransactionApprovalParams, Transaction,
};
pub use sources::{AppliedPage, EmployeeDirectory, PaginatedTransactions, TransactionsByEmployee};
pub use transport::{CustomFetch, Transport, TransportRef};
pub use types::{EmployeeFilter, Endpoint};
