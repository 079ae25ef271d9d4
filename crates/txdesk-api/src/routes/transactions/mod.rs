//! Transaction routes - list, employee filter, view more, approvals
//!
//! Structure:
//! - api.rs: JSON API and HTMX endpoints
//! - page.rs: Full page and fragment rendering

pub mod api;
pub mod page;

pub use api::{
    api_transactions,
    api_transaction_detail,
    api_set_approval,
    htmx_transactions_list,
    htmx_transactions_filter,
    htmx_transactions_more,
    htmx_transaction_approval,
};

pub use page::page_transactions;
