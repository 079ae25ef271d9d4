//! Route modules for the API server
//!
//! - transactions: transaction list, employee filter, view more, approvals
//! - employees: employee directory
//!
//! Each module follows a consistent structure:
//! - api.rs: JSON API and HTMX endpoints
//! - page.rs: HTML rendering

pub mod employees;
pub mod transactions;
