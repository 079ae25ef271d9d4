//! Transaction board: reconciles the accumulated list, the latest page and
//! the per-employee list into the single view the UI shows.
//!
//! The accumulated list is owned here and replaced copy-on-write, so
//! readers always get a complete `Arc` snapshot. Which list is shown is
//! decided at read time from the filter and the two stores.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use txdesk_config::Config;

use crate::error::{CoreError, CoreResult};
use crate::models::{Employee, SetTransactionApprovalParams, Transaction};
use crate::sources::{AppliedPage, EmployeeDirectory, PaginatedTransactions, TransactionsByEmployee};
use crate::transport::{CustomFetch, TransportRef};
use crate::types::{Endpoint, EmployeeFilter};

// ==================== Pure reconciliation rules ====================

/// Merge a fetched page into the accumulated list.
///
/// An empty list becomes the page as-is. Otherwise page entries whose id
/// is already present are skipped and the rest are appended in page order.
pub fn merge_page(accumulated: &[Transaction], page: &[Transaction]) -> Vec<Transaction> {
    if accumulated.is_empty() {
        return page.to_vec();
    }

    let mut seen: HashSet<&str> = accumulated.iter().map(|t| t.id.as_str()).collect();
    let mut merged = accumulated.to_vec();
    for transaction in page {
        if seen.insert(transaction.id.as_str()) {
            merged.push(transaction.clone());
        }
    }
    merged
}

/// Pick the list to display: the employee list when a real employee is
/// selected and that list has been loaded, the accumulated list otherwise.
pub fn select_view(
    filter: &EmployeeFilter,
    scoped: Option<Arc<Vec<Transaction>>>,
    accumulated: Arc<Vec<Transaction>>,
) -> Arc<Vec<Transaction>> {
    match (filter.employee(), scoped) {
        (Some(employee), Some(scoped)) if !employee.is_sentinel() => scoped,
        _ => accumulated,
    }
}

/// Whether the "view more" control is offered
pub fn show_view_more(
    filter: &EmployeeFilter,
    view_len: usize,
    latest_page_len: Option<usize>,
    page_size: usize,
) -> bool {
    !filter.is_active() && view_len > 0 && latest_page_len == Some(page_size)
}

/// Copy of `transactions` with one entry's approval flag set.
///
/// Returns `None` when no entry has the given id.
pub fn patch_approval(transactions: &[Transaction], transaction_id: &str, value: bool) -> Option<Vec<Transaction>> {
    if !transactions.iter().any(|t| t.id == transaction_id) {
        return None;
    }
    Some(
        transactions
            .iter()
            .map(|t| if t.id == transaction_id { t.with_approval(value) } else { t.clone() })
            .collect(),
    )
}

// ==================== Board ====================

/// Point-in-time view of the board for rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub filter: EmployeeFilter,
    pub employees: Vec<Employee>,
    pub employees_loading: bool,
    pub transactions: Vec<Transaction>,
    pub show_view_more: bool,
    pub page_loading: bool,
}

/// Clears the flag when the guarded load finishes or is dropped
struct LoadGuard<'a>(&'a AtomicBool);

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Reconciliation core over the three fetch sources
pub struct TransactionBoard {
    page_size: usize,
    fetch: Arc<CustomFetch>,
    employees: EmployeeDirectory,
    paginated: PaginatedTransactions,
    by_employee: TransactionsByEmployee,
    accumulated: RwLock<Arc<Vec<Transaction>>>,
    filter: RwLock<EmployeeFilter>,
    initial_load: AtomicBool,
}

impl TransactionBoard {
    /// Create a board using the configured page size
    pub fn new(transport: TransportRef, config: &Config) -> Self {
        Self::with_page_size(transport, config.pagination.page_size)
    }

    pub fn with_page_size(transport: TransportRef, page_size: usize) -> Self {
        let fetch = Arc::new(CustomFetch::new(transport));
        Self {
            page_size,
            employees: EmployeeDirectory::new(fetch.clone()),
            paginated: PaginatedTransactions::new(fetch.clone()),
            by_employee: TransactionsByEmployee::new(fetch.clone()),
            fetch,
            accumulated: RwLock::new(Arc::new(Vec::new())),
            filter: RwLock::new(EmployeeFilter::All),
            initial_load: AtomicBool::new(false),
        }
    }

    // ==================== Loading ====================

    /// Run the unfiltered load sequence if nothing has been loaded yet.
    ///
    /// Returns whether a sequence was started. Calls made while the
    /// directory is loading, or while an earlier call is outstanding, do
    /// nothing.
    pub async fn load_initial(&self) -> CoreResult<bool> {
        if self.employees.data().is_some() || self.employees.loading() {
            return Ok(false);
        }
        if self
            .initial_load
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Ok(false);
        }
        let _guard = LoadGuard(&self.initial_load);

        self.load_unfiltered().await?;
        Ok(true)
    }

    /// Fetch the directory, then restart pagination from the first page.
    ///
    /// The accumulated list is replaced by the first page once it arrives.
    /// A directory failure does not stop the page fetch; the first error
    /// is returned.
    pub async fn load_unfiltered(&self) -> CoreResult<()> {
        log::info!("Loading employees and the first transaction page");

        let directory_result = self.employees.fetch_all().await;
        if let Err(ref e) = directory_result {
            log::warn!("Failed to load employees: {}", e);
        }

        self.paginated.reset();
        match self.paginated.fetch_all().await {
            Ok(Some(page)) => self.apply_page(page),
            Ok(None) => {}
            Err(e) => {
                log::warn!("Failed to load the first transaction page: {}", e);
                return Err(e);
            }
        }

        directory_result
    }

    /// Fetch the next page and merge it into the accumulated list.
    ///
    /// If a reset happened since the last applied page, the fetched page is
    /// the first one and replaces the list instead.
    pub async fn load_next_page(&self) -> CoreResult<()> {
        match self.paginated.fetch_all().await {
            Ok(Some(page)) => {
                self.apply_page(page);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) => {
                log::warn!("Failed to load more transactions: {}", e);
                Err(e)
            }
        }
    }

    fn apply_page(&self, page: AppliedPage) {
        let mut accumulated = self.accumulated.write().unwrap();
        if page.is_first() {
            log::debug!("Resetting accumulated list to {} transactions", page.transactions.len());
            *accumulated = page.transactions;
            return;
        }

        let merged = merge_page(&accumulated, &page.transactions);
        log::debug!(
            "Merged page {} of {}: {} new, {} total",
            page.cursor,
            page.transactions.len(),
            merged.len() - accumulated.len(),
            merged.len()
        );
        *accumulated = Arc::new(merged);
    }

    /// Change the employee filter.
    ///
    /// The sentinel or `None` clears the filter and reloads the unfiltered
    /// list; a real employee triggers a fetch of that employee's list.
    pub async fn select_employee(&self, selection: Option<Employee>) -> CoreResult<()> {
        let filter = EmployeeFilter::from_selection(selection);
        *self.filter.write().unwrap() = filter.clone();

        match filter {
            EmployeeFilter::All => {
                log::info!("Showing all employees");
                self.load_unfiltered().await
            }
            EmployeeFilter::Employee(employee) => {
                log::info!("Filtering by employee {} ({})", employee.full_name(), employee.id);
                if let Err(e) = self.by_employee.fetch_by_id(&employee.id).await {
                    log::warn!("Failed to load transactions for {}: {}", employee.id, e);
                    return Err(e);
                }
                Ok(())
            }
        }
    }

    /// Select by identifier; an empty id means "all employees"
    pub async fn select_employee_by_id(&self, employee_id: &str) -> CoreResult<()> {
        if employee_id.is_empty() {
            return self.select_employee(None).await;
        }
        let employee = self.employees.find(employee_id).ok_or_else(|| CoreError::InvalidRequest {
            message: format!("Unknown employee: {}", employee_id),
        })?;
        self.select_employee(Some(employee)).await
    }

    // ==================== Approval ====================

    /// Persist an approval flag, then patch the accumulated list.
    ///
    /// Nothing is patched if the remote call fails. The per-employee list
    /// is left as fetched; cached page and employee responses are dropped
    /// so the next fetch of either reads the persisted value.
    pub async fn set_approval(&self, transaction_id: &str, value: bool) -> CoreResult<()> {
        if transaction_id.is_empty() {
            return Err(CoreError::InvalidRequest {
                message: "Transaction id must not be empty".to_string(),
            });
        }

        let params = SetTransactionApprovalParams {
            transaction_id: transaction_id.to_string(),
            value,
        };
        if let Err(e) = self
            .fetch
            .fetch_without_cache::<serde_json::Value, _>(Endpoint::SetTransactionApproval, &params)
            .await
        {
            log::warn!("Failed to persist approval for {}: {}", transaction_id, e);
            return Err(e);
        }

        self.fetch.clear_cache_by_endpoint(&[
            Endpoint::PaginatedTransactions,
            Endpoint::TransactionsByEmployee,
        ]);

        let mut accumulated = self.accumulated.write().unwrap();
        match patch_approval(&accumulated, transaction_id, value) {
            Some(patched) => {
                log::info!("Transaction {} approved={}", transaction_id, value);
                *accumulated = Arc::new(patched);
            }
            None => log::debug!("Transaction {} is not in the accumulated list", transaction_id),
        }
        Ok(())
    }

    // ==================== Reading ====================

    /// The list to display right now
    pub fn current_view(&self) -> Arc<Vec<Transaction>> {
        let filter = self.filter();
        select_view(&filter, self.by_employee.data(), self.accumulated())
    }

    /// Whether the "view more" control should be shown
    pub fn can_view_more(&self) -> bool {
        show_view_more(
            &self.filter(),
            self.current_view().len(),
            self.paginated.latest_page_len(),
            self.page_size,
        )
    }

    /// Find a transaction in the current view
    pub fn transaction(&self, transaction_id: &str) -> CoreResult<Transaction> {
        self.current_view()
            .iter()
            .find(|t| t.id == transaction_id)
            .cloned()
            .ok_or_else(|| CoreError::TransactionNotFound {
                id: transaction_id.to_string(),
            })
    }

    pub fn accumulated(&self) -> Arc<Vec<Transaction>> {
        self.accumulated.read().unwrap().clone()
    }

    pub fn filter(&self) -> EmployeeFilter {
        self.filter.read().unwrap().clone()
    }

    pub fn employees(&self) -> Option<Arc<Vec<Employee>>> {
        self.employees.data()
    }

    pub fn employees_loading(&self) -> bool {
        self.employees.loading()
    }

    pub fn page_loading(&self) -> bool {
        self.paginated.loading()
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            filter: self.filter(),
            employees: self.employees().map(|e| e.as_ref().clone()).unwrap_or_default(),
            employees_loading: self.employees_loading(),
            transactions: self.current_view().as_ref().clone(),
            show_view_more: self.can_view_more(),
            page_loading: self.page_loading(),
        }
    }
}

// ==================== Tests ====================
