//! Fetch sources: employee directory, paginated transactions and
//! per-employee transactions
//!
//! Each source keeps its latest payload and a loading flag. Every issued
//! request carries a generation number; a response is applied only if no
//! newer request was issued (or the source reset) while it was in flight.
//! Locks are never held across a remote call.

use std::sync::{Arc, RwLock};

use crate::error::CoreResult;
use crate::models::{
    Employee, PaginatedRequestParams, PaginatedResponse, RequestByEmployeeParams, Transaction,
};
use crate::transport::CustomFetch;
use crate::types::Endpoint;

/// Loading flag plus request generation
#[derive(Debug, Default)]
struct RequestTracker {
    generation: u64,
    loading: bool,
}

impl RequestTracker {
    fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.generation
    }

    /// Returns false when a newer request superseded `generation`
    fn finish(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.loading = false;
        true
    }

    fn cancel(&mut self) {
        self.generation += 1;
        self.loading = false;
    }
}

// ==================== Employee Directory ====================

#[derive(Debug, Default)]
struct DirectoryState {
    data: Option<Arc<Vec<Employee>>>,
    tracker: RequestTracker,
}

/// The full employee collection, fetched through the cache
pub struct EmployeeDirectory {
    fetch: Arc<CustomFetch>,
    state: RwLock<DirectoryState>,
}

impl EmployeeDirectory {
    pub fn new(fetch: Arc<CustomFetch>) -> Self {
        Self {
            fetch,
            state: RwLock::new(DirectoryState::default()),
        }
    }

    /// Loaded employees, `None` until the first successful fetch
    pub fn data(&self) -> Option<Arc<Vec<Employee>>> {
        self.state.read().unwrap().data.clone()
    }

    pub fn loading(&self) -> bool {
        self.state.read().unwrap().tracker.loading
    }

    pub async fn fetch_all(&self) -> CoreResult<()> {
        let generation = self.state.write().unwrap().tracker.begin();

        let result = self.fetch.fetch_with_cache::<Vec<Employee>, _>(Endpoint::Employees, &()).await;

        let mut state = self.state.write().unwrap();
        if !state.tracker.finish(generation) {
            return Ok(());
        }
        let employees = result?;
        log::debug!("Loaded {} employees", employees.len());
        state.data = Some(Arc::new(employees));
        Ok(())
    }

    /// Find a loaded employee by identifier
    pub fn find(&self, employee_id: &str) -> Option<Employee> {
        self.data()
            .and_then(|employees| employees.iter().find(|e| e.id == employee_id).cloned())
    }
}

// ==================== Paginated Transactions ====================

#[derive(Debug, Default)]
struct PageState {
    response: Option<PaginatedResponse<Arc<Vec<Transaction>>>>,
    tracker: RequestTracker,
}

impl PageState {
    /// Cursor the next fetch will request; `None` once the listing is exhausted
    fn next_cursor(&self) -> Option<u32> {
        match &self.response {
            None => Some(0),
            Some(response) => response.next_page,
        }
    }
}

/// A page that was applied to the source
#[derive(Debug, Clone)]
pub struct AppliedPage {
    /// Cursor the page was requested with
    pub cursor: u32,
    pub transactions: Arc<Vec<Transaction>>,
}

impl AppliedPage {
    /// First page of a load sequence; it replaces rather than extends
    pub fn is_first(&self) -> bool {
        self.cursor == 0
    }
}

/// All transactions, one page per fetch
pub struct PaginatedTransactions {
    fetch: Arc<CustomFetch>,
    state: RwLock<PageState>,
}

impl PaginatedTransactions {
    pub fn new(fetch: Arc<CustomFetch>) -> Self {
        Self {
            fetch,
            state: RwLock::new(PageState::default()),
        }
    }

    /// Length of the most recently applied page
    pub fn latest_page_len(&self) -> Option<usize> {
        self.state.read().unwrap().response.as_ref().map(|r| r.data.len())
    }

    pub fn loading(&self) -> bool {
        self.state.read().unwrap().tracker.loading
    }

    /// Fetch the page at the current cursor.
    ///
    /// Returns the page when it was applied, `Ok(None)` when the listing is
    /// exhausted or the response was superseded.
    pub async fn fetch_all(&self) -> CoreResult<Option<AppliedPage>> {
        let (cursor, generation) = {
            let mut state = self.state.write().unwrap();
            let Some(cursor) = state.next_cursor() else {
                log::debug!("No further transaction pages");
                return Ok(None);
            };
            (cursor, state.tracker.begin())
        };

        let params = PaginatedRequestParams { page: Some(cursor) };
        let result = self
            .fetch
            .fetch_with_cache::<PaginatedResponse<Vec<Transaction>>, _>(Endpoint::PaginatedTransactions, &params)
            .await;

        let mut state = self.state.write().unwrap();
        if !state.tracker.finish(generation) {
            log::debug!("Discarding superseded response for page {}", cursor);
            return Ok(None);
        }
        let response = result?;
        let transactions = Arc::new(response.data);
        log::debug!("Applied page {} with {} transactions", cursor, transactions.len());
        state.response = Some(PaginatedResponse {
            data: transactions.clone(),
            next_page: response.next_page,
        });
        Ok(Some(AppliedPage { cursor, transactions }))
    }

    /// Forget the cursor so the next fetch starts from the first page
    pub fn reset(&self) {
        let mut state = self.state.write().unwrap();
        state.response = None;
        state.tracker.cancel();
    }
}

// ==================== Transactions By Employee ====================

#[derive(Debug, Default)]
struct ScopedState {
    data: Option<Arc<Vec<Transaction>>>,
    tracker: RequestTracker,
}

/// Every transaction of one employee, unpaged
pub struct TransactionsByEmployee {
    fetch: Arc<CustomFetch>,
    state: RwLock<ScopedState>,
}

impl TransactionsByEmployee {
    pub fn new(fetch: Arc<CustomFetch>) -> Self {
        Self {
            fetch,
            state: RwLock::new(ScopedState::default()),
        }
    }

    pub fn data(&self) -> Option<Arc<Vec<Transaction>>> {
        self.state.read().unwrap().data.clone()
    }

    pub fn loading(&self) -> bool {
        self.state.read().unwrap().tracker.loading
    }

    /// Replace the store with `employee_id`'s transactions.
    ///
    /// Returns whether the response was applied.
    pub async fn fetch_by_id(&self, employee_id: &str) -> CoreResult<bool> {
        let generation = self.state.write().unwrap().tracker.begin();

        let params = RequestByEmployeeParams {
            employee_id: employee_id.to_string(),
        };
        let result = self
            .fetch
            .fetch_with_cache::<Vec<Transaction>, _>(Endpoint::TransactionsByEmployee, &params)
            .await;

        let mut state = self.state.write().unwrap();
        if !state.tracker.finish(generation) {
            log::debug!("Discarding superseded transactions for employee {}", employee_id);
            return Ok(false);
        }
        let transactions = result?;
        log::debug!("Loaded {} transactions for employee {}", transactions.len(), employee_id);
        state.data = Some(Arc::new(transactions));
        Ok(true)
    }
}

// ==================== Tests ====================
