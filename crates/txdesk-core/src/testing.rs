//! Scripted in-memory transport for tests

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::error::{CoreError, CoreResult};
use crate::models::{Employee, Transaction};
use crate::transport::Transport;
use crate::types::Endpoint;

pub fn employee(id: &str, first: &str, last: &str) -> Employee {
    Employee::new(id, first, last)
}

pub fn tx(id: &str, owner: &Employee, approved: bool) -> Transaction {
    Transaction {
        id: id.to_string(),
        amount: 10.0,
        employee: owner.clone(),
        merchant: format!("merchant-{}", id),
        date: "2024-01-15".to_string(),
        approved,
    }
}

/// Backend double answering from fixed data
///
/// Pages are indexed by cursor; `nextPage` is the following index until the
/// last page. Persisted approvals are overlaid on every later read. A call
/// can be held until the test releases it through `hold`.
#[derive(Default)]
pub struct ScriptedTransport {
    employees: Vec<Employee>,
    pages: Vec<Vec<Transaction>>,
    by_employee: HashMap<String, Vec<Transaction>>,
    failing: Mutex<HashSet<Endpoint>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    calls: Mutex<Vec<(Endpoint, serde_json::Value)>>,
    approvals: Mutex<HashMap<String, bool>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_employees(mut self, employees: Vec<Employee>) -> Self {
        self.employees = employees;
        self
    }

    pub fn with_pages(mut self, pages: Vec<Vec<Transaction>>) -> Self {
        self.pages = pages;
        self
    }

    pub fn with_employee_transactions(mut self, employee_id: &str, transactions: Vec<Transaction>) -> Self {
        self.by_employee.insert(employee_id.to_string(), transactions);
        self
    }

    pub fn fail(&self, endpoint: Endpoint, failing: bool) {
        let mut set = self.failing.lock().unwrap();
        if failing {
            set.insert(endpoint);
        } else {
            set.remove(&endpoint);
        }
    }

    /// Block the next call matching `key` until the returned handle is notified.
    ///
    /// Keys: `employees`, `page:{n}`, `employee:{id}`, `approval:{id}`.
    pub fn hold(&self, key: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates.lock().unwrap().insert(key.to_string(), notify.clone());
        notify
    }

    pub fn call_count(&self, endpoint: Endpoint) -> usize {
        self.calls.lock().unwrap().iter().filter(|(e, _)| *e == endpoint).count()
    }

    pub fn persisted_approval(&self, transaction_id: &str) -> Option<bool> {
        self.approvals.lock().unwrap().get(transaction_id).copied()
    }

    fn overlay(&self, transactions: &[Transaction]) -> Vec<Transaction> {
        let approvals = self.approvals.lock().unwrap();
        transactions
            .iter()
            .map(|t| match approvals.get(&t.id) {
                Some(&approved) => t.with_approval(approved),
                None => t.clone(),
            })
            .collect()
    }

    fn gate_key(endpoint: Endpoint, params: &serde_json::Value) -> String {
        let field = |name: &str| params.get(name).map(|v| v.to_string().trim_matches('"').to_string()).unwrap_or_default();
        match endpoint {
            Endpoint::Employees => "employees".to_string(),
            Endpoint::PaginatedTransactions => format!("page:{}", field("page")),
            Endpoint::TransactionsByEmployee => format!("employee:{}", field("employeeId")),
            Endpoint::SetTransactionApproval => format!("approval:{}", field("transactionId")),
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn call(&self, endpoint: Endpoint, params: serde_json::Value) -> CoreResult<serde_json::Value> {
        self.calls.lock().unwrap().push((endpoint, params.clone()));

        let gate = self.gates.lock().unwrap().remove(&Self::gate_key(endpoint, &params));
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.failing.lock().unwrap().contains(&endpoint) {
            return Err(CoreError::Transport {
                endpoint: endpoint.to_string(),
                message: "scripted failure".to_string(),
            });
        }

        let value = match endpoint {
            Endpoint::Employees => serde_json::to_value(&self.employees)?,
            Endpoint::PaginatedTransactions => {
                let page = params.get("page").and_then(|p| p.as_u64()).unwrap_or(0) as usize;
                let data = self.pages.get(page).map(|p| self.overlay(p)).unwrap_or_default();
                let next_page = if page + 1 < self.pages.len() { Some(page as u32 + 1) } else { None };
                serde_json::json!({ "data": data, "nextPage": next_page })
            }
            Endpoint::TransactionsByEmployee => {
                let id = params.get("employeeId").and_then(|v| v.as_str()).unwrap_or("");
                let data = self.by_employee.get(id).map(|t| self.overlay(t)).unwrap_or_default();
                serde_json::to_value(data)?
            }
            Endpoint::SetTransactionApproval => {
                let id = params.get("transactionId").and_then(|v| v.as_str()).unwrap_or("").to_string();
                let value = params.get("value").and_then(|v| v.as_bool()).unwrap_or(false);
                self.approvals.lock().unwrap().insert(id, value);
                serde_json::Value::Null
            }
        };
        Ok(value)
    }
}
