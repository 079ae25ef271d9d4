//! Basic types for the core module

use serde::{Deserialize, Serialize};

use super::models::Employee;

/// Named remote calls understood by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Endpoint {
    /// Full employee directory
    Employees,
    /// One page of all transactions
    PaginatedTransactions,
    /// Every transaction of one employee
    TransactionsByEmployee,
    /// Persist an approval flag
    SetTransactionApproval,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Employees => "employees",
            Endpoint::PaginatedTransactions => "paginatedTransactions",
            Endpoint::TransactionsByEmployee => "transactionsByEmployee",
            Endpoint::SetTransactionApproval => "setTransactionApproval",
        }
    }
}

impl std::str::FromStr for Endpoint {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "employees" => Ok(Endpoint::Employees),
            "paginatedTransactions" => Ok(Endpoint::PaginatedTransactions),
            "transactionsByEmployee" => Ok(Endpoint::TransactionsByEmployee),
            "setTransactionApproval" => Ok(Endpoint::SetTransactionApproval),
            _ => Err(format!("Unknown endpoint: {}", s)),
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which employee the transaction list is narrowed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "employee", rename_all = "lowercase")]
pub enum EmployeeFilter {
    /// No filter; the accumulated, paginated list is shown
    All,
    /// Only this employee's transactions
    Employee(Employee),
}

impl Default for EmployeeFilter {
    fn default() -> Self {
        EmployeeFilter::All
    }
}

impl EmployeeFilter {
    /// Build a filter from a UI selection; the sentinel and `None` both mean "all"
    pub fn from_selection(selection: Option<Employee>) -> Self {
        match selection {
            Some(employee) if !employee.is_sentinel() => EmployeeFilter::Employee(employee),
            _ => EmployeeFilter::All,
        }
    }

    pub fn employee(&self) -> Option<&Employee> {
        match self {
            EmployeeFilter::All => None,
            EmployeeFilter::Employee(employee) => Some(employee),
        }
    }

    pub fn is_active(&self) -> bool {
        self.employee().is_some()
    }

    /// Identifier of the selected employee, empty when unfiltered
    pub fn selected_id(&self) -> &str {
        self.employee().map(|e| e.id.as_str()).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_round_trip_names() {
        for endpoint in [
            Endpoint::Employees,
            Endpoint::PaginatedTransactions,
            Endpoint::TransactionsByEmployee,
            Endpoint::SetTransactionApproval,
        ] {
            assert_eq!(endpoint.as_str().parse::<Endpoint>().unwrap(), endpoint);
        }
        assert!("transactions".parse::<Endpoint>().is_err());
    }

    #[test]
    fn test_filter_from_selection() {
        assert_eq!(EmployeeFilter::from_selection(None), EmployeeFilter::All);
        assert_eq!(EmployeeFilter::from_selection(Some(Employee::all())), EmployeeFilter::All);

        let ada = Employee::new("e1", "Ada", "Lovelace");
        let filter = EmployeeFilter::from_selection(Some(ada.clone()));
        assert!(filter.is_active());
        assert_eq!(filter.employee(), Some(&ada));
        assert_eq!(filter.selected_id(), "e1");
    }
}
