//! Transactions page rendering
//!
//! Endpoints:
//! - page_transactions: Main page with the employee filter and the panel
//!
//! Helper functions:
//! - render_panel: Transaction rows plus the view-more control
//! - render_employee_select: Employee filter control

use crate::{base_html, AppState};
use txdesk_core::{BoardSnapshot, Employee, Transaction};
use txdesk_utils::{escape_html, format_usd};

/// Transactions page. The first visit starts the initial load.
pub async fn page_transactions(state: axum::extract::State<AppState>) -> axum::response::Html<String> {
    let notice = match state.board.load_initial().await {
        Ok(true) => {
            log::info!("Initial load finished");
            None
        }
        Ok(false) => None,
        Err(e) => Some(format!("Some data could not be loaded: {}", e)),
    };

    let snapshot = state.board.snapshot();
    let inner_content = format!(
        r#"<main class='max-w-3xl mx-auto p-6'>
            <h1 class='text-2xl font-bold mb-4'>Transactions</h1>
            <hr class='mb-6'>
            {}
            <div class='mb-6'></div>
            <div id='tx-panel'>{}</div>
        </main>"#,
        render_employee_select(&snapshot),
        render_panel(&snapshot, notice.as_deref())
    );

    axum::response::Html(base_html("Transactions", &inner_content))
}

/// Employee filter control: "All Employees" followed by every loaded employee
pub fn render_employee_select(snapshot: &BoardSnapshot) -> String {
    if snapshot.employees_loading && snapshot.employees.is_empty() {
        return "<p class='text-gray-500'>Loading employees...</p>".to_string();
    }

    let selected = snapshot.filter.selected_id();
    let sentinel = Employee::all();
    let options: String = std::iter::once(&sentinel)
        .chain(snapshot.employees.iter())
        .map(|employee| {
            let label = if employee.is_sentinel() {
                "All Employees".to_string()
            } else {
                employee.full_name()
            };
            format!(
                "<option value='{}'{}>{}</option>",
                escape_html(&employee.id),
                if employee.id == selected { " selected" } else { "" },
                escape_html(&label)
            )
        })
        .collect();

    format!(
        r#"<label class='block text-sm text-gray-600 mb-1' for='employee-filter'>Filter by employee</label>
        <select id='employee-filter' name='employee_id' class='border rounded-lg px-3 py-2 w-full'
            hx-post='/transactions/filter' hx-trigger='change' hx-target='#tx-panel'>{}</select>"#,
        options
    )
}

/// Transaction rows plus the view-more control
pub fn render_panel(snapshot: &BoardSnapshot, notice: Option<&str>) -> String {
    let mut html = String::new();

    if let Some(message) = notice {
        html.push_str(&format!(
            "<div class='mb-4 p-3 rounded-lg bg-red-50 text-red-700 border border-red-200'>{}</div>",
            escape_html(message)
        ));
    }

    if snapshot.transactions.is_empty() {
        html.push_str("<div class='text-center py-12 text-gray-500'><p>No transactions</p></div>");
    } else {
        html.push_str("<div class='space-y-2'>");
        for transaction in &snapshot.transactions {
            html.push_str(&render_row(transaction));
        }
        html.push_str("</div>");
    }

    if snapshot.show_view_more {
        html.push_str(&format!(
            r#"<button class='mt-4 px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'
                hx-post='/transactions/more' hx-target='#tx-panel'{}>View More</button>"#,
            if snapshot.page_loading { " disabled" } else { "" }
        ));
    }

    html
}

fn render_row(transaction: &Transaction) -> String {
    let id = escape_html(&transaction.id);
    format!(
        r#"<div class='flex items-center justify-between bg-white rounded-lg shadow-sm p-4' id='tx-{}'>
            <div>
                <p class='font-medium'>{}</p>
                <p class='text-sm text-gray-500'>{} - {}</p>
            </div>
            <div class='flex items-center gap-4'>
                <span class='font-medium'>{}</span>
                <input type='checkbox'{}
                    hx-post='/transactions/{}/approval' hx-vals='{{"value": "{}"}}' hx-target='#tx-panel'>
            </div>
        </div>"#,
        id,
        escape_html(&transaction.merchant),
        escape_html(&transaction.employee.full_name()),
        escape_html(&transaction.display_date()),
        format_usd(transaction.amount),
        if transaction.approved { " checked" } else { "" },
        id,
        !transaction.approved
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use txdesk_core::EmployeeFilter;

    fn snapshot(transactions: Vec<Transaction>, show_view_more: bool) -> BoardSnapshot {
        BoardSnapshot {
            filter: EmployeeFilter::All,
            employees: vec![Employee::new("e1", "Ada", "Lovelace")],
            employees_loading: false,
            transactions,
            show_view_more,
            page_loading: false,
        }
    }

    fn transaction(id: &str, approved: bool) -> Transaction {
        Transaction {
            id: id.to_string(),
            amount: 1234.5,
            employee: Employee::new("e1", "Ada", "Lovelace"),
            merchant: "Social Media Ads".to_string(),
            date: "2024-01-15".to_string(),
            approved,
        }
    }

    #[test]
    fn test_row_toggle_posts_inverse_value() {
        let html = render_row(&transaction("tx_1", true));
        assert!(html.contains(" checked"));
        assert!(html.contains(r#"hx-vals='{"value": "false"}'"#));
        assert!(html.contains("$1,234.50"));
        assert!(html.contains("Ada Lovelace - Jan 15, 2024"));
        assert!(!html.contains("name="));
    }

    #[test]
    fn test_panel_view_more_button() {
        let html = render_panel(&snapshot(vec![transaction("tx_1", false)], true), None);
        assert!(html.contains("View More"));
        assert!(!html.contains(" disabled"));

        let mut loading = snapshot(vec![transaction("tx_1", false)], true);
        loading.page_loading = true;
        assert!(render_panel(&loading, None).contains(" disabled"));

        let html = render_panel(&snapshot(vec![transaction("tx_1", false)], false), None);
        assert!(!html.contains("View More"));
    }

    #[test]
    fn test_panel_notice_is_escaped() {
        let html = render_panel(&snapshot(vec![], false), Some("<b>down</b>"));
        assert!(html.contains("&lt;b&gt;down&lt;/b&gt;"));
        assert!(html.contains("No transactions"));
    }

    #[test]
    fn test_employee_select_marks_selection() {
        let mut snap = snapshot(vec![], false);
        let html = render_employee_select(&snap);
        assert!(html.contains("<option value='' selected>All Employees</option>"));
        assert!(html.contains("<option value='e1'>Ada Lovelace</option>"));

        snap.filter = EmployeeFilter::Employee(Employee::new("e1", "Ada", "Lovelace"));
        let html = render_employee_select(&snap);
        assert!(html.contains("<option value='e1' selected>Ada Lovelace</option>"));
    }

    #[test]
    fn test_employee_select_loading() {
        let mut snap = snapshot(vec![], false);
        snap.employees.clear();
        snap.employees_loading = true;
        assert!(render_employee_select(&snap).contains("Loading employees"));
    }
}
