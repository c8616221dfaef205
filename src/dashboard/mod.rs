//! Dashboard module
//!
//! Provides the overview page with summary cards, charts and a sortable
//! transaction table, the forms for adding, editing and deleting transactions, and the
//! cached transaction list used by dashboard clients.

mod aggregation;
mod cache;
mod cards;
mod charts;
mod handlers;
mod tables;

pub use aggregation::{
    CategoryTotal, MonthlyTotal, balance, category_totals, monthly_expenses, top_categories,
    total_expenses, total_income,
};
pub use cache::{CacheCommand, DashboardController, TransactionApi};
pub use handlers::{
    create_transaction_form_handler, delete_transaction_form_handler, get_dashboard_page,
    get_edit_transaction_page, update_transaction_form_handler,
};
