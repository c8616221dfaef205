//! Transaction data aggregation for the dashboard.
//!
//! Every function here is pure: it only looks at the list it is given, and
//! "today" is passed in rather than read from the clock.

use std::collections::HashMap;

use serde::Serialize;
use time::{Date, Duration, Month};

use crate::transaction::{Transaction, TransactionType};

/// The total spent in one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    /// The category name, "Others" for uncategorized expenses.
    pub category: String,
    /// The sum of the expense magnitudes.
    pub amount: f64,
}

/// The total spent in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    /// The first day of the month.
    pub month: Date,
    /// The month formatted for display, e.g. "Jan 2024".
    pub label: String,
    /// The sum of the expense magnitudes.
    pub total: f64,
}

/// The sum of all income amounts.
pub fn total_income(transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .filter(|transaction| transaction.kind == TransactionType::Income)
        .map(|transaction| transaction.amount)
        .sum()
}

/// The sum of the magnitudes of all expenses.
pub fn total_expenses(transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .filter(|transaction| transaction.kind == TransactionType::Expense)
        .map(|transaction| transaction.amount.abs())
        .sum()
}

/// Total income minus total expenses.
pub fn balance(transactions: &[Transaction]) -> f64 {
    total_income(transactions) - total_expenses(transactions)
}

/// Groups expenses by category and sums their magnitudes.
///
/// Categories appear in the order they are first encountered.
pub fn category_totals(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    let mut index_by_category: HashMap<&str, usize> = HashMap::new();

    for transaction in transactions
        .iter()
        .filter(|transaction| transaction.kind == TransactionType::Expense)
    {
        let category = transaction.category_label();

        let index = *index_by_category.entry(category).or_insert_with(|| {
            totals.push(CategoryTotal {
                category: category.to_owned(),
                amount: 0.0,
            });
            totals.len() - 1
        });

        totals[index].amount += transaction.amount.abs();
    }

    totals
}

/// The `count` categories with the largest expense totals, largest first.
///
/// Ties keep the order in which the categories were first encountered.
pub fn top_categories(transactions: &[Transaction], count: usize) -> Vec<CategoryTotal> {
    let mut totals = category_totals(transactions);
    totals.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    totals.truncate(count);
    totals
}

/// Sums expenses for each of the `months_back + 1` calendar months ending
/// with the month containing `today`.
///
/// # Returns
/// One entry per month in chronological order, with zero for months that have no expenses.
pub fn monthly_expenses(
    transactions: &[Transaction],
    months_back: u32,
    today: Date,
) -> Vec<MonthlyTotal> {
    let mut totals_by_month: HashMap<Date, f64> = HashMap::new();

    for transaction in transactions
        .iter()
        .filter(|transaction| transaction.kind == TransactionType::Expense)
    {
        *totals_by_month
            .entry(first_of_month(transaction.date))
            .or_insert(0.0) += transaction.amount.abs();
    }

    trailing_months(today, months_back)
        .into_iter()
        .map(|month| MonthlyTotal {
            month,
            label: format_month_label(month),
            total: totals_by_month.get(&month).copied().unwrap_or(0.0),
        })
        .collect()
}

/// The first day of the month containing `date`.
fn first_of_month(date: Date) -> Date {
    date - Duration::days(i64::from(date.day()) - 1)
}

/// The first days of the `months_back + 1` months ending with the month of
/// `today`, oldest first.
fn trailing_months(today: Date, months_back: u32) -> Vec<Date> {
    let mut months = vec![first_of_month(today)];

    for _ in 0..months_back {
        let Some(previous) = months
            .last()
            .and_then(|month| month.previous_day())
            .map(first_of_month)
        else {
            break;
        };

        months.push(previous);
    }

    months.reverse();
    months
}

/// Formats a month as its three-letter abbreviation and year, e.g. "Jan 2024".
fn format_month_label(month: Date) -> String {
    let name = match month.month() {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    };

    format!("{name} {}", month.year())
}
