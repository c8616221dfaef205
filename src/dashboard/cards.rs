//! Card components for the dashboard summary.
//!
//! Provides card-based views showing:
//! - Total income, total expenses and the balance
//! - The top spending categories with their share of total expenses

use maud::{Markup, html};

use crate::{dashboard::aggregation::CategoryTotal, html::format_currency};

const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md";
const AMOUNT_GREEN_STYLE: &str = "text-green-600 dark:text-green-400";
const AMOUNT_RED_STYLE: &str = "text-red-600 dark:text-red-400";

/// The totals shown in the summary cards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct SummaryTotals {
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
}

/// Formats a percentage value, avoiding "-0%" display.
fn format_percentage(value: f64) -> String {
    let rounded = value.round();
    if rounded.abs() < 0.5 {
        "0".to_string()
    } else {
        format!("{:.0}", rounded)
    }
}

/// The color for the balance: green when it is not negative.
fn balance_color_class(balance: f64) -> &'static str {
    if balance >= 0.0 {
        AMOUNT_GREEN_STYLE
    } else {
        AMOUNT_RED_STYLE
    }
}

/// Renders the income, expenses and balance cards followed by a card per
/// top category.
pub(super) fn summary_cards_view(totals: SummaryTotals, top_categories: &[CategoryTotal]) -> Markup {
    html! {
        section id="summary-cards" class="w-full mx-auto mb-8" {
            div class="grid grid-cols-1 sm:grid-cols-3 gap-4 mb-4" {
                (total_card("total-income", "Total Income", totals.income, AMOUNT_GREEN_STYLE))
                (total_card("total-expenses", "Total Expenses", totals.expenses, AMOUNT_RED_STYLE))
                (total_card("balance", "Balance", totals.balance, balance_color_class(totals.balance)))
            }

            h3 class="text-xl font-semibold mb-4" { "Top Categories" }

            @if top_categories.is_empty() {
                p class="text-sm text-gray-600 dark:text-gray-400" {
                    "No expenses recorded yet."
                }
            } @else {
                div class="grid grid-cols-1 sm:grid-cols-3 gap-4" {
                    @for category in top_categories {
                        (category_card(category, totals.expenses))
                    }
                }
            }
        }
    }
}

fn total_card(id: &str, title: &str, amount: f64, color_class: &str) -> Markup {
    html! {
        div id=(id) class=(CARD_STYLE) {
            h4 class="text-sm font-medium text-gray-600 dark:text-gray-400 mb-2" {
                (title)
            }
            div class={"text-3xl font-bold " (color_class)} {
                (format_currency(amount))
            }
        }
    }
}

/// Renders a single card for one of the top categories.
fn category_card(category: &CategoryTotal, total_expenses: f64) -> Markup {
    let percentage_of_total = if total_expenses > 0.0 {
        category.amount / total_expenses * 100.0
    } else {
        0.0
    };

    html! {
        div
            class={(CARD_STYLE) " category-card"}
            aria-label=(format!(
                "{}: {}, {}% of expenses",
                category.category,
                format_currency(category.amount),
                format_percentage(percentage_of_total)
            ))
        {
            h4 class="text-lg font-semibold mb-3 truncate" title=(category.category) {
                (category.category)
            }

            div class="text-2xl font-bold mb-1" {
                (format_currency(category.amount))
            }

            div class="text-sm text-gray-600 dark:text-gray-400 mb-2" {
                (format_percentage(percentage_of_total)) "% of expenses"
            }

            (progress_bar(percentage_of_total))
        }
    }
}

/// Renders a horizontal progress bar showing percentage of total expenses.
fn progress_bar(percentage: f64) -> Markup {
    let clamped = percentage.clamp(0.0, 100.0);

    // Keep a minimum width so rounded corners are visible
    let display_percentage = if clamped > 0.0 && clamped < 3.0 {
        3.0
    } else {
        clamped
    };

    html! {
        div
            class="w-full bg-gray-200 dark:bg-gray-700 rounded-full h-2.5"
            role="progressbar"
            aria-valuenow=(format_percentage(clamped))
            aria-valuemin="0"
            aria-valuemax="100"
        {
            @if clamped > 0.0 {
                div
                    class="bg-blue-600 dark:bg-blue-500 h-2.5 rounded-full"
                    style=(format!("width: {:.1}%", display_percentage))
                {}
            }
        }
    }
}
