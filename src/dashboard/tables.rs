//! The sortable "Recent Transactions" table.
//!
//! Sorting is driven by the `sort` and `order` query parameters. Unknown
//! values fall back to sorting by date, newest first.

use std::cmp::Ordering;

use maud::{Markup, html};
use serde::Deserialize;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, CATEGORY_BADGE_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, format_currency,
    },
    transaction::{Transaction, TransactionType},
};

/// Descriptions with more characters than this are shortened in the table.
const DESCRIPTION_DISPLAY_LIMIT: usize = 7;
/// How many characters of a shortened description are kept.
const DESCRIPTION_PREFIX_LENGTH: usize = 8;

/// Dates are shown like "Jan 05, 2024".
const DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[month repr:short] [day padding:zero], [year]");

const EDIT_LINK_STYLE: &str = "text-blue-600 hover:text-blue-500 \
    dark:text-blue-500 dark:hover:text-blue-400 underline mr-4";
const TABLE_CELL_GREEN_STYLE: &str = "text-green-600 dark:text-green-400";
const TABLE_CELL_RED_STYLE: &str = "text-red-600 dark:text-red-400";

/// The raw query parameters for sorting the table.
#[derive(Debug, Default, Deserialize)]
pub struct TableQuery {
    /// The column to sort by.
    pub sort: Option<String>,
    /// "asc" or "desc".
    pub order: Option<String>,
}

/// A column the table can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum SortColumn {
    Date,
    Amount,
    Description,
    Category,
    Type,
}

impl SortColumn {
    const ALL: [SortColumn; 5] = [
        SortColumn::Date,
        SortColumn::Description,
        SortColumn::Category,
        SortColumn::Type,
        SortColumn::Amount,
    ];

    fn from_query_value(value: &str) -> Option<Self> {
        match value {
            "date" => Some(Self::Date),
            "amount" => Some(Self::Amount),
            "description" => Some(Self::Description),
            "category" => Some(Self::Category),
            "type" => Some(Self::Type),
            _ => None,
        }
    }

    fn as_query_value(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Amount => "amount",
            Self::Description => "description",
            Self::Category => "category",
            Self::Type => "type",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Amount => "Amount",
            Self::Description => "Description",
            Self::Category => "Category",
            Self::Type => "Type",
        }
    }

    fn compare(self, a: &Transaction, b: &Transaction) -> Ordering {
        match self {
            Self::Date => a.date.cmp(&b.date),
            Self::Amount => a.amount.total_cmp(&b.amount),
            Self::Description => a
                .description
                .to_lowercase()
                .cmp(&b.description.to_lowercase()),
            Self::Category => a
                .category_label()
                .to_lowercase()
                .cmp(&b.category_label().to_lowercase()),
            Self::Type => a.kind.as_str().cmp(b.kind.as_str()),
        }
    }
}

/// The direction to sort the table in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    fn from_query_value(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(Self::Ascending),
            "desc" => Some(Self::Descending),
            _ => None,
        }
    }

    fn as_query_value(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// The validated sort selection for the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct TableSort {
    pub column: SortColumn,
    pub order: SortOrder,
}

impl Default for TableSort {
    fn default() -> Self {
        Self {
            column: SortColumn::Date,
            order: SortOrder::Descending,
        }
    }
}

impl TableSort {
    /// Parse the query parameters, using the default sort if either value is
    /// missing or not recognised.
    pub(super) fn from_query(query: &TableQuery) -> Self {
        let column = query.sort.as_deref().map(SortColumn::from_query_value);
        let order = query.order.as_deref().map(SortOrder::from_query_value);

        match (column, order) {
            (Some(Some(column)), Some(Some(order))) => Self { column, order },
            (Some(Some(column)), None) => Self {
                column,
                ..Self::default()
            },
            _ => Self::default(),
        }
    }

    /// Sort `transactions` in place. Equal rows keep their relative order.
    pub(super) fn apply(self, transactions: &mut [Transaction]) {
        match self.order {
            SortOrder::Ascending => transactions.sort_by(|a, b| self.column.compare(a, b)),
            SortOrder::Descending => transactions.sort_by(|a, b| self.column.compare(b, a)),
        }
    }

    /// The link for a column header: clicking the current column flips the
    /// order, any other column starts descending.
    fn header_url(self, column: SortColumn) -> String {
        let order = if column == self.column {
            self.order.toggled()
        } else {
            SortOrder::Descending
        };

        format!(
            "{}?sort={}&order={}",
            endpoints::DASHBOARD_VIEW,
            column.as_query_value(),
            order.as_query_value()
        )
    }
}

/// Shorten a description to its first few characters if it is too long to display.
pub(super) fn display_description(description: &str) -> String {
    if description.graphemes(true).count() <= DESCRIPTION_DISPLAY_LIMIT {
        return description.to_owned();
    }

    let prefix: String = description
        .graphemes(true)
        .take(DESCRIPTION_PREFIX_LENGTH)
        .collect();

    format!("{prefix}..")
}

/// Format an amount with an explicit sign, e.g. "+$10.00" or "-$4.50".
pub(super) fn format_signed_amount(amount: f64) -> String {
    if amount < 0.0 {
        format!("-{}", format_currency(amount.abs()))
    } else {
        format!("+{}", format_currency(amount))
    }
}

/// Renders the transactions table, sorted by `sort`.
pub(super) fn transactions_table(transactions: &[Transaction], sort: TableSort) -> Markup {
    let mut rows = transactions.to_vec();
    sort.apply(&mut rows);

    html! {
        section id="transactions" class="w-full mx-auto mb-8" {
            h3 class="text-xl font-semibold mb-4" { "Recent Transactions" }

            div class="overflow-x-auto rounded-lg shadow" {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400" {
                    thead class=(TABLE_HEADER_STYLE) {
                        tr {
                            @for column in SortColumn::ALL {
                                th scope="col" class=(TABLE_CELL_STYLE) {
                                    a href=(sort.header_url(column)) class="hover:underline" {
                                        (column.label())
                                        @if column == sort.column {
                                            @match sort.order {
                                                SortOrder::Ascending => " ▲",
                                                SortOrder::Descending => " ▼",
                                            }
                                        }
                                    }
                                }
                            }
                            th scope="col" class=(TABLE_CELL_STYLE) {
                                span class="sr-only" { "Actions" }
                            }
                        }
                    }
                    tbody {
                        @for transaction in &rows {
                            (transaction_row(transaction))
                        }

                        @if rows.is_empty() {
                            tr class=(TABLE_ROW_STYLE) {
                                td
                                    colspan="6"
                                    class={(TABLE_CELL_STYLE) " text-center"}
                                    data-empty-state
                                {
                                    "No transactions yet. Add one using the form above."
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn transaction_row(transaction: &Transaction) -> Markup {
    let amount_style = match transaction.kind {
        TransactionType::Income => TABLE_CELL_GREEN_STYLE,
        TransactionType::Expense => TABLE_CELL_RED_STYLE,
    };
    let edit_url = format_endpoint(endpoints::DASHBOARD_EDIT_TRANSACTION, &transaction.id);
    let delete_url = format_endpoint(endpoints::DASHBOARD_DELETE_TRANSACTION, &transaction.id);

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id) {
            td class=(TABLE_CELL_STYLE) { (format_table_date(transaction.date)) }
            td
                class={(TABLE_CELL_STYLE) " font-medium text-gray-900 dark:text-white"}
                title=(transaction.description)
            {
                (display_description(&transaction.description))
            }
            td class=(TABLE_CELL_STYLE) {
                span class=(CATEGORY_BADGE_STYLE) { (transaction.category_label()) }
            }
            td class=(TABLE_CELL_STYLE) { (transaction.kind) }
            td class={(TABLE_CELL_STYLE) " whitespace-nowrap " (amount_style)} {
                (format_signed_amount(transaction.amount))
            }
            td class={(TABLE_CELL_STYLE) " flex items-center"} {
                a href=(edit_url) class=(EDIT_LINK_STYLE) { "Edit" }
                form method="post" action=(delete_url) {
                    button type="submit" class=(BUTTON_DELETE_STYLE) { "Delete" }
                }
            }
        }
    }
}

fn format_table_date(date: Date) -> String {
    date.format(DATE_FORMAT).unwrap_or_else(|error| {
        tracing::warn!("Could not format date {date}: {error}");
        date.to_string()
    })
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::transaction::{Transaction, TransactionType};

    use super::{
        SortColumn, SortOrder, TableQuery, TableSort, display_description, format_signed_amount,
        format_table_date, transactions_table,
    };

    fn transaction(id: &str, amount: f64, description: &str, category: Option<&str>) -> Transaction {
        Transaction {
            id: id.to_owned(),
            amount,
            date: date!(2024 - 01 - 01),
            description: description.to_owned(),
            kind: if amount < 0.0 {
                TransactionType::Expense
            } else {
                TransactionType::Income
            },
            category: category.map(str::to_owned),
        }
    }

    fn query(sort: Option<&str>, order: Option<&str>) -> TableQuery {
        TableQuery {
            sort: sort.map(str::to_owned),
            order: order.map(str::to_owned),
        }
    }

    #[test]
    fn short_descriptions_are_unchanged() {
        assert_eq!(display_description("Coffee"), "Coffee");
        assert_eq!(display_description("Grocery"), "Grocery");
    }

    #[test]
    fn long_descriptions_are_shortened() {
        assert_eq!(display_description("Groceries"), "Grocerie..");
        assert_eq!(display_description("Monthly rent payment"), "Monthly ..");
    }

    #[test]
    fn amounts_have_explicit_signs() {
        assert_eq!(format_signed_amount(100.0), "+$100.00");
        assert_eq!(format_signed_amount(-4.5), "-$4.50");
    }

    #[test]
    fn sort_query_defaults_to_newest_first() {
        assert_eq!(TableSort::from_query(&query(None, None)), TableSort::default());
        assert_eq!(
            TableSort::from_query(&query(Some("colour"), Some("asc"))),
            TableSort::default()
        );
        assert_eq!(
            TableSort::from_query(&query(Some("amount"), Some("sideways"))),
            TableSort::default()
        );
        assert_eq!(
            TableSort::default(),
            TableSort {
                column: SortColumn::Date,
                order: SortOrder::Descending
            }
        );
    }

    #[test]
    fn sort_query_accepts_known_values() {
        assert_eq!(
            TableSort::from_query(&query(Some("amount"), Some("asc"))),
            TableSort {
                column: SortColumn::Amount,
                order: SortOrder::Ascending
            }
        );
        assert_eq!(
            TableSort::from_query(&query(Some("category"), None)),
            TableSort {
                column: SortColumn::Category,
                order: SortOrder::Descending
            }
        );
    }

    #[test]
    fn sorts_by_amount_ascending() {
        let mut transactions = vec![
            transaction("1", 10.0, "a", None),
            transaction("2", -30.0, "b", None),
            transaction("3", 5.0, "c", None),
        ];

        TableSort {
            column: SortColumn::Amount,
            order: SortOrder::Ascending,
        }
        .apply(&mut transactions);

        let ids: Vec<&str> = transactions.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "1"]);
    }

    #[test]
    fn sorts_by_category_using_display_label() {
        let mut transactions = vec![
            transaction("1", -1.0, "a", Some("Utilities")),
            transaction("2", -1.0, "b", None),
            transaction("3", -1.0, "c", Some("Gas")),
        ];

        TableSort {
            column: SortColumn::Category,
            order: SortOrder::Ascending,
        }
        .apply(&mut transactions);

        let ids: Vec<&str> = transactions.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "2", "1"]);
    }

    #[test]
    fn empty_table_shows_empty_state_row() {
        let html = Html::parse_fragment(&transactions_table(&[], TableSort::default()).into_string());

        let selector = Selector::parse("td[data-empty-state]").unwrap();
        assert_eq!(html.select(&selector).count(), 1);
    }

    #[test]
    fn rows_have_delete_forms() {
        let transactions = vec![transaction("42", -12.0, "Lunch", Some("Dining Out"))];

        let html = Html::parse_fragment(
            &transactions_table(&transactions, TableSort::default()).into_string(),
        );

        let selector = Selector::parse("tr[data-transaction-id='42'] form").unwrap();
        let form = html.select(&selector).next().expect("row should have a delete form");
        assert_eq!(
            form.value().attr("action"),
            Some("/dashboard/transactions/42/delete")
        );
        assert_eq!(form.value().attr("method"), Some("post"));
    }

    #[test]
    fn rows_have_edit_links() {
        let transactions = vec![transaction("42", -12.0, "Lunch", Some("Dining Out"))];

        let html = Html::parse_fragment(
            &transactions_table(&transactions, TableSort::default()).into_string(),
        );

        let selector = Selector::parse("tr[data-transaction-id='42'] a").unwrap();
        let link = html.select(&selector).next().expect("row should have an edit link");
        assert_eq!(
            link.value().attr("href"),
            Some("/dashboard/transactions/42/edit")
        );
        assert_eq!(link.text().collect::<String>(), "Edit");
    }

    #[test]
    fn dates_use_short_month_names() {
        assert_eq!(format_table_date(date!(2024 - 01 - 05)), "Jan 05, 2024");
        assert_eq!(format_table_date(date!(2023 - 12 - 31)), "Dec 31, 2023");
    }

    #[test]
    fn rows_show_formatted_dates() {
        let transactions = vec![transaction("1", 5.0, "Refund", None)];

        let html = Html::parse_fragment(
            &transactions_table(&transactions, TableSort::default()).into_string(),
        );

        let selector = Selector::parse("tbody tr td").unwrap();
        let first_cell = html.select(&selector).next().unwrap();
        assert_eq!(first_cell.text().collect::<String>(), "Jan 01, 2024");
    }

    #[test]
    fn current_column_header_links_to_reversed_order() {
        let html = Html::parse_fragment(
            &transactions_table(&[], TableSort::default()).into_string(),
        );

        let selector = Selector::parse("thead a").unwrap();
        let links: Vec<&str> = html
            .select(&selector)
            .filter_map(|link| link.value().attr("href"))
            .collect();
        assert!(links.contains(&"/?sort=date&order=asc"));
        assert!(links.contains(&"/?sort=amount&order=desc"));
    }
}
