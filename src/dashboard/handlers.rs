//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - Route handlers for displaying the dashboard and for its add/edit/delete forms
//! - HTML view functions for rendering the dashboard UI
//! - State used by the handlers

use axum::{
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use maud::{Markup, html};
use time::Date;

use crate::{
    AppState, Error,
    dashboard::{
        aggregation::{
            balance, category_totals, monthly_expenses, top_categories, total_expenses,
            total_income,
        },
        cards::{SummaryTotals, summary_cards_view},
        charts::{
            DashboardChart, ECHARTS_SCRIPT_URL, category_chart, charts_script, charts_view,
            monthly_expenses_chart,
        },
        tables::{TableQuery, TableSort, transactions_table},
    },
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement,
        PAGE_CONTAINER_STYLE, base, error_alert,
    },
    timezone::get_local_date,
    transaction::{
        KNOWN_CATEGORIES, MAX_DESCRIPTION_LENGTH, Transaction, TransactionForm,
        TransactionIdParam, TransactionPatch, TransactionStore,
    },
};

/// How many months before the current one the expenses chart covers.
const MONTHS_BACK: u32 = 5;
/// How many categories get their own summary card.
const TOP_CATEGORY_COUNT: usize = 3;

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The gateway to the transaction collection.
    pub transaction_store: TransactionStore,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display a page with an overview of the user's finances.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(query): Query<TableQuery>,
) -> Result<Response, Error> {
    let sort = TableSort::from_query(&query);
    let markup = render_dashboard(&state, sort, &TransactionForm::default(), None)?;

    Ok(markup.into_response())
}

/// Handle the dashboard's add-transaction form.
///
/// Redirects back to the dashboard on success. If the form is invalid the
/// dashboard is rendered again with an alert and the submitted values.
pub async fn create_transaction_form_handler(
    State(state): State<DashboardState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let new_transaction = match form.validate() {
        Ok(new_transaction) => new_transaction,
        Err(error) => {
            tracing::debug!("Rejected transaction form: {error}");
            let alert = error_alert("Could not add transaction", &error.to_string());

            return match render_dashboard(&state, TableSort::default(), &form, Some(alert)) {
                Ok(markup) => (StatusCode::BAD_REQUEST, markup).into_response(),
                Err(error) => error.into_response(),
            };
        }
    };

    match state.transaction_store.create(new_transaction) {
        Ok(_) => Redirect::to(endpoints::DASHBOARD_VIEW).into_response(),
        Err(error) => {
            tracing::error!("Could not create transaction from form: {error}");
            error.into_response()
        }
    }
}

/// Display the page for editing a transaction, pre-filled with its current values.
pub async fn get_edit_transaction_page(
    State(state): State<DashboardState>,
    TransactionIdParam(transaction_id): TransactionIdParam,
) -> Result<Response, Error> {
    let transaction = state
        .transaction_store
        .get_by_id(&transaction_id)
        .map(Transaction::from)
        .inspect_err(|error| {
            tracing::debug!("Could not get transaction {transaction_id} for editing: {error}")
        })?;
    let today = get_local_date(&state.local_timezone)?;
    let form = TransactionForm::from_transaction(&transaction);

    Ok(edit_transaction_view(&transaction.id, &form, today, None).into_response())
}

/// Handle the edit form for a transaction.
///
/// The submitted values replace the stored ones and the user is redirected
/// back to the dashboard. If the form is invalid the edit page is rendered
/// again with an alert and the submitted values.
pub async fn update_transaction_form_handler(
    State(state): State<DashboardState>,
    TransactionIdParam(transaction_id): TransactionIdParam,
    Form(form): Form<TransactionForm>,
) -> Response {
    if let Err(error) = state.transaction_store.get_by_id(&transaction_id) {
        tracing::debug!("Could not get transaction {transaction_id} for editing: {error}");
        return error.into_response();
    }

    let new_transaction = match form.validate() {
        Ok(new_transaction) => new_transaction,
        Err(error) => {
            tracing::debug!("Rejected edit of transaction {transaction_id}: {error}");
            let alert = error_alert("Could not update transaction", &error.to_string());

            return match get_local_date(&state.local_timezone) {
                Ok(today) => (
                    StatusCode::BAD_REQUEST,
                    edit_transaction_view(&transaction_id, &form, today, Some(alert)),
                )
                    .into_response(),
                Err(error) => error.into_response(),
            };
        }
    };

    match state
        .transaction_store
        .update_by_id(&transaction_id, TransactionPatch::from(new_transaction))
    {
        Ok(_) => Redirect::to(endpoints::DASHBOARD_VIEW).into_response(),
        Err(error) => {
            tracing::error!("Could not update transaction {transaction_id} from form: {error}");
            error.into_response()
        }
    }
}

/// Handle a dashboard delete button.
pub async fn delete_transaction_form_handler(
    State(state): State<DashboardState>,
    TransactionIdParam(transaction_id): TransactionIdParam,
) -> Result<Redirect, Error> {
    state
        .transaction_store
        .delete_by_id(&transaction_id)
        .inspect_err(|error| {
            tracing::error!("Could not delete transaction {transaction_id}: {error}")
        })?;

    Ok(Redirect::to(endpoints::DASHBOARD_VIEW))
}

/// Fetch the transactions and render the whole dashboard page.
///
/// # Errors
/// Returns an error if the transactions cannot be fetched or the timezone is invalid.
fn render_dashboard(
    state: &DashboardState,
    sort: TableSort,
    form: &TransactionForm,
    alert: Option<Markup>,
) -> Result<Markup, Error> {
    let today = get_local_date(&state.local_timezone)?;
    let transactions: Vec<Transaction> = state
        .transaction_store
        .list_all()
        .inspect_err(|error| tracing::error!("Could not get transactions: {error}"))?
        .into_iter()
        .map(Transaction::from)
        .collect();

    Ok(dashboard_view(&transactions, today, sort, form, alert))
}

fn build_dashboard_charts(transactions: &[Transaction], today: Date) -> [DashboardChart; 2] {
    [
        DashboardChart {
            id: "monthly-expenses-chart",
            options: monthly_expenses_chart(&monthly_expenses(transactions, MONTHS_BACK, today))
                .to_string(),
        },
        DashboardChart {
            id: "category-chart",
            options: category_chart(&category_totals(transactions)).to_string(),
        },
    ]
}

fn dashboard_view(
    transactions: &[Transaction],
    today: Date,
    sort: TableSort,
    form: &TransactionForm,
    alert: Option<Markup>,
) -> Markup {
    let totals = SummaryTotals {
        income: total_income(transactions),
        expenses: total_expenses(transactions),
        balance: balance(transactions),
    };
    let top_categories = top_categories(transactions, TOP_CATEGORY_COUNT);
    let charts = build_dashboard_charts(transactions, today);

    let content = html!(
        div
            id="dashboard-content"
            class={(PAGE_CONTAINER_STYLE) " max-w-screen-xl"}
        {
            h1 class="text-2xl font-bold mb-6" { "Personal Finance Tracker" }

            div id="alert-container" class="w-full flex justify-center" {
                @if let Some(alert) = alert {
                    (alert)
                }
            }

            (summary_cards_view(totals, &top_categories))
            (charts_view(&charts))
            (transaction_form_view(form, today, &ADD_FORM))
            (transactions_table(transactions, sort))
        }
    );

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_SCRIPT_URL.to_owned()),
        charts_script(&charts),
    ];

    base("Dashboard", &scripts, &content)
}

fn edit_transaction_view(
    transaction_id: &str,
    form: &TransactionForm,
    today: Date,
    alert: Option<Markup>,
) -> Markup {
    let action = format_endpoint(endpoints::DASHBOARD_EDIT_TRANSACTION, transaction_id);
    let target = FormTarget {
        section_id: "edit-transaction",
        heading: "Edit Transaction",
        action: &action,
        submit_label: "Save Changes",
    };

    let content = html!(
        div
            id="edit-transaction-content"
            class={(PAGE_CONTAINER_STYLE) " max-w-screen-md"}
        {
            div id="alert-container" class="w-full flex justify-center" {
                @if let Some(alert) = alert {
                    (alert)
                }
            }

            (transaction_form_view(form, today, &target))

            a href=(endpoints::DASHBOARD_VIEW) class="text-blue-600 hover:underline" {
                "Back to dashboard"
            }
        }
    );

    base("Edit Transaction", &[], &content)
}

/// Where a transaction form is submitted and how it is labelled.
struct FormTarget<'a> {
    section_id: &'a str,
    heading: &'a str,
    action: &'a str,
    submit_label: &'a str,
}

const ADD_FORM: FormTarget<'static> = FormTarget {
    section_id: "add-transaction",
    heading: "Add Transaction",
    action: endpoints::DASHBOARD_TRANSACTIONS,
    submit_label: "Add Transaction",
};

/// A transaction form pre-filled with `form`.
fn transaction_form_view(form: &TransactionForm, today: Date, target: &FormTarget) -> Markup {
    let date = if form.date.is_empty() {
        today.to_string()
    } else {
        form.date.clone()
    };
    let is_income = form.kind == "income";

    html!(
        section id=(target.section_id) class="w-full mx-auto mb-8" {
            h3 class="text-xl font-semibold mb-4" { (target.heading) }

            form
                method="post"
                action=(target.action)
                class="grid grid-cols-1 md:grid-cols-3 gap-4 bg-white dark:bg-gray-800 p-4 rounded-lg shadow"
            {
                div {
                    label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }
                    input
                        id="amount"
                        name="amount"
                        type="number"
                        step="0.01"
                        min="0.01"
                        placeholder="0.00"
                        value=(form.amount)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div {
                    label for="date" class=(FORM_LABEL_STYLE) { "Date" }
                    input
                        id="date"
                        name="date"
                        type="date"
                        value=(date)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div {
                    label for="type" class=(FORM_LABEL_STYLE) { "Type" }
                    select id="type" name="type" class=(FORM_TEXT_INPUT_STYLE) {
                        option value="expense" selected[!is_income] { "Expense" }
                        option value="income" selected[is_income] { "Income" }
                    }
                }

                div class="md:col-span-2" {
                    label for="description" class=(FORM_LABEL_STYLE) { "Description" }
                    input
                        id="description"
                        name="description"
                        type="text"
                        maxlength=(MAX_DESCRIPTION_LENGTH)
                        placeholder="What was this for?"
                        value=(form.description)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div {
                    label for="category" class=(FORM_LABEL_STYLE) { "Category" }
                    input
                        id="category"
                        name="category"
                        type="text"
                        list="known-categories"
                        placeholder="Others"
                        value=(form.category.as_deref().unwrap_or_default())
                        class=(FORM_TEXT_INPUT_STYLE);
                    datalist id="known-categories" {
                        @for category in KNOWN_CATEGORIES {
                            option value=(category) {}
                        }
                    }
                }

                div class="md:col-span-3" {
                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { (target.submit_label) }
                }
            }
        }
    )
}
