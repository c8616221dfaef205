//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/transactions/{transaction_id}', use [format_endpoint].

/// The dashboard page.
pub const DASHBOARD_VIEW: &str = "/";
/// The route for the dashboard's add-transaction form.
pub const DASHBOARD_TRANSACTIONS: &str = "/dashboard/transactions";
/// The page and form target for editing a transaction from the dashboard.
pub const DASHBOARD_EDIT_TRANSACTION: &str = "/dashboard/transactions/{transaction_id}/edit";
/// The route for the dashboard's delete buttons.
pub const DASHBOARD_DELETE_TRANSACTION: &str =
    "/dashboard/transactions/{transaction_id}/delete";

/// The route to list and create transactions.
pub const TRANSACTIONS_API: &str = "/transactions";
/// The route to update or delete a single transaction.
pub const TRANSACTION: &str = "/transactions/{transaction_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/transactions/{transaction_id}', '{transaction_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: &str) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
