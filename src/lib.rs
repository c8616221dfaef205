//! Fintrack is a web app for keeping track of personal income and expenses.
//!
//! This library provides a JSON API for recording transactions and a
//! server-rendered dashboard that summarises them with totals, a monthly
//! expense trend and a breakdown of expenses by category.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod dashboard;
mod db;
mod endpoints;
mod html;
mod logging;
mod routing;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use dashboard::{
    CacheCommand, CategoryTotal, DashboardController, MonthlyTotal, TransactionApi, balance,
    category_totals, monthly_expenses, top_categories, total_expenses, total_income,
};
pub use db::{initialize as initialize_db, open_connection};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use transaction::{
    DeleteAcknowledgement, KNOWN_CATEGORIES, NewTransaction, StoredTransaction, Transaction,
    TransactionForm, TransactionPatch, TransactionStore, TransactionType, UNCATEGORIZED_LABEL,
    ValidationField,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The identifier or the payload of a request was missing or malformed.
    #[error("{0}")]
    BadRequest(String),

    /// The requested transaction was not found.
    ///
    /// For HTTP request handlers, the client should check that the ID is
    /// correct and that the transaction has not already been deleted.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("Transaction not found")]
    NotFound,

    /// No route matches the requested path.
    #[error("Route not found")]
    RouteNotFound,

    /// A field of the transaction form failed validation.
    ///
    /// These errors are resolved before any request reaches the store.
    #[error("{}", .0.message())]
    ValidationError(ValidationField),

    /// The database connection string is missing, or the database could not
    /// be opened.
    #[error("could not connect to the database: {0}")]
    ConnectionError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::BadRequest(rejection.body_text())
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::BadRequest(_) | Error::ValidationError(_) => StatusCode::BAD_REQUEST,
            Error::NotFound | Error::RouteNotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let message = match self {
            Error::BadRequest(_)
            | Error::NotFound
            | Error::RouteNotFound
            | Error::ValidationError(_) => self.to_string(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                "An unexpected error occurred, check the server logs for more details.".to_owned()
            }
        };

        (status_code, Json(json!({ "error": message }))).into_response()
    }
}
