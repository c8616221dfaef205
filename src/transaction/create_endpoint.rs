//! Defines the endpoint for creating a new transaction.

use axum::{Json, extract::State, extract::rejection::JsonRejection};

use crate::{
    Error,
    transaction::{NewTransaction, Transaction, TransactionStore},
};

/// A route handler for creating a new transaction, responds with the stored transaction.
pub async fn create_transaction_endpoint(
    State(store): State<TransactionStore>,
    payload: Result<Json<NewTransaction>, JsonRejection>,
) -> Result<Json<Transaction>, Error> {
    let Json(new_transaction) = payload
        .inspect_err(|rejection| tracing::warn!("Rejected create payload: {rejection}"))?;

    let stored = store
        .create(new_transaction)
        .inspect_err(|error| tracing::error!("Could not create transaction: {error}"))?;

    Ok(Json(stored.into()))
}
