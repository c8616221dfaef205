//! Defines the endpoint for updating an existing transaction.

use axum::{Json, extract::State, extract::rejection::JsonRejection};

use crate::{
    Error,
    transaction::{Transaction, TransactionPatch, TransactionStore, id_param::TransactionIdParam},
};

/// A route handler for updating a transaction, responds with the updated transaction.
///
/// Only the fields present in the request body are replaced.
pub async fn update_transaction_endpoint(
    State(store): State<TransactionStore>,
    TransactionIdParam(transaction_id): TransactionIdParam,
    payload: Result<Json<TransactionPatch>, JsonRejection>,
) -> Result<Json<Transaction>, Error> {
    let Json(patch) = payload
        .inspect_err(|rejection| tracing::warn!("Rejected update payload: {rejection}"))?;

    let updated = store
        .update_by_id(&transaction_id, patch)
        .inspect_err(|error| {
            tracing::error!("Could not update transaction {transaction_id}: {error}")
        })?;

    Ok(Json(updated.into()))
}
