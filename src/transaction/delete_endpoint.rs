//! Defines the endpoint for deleting a transaction.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    transaction::{TransactionStore, id_param::TransactionIdParam},
};

/// The response body for a successful delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteAcknowledgement {
    /// A human readable confirmation.
    pub message: String,
}

/// A route handler for deleting a transaction, responds with an acknowledgement.
pub async fn delete_transaction_endpoint(
    State(store): State<TransactionStore>,
    TransactionIdParam(transaction_id): TransactionIdParam,
) -> Result<Json<DeleteAcknowledgement>, Error> {
    store.delete_by_id(&transaction_id).inspect_err(|error| {
        tracing::error!("Could not delete transaction {transaction_id}: {error}")
    })?;

    Ok(Json(DeleteAcknowledgement {
        message: "Transaction deleted".to_owned(),
    }))
}
