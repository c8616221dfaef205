//! Implements a struct that holds the state of the REST server.

use axum::extract::FromRef;

use crate::{Error, transaction::TransactionStore};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The gateway to the transaction collection.
    pub transaction_store: TransactionStore,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl AppState {
    /// Create a new [AppState] around an explicitly constructed transaction store.
    ///
    /// The store is connected eagerly so that a bad connection string is
    /// reported at startup rather than on the first request.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns an [Error::ConnectionError] if the store cannot be connected.
    pub fn new(transaction_store: TransactionStore, local_timezone: &str) -> Result<Self, Error> {
        transaction_store.connect()?;

        Ok(Self {
            transaction_store,
            local_timezone: local_timezone.to_owned(),
        })
    }
}

impl FromRef<AppState> for TransactionStore {
    fn from_ref(state: &AppState) -> Self {
        state.transaction_store.clone()
    }
}
