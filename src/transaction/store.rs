//! The gateway to the transaction collection.
//!
//! [TransactionStore] is constructed explicitly from a connection string and
//! handed to whatever needs it. The underlying connection is opened lazily on
//! first use and shared by every clone of the store.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, params};

use crate::{
    Error,
    db::{initialize, open_connection},
    transaction::{
        NewTransaction, StoredTransaction, TransactionPatch,
        core::{TRANSACTION_COLUMNS, TransactionId, map_transaction_row},
    },
};

/// Creates, lists, updates and deletes transactions in the database.
#[derive(Debug, Clone)]
pub struct TransactionStore {
    connection_string: String,
    connection: Arc<Mutex<Option<Connection>>>,
}

impl TransactionStore {
    /// Create a store for the database named by `connection_string`.
    ///
    /// No connection is made until [TransactionStore::connect] or the first
    /// operation.
    ///
    /// # Errors
    /// Returns an [Error::ConnectionError] if the connection string is missing or blank.
    pub fn new(connection_string: Option<&str>) -> Result<Self, Error> {
        let connection_string = connection_string
            .map(str::trim)
            .filter(|connection_string| !connection_string.is_empty())
            .ok_or_else(|| {
                Error::ConnectionError("no database connection string was provided".to_owned())
            })?;

        Ok(Self {
            connection_string: connection_string.to_owned(),
            connection: Arc::new(Mutex::new(None)),
        })
    }

    /// Make sure the store is connected.
    ///
    /// Returns immediately if a connection already exists, otherwise opens
    /// the database and creates the tables.
    ///
    /// # Errors
    /// Returns an [Error::ConnectionError] if the database cannot be opened,
    /// or an [Error::DatabaseLockError] if the connection lock is poisoned.
    pub fn connect(&self) -> Result<(), Error> {
        self.with_connection(|_| Ok(()))
    }

    /// Whether a connection has been established.
    pub fn is_connected(&self) -> bool {
        self.connection
            .lock()
            .map(|connection| connection.is_some())
            .unwrap_or(false)
    }

    /// Insert a new transaction and return it with its generated identifier.
    ///
    /// The amount is given the sign that matches the transaction type.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::BadRequest] if the amount is zero,
    /// - or [Error::SqlError] if there is some other SQL error.
    pub fn create(&self, transaction: NewTransaction) -> Result<StoredTransaction, Error> {
        let transaction = transaction.normalized()?;

        self.with_connection(|connection| {
            let stored = connection
                .prepare(&format!(
                    "INSERT INTO \"transaction\" (amount, date, description, type, category)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     RETURNING {TRANSACTION_COLUMNS}"
                ))?
                .query_row(
                    params![
                        transaction.amount,
                        transaction.date,
                        transaction.description,
                        transaction.kind,
                        transaction.category,
                    ],
                    map_transaction_row,
                )?;

            tracing::debug!("Created transaction {}", stored.internal_id);

            Ok(stored)
        })
    }

    /// Get every transaction, newest first.
    ///
    /// Transactions on the same date are ordered by most recently created.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] if there is an SQL error.
    pub fn list_all(&self) -> Result<Vec<StoredTransaction>, Error> {
        self.with_connection(|connection| {
            let mut statement = connection.prepare(&format!(
                "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" ORDER BY date DESC, id DESC"
            ))?;

            let transactions = statement
                .query_map([], map_transaction_row)?
                .map(|row| row.map_err(Error::from))
                .collect();

            transactions
        })
    }

    /// Retrieve a transaction by its public identifier.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a stored transaction,
    /// - or [Error::SqlError] if there is some other SQL error.
    pub fn get_by_id(&self, id: &str) -> Result<StoredTransaction, Error> {
        let id = parse_id(id)?;

        self.with_connection(|connection| get_transaction(id, connection))
    }

    /// Replace the fields supplied in `patch` on the transaction `id`.
    ///
    /// The revision counter is incremented on every update.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a stored transaction,
    /// - [Error::BadRequest] if the resulting amount is zero,
    /// - or [Error::SqlError] if there is some other SQL error.
    pub fn update_by_id(
        &self,
        id: &str,
        patch: TransactionPatch,
    ) -> Result<StoredTransaction, Error> {
        let id = parse_id(id)?;

        self.with_connection(|connection| {
            let mut transaction = get_transaction(id, connection)?;
            transaction.apply_patch(patch)?;

            let updated = connection
                .prepare(&format!(
                    "UPDATE \"transaction\"
                    SET \
                        revision = revision + 1, \
                        amount = ?1, \
                        date = ?2, \
                        description = ?3, \
                        type = ?4, \
                        category = ?5 \
                    WHERE id = ?6
                    RETURNING {TRANSACTION_COLUMNS}"
                ))?
                .query_row(
                    params![
                        transaction.amount,
                        transaction.date,
                        transaction.description,
                        transaction.kind,
                        transaction.category,
                        id,
                    ],
                    map_transaction_row,
                )?;

            tracing::debug!(
                "Updated transaction {id} to revision {}",
                updated.revision
            );

            Ok(updated)
        })
    }

    /// Delete the transaction `id` and return what was deleted.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a stored transaction,
    /// - or [Error::SqlError] if there is some other SQL error.
    pub fn delete_by_id(&self, id: &str) -> Result<StoredTransaction, Error> {
        let id = parse_id(id)?;

        self.with_connection(|connection| {
            let deleted = connection
                .prepare(&format!(
                    "DELETE FROM \"transaction\" WHERE id = ?1 RETURNING {TRANSACTION_COLUMNS}"
                ))?
                .query_row([id], map_transaction_row)?;

            tracing::debug!("Deleted transaction {id}");

            Ok(deleted)
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<Connection>>, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }

    fn with_connection<T>(
        &self,
        operation: impl FnOnce(&Connection) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let mut guard = self.lock()?;

        if guard.is_none() {
            let connection = open_connection(&self.connection_string)?;
            initialize(&connection)?;
            tracing::info!("Connected to the transaction database");
            *guard = Some(connection);
        }

        match guard.as_ref() {
            Some(connection) => operation(connection),
            None => Err(Error::ConnectionError(
                "the database connection was not established".to_owned(),
            )),
        }
    }
}

/// Identifiers that are not valid keys cannot match any transaction.
fn parse_id(id: &str) -> Result<TransactionId, Error> {
    id.trim().parse().map_err(|_| Error::NotFound)
}

fn get_transaction(id: TransactionId, connection: &Connection) -> Result<StoredTransaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = :id"
        ))?
        .query_row(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}
