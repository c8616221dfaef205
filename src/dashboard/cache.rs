//! The dashboard's cached view of the transaction list.
//!
//! [DashboardController] keeps a local copy of the transactions and talks to
//! the transaction service through [TransactionApi]. Local changes are only
//! made after the service has confirmed them, so a failed call never leaves
//! the cache out of step with the server.

use crate::{
    Error,
    transaction::{
        NewTransaction, Transaction, TransactionForm, TransactionPatch, TransactionStore,
    },
};

/// The remote operations the dashboard needs from the transaction service.
pub trait TransactionApi {
    /// Fetch every transaction, newest first.
    fn list(&self) -> impl Future<Output = Result<Vec<Transaction>, Error>> + Send;

    /// Create a transaction and return it with its identifier.
    fn create(
        &self,
        transaction: NewTransaction,
    ) -> impl Future<Output = Result<Transaction, Error>> + Send;

    /// Replace the supplied fields of the transaction `id`.
    fn update(
        &self,
        id: &str,
        patch: TransactionPatch,
    ) -> impl Future<Output = Result<Transaction, Error>> + Send;

    /// Delete the transaction `id`.
    fn delete(&self, id: &str) -> impl Future<Output = Result<(), Error>> + Send;
}

impl TransactionApi for TransactionStore {
    async fn list(&self) -> Result<Vec<Transaction>, Error> {
        Ok(self
            .list_all()?
            .into_iter()
            .map(Transaction::from)
            .collect())
    }

    async fn create(&self, transaction: NewTransaction) -> Result<Transaction, Error> {
        TransactionStore::create(self, transaction).map(Transaction::from)
    }

    async fn update(&self, id: &str, patch: TransactionPatch) -> Result<Transaction, Error> {
        self.update_by_id(id, patch).map(Transaction::from)
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        self.delete_by_id(id).map(|_| ())
    }
}

/// A change to apply to the cached transaction list.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheCommand {
    /// Append a newly created transaction.
    Add(Transaction),
    /// Replace the transaction with the same id.
    Update(Transaction),
    /// Remove the transaction with this id.
    Delete(String),
}

/// Keeps the dashboard's transaction list in sync with the transaction service.
#[derive(Debug)]
pub struct DashboardController<A: TransactionApi> {
    api: A,
    transactions: Vec<Transaction>,
}

impl<A: TransactionApi> DashboardController<A> {
    /// Create a controller with an empty cache.
    pub fn new(api: A) -> Self {
        Self {
            api,
            transactions: Vec::new(),
        }
    }

    /// The cached transactions.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Replace the cache with a fresh copy of every transaction.
    ///
    /// # Errors
    /// Returns the error from the service. The cache is left unchanged.
    pub async fn load(&mut self) -> Result<(), Error> {
        let transactions = self
            .api
            .list()
            .await
            .inspect_err(|error| tracing::error!("Failed to load transactions: {error}"))?;

        self.transactions = transactions;

        Ok(())
    }

    /// Validate `form`, create the transaction and add it to the cache.
    ///
    /// # Errors
    /// Returns an [Error::ValidationError] without calling the service if the
    /// form is invalid, otherwise the error from the service.
    pub async fn add(&mut self, form: &TransactionForm) -> Result<Transaction, Error> {
        let new_transaction = form.validate()?;

        let created = self
            .api
            .create(new_transaction)
            .await
            .inspect_err(|error| tracing::error!("Failed to add transaction: {error}"))?;

        self.apply(CacheCommand::Add(created.clone()));

        Ok(created)
    }

    /// Validate `form`, update the transaction `id` and replace it in the cache.
    ///
    /// # Errors
    /// Returns an [Error::ValidationError] without calling the service if the
    /// form is invalid, otherwise the error from the service.
    pub async fn update(&mut self, id: &str, form: &TransactionForm) -> Result<Transaction, Error> {
        let patch = TransactionPatch::from(form.validate()?);

        let updated = self
            .api
            .update(id, patch)
            .await
            .inspect_err(|error| tracing::error!("Failed to update transaction {id}: {error}"))?;

        self.apply(CacheCommand::Update(updated.clone()));

        Ok(updated)
    }

    /// Delete the transaction `id` and remove it from the cache.
    ///
    /// # Errors
    /// Returns an [Error::BadRequest] without calling the service if `id` is
    /// blank, otherwise the error from the service.
    pub async fn delete(&mut self, id: &str) -> Result<(), Error> {
        if id.trim().is_empty() {
            return Err(Error::BadRequest("Transaction ID is required".to_owned()));
        }

        self.api
            .delete(id)
            .await
            .inspect_err(|error| tracing::error!("Failed to delete transaction {id}: {error}"))?;

        self.apply(CacheCommand::Delete(id.to_owned()));

        Ok(())
    }

    fn apply(&mut self, command: CacheCommand) {
        match command {
            CacheCommand::Add(transaction) => self.transactions.push(transaction),
            CacheCommand::Update(transaction) => {
                if let Some(cached) = self
                    .transactions
                    .iter_mut()
                    .find(|cached| cached.id == transaction.id)
                {
                    *cached = transaction;
                }
            }
            CacheCommand::Delete(id) => self.transactions.retain(|cached| cached.id != id),
        }
    }
}
