//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The public `Transaction` model and the internal `StoredTransaction` record
//! - The `TransactionStore` gateway for persisting transactions
//! - Validation of transaction form input
//! - The JSON route handlers for creating, listing, updating and deleting transactions

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod form;
mod id_param;
mod list_endpoint;
mod store;

pub use self::core::{
    KNOWN_CATEGORIES, NewTransaction, StoredTransaction, Transaction, TransactionPatch,
    TransactionType, UNCATEGORIZED_LABEL, create_transaction_table,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::{DeleteAcknowledgement, delete_transaction_endpoint};
pub use edit_endpoint::update_transaction_endpoint;
pub use form::{MAX_DESCRIPTION_LENGTH, TransactionForm, ValidationField};
pub use id_param::TransactionIdParam;
pub use list_endpoint::list_transactions_endpoint;
pub use store::TransactionStore;
