//! Defines the core data models and table schema for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Deserializer, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Error, transaction::form::ValidationField};

/// The format used for transaction dates, e.g. "2024-01-31".
pub const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// The label used for expenses that have no category.
pub const UNCATEGORIZED_LABEL: &str = "Others";

/// Suggested categories offered when entering a transaction.
pub const KNOWN_CATEGORIES: [&str; 10] = [
    "Groceries",
    "Gas",
    "Utilities",
    "Entertainment",
    "Dining Out",
    "Shopping",
    "Transportation",
    "Healthcare",
    "Education",
    "Other",
];

/// The database key of a stored transaction.
pub type TransactionId = i64;

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned, stored with a positive amount.
    Income,
    /// Money spent, stored with a negative amount.
    Expense,
}

impl TransactionType {
    /// The lowercase name used in JSON and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// Give `amount` the sign that matches this type.
    ///
    /// Expenses are negative and income is positive, regardless of the sign
    /// of `amount`.
    pub fn signed_amount(&self, amount: f64) -> f64 {
        match self {
            TransactionType::Income => amount.abs(),
            TransactionType::Expense => -amount.abs(),
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(Error::ValidationError(ValidationField::Type)),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|_| FromSqlError::InvalidType)
    }
}

/// An expense or income as it is shown to API clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The public identifier assigned by the store.
    pub id: String,
    /// The amount of money, negative for expenses and positive for income.
    pub amount: f64,
    /// When the transaction happened.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: String,
    /// Whether the transaction is income or an expense.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// An optional free text category, e.g. "Groceries".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Transaction {
    /// The category to group this transaction under.
    ///
    /// Missing or blank categories are reported as [UNCATEGORIZED_LABEL].
    pub fn category_label(&self) -> &str {
        category_label(self.category.as_deref())
    }
}

pub(crate) fn category_label(category: Option<&str>) -> &str {
    match category {
        Some(category) if !category.trim().is_empty() => category,
        _ => UNCATEGORIZED_LABEL,
    }
}

/// The fields needed to create a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    /// The amount of money. The sign is derived from `kind` when stored.
    pub amount: f64,
    /// When the transaction happened.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: String,
    /// Whether the transaction is income or an expense.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// An optional free text category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl NewTransaction {
    /// Check the amount and give it the sign that matches the type.
    ///
    /// Blank categories are dropped.
    ///
    /// # Errors
    /// Returns an [Error::BadRequest] if the amount is zero or not finite.
    pub(crate) fn normalized(self) -> Result<Self, Error> {
        let amount = check_amount(self.amount)?;

        Ok(Self {
            amount: self.kind.signed_amount(amount),
            category: normalize_category(self.category),
            ..self
        })
    }
}

/// A set of fields to replace on a stored transaction.
///
/// Fields that are `None` are left untouched. For `category`, `Some(None)`
/// (JSON `null`) clears the category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionPatch {
    /// The new amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// The new date.
    #[serde(
        default,
        with = "iso_date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<Date>,
    /// The new description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The new type.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionType>,
    /// The new category, or `Some(None)` to clear it.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<Option<String>>,
}

impl From<NewTransaction> for TransactionPatch {
    fn from(transaction: NewTransaction) -> Self {
        Self {
            amount: Some(transaction.amount),
            date: Some(transaction.date),
            description: Some(transaction.description),
            kind: Some(transaction.kind),
            category: Some(transaction.category),
        }
    }
}

/// Distinguishes a field that is present but `null` from a missing field.
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// A transaction as it is persisted, including the internal bookkeeping fields.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredTransaction {
    /// The database key.
    pub internal_id: TransactionId,
    /// How many times the record has been updated.
    pub revision: i64,
    /// The signed amount.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: String,
    /// Whether the transaction is income or an expense.
    pub kind: TransactionType,
    /// An optional free text category.
    pub category: Option<String>,
}

impl StoredTransaction {
    /// Replace the fields supplied in `patch`, then re-derive the sign of the
    /// amount from the resulting type.
    ///
    /// # Errors
    /// Returns an [Error::BadRequest] if the resulting amount is zero or not finite.
    pub(crate) fn apply_patch(&mut self, patch: TransactionPatch) -> Result<(), Error> {
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(category) = patch.category {
            self.category = normalize_category(category);
        }

        self.amount = self.kind.signed_amount(check_amount(self.amount)?);

        Ok(())
    }
}

impl From<StoredTransaction> for Transaction {
    fn from(stored: StoredTransaction) -> Self {
        Self {
            id: stored.internal_id.to_string(),
            amount: stored.amount,
            date: stored.date,
            description: stored.description,
            kind: stored.kind,
            category: stored.category,
        }
    }
}

fn check_amount(amount: f64) -> Result<f64, Error> {
    if amount == 0.0 || !amount.is_finite() {
        Err(Error::BadRequest(
            "Amount must be a valid non-zero number".to_owned(),
        ))
    } else {
        Ok(amount)
    }
}

fn normalize_category(category: Option<String>) -> Option<String> {
    category
        .map(|category| category.trim().to_owned())
        .filter(|category| !category.is_empty())
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                revision INTEGER NOT NULL DEFAULT 0,
                amount REAL NOT NULL CHECK (amount != 0),
                date TEXT NOT NULL,
                description TEXT NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                category TEXT
                )",
        (),
    )?;

    // Used by the date-descending listing.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
        (),
    )?;

    Ok(())
}

/// The columns selected for a [StoredTransaction], in the order expected by
/// [map_transaction_row].
pub(crate) const TRANSACTION_COLUMNS: &str =
    "id, revision, amount, date, description, type, category";

/// Map a database row to a [StoredTransaction].
pub fn map_transaction_row(row: &Row) -> Result<StoredTransaction, rusqlite::Error> {
    let internal_id = row.get(0)?;
    let revision = row.get(1)?;
    let amount = row.get(2)?;
    let date = row.get(3)?;
    let description = row.get(4)?;
    let kind = row.get(5)?;
    let category = row.get(6)?;

    Ok(StoredTransaction {
        internal_id,
        revision,
        amount,
        date,
        description,
        kind,
        category,
    })
}

// ============================================================================
// TESTS
// ============================================================================
