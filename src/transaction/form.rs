//! Validation of transaction form input.
//!
//! The form accepts raw strings as typed by the user and turns them into a
//! [NewTransaction] with a signed amount. It never touches the store.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::Date;
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    Error,
    transaction::{
        NewTransaction, Transaction, TransactionType,
        core::DATE_FORMAT,
    },
};

/// The maximum number of characters in a transaction description.
pub const MAX_DESCRIPTION_LENGTH: usize = 100;

/// The form field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationField {
    /// The amount is missing, not a number, or zero.
    Amount,
    /// The date is missing or not a valid date.
    Date,
    /// The description is empty or too long.
    Description,
    /// The type is neither income nor expense.
    Type,
}

impl ValidationField {
    /// A message explaining how to fix the field.
    pub fn message(&self) -> &'static str {
        match self {
            ValidationField::Amount => "Amount must be a valid non-zero number",
            ValidationField::Date => "Date is required",
            ValidationField::Description => {
                "Description is required and must be at most 100 characters"
            }
            ValidationField::Type => "Please select a transaction type",
        }
    }
}

impl Display for ValidationField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ValidationField::Amount => "amount",
            ValidationField::Date => "date",
            ValidationField::Description => "description",
            ValidationField::Type => "type",
        };

        write!(f, "{name}")
    }
}

/// Raw form data for creating or editing a transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionForm {
    /// The unsigned amount, e.g. "12.50".
    #[serde(default)]
    pub amount: String,
    /// The date as "YYYY-MM-DD".
    #[serde(default)]
    pub date: String,
    /// What the transaction was for.
    #[serde(default)]
    pub description: String,
    /// Either "income" or "expense".
    #[serde(default, rename = "type")]
    pub kind: String,
    /// An optional category.
    #[serde(default)]
    pub category: Option<String>,
}

impl TransactionForm {
    /// Pre-fill a form with the fields of an existing transaction.
    pub fn from_transaction(transaction: &Transaction) -> Self {
        Self {
            amount: transaction.amount.abs().to_string(),
            date: transaction.date.to_string(),
            description: transaction.description.clone(),
            kind: transaction.kind.to_string(),
            category: transaction.category.clone(),
        }
    }

    /// Validate the form and produce a transaction ready to be sent to the store.
    ///
    /// Expenses get a negative amount and income a positive one.
    ///
    /// # Errors
    /// Returns an [Error::ValidationError] naming the first field that failed,
    /// checked in the order amount, date, description, type.
    pub fn validate(&self) -> Result<NewTransaction, Error> {
        let amount = parse_amount(&self.amount)?;
        let date = parse_date(&self.date)?;
        let description = check_description(&self.description)?;
        let kind: TransactionType = self.kind.parse()?;
        let category = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|category| !category.is_empty())
            .map(str::to_owned);

        Ok(NewTransaction {
            amount: kind.signed_amount(amount),
            date,
            description,
            kind,
            category,
        })
    }
}

fn parse_amount(text: &str) -> Result<f64, Error> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount != 0.0)
        .ok_or(Error::ValidationError(ValidationField::Amount))
}

fn parse_date(text: &str) -> Result<Date, Error> {
    Date::parse(text.trim(), DATE_FORMAT).map_err(|_| Error::ValidationError(ValidationField::Date))
}

fn check_description(text: &str) -> Result<String, Error> {
    let description = text.trim();
    let length = description.graphemes(true).count();

    if (1..=MAX_DESCRIPTION_LENGTH).contains(&length) {
        Ok(description.to_owned())
    } else {
        Err(Error::ValidationError(ValidationField::Description))
    }
}
