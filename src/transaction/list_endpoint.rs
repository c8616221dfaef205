//! Defines the endpoint for listing every transaction.

use axum::{Json, extract::State};

use crate::{
    Error,
    transaction::{Transaction, TransactionStore},
};

/// A route handler for listing all transactions, newest first.
pub async fn list_transactions_endpoint(
    State(store): State<TransactionStore>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let transactions = store
        .list_all()
        .inspect_err(|error| tracing::error!("Could not list transactions: {error}"))?
        .into_iter()
        .map(Transaction::from)
        .collect();

    Ok(Json(transactions))
}

#[cfg(test)]
mod tests {
    use axum::{Json, extract::State};
    use time::macros::date;

    use crate::transaction::{
        NewTransaction, TransactionStore, TransactionType,
        list_endpoint::list_transactions_endpoint,
    };

    #[tokio::test]
    async fn lists_newest_first() {
        let store = TransactionStore::new(Some(":memory:")).unwrap();
        for (day, description) in [(3, "Third"), (1, "First"), (2, "Second")] {
            store
                .create(NewTransaction {
                    amount: 10.0,
                    date: date!(2024 - 03 - 01).replace_day(day).unwrap(),
                    description: description.to_owned(),
                    kind: TransactionType::Income,
                    category: None,
                })
                .unwrap();
        }

        let Json(transactions) = list_transactions_endpoint(State(store)).await.unwrap();

        let descriptions: Vec<&str> = transactions
            .iter()
            .map(|transaction| transaction.description.as_str())
            .collect();
        assert_eq!(descriptions, vec!["Third", "Second", "First"]);
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let store = TransactionStore::new(Some(":memory:")).unwrap();

        let Json(transactions) = list_transactions_endpoint(State(store)).await.unwrap();

        assert!(transactions.is_empty());
    }
}
