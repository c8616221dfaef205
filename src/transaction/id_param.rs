//! Extracts the transaction identifier from a request path.

use std::collections::HashMap;

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::Error;

/// The name of the route parameter holding a transaction identifier.
pub const TRANSACTION_ID_PARAM: &str = "transaction_id";

/// The identifier of the transaction a request targets.
///
/// Resolved from the `transaction_id` route parameter when the route declares
/// one, otherwise from the last non-empty segment of the request path.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionIdParam(pub String);

impl<S> FromRequestParts<S> for TransactionIdParam
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let named = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .ok()
            .and_then(|Path(mut params)| params.remove(TRANSACTION_ID_PARAM));

        let id = named.or_else(|| last_path_segment(parts.uri.path()));

        match id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Ok(Self(id.to_owned())),
            _ => Err(Error::BadRequest("Transaction ID is required".to_owned())),
        }
    }
}

fn last_path_segment(path: &str) -> Option<String> {
    path.rsplit('/')
        .find(|segment| !segment.is_empty())
        .map(str::to_owned)
}
