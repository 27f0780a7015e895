//! Defines the endpoint for deleting a transaction from its kind partition.

use std::sync::Arc;

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    AppState,
    backend::AuthSession,
    transaction::{TransactionKind, TransactionStore},
};

/// The state needed to delete a transaction.
#[derive(Clone)]
pub struct DeleteTransactionState {
    /// The cache the delete is written through.
    pub store: Arc<TransactionStore>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }
}

/// The path parameters addressing a single transaction.
///
/// Ids are only unique within a kind partition, so the kind is part of the
/// path.
#[derive(Debug, Deserialize)]
pub struct DeleteTransactionPath {
    /// The partition the transaction lives in.
    pub kind: TransactionKind,
    /// The transaction's id within its partition.
    pub transaction_id: String,
}

/// A route handler for deleting a transaction.
///
/// Deleting an id that no longer exists succeeds; the row is gone either
/// way.
// The status code has to be 200 OK or HTMX will not delete the table row.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    Extension(session): Extension<AuthSession>,
    Path(path): Path<DeleteTransactionPath>,
) -> Response {
    match state
        .store
        .delete(&session, path.kind, &path.transaction_id)
        .await
    {
        Ok(()) => StatusCode::OK.into_response(),
        Err(error) => {
            tracing::error!(
                "Could not delete transaction {}/{}: {error}",
                path.kind,
                path.transaction_id
            );
            error.into_alert_response()
        }
    }
}
