//! The client-side transaction cache and its mutation operations.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use time::OffsetDateTime;

use crate::{
    Error,
    backend::{AuthSession, TransactionDatabase},
    transaction::{Transaction, TransactionKind, TransactionRecord},
};

/// An in-memory cache of each signed-in user's transactions, backed by the
/// hosted database.
///
/// The cache is keyed by user id. Sessions only ever read and write their
/// own entry, so concurrent sessions for different users never see each
/// other's data.
///
/// Refresh policy (read-after-write): every mutation round-trips through
/// the database and then re-reads both partitions in full, replacing that
/// user's entry. This trades an extra round trip per mutation for the
/// guarantee that the entry equals the last successful fetch and never
/// diverges from confirmed backend state. There are no optimistic updates,
/// retries or background refreshes; when two mutations race, the last
/// completed fetch wins.
pub struct TransactionStore {
    database: Arc<dyn TransactionDatabase>,
    cache: Mutex<HashMap<String, Vec<Transaction>>>,
}

impl TransactionStore {
    /// Create an empty store backed by `database`.
    pub fn new(database: Arc<dyn TransactionDatabase>) -> Self {
        Self {
            database,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Read both partitions for the session's user and replace that user's
    /// cache entry with the merged, kind-tagged result.
    ///
    /// A partition the user has no records in contributes zero records.
    ///
    /// # Errors
    ///
    /// Returns [Error::ReadFailed] if either partition read fails; the
    /// cache is left unchanged.
    pub async fn fetch_all(&self, session: &AuthSession) -> Result<(), Error> {
        let mut transactions = Vec::new();

        for kind in [TransactionKind::Income, TransactionKind::Expense] {
            let records = self
                .database
                .read_partition(session, kind)
                .await
                .map_err(|error| Error::ReadFailed(error.to_string()))?;

            transactions.extend(
                records
                    .into_iter()
                    .map(|(id, record)| Transaction::from_record(id, kind, record)),
            );
        }

        let mut cache = self.cache.lock().map_err(|_| Error::CacheLockError)?;
        cache.insert(session.user_id.clone(), transactions);

        Ok(())
    }

    /// Validate the raw form input and append a new transaction to the
    /// `kind` partition, then refresh the session user's cache entry.
    ///
    /// The description is trimmed and falls back to the capitalized kind
    /// name when blank. The date and owner are assigned here, not taken
    /// from the client.
    ///
    /// # Errors
    ///
    /// - [Error::InvalidAmount] if `amount_text` is not a finite number
    ///   greater than zero. No backend write is made.
    /// - [Error::WriteFailed] if the append fails; the cache is left
    ///   unchanged.
    /// - [Error::ReadFailed] if the append succeeds but the refresh fails.
    pub async fn add(
        &self,
        session: &AuthSession,
        kind: TransactionKind,
        amount_text: &str,
        description: &str,
    ) -> Result<(), Error> {
        let amount = parse_amount(amount_text)?;

        let record = TransactionRecord {
            amount,
            description: default_description(kind, description),
            date: OffsetDateTime::now_utc(),
            user_id: session.user_id.clone(),
        };

        self.database
            .push(session, kind, &record)
            .await
            .map_err(|error| {
                tracing::error!("Error adding transaction: {error}");
                Error::WriteFailed(error.to_string())
            })?;

        self.fetch_all(session).await
    }

    /// Delete the record at `id` within the `kind` partition, then refresh
    /// the session user's cache entry.
    ///
    /// Records of the other kind that happen to share the same id value are
    /// unaffected. Deleting an id that does not exist is a no-op success.
    ///
    /// # Errors
    ///
    /// - [Error::WriteFailed] if the delete fails; the cache is left
    ///   unchanged.
    /// - [Error::ReadFailed] if the delete succeeds but the refresh fails.
    pub async fn delete(
        &self,
        session: &AuthSession,
        kind: TransactionKind,
        id: &str,
    ) -> Result<(), Error> {
        self.database
            .delete(session, kind, id)
            .await
            .map_err(|error| {
                tracing::error!("Error deleting transaction {kind}/{id}: {error}");
                Error::WriteFailed(error.to_string())
            })?;

        self.fetch_all(session).await
    }

    /// A snapshot of the cached transactions for `user_id`, in no
    /// particular order, or `None` if nothing has been fetched for that
    /// user since the server started.
    ///
    /// # Errors
    ///
    /// Returns [Error::CacheLockError] if the cache lock is poisoned.
    pub fn transactions(&self, user_id: &str) -> Result<Option<Vec<Transaction>>, Error> {
        let cache = self.cache.lock().map_err(|_| Error::CacheLockError)?;

        Ok(cache.get(user_id).cloned())
    }

    /// A snapshot of the session user's cached transactions, fetching them
    /// from the backend first when the cache has no entry for that user.
    ///
    /// The fetch-on-miss covers clients that return with a still-valid
    /// session cookie after a server restart.
    ///
    /// # Errors
    ///
    /// Returns [Error::ReadFailed] if the cache misses and the fetch fails,
    /// or [Error::CacheLockError] if the cache lock is poisoned.
    pub async fn transactions_or_fetch(
        &self,
        session: &AuthSession,
    ) -> Result<Vec<Transaction>, Error> {
        if let Some(transactions) = self.transactions(&session.user_id)? {
            return Ok(transactions);
        }

        self.fetch_all(session).await?;

        Ok(self.transactions(&session.user_id)?.unwrap_or_default())
    }

    /// Drop the cache entry for `user_id`. Called at log-out so no data
    /// outlives the session. Other users' entries are untouched.
    pub fn clear(&self, user_id: &str) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.remove(user_id);
        }
    }
}

/// Parse the raw amount entered in a form.
///
/// # Errors
///
/// Returns [Error::InvalidAmount] unless the text parses as a finite number
/// strictly greater than zero.
fn parse_amount(amount_text: &str) -> Result<f64, Error> {
    match amount_text.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount > 0.0 => Ok(amount),
        _ => Err(Error::InvalidAmount),
    }
}

fn default_description(kind: TransactionKind, description: &str) -> String {
    let trimmed = description.trim();

    if trimmed.is_empty() {
        kind.capitalized().to_owned()
    } else {
        trimmed.to_owned()
    }
}
