//! The boundary to the hosted backend services.
//!
//! The app stores nothing locally: user identity is delegated to a hosted
//! identity provider and transaction records to a hosted realtime database.
//! Both collaborators are modelled as explicit request/response traits so
//! the suspension point sits at the trait call, and so the rest of the app
//! can be tested against in-memory implementations.

mod firebase;

#[cfg(test)]
pub(crate) mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

pub use firebase::{FirebaseAuth, FirebaseDatabase};

use crate::transaction::{TransactionKind, TransactionRecord};

/// The errors that may occur while talking to the hosted backend.
///
/// No retries are performed anywhere: every failure is terminal for the
/// action that triggered it and requires the user to try again.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum BackendError {
    /// The backend understood the request and refused it, e.g. a duplicate
    /// email at sign-up or invalid credentials at log-in.
    ///
    /// The message comes from the backend and is safe to show to the user
    /// where the caller chooses to do so.
    #[error("{0}")]
    Rejected(String),

    /// The request never completed, e.g. a network failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend replied with something the client could not decode.
    #[error("invalid response from backend: {0}")]
    InvalidResponse(String),
}

/// An authenticated session issued by the identity provider.
///
/// The session is held client-side in an encrypted cookie; the `id_token`
/// authorises database requests on behalf of the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    /// The identity provider's id for the user. Database records for the
    /// user live under this id.
    pub user_id: String,
    /// The email the user signed up with.
    pub email: String,
    /// The bearer token that authorises database reads and writes.
    pub id_token: String,
}

/// The profile record written once at sign-up, stored at `users/{user_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// The email the account was created with.
    pub email: String,
    /// When the account was created.
    #[serde(rename = "dateCreated", with = "time::serde::rfc3339")]
    pub date_created: OffsetDateTime,
}

/// The hosted identity provider.
///
/// Exposes exactly the operations the app consumes: account creation,
/// credential verification and sign-out.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account for `email` and return a session for it.
    ///
    /// # Errors
    ///
    /// Returns [BackendError::Rejected] with the provider's message if the
    /// account cannot be created, e.g. the email is already registered or
    /// the password is too weak.
    async fn create_account(&self, email: &str, password: &str)
    -> Result<AuthSession, BackendError>;

    /// Verify `email` and `password` and return a session on success.
    ///
    /// # Errors
    ///
    /// Returns [BackendError::Rejected] if the credentials are wrong.
    /// Callers must not show the provider's reason to the user.
    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, BackendError>;

    /// End `session` on the provider side.
    async fn sign_out(&self, session: &AuthSession) -> Result<(), BackendError>;
}

/// The hosted realtime database.
///
/// Records are stored in two partitions per user, one per transaction kind:
/// `users/{user_id}/incomes` and `users/{user_id}/expenses`. Ids are
/// generated by the database and are only unique within their partition.
#[async_trait]
pub trait TransactionDatabase: Send + Sync {
    /// Write the profile record for the session's user.
    async fn write_profile(
        &self,
        session: &AuthSession,
        profile: &UserProfile,
    ) -> Result<(), BackendError>;

    /// Read the full `kind` partition for the session's user.
    ///
    /// A partition that does not exist (the user has no records of that
    /// kind) yields an empty list, not an error.
    async fn read_partition(
        &self,
        session: &AuthSession,
        kind: TransactionKind,
    ) -> Result<Vec<(String, TransactionRecord)>, BackendError>;

    /// Append `record` to the `kind` partition and return the generated id.
    async fn push(
        &self,
        session: &AuthSession,
        kind: TransactionKind,
        record: &TransactionRecord,
    ) -> Result<String, BackendError>;

    /// Delete the record at `id` within the `kind` partition.
    ///
    /// Deleting an id that does not exist is a no-op success on the backend
    /// and is not treated specially here.
    async fn delete(
        &self,
        session: &AuthSession,
        kind: TransactionKind,
        id: &str,
    ) -> Result<(), BackendError>;
}
