//! Implements a struct that holds the state of the web server.

use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{
    auth::DEFAULT_COOKIE_DURATION,
    backend::{IdentityProvider, TransactionDatabase},
    transaction::TransactionStore,
};

/// The state of the web server.
#[derive(Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,

    /// The identity provider that accounts are created and verified against.
    pub auth: Arc<dyn IdentityProvider>,

    /// The hosted database that holds user profiles and transactions.
    pub database: Arc<dyn TransactionDatabase>,

    /// The cached view of the signed-in user's transactions.
    pub store: Arc<TransactionStore>,
}

impl AppState {
    /// Create a new [AppState] backed by the given identity provider and
    /// database.
    pub fn new(
        cookie_secret: &str,
        auth: Arc<dyn IdentityProvider>,
        database: Arc<dyn TransactionDatabase>,
    ) -> Self {
        let store = Arc::new(TransactionStore::new(database.clone()));

        Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            auth,
            database,
            store,
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a signing key for cookies from a `secret`s string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}
