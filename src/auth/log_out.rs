//! Log-out route handler that invalidates the session cookie and redirects users.

use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};

use crate::{
    AppState,
    auth::{get_session_from_cookies, invalidate_session_cookie},
    backend::IdentityProvider,
    endpoints,
    transaction::TransactionStore,
};

/// The state needed to log out.
#[derive(Clone)]
pub struct LogOutState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The identity provider the session is signed out from.
    pub auth: Arc<dyn IdentityProvider>,
    /// The transaction cache, emptied at log-out.
    pub store: Arc<TransactionStore>,
}

impl FromRef<AppState> for LogOutState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            auth: state.auth.clone(),
            store: state.store.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LogOutState> for Key {
    fn from_ref(state: &LogOutState) -> Self {
        state.cookie_key.clone()
    }
}

/// Sign out from the identity provider, empty the transaction cache,
/// invalidate the session cookie and redirect the client to the log-in page.
///
/// The client is logged out locally even if the provider cannot be reached;
/// the id token expires on its own.
pub async fn get_log_out(State(state): State<LogOutState>, jar: PrivateCookieJar) -> Response {
    if let Ok(session) = get_session_from_cookies(&jar) {
        if let Err(error) = state.auth.sign_out(&session).await {
            tracing::error!("Error signing out from the identity provider: {error}");
        }

        state.store.clear(&session.user_id);
    }

    let jar = invalidate_session_cookie(jar);

    (jar, Redirect::to(endpoints::LOG_IN_VIEW)).into_response()
}
