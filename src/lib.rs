//! CoinTrack is a web app for tracking your income, expenses and spending
//! habits.
//!
//! The app serves HTML pages directly. Persistence and user identity are
//! delegated to a hosted realtime database and identity provider, reached
//! over REST; this crate keeps the session state, an in-memory transaction
//! cache and the aggregation logic that derives balances and spending
//! patterns from it.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod backend;
mod dashboard;
mod endpoints;
mod html;
mod internal_server_error;
mod navigation;
mod not_found;
mod routing;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use backend::{
    AuthSession, BackendError, FirebaseAuth, FirebaseDatabase, IdentityProvider,
    TransactionDatabase, UserProfile,
};
pub use routing::build_router;
pub use transaction::{Transaction, TransactionKind, TransactionStore};

use crate::{alert::Alert, internal_server_error::InternalServerError};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The amount entered for a new transaction is missing, not a number, or
    /// not greater than zero.
    #[error("Please enter a valid amount")]
    InvalidAmount,

    /// The session cookie is missing, expired or could not be decoded.
    ///
    /// The client should be redirected to the log-in page.
    #[error("the session is missing or has expired")]
    SessionExpired,

    /// A read from the hosted database failed.
    ///
    /// The cause should be logged on the server; clients only see a generic
    /// failure message. The local cache is left unchanged.
    #[error("could not read from the backend: {0}")]
    ReadFailed(String),

    /// A write to the hosted database failed.
    ///
    /// The cause should be logged on the server; clients only see a generic
    /// failure message. No partial local update is applied.
    #[error("could not write to the backend: {0}")]
    WriteFailed(String),

    /// Could not acquire the lock on the transaction cache.
    #[error("could not acquire the transaction cache lock")]
    CacheLockError,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::SessionExpired => {
                axum::response::Redirect::to(endpoints::LOG_IN_VIEW).into_response()
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub(crate) fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::InvalidAmount => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid amount".to_owned(),
                    details: "Please enter a valid amount".to_owned(),
                },
            ),
            Error::WriteFailed(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Could not save your changes".to_owned(),
                    details: "The backend rejected the request. Try again later.".to_owned(),
                },
            ),
            Error::ReadFailed(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Could not load your transactions".to_owned(),
                    details: "The backend could not be reached. Try again later.".to_owned(),
                },
            ),
            error => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details: error.to_string(),
                },
            ),
        };

        (status_code, alert.into_markup()).into_response()
    }
}
