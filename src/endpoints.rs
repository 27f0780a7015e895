//! The API endpoints URIs.

use crate::transaction::TransactionKind;

/// The root route which redirects to the dashboard or log in page.
pub const ROOT: &str = "/";
/// The landing page for logged in users.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for displaying a user's transactions.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page for creating a new transaction.
pub const NEW_TRANSACTION_VIEW: &str = "/transactions/new";
/// The route for getting the registration page.
pub const REGISTER_VIEW: &str = "/register";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to request a cup of coffee (experimental).
pub const COFFEE: &str = "/api/coffee";
/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to create user accounts.
pub const USERS: &str = "/api/users";
/// The route to create transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to delete a single transaction within a kind partition.
pub const DELETE_TRANSACTION: &str = "/api/transactions/{kind}/{transaction_id}";
/// The route to re-fetch all transactions from the hosted database.
pub const REFRESH: &str = "/api/refresh";

/// The concrete URI for deleting the transaction `id` from the `kind`
/// partition.
///
/// Ids are only unique within their partition, so the kind is part of the
/// path.
pub fn delete_transaction_uri(kind: TransactionKind, id: &str) -> String {
    format!("/api/transactions/{kind}/{id}")
}
