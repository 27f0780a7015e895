//! User authentication: the session cookie, the log-in, registration and
//! log-out routes, and the middleware that protects the rest of the app.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod register;

pub(crate) use cookie::{DEFAULT_COOKIE_DURATION, invalidate_session_cookie, set_session_cookie};
pub use log_in::{LoginState, get_log_in_page, post_log_in};
pub use log_out::{LogOutState, get_log_out};
pub use middleware::{AuthState, auth_guard, auth_guard_hx};
pub use register::{RegistrationState, get_register_page, register_user};

pub(crate) use cookie::get_session_from_cookies;

#[cfg(test)]
pub(crate) use cookie::COOKIE_SESSION;

#[cfg(test)]
pub(crate) use log_in::INVALID_CREDENTIALS_ERROR_MSG;
