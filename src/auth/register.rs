//! The registration page for creating a new account with the identity provider.

use std::sync::Arc;

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    AppState,
    backend::{BackendError, IdentityProvider, TransactionDatabase, UserProfile},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, base, confirm_password_input, email_input, loading_spinner,
        log_in_register, password_input,
    },
    internal_server_error::get_internal_server_error_redirect,
};

/// The minimum number of characters the identity provider accepts for a
/// password. Checked client-side so most mistakes never leave the browser.
const PASSWORD_INPUT_MIN_LENGTH: u8 = 6;

fn registration_form(
    email: &str,
    email_error_message: Option<&str>,
    confirm_password_error_message: Option<&str>,
) -> Markup {
    html! {
        form
            hx-post=(endpoints::USERS)
            hx-indicator="#indicator"
            hx-disabled-elt="#email, #password, #confirm_password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            (email_input(email))

            @if let Some(error_message) = email_error_message
            {
                p class="text-red-500 text-base" { (error_message) }
            }

            (password_input("", PASSWORD_INPUT_MIN_LENGTH, None))
            (confirm_password_input(confirm_password_error_message))

            button
                type="submit" id="submit-button" tabindex="0"
                class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Sign up"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "

                a
                    href=(endpoints::LOG_IN_VIEW) tabindex="0"
                    class="font-semibold leading-6 text-blue-600 hover:text-blue-500 dark:text-blue-500 dark:hover:text-blue-400"
                {
                  "Log in here"
                }
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let registration_form = registration_form("", None, None);
    let content = log_in_register("Create an account", &registration_form);
    base("Register", &[], &content).into_response()
}

/// The state needed for creating a new user.
#[derive(Clone)]
pub struct RegistrationState {
    /// The identity provider that holds the new account.
    pub auth: Arc<dyn IdentityProvider>,
    /// The hosted database the user's profile is written to.
    pub database: Arc<dyn TransactionDatabase>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            auth: state.auth.clone(),
            database: state.database.clone(),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Handler for registration requests via the POST method.
///
/// The passwords are compared before the identity provider is contacted; a
/// mismatch never leaves the server. On success a profile record is written
/// for the new user and the client is redirected to the log-in page to sign
/// in with the new credentials.
pub async fn register_user(
    State(state): State<RegistrationState>,
    Form(user_data): Form<RegisterForm>,
) -> Response {
    if user_data.password != user_data.confirm_password {
        return registration_form(&user_data.email, None, Some("Passwords do not match"))
            .into_response();
    }

    let session = match state
        .auth
        .create_account(&user_data.email, &user_data.password)
        .await
    {
        Ok(session) => session,
        Err(BackendError::Rejected(message)) => {
            return registration_form(&user_data.email, Some(&message), None).into_response();
        }
        Err(error) => {
            tracing::error!("An unhandled error occurred while creating an account: {error}");

            return get_internal_server_error_redirect();
        }
    };

    let profile = UserProfile {
        email: session.email.clone(),
        date_created: OffsetDateTime::now_utc(),
    };

    // The account exists either way; a missing profile only loses the
    // sign-up date.
    if let Err(error) = state.database.write_profile(&session, &profile).await {
        tracing::error!("Error writing profile for new user: {error}");
    }

    (
        HxRedirect(endpoints::LOG_IN_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
