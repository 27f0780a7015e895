//! Defines the page and endpoint for creating a new transaction.

use std::sync::Arc;

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error,
    backend::AuthSession,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE,
        FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, base,
        dollar_input_styles, loading_spinner,
    },
    navigation::NavBar,
    transaction::{TransactionKind, TransactionStore},
};

fn kind_radio(kind: TransactionKind, checked: bool) -> Markup {
    let id = format!("kind-{kind}");

    html! {
        div class="flex items-center gap-2"
        {
            input
                type="radio"
                name="kind"
                id=(id)
                value=(kind)
                checked[checked]
                class=(FORM_RADIO_INPUT_STYLE);

            label for=(id) class=(FORM_RADIO_LABEL_STYLE)
            {
                (kind.capitalized())
            }
        }
    }
}

fn new_transaction_view(
    kind: TransactionKind,
    amount: &str,
    description: &str,
    amount_error_message: Option<&str>,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html();
    let spinner = loading_spinner();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::TRANSACTIONS_API)
                hx-indicator="#indicator"
                hx-target-error="#alert-container"
                class="w-full max-w-md space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "New Transaction" }

                div
                {
                    span class=(FORM_LABEL_STYLE) { "Type" }

                    div class=(FORM_RADIO_GROUP_STYLE)
                    {
                        (kind_radio(TransactionKind::Income, kind == TransactionKind::Income))
                        (kind_radio(TransactionKind::Expense, kind == TransactionKind::Expense))
                    }
                }

                div
                {
                    label
                        for="amount"
                        class=(FORM_LABEL_STYLE)
                    {
                        "Amount"
                    }

                    // w-full needed to ensure input takes the full width when prefilled with a value
                    div class="input-wrapper w-full"
                    {
                        input
                            name="amount"
                            id="amount"
                            type="number"
                            step="0.01"
                            min="0.01"
                            placeholder="0.00"
                            required
                            autofocus
                            value=(amount)
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    @if let Some(error_message) = amount_error_message
                    {
                        p class="text-red-500 text-base" { (error_message) }
                    }
                }

                div
                {
                    label
                        for="description"
                        class=(FORM_LABEL_STYLE)
                    {
                        "Description"
                    }

                    input
                        name="description"
                        id="description"
                        type="text"
                        placeholder="Description"
                        value=(description)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span
                        id="indicator"
                        class="inline htmx-indicator"
                    {
                        (spinner)
                    }
                    " Create Transaction"
                }
            }
        }
    };

    base("Create Transaction", &[dollar_input_styles()], &content)
}

/// Renders the page for creating a transaction.
pub async fn get_new_transaction_page() -> Response {
    new_transaction_view(TransactionKind::Expense, "", "", None).into_response()
}

/// The state needed to create a transaction.
#[derive(Clone)]
pub struct CreateTransactionState {
    /// The cache the new transaction is written through.
    pub store: Arc<TransactionStore>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }
}

/// The form data for creating a transaction.
///
/// The amount arrives as raw text so that the server applies the same
/// validation whether or not the browser enforced the number input.
#[derive(Debug, Deserialize)]
pub struct NewTransactionForm {
    /// Whether the transaction is an income or an expense.
    pub kind: TransactionKind,
    /// The value of the transaction in dollars.
    pub amount: String,
    /// Text detailing the transaction.
    #[serde(default)]
    pub description: String,
}

/// A route handler for creating a new transaction, redirects to the
/// transactions view on success.
///
/// An invalid amount re-renders the form with an inline error and performs
/// no backend write.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Extension(session): Extension<AuthSession>,
    Form(form): Form<NewTransactionForm>,
) -> Response {
    match state
        .store
        .add(&session, form.kind, &form.amount, &form.description)
        .await
    {
        Ok(()) => (
            HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::InvalidAmount) => new_transaction_view(
            form.kind,
            &form.amount,
            &form.description,
            Some("Please enter a valid amount"),
        )
        .into_response(),
        Err(error) => {
            tracing::error!("Error creating transaction: {error}");
            error.into_alert_response()
        }
    }
}
