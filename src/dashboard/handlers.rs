//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - Route handlers for displaying and refreshing the dashboard
//! - HTML view functions for rendering the dashboard UI
//! - The state type used by the handlers

use std::sync::Arc;

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};

use crate::{
    AppState, Error,
    backend::AuthSession,
    dashboard::{
        aggregation::{Summary, balance, spending_patterns, summary},
        charts::{DashboardChart, charts_script, charts_view, spending_patterns_chart},
    },
    endpoints,
    html::{
        HeadElement, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, format_currency, link,
    },
    navigation::NavBar,
    transaction::TransactionStore,
};

/// The state needed for displaying the dashboard page.
#[derive(Clone)]
pub struct DashboardState {
    /// The cache the dashboard's derived views are computed from.
    pub store: Arc<TransactionStore>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }
}

/// Display a page with an overview of the user's finances.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(session): Extension<AuthSession>,
) -> Result<Response, Error> {
    let transactions = state.store.transactions_or_fetch(&session).await?;
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);

    if transactions.is_empty() {
        return Ok(dashboard_no_data_view(nav_bar, &session.email).into_response());
    }

    let current_balance = balance(&transactions);
    let totals = summary(&transactions);
    let patterns = spending_patterns(&transactions);

    let charts = [DashboardChart {
        id: "spending-patterns-chart",
        options: spending_patterns_chart(&patterns).to_string(),
    }];

    Ok(dashboard_view(nav_bar, &session.email, current_balance, totals, &charts).into_response())
}

/// Re-read both transaction partitions from the backend and send the client
/// back to the dashboard to render the fresh data.
pub async fn post_refresh(
    State(state): State<DashboardState>,
    Extension(session): Extension<AuthSession>,
) -> Response {
    if let Err(error) = state.store.fetch_all(&session).await {
        tracing::error!("Error refreshing transactions: {error}");
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

/// Renders the dashboard page when no transaction data exists.
fn dashboard_no_data_view(nav_bar: NavBar, email: &str) -> Markup {
    let nav_bar = nav_bar.into_html();
    let new_transaction_link = link(endpoints::NEW_TRANSACTION_VIEW, "add a transaction");

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold"
            {
                "Welcome, " (email) "!"
            }

            p
            {
                "Your balance and spending patterns will show up here once
                you " (new_transaction_link) "."
            }
        }
    );

    base("Dashboard", &[], &content)
}

/// Renders the main dashboard page with the balance card, summary table and
/// spending-patterns chart.
fn dashboard_view(
    nav_bar: NavBar,
    email: &str,
    current_balance: f64,
    totals: Summary,
    charts: &[DashboardChart],
) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (balance_card(email, current_balance))
            (summary_table(totals))
            (charts_view(charts))

            button
                hx-post=(endpoints::REFRESH)
                hx-indicator="#indicator"
                hx-target-error="#alert-container"
                tabindex="0"
                class="px-4 py-2 mb-8 bg-blue-500 dark:bg-blue-600
                    hover:bg-blue-600 hover:dark:bg-blue-700 text-white rounded"
            {
                "Refresh"
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(charts),
    ];

    base("Dashboard", &scripts, &content)
}

/// Renders the greeting and current balance, green when the user is in
/// credit and red otherwise.
fn balance_card(email: &str, current_balance: f64) -> Markup {
    let balance_style = if current_balance >= 0.0 {
        "text-3xl font-bold text-green-600 dark:text-green-400"
    } else {
        "text-3xl font-bold text-red-600 dark:text-red-400"
    };

    html!(
        section
            id="balance"
            class="w-full mx-auto mb-8 bg-white dark:bg-gray-800 border
                border-gray-200 dark:border-gray-700 rounded-lg p-4 shadow-md"
        {
            h2 class="text-xl font-semibold mb-2"
            {
                "Welcome, " (email) "!"
            }

            p class="text-sm text-gray-600 dark:text-gray-400"
            {
                "Current balance"
            }

            div class=(balance_style)
            {
                (format_currency(current_balance))
            }
        }
    )
}

/// Renders income and expense totals side by side with their difference.
fn summary_table(totals: Summary) -> Markup {
    html!(
        section
            id="summary"
            class="w-full mx-auto mb-4 overflow-x-auto rounded-lg shadow-md"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Total Income" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Total Expenses" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Net Balance" }
                    }
                }

                tbody
                {
                    tr class=(TABLE_ROW_STYLE)
                    {
                        td class=(TABLE_CELL_STYLE) { (format_currency(totals.total_income)) }
                        td class=(TABLE_CELL_STYLE) { (format_currency(totals.total_expenses)) }
                        td class=(TABLE_CELL_STYLE) { (format_currency(totals.net_balance)) }
                    }
                }
            }
        }
    )
}

#[cfg(test)]
mod get_dashboard_page_tests {
    use std::sync::Arc;

    use axum::{Extension, extract::State, http::StatusCode};
    use scraper::{Html, Selector};

    use crate::{
        backend::{IdentityProvider, memory::MemoryBackend},
        test_utils::{assert_valid_html, parse_html_document},
        transaction::{TransactionKind, TransactionStore},
    };

    use super::{DashboardState, get_dashboard_page};

    fn get_test_state(backend: Arc<MemoryBackend>) -> DashboardState {
        DashboardState {
            store: Arc::new(TransactionStore::new(backend)),
        }
    }

    #[tokio::test]
    async fn dashboard_page_shows_balance_and_chart() {
        let backend = Arc::new(MemoryBackend::new());
        let session = backend.test_session();
        backend.seed(&session, TransactionKind::Income, 1000.0, "Salary");
        backend.seed(&session, TransactionKind::Expense, 200.0, "Food");
        backend.seed(&session, TransactionKind::Expense, 50.0, "Food");
        let state = get_test_state(backend);
        state.store.fetch_all(&session).await.unwrap();

        let response = get_dashboard_page(State(state), Extension(session))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        assert_text_contains(&html, "#balance", "Welcome, test@example.com!");
        assert_text_contains(&html, "#balance", "$750.00");
        assert_chart_exists(&html, "spending-patterns-chart");
    }

    #[tokio::test]
    async fn dashboard_page_shows_summary_totals() {
        let backend = Arc::new(MemoryBackend::new());
        let session = backend.test_session();
        backend.seed(&session, TransactionKind::Income, 1000.0, "Salary");
        backend.seed(&session, TransactionKind::Expense, 250.0, "Food");
        let state = get_test_state(backend);
        state.store.fetch_all(&session).await.unwrap();

        let response = get_dashboard_page(State(state), Extension(session))
            .await
            .unwrap();

        let html = parse_html_document(response).await;

        assert_text_contains(&html, "#summary", "$1,000.00");
        assert_text_contains(&html, "#summary", "$250.00");
        assert_text_contains(&html, "#summary", "$750.00");
    }

    #[tokio::test]
    async fn displays_prompt_text_on_no_data() {
        let backend = Arc::new(MemoryBackend::new());
        let session = backend.test_session();
        let state = get_test_state(backend);

        let response = get_dashboard_page(State(state), Extension(session))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let link_selector =
            Selector::parse(&format!("a[href='{}']", crate::endpoints::NEW_TRANSACTION_VIEW))
                .unwrap();
        assert!(
            html.select(&link_selector).next().is_some(),
            "no-data view should link to the new transaction page"
        );
    }

    #[tokio::test]
    async fn dashboard_never_shows_another_users_data() {
        let backend = Arc::new(MemoryBackend::new());
        let alice = backend.test_session();
        backend.seed(&alice, TransactionKind::Income, 1000.0, "Salary");
        let bob = backend
            .create_account("bob@example.com", "hunter2")
            .await
            .unwrap();
        let state = get_test_state(backend);
        state.store.fetch_all(&alice).await.unwrap();

        let response = get_dashboard_page(State(state), Extension(bob))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(
            text.contains("Welcome, bob@example.com!"),
            "want Bob's greeting, got \"{text}\""
        );
        assert!(
            !text.contains("$1,000.00"),
            "Bob's dashboard must not show Alice's balance, got \"{text}\""
        );
    }

    #[track_caller]
    fn assert_chart_exists(html: &Html, chart_id: &str) {
        let selector = Selector::parse(&format!("#{}", chart_id)).unwrap();
        assert!(
            html.select(&selector).next().is_some(),
            "Chart with id '{}' not found",
            chart_id
        );
    }

    #[track_caller]
    fn assert_text_contains(html: &Html, selector_string: &str, want: &str) {
        let selector = Selector::parse(selector_string).unwrap();
        let text = html
            .select(&selector)
            .map(|node| node.text().collect::<String>())
            .collect::<Vec<_>>()
            .join(" ");
        assert!(
            text.contains(want),
            "want {selector_string} to contain \"{want}\", got \"{text}\""
        );
    }
}
