//! Defines the route handler for the page that displays transactions as a table.
use std::sync::Arc;

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error,
    backend::AuthSession,
    dashboard::aggregation::filter_and_sort,
    endpoints,
    html::{
        BUTTON_DELETE_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency, link,
    },
    navigation::NavBar,
    transaction::{Transaction, TransactionKind, TransactionStore},
};

fn amount_class(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Income => "text-green-700 dark:text-green-300",
        TransactionKind::Expense => "text-red-700 dark:text-red-300",
    }
}

/// The amount as it appears in the table, signed by the transaction kind.
fn signed_amount(transaction: &Transaction) -> f64 {
    match transaction.kind {
        TransactionKind::Income => transaction.amount,
        TransactionKind::Expense => -transaction.amount,
    }
}

fn transactions_view(transactions: &[Transaction], search: &str) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl lg:mx-auto" id="transactions-content"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Transactions" }

                    a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                    {
                        "New Transaction"
                    }
                }

                input
                    type="search"
                    name="search"
                    id="search"
                    placeholder="Search descriptions..."
                    value=(search)
                    hx-get=(endpoints::TRANSACTIONS_VIEW)
                    hx-trigger="input changed delay:300ms, keyup[key=='Enter']"
                    hx-target="#transactions-table"
                    hx-select="#transactions-table"
                    hx-swap="outerHTML"
                    class=(FORM_TEXT_INPUT_STYLE);

                (transactions_table(transactions, search))
            }
        }
    };

    base("Transactions", &[], &content)
}

fn transactions_table(transactions: &[Transaction], search: &str) -> Markup {
    if transactions.is_empty() {
        return html! {
            div id="transactions-table" class="py-8 text-center"
            {
                @if search.is_empty() {
                    p
                    {
                        "Nothing here yet. "
                        (link(endpoints::NEW_TRANSACTION_VIEW, "Add your first transaction"))
                        "."
                    }
                } @else {
                    p { "No transactions match \"" (search) "\"." }
                }
            }
        };
    }

    html! {
        section
            id="transactions-table"
            class="rounded bg-gray-50 dark:bg-gray-800 overflow-x-auto shadow-md"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class={ "px-6 py-4 text-right" } { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @for transaction in transactions {
                        (transaction_row_view(transaction))
                    }
                }
            }
        }
    }
}

fn transaction_row_view(transaction: &Transaction) -> Markup {
    let amount_str = format_currency(signed_amount(transaction));
    let amount_class = amount_class(transaction.kind);
    let delete_url = endpoints::delete_transaction_uri(transaction.kind, &transaction.id);

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-row="true"
        {
            td class=(TABLE_CELL_STYLE)
            {
                time datetime=(transaction.date.date()) { (transaction.date.date()) }
            }
            td class=(TABLE_CELL_STYLE) { (transaction.description) }
            td class={ "px-6 py-4 text-right " (amount_class) } { (amount_str) }
            td class=(TABLE_CELL_STYLE)
            {
                button
                    hx-delete=(delete_url)
                    hx-confirm={
                        "Are you sure you want to delete the transaction '"
                        (transaction.description) "'? This cannot be undone."
                    }
                    hx-target="closest tr"
                    hx-target-error="#alert-container"
                    hx-swap="delete"
                    class=(BUTTON_DELETE_STYLE)
                {
                    "Delete"
                }
            }
        }
    }
}

/// The query string for the transactions page.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    /// Case-insensitive substring to match against descriptions.
    #[serde(default)]
    pub search: String,
}

/// The state needed for the transactions page.
#[derive(Clone)]
pub struct TransactionsViewState {
    /// The cache the table is rendered from.
    pub store: Arc<TransactionStore>,
}

impl FromRef<AppState> for TransactionsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }
}

/// Render the user's transactions as a searchable table, most recent first.
pub async fn get_transactions_page(
    State(state): State<TransactionsViewState>,
    Extension(session): Extension<AuthSession>,
    Query(query): Query<SearchQuery>,
) -> Result<Response, Error> {
    let transactions = state.store.transactions_or_fetch(&session).await?;
    let rows = filter_and_sort(&transactions, &query.search);

    Ok(transactions_view(&rows, &query.search).into_response())
}

#[cfg(test)]
mod transactions_page_tests {
    use std::sync::Arc;

    use axum::{
        Extension,
        extract::{Query, State},
        http::StatusCode,
    };
    use scraper::{Html, Selector};

    use crate::{
        backend::memory::MemoryBackend,
        endpoints,
        test_utils::{assert_valid_html, parse_html_document},
        transaction::{TransactionKind, TransactionStore},
    };

    use super::{SearchQuery, TransactionsViewState, get_transactions_page};

    async fn get_test_page(backend: Arc<MemoryBackend>, search: &str) -> Html {
        let session = backend.test_session();
        let state = TransactionsViewState {
            store: Arc::new(TransactionStore::new(backend)),
        };
        state.store.fetch_all(&session).await.unwrap();

        let response = get_transactions_page(
            State(state),
            Extension(session),
            Query(SearchQuery {
                search: search.to_owned(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        html
    }

    #[tokio::test]
    async fn lists_all_transactions_with_signed_amounts() {
        let backend = Arc::new(MemoryBackend::new());
        let session = backend.test_session();
        backend.seed(&session, TransactionKind::Income, 1000.0, "Salary");
        backend.seed(&session, TransactionKind::Expense, 250.0, "Food");

        let html = get_test_page(backend, "").await;

        let rows = select_rows(&html);
        assert_eq!(rows.len(), 2, "want 2 table rows, got {}", rows.len());

        let text = html.html();
        assert!(text.contains("$1,000.00"), "income amount should be shown");
        assert!(text.contains("-$250.00"), "expense amount should be negated");
    }

    #[tokio::test]
    async fn search_filters_rows_by_description() {
        let backend = Arc::new(MemoryBackend::new());
        let session = backend.test_session();
        backend.seed(&session, TransactionKind::Expense, 20.0, "Food");
        backend.seed(&session, TransactionKind::Expense, 30.0, "Foobar");
        backend.seed(&session, TransactionKind::Expense, 40.0, "Gas");

        let html = get_test_page(backend, "foo").await;

        let rows = select_rows(&html);
        assert_eq!(rows.len(), 2, "want 2 matching rows, got {}", rows.len());
        assert!(!html.html().contains("Gas"));
    }

    #[tokio::test]
    async fn rows_have_delete_buttons_with_partitioned_urls() {
        let backend = Arc::new(MemoryBackend::new());
        let session = backend.test_session();
        backend.seed_with_id(&session, TransactionKind::Expense, "-Nabc", 50.0, "Food");

        let html = get_test_page(backend, "").await;

        let button_selector = Selector::parse("button[hx-delete]").unwrap();
        let buttons: Vec<_> = html.select(&button_selector).collect();
        assert_eq!(buttons.len(), 1, "want 1 delete button, got {}", buttons.len());
        assert_eq!(
            buttons[0].value().attr("hx-delete"),
            Some("/api/transactions/expense/-Nabc")
        );
    }

    #[tokio::test]
    async fn empty_store_shows_prompt_with_create_link() {
        let backend = Arc::new(MemoryBackend::new());

        let html = get_test_page(backend, "").await;

        let link_selector =
            Selector::parse(&format!("a[href='{}']", endpoints::NEW_TRANSACTION_VIEW)).unwrap();
        let links: Vec<_> = html.select(&link_selector).collect();
        assert!(
            links.len() >= 2,
            "want header and empty-state links to the new transaction page"
        );
    }

    fn select_rows(html: &Html) -> Vec<scraper::ElementRef<'_>> {
        let row_selector = Selector::parse("tr[data-transaction-row]").unwrap();
        html.select(&row_selector).collect()
    }
}
