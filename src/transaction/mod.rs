//! Transactions: the domain model, the cached store and the pages and
//! endpoints for listing, creating and deleting transactions.

mod create_endpoint;
mod delete_endpoint;
mod model;
mod store;
mod transactions_page;

pub use create_endpoint::{create_transaction_endpoint, get_new_transaction_page};
pub use delete_endpoint::delete_transaction_endpoint;
pub use model::{Transaction, TransactionKind, TransactionRecord};
pub use store::TransactionStore;
pub use transactions_page::get_transactions_page;
