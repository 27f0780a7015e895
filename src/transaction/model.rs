//! The transaction domain model.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Whether a transaction adds to or subtracts from the balance.
///
/// The sign of a transaction is implied by its kind; amounts are always
/// stored as positive numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in.
    Income,
    /// Money going out.
    Expense,
}

impl TransactionKind {
    /// The name of the database partition that holds records of this kind.
    pub fn partition(self) -> &'static str {
        match self {
            TransactionKind::Income => "incomes",
            TransactionKind::Expense => "expenses",
        }
    }

    /// The capitalized kind name, used as the default description for
    /// transactions created without one.
    pub fn capitalized(self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Income => write!(f, "income"),
            TransactionKind::Expense => write!(f, "expense"),
        }
    }
}

/// The wire form of a transaction, as stored in the hosted database.
///
/// The kind and id are not part of the record: the kind is implied by the
/// partition the record lives in, and the id is the record's key within
/// that partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// The transaction amount. Always strictly positive.
    pub amount: f64,
    /// Free text describing the transaction. Doubles as the category key
    /// for expense aggregation.
    pub description: String,
    /// When the transaction was created. Assigned at creation, never
    /// user-editable.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// The id of the user that owns the record.
    #[serde(rename = "userId")]
    pub user_id: String,
}

/// A transaction as held in the in-memory cache: a [TransactionRecord]
/// tagged with the partition it was read from and its id within it.
///
/// Ids are only unique within a kind partition, so a transaction is
/// identified by the pair `(kind, id)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The record's key within its partition, assigned by the database.
    pub id: String,
    /// The partition the record was read from.
    pub kind: TransactionKind,
    /// The transaction amount. Always strictly positive.
    pub amount: f64,
    /// Free text describing the transaction.
    pub description: String,
    /// When the transaction was created.
    pub date: OffsetDateTime,
    /// The id of the user that owns the record.
    pub user_id: String,
}

impl Transaction {
    /// Tag a wire record with the partition and id it was read from.
    pub fn from_record(id: String, kind: TransactionKind, record: TransactionRecord) -> Self {
        Self {
            id,
            kind,
            amount: record.amount,
            description: record.description,
            date: record.date,
            user_id: record.user_id,
        }
    }
}
