//! Pure functions that derive views from the cached transaction list.
//!
//! Everything here is deterministic and side-effect free: the balance, the
//! income/expense summary, the per-category spending totals and the
//! filtered transaction list are all recomputed in full from the cache
//! whenever it changes, never stored.

use crate::transaction::{Transaction, TransactionKind};

/// The grouping key used for expenses whose description is blank.
pub(crate) const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// The current balance: the sum of all income amounts minus the sum of all
/// expense amounts. An empty list yields zero.
pub(crate) fn balance(transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .map(|transaction| match transaction.kind {
            TransactionKind::Income => transaction.amount,
            TransactionKind::Expense => -transaction.amount,
        })
        .sum()
}

/// Income and expense totals, reported separately alongside their difference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Summary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_balance: f64,
}

/// Sums income and expense amounts separately.
pub(crate) fn summary(transactions: &[Transaction]) -> Summary {
    let mut total_income = 0.0;
    let mut total_expenses = 0.0;

    for transaction in transactions {
        match transaction.kind {
            TransactionKind::Income => total_income += transaction.amount,
            TransactionKind::Expense => total_expenses += transaction.amount,
        }
    }

    Summary {
        total_income,
        total_expenses,
        net_balance: total_income - total_expenses,
    }
}

/// An expense total for one spending category.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SpendingCategory {
    /// The description shared by the grouped expenses, or
    /// [UNCATEGORIZED_LABEL] for blank descriptions.
    pub category: String,
    /// The total spent in this category, rounded to two decimal places.
    pub amount: f64,
}

/// Groups expense transactions by description and totals each group.
///
/// Income transactions are ignored. Descriptions are trimmed before
/// grouping; blank ones fall into the [UNCATEGORIZED_LABEL] group. The
/// result is sorted by amount, largest first, with ties keeping the order
/// in which the categories were first encountered.
pub(crate) fn spending_patterns(transactions: &[Transaction]) -> Vec<SpendingCategory> {
    let mut categories: Vec<SpendingCategory> = Vec::new();

    for transaction in transactions {
        if transaction.kind != TransactionKind::Expense {
            continue;
        }

        let key = transaction.description.trim();
        let key = if key.is_empty() {
            UNCATEGORIZED_LABEL
        } else {
            key
        };

        match categories
            .iter_mut()
            .find(|category| category.category == key)
        {
            Some(category) => category.amount += transaction.amount,
            None => categories.push(SpendingCategory {
                category: key.to_owned(),
                amount: transaction.amount,
            }),
        }
    }

    for category in &mut categories {
        category.amount = round_to_cents(category.amount);
    }

    // Vec::sort_by is stable, so equal amounts keep first-encountered order.
    categories.sort_by(|a, b| b.amount.total_cmp(&a.amount));

    categories
}

/// Filters transactions whose description contains `search_term`
/// (case-insensitive) and sorts the matches by date, most recent first.
///
/// Used only for display. The balance and spending patterns always cover
/// the full list.
pub(crate) fn filter_and_sort(transactions: &[Transaction], search_term: &str) -> Vec<Transaction> {
    let search_term = search_term.to_lowercase();

    let mut matches: Vec<Transaction> = transactions
        .iter()
        .filter(|transaction| {
            transaction
                .description
                .to_lowercase()
                .contains(&search_term)
        })
        .cloned()
        .collect();

    matches.sort_by(|a, b| b.date.cmp(&a.date));

    matches
}

fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
