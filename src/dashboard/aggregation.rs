//! Groups a month's transactions by category for the breakdown table and chart.

use std::collections::HashMap;

use crate::transaction::{TransactionType, TransactionWithCategory};

/// The total amount for one category and transaction type.
///
/// Uncategorized transactions are grouped under
/// [UNCATEGORIZED_LABEL](crate::transaction::UNCATEGORIZED_LABEL).
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub name: String,
    pub kind: TransactionType,
    pub total: f64,
}

/// Sums `transactions` per (category name, transaction type), largest total first.
///
/// Ties are ordered by name so the table is stable between page loads.
pub fn category_breakdown(transactions: &[TransactionWithCategory]) -> Vec<CategoryTotal> {
    let mut totals: HashMap<(&str, TransactionType), f64> = HashMap::new();

    for row in transactions {
        *totals
            .entry((row.category_label(), row.transaction.kind))
            .or_insert(0.0) += row.transaction.amount;
    }

    let mut breakdown: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|((name, kind), total)| CategoryTotal {
            name: name.to_owned(),
            kind,
            total,
        })
        .collect();

    breakdown.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.kind.cmp(&b.kind))
    });

    breakdown
}

/// The expense rows of `breakdown`, keeping their order.
pub(super) fn expense_totals(breakdown: &[CategoryTotal]) -> Vec<&CategoryTotal> {
    breakdown
        .iter()
        .filter(|category| category.kind == TransactionType::Expense)
        .collect()
}
