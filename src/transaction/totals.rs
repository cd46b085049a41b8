use crate::transaction::{Transaction, TransactionType};

/// The money earned and spent over a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub income: f64,
    pub expense: f64,
}

impl Totals {
    /// Add up the income and expenses of `transactions`.
    pub fn from_transactions<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        transactions
            .into_iter()
            .fold(Self::default(), |mut totals, transaction| {
                totals.add(transaction.kind, transaction.amount);
                totals
            })
    }

    pub fn add(&mut self, kind: TransactionType, amount: f64) {
        match kind {
            TransactionType::Income => self.income += amount,
            TransactionType::Expense => self.expense += amount,
        }
    }

    /// Income minus expenses.
    pub fn net(&self) -> f64 {
        self.income - self.expense
    }
}
