//! Generates the recurring transactions that are due, once per log-in.

use rusqlite::Connection;
use time::Date;

use crate::{
    Error,
    recurring::{
        RecurringId, RecurringTransaction, get_active_recurring_transactions,
        policy::{GeneratedTransaction, GenerationDecision, evaluate},
        update_last_generated,
    },
    transaction::{TransactionId, create_transaction},
};

/// Where the generator reads recurring transactions from and writes generated transactions to.
pub trait RecurringStore {
    /// The recurring transactions that are active.
    fn active_definitions(&self) -> Result<Vec<RecurringTransaction>, Error>;

    /// Add a generated transaction to the ledger.
    fn insert_transaction(&self, generated: &GeneratedTransaction) -> Result<TransactionId, Error>;

    fn update_last_generated(&self, id: RecurringId, date: Date) -> Result<(), Error>;

    /// Run `operation` so that its writes are kept only if it succeeds.
    ///
    /// Stores without transactions run `operation` directly, so a failure
    /// part way through keeps the writes made before it.
    fn atomically<T>(&self, operation: impl FnOnce(&Self) -> Result<T, Error>) -> Result<T, Error> {
        operation(self)
    }
}

impl RecurringStore for Connection {
    fn active_definitions(&self) -> Result<Vec<RecurringTransaction>, Error> {
        get_active_recurring_transactions(self)
    }

    fn insert_transaction(&self, generated: &GeneratedTransaction) -> Result<TransactionId, Error> {
        create_transaction(generated.to_builder(), self).map(|transaction| transaction.id)
    }

    fn update_last_generated(&self, id: RecurringId, date: Date) -> Result<(), Error> {
        update_last_generated(id, date, self)
    }

    fn atomically<T>(&self, operation: impl FnOnce(&Self) -> Result<T, Error>) -> Result<T, Error> {
        let transaction = self.unchecked_transaction()?;
        let result = operation(self)?;
        transaction.commit()?;

        Ok(result)
    }
}

/// Generate every active recurring transaction that is due on `today`.
///
/// Returns the number of transactions that were both added to the ledger and
/// recorded as generated. Failures are logged and only affect the recurring
/// transaction they happened for.
pub fn run_once<S: RecurringStore>(store: &S, today: Date) -> usize {
    let definitions = match store.active_definitions() {
        Ok(definitions) => definitions,
        Err(error) => {
            tracing::error!("Could not fetch recurring transactions: {error}");
            return 0;
        }
    };

    let mut generated_count = 0;

    for recurring in &definitions {
        let generated = match evaluate(recurring, today) {
            GenerationDecision::Generate(generated) => generated,
            GenerationDecision::Skip(reason) => {
                tracing::debug!("Skipping recurring transaction {}: {reason}", recurring.id);
                continue;
            }
        };

        match generate(store, &generated) {
            Ok(transaction_id) => {
                tracing::info!(
                    "Generated transaction {transaction_id} dated {} from recurring transaction {}",
                    generated.date,
                    recurring.id
                );
                generated_count += 1;
            }
            Err(Error::DuplicateRecurringTransaction) => tracing::warn!(
                "Recurring transaction {} already has a transaction on {}",
                recurring.id,
                generated.date
            ),
            Err(error) => tracing::error!(
                "Could not generate a transaction dated {} from recurring transaction {}: {error}",
                generated.date,
                recurring.id
            ),
        }
    }

    tracing::info!(
        "Generated {generated_count} transaction(s) from {} active recurring transaction(s)",
        definitions.len()
    );

    generated_count
}

/// Insert the generated transaction and record it on its recurring transaction.
///
/// Any error, including one from starting or committing the store's
/// transaction, is returned to [run_once] which logs it.
fn generate<S: RecurringStore>(
    store: &S,
    generated: &GeneratedTransaction,
) -> Result<TransactionId, Error> {
    store.atomically(|store| {
        let transaction_id = store.insert_transaction(generated)?;
        store.update_last_generated(generated.recurring_id, generated.date)?;

        Ok(transaction_id)
    })
}

/// The progress of the generator for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    Running,
    /// The generator has run, later runs in the same session do nothing.
    Checked { generated_count: usize },
}

/// Runs the generator at most once. Create a new runner for each session.
#[derive(Debug)]
pub struct SessionRunner {
    state: RunState,
}

impl SessionRunner {
    pub fn new() -> Self {
        Self {
            state: RunState::NotStarted,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Run the generator if it has not run yet and return the number of
    /// generated transactions.
    pub fn run<S: RecurringStore>(&mut self, store: &S, today: Date) -> usize {
        if let RunState::Checked { generated_count } = self.state {
            return generated_count;
        }

        self.state = RunState::Running;
        let generated_count = run_once(store, today);
        self.state = RunState::Checked { generated_count };

        generated_count
    }
}

impl Default for SessionRunner {
    fn default() -> Self {
        Self::new()
    }
}
