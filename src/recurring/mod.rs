//! Recurring transactions: templates for income and expenses that repeat every
//! month or week, and the generator that adds them to the ledger.
//!
//! The generator runs once when the user logs in. Each active recurring
//! transaction is checked with [evaluate], and the due ones are written through
//! a [RecurringStore]. A monthly transaction is generated at most once per
//! calendar month and a weekly one at most once per seven days.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod form;
mod list;
mod policy;
mod runner;
mod toggle;

pub use create::{create_recurring_endpoint, get_new_recurring_page};
pub use db::{
    create_recurring_transaction, create_recurring_transaction_table,
    delete_recurring_transaction, get_active_recurring_transactions,
    get_all_recurring_transactions, get_recurring_transaction,
    get_recurring_transaction_with_category, set_recurring_transaction_active,
    update_last_generated, update_recurring_transaction,
};
pub use delete::delete_recurring_endpoint;
pub use domain::{
    DayOfMonth, Frequency, NewRecurringTransaction, RecurringId, RecurringTransaction,
    RecurringTransactionWithCategory,
};
pub use edit::{get_edit_recurring_page, update_recurring_endpoint};
pub use list::get_recurring_page;
pub use policy::{GeneratedTransaction, GenerationDecision, SkipReason, evaluate};
pub use runner::{RecurringStore, RunState, SessionRunner, run_once};
pub use toggle::toggle_recurring_endpoint;
