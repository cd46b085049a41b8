//! The ledger: income and expense transactions and the pages for managing them.

mod core;
mod create;
mod delete;
mod edit;
mod form;
mod list;
mod totals;

pub use core::{
    Transaction, TransactionBuilder, TransactionId, TransactionType, TransactionWithCategory,
    UNCATEGORIZED_LABEL, create_transaction, create_transaction_table, get_transaction,
    get_transactions_in_range,
};
pub use create::{create_transaction_endpoint, get_create_transaction_page};
pub use delete::delete_transaction_endpoint;
pub use edit::{get_edit_transaction_page, update_transaction_endpoint};
pub use form::{category_select, transaction_type_fields};
pub use list::{get_transactions_page, totals_summary, type_badge};
pub use totals::Totals;
