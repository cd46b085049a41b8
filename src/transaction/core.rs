//! Defines the core data models and database queries for ledger transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    category::{CategoryId, check_category_type},
    recurring::RecurringId,
};

// ============================================================================
// MODELS
// ============================================================================

/// Database identifier for a transaction.
pub type TransactionId = i64;

/// Whether money came in or went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    /// The value stored in the database and used in forms.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// The amount with the sign used for net totals, negative for expenses.
    pub fn signed(&self, amount: f64) -> f64 {
        match self {
            TransactionType::Income => amount,
            TransactionType::Expense => -amount,
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Income => write!(f, "Income"),
            TransactionType::Expense => write!(f, "Expense"),
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(format!("unknown transaction type {other:?}")),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: String| FromSqlError::Other(error.into()))
    }
}

/// An expense or income recorded in the ledger.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// When the transaction happened.
    pub date: Date,
    /// The amount of money, always greater than zero.
    pub amount: f64,
    /// Whether the money was earned or spent.
    pub kind: TransactionType,
    /// The ID of the category the transaction belongs to.
    pub category_id: Option<CategoryId>,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The recurring transaction that generated this transaction, if any.
    pub recurring_id: Option<RecurringId>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        amount: f64,
        kind: TransactionType,
        date: Date,
        description: &str,
    ) -> TransactionBuilder {
        TransactionBuilder {
            amount,
            kind,
            date,
            description: description.to_owned(),
            category_id: None,
            recurring_id: None,
        }
    }
}

/// The fields of a transaction that has not been saved yet.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The amount of money, must be greater than zero.
    ///
    /// The direction of the money is given by `kind`, so a rent payment of
    /// $1,200 is `1200.0` with [TransactionType::Expense].
    pub amount: f64,
    pub kind: TransactionType,
    pub date: Date,
    pub description: String,
    /// The category of the transaction, e.g. "Medicine sales", "Rent".
    ///
    /// The category must have the same [TransactionType] as the transaction.
    pub category_id: Option<CategoryId>,
    /// Set for transactions generated from a recurring transaction.
    ///
    /// The database allows at most one transaction per recurring transaction and date.
    pub recurring_id: Option<RecurringId>,
}

impl TransactionBuilder {
    /// Set the category for the transaction.
    pub fn category_id(mut self, category_id: Option<CategoryId>) -> Self {
        self.category_id = category_id;
        self
    }

    /// Link the transaction to the recurring transaction that generated it.
    pub fn recurring_id(mut self, recurring_id: Option<RecurringId>) -> Self {
        self.recurring_id = recurring_id;
        self
    }
}

/// Shown in place of a category name for transactions without a category.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// A transaction together with the name of its category.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionWithCategory {
    pub transaction: Transaction,
    /// `None` for uncategorized transactions.
    pub category_name: Option<String>,
}

impl TransactionWithCategory {
    /// The category name, or [UNCATEGORIZED_LABEL].
    pub fn category_label(&self) -> &str {
        self.category_name.as_deref().unwrap_or(UNCATEGORIZED_LABEL)
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Checks the amount and that the category exists and has the same type as the transaction.
fn validate(builder: &TransactionBuilder, connection: &Connection) -> Result<(), Error> {
    if !(builder.amount.is_finite() && builder.amount > 0.0) {
        return Err(Error::NonPositiveAmount(builder.amount));
    }

    match builder.category_id {
        Some(category_id) => check_category_type(category_id, builder.kind, connection),
        None => Ok(()),
    }
}

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::NonPositiveAmount] if the amount is zero, negative or not a number,
/// - [Error::InvalidCategory] if the category ID does not refer to a real category,
/// - [Error::CategoryTypeMismatch] if the category is for the other transaction type,
/// - [Error::DuplicateRecurringTransaction] if the recurring transaction already
///   generated a transaction on the same date,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    validate(&builder, connection)?;

    connection
        .prepare(
            "INSERT INTO \"transaction\" (date, amount, type, category_id, description, recurring_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, date, amount, type, category_id, description, recurring_id",
        )?
        .query_row(
            (
                builder.date,
                builder.amount,
                builder.kind,
                builder.category_id,
                &builder.description,
                builder.recurring_id,
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateRecurringTransaction,
            error => error.into(),
        })
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    connection
        .prepare(
            "SELECT id, date, amount, type, category_id, description, recurring_id
             FROM \"transaction\" WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_transaction_row)
        .map_err(|error| error.into())
}

/// Overwrite the date, amount, type, category and description of a transaction.
///
/// The link to a recurring transaction is kept as is.
///
/// # Errors
/// Returns the same validation errors as [create_transaction], or
/// [Error::UpdateMissingTransaction] if `id` does not refer to a transaction.
pub fn update_transaction(
    id: TransactionId,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<(), Error> {
    validate(&builder, connection)?;

    let rows_affected = connection.execute(
        "UPDATE \"transaction\"
         SET date = ?1, amount = ?2, type = ?3, category_id = ?4, description = ?5
         WHERE id = ?6",
        (
            builder.date,
            builder.amount,
            builder.kind,
            builder.category_id,
            &builder.description,
            id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTransaction);
    }

    Ok(())
}

/// Delete a transaction by ID.
///
/// # Errors
/// Returns [Error::DeleteMissingTransaction] if `id` does not refer to a transaction.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM \"transaction\" WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

const SELECT_WITH_CATEGORY: &str = "SELECT t.id, t.date, t.amount, t.type, t.category_id, \
    t.description, t.recurring_id, c.name \
    FROM \"transaction\" t LEFT JOIN category c ON c.id = t.category_id";

/// Get the transactions dated from `start` to `end` (inclusive), newest first.
pub fn get_transactions_in_range(
    start: Date,
    end: Date,
    connection: &Connection,
) -> Result<Vec<TransactionWithCategory>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_WITH_CATEGORY} WHERE t.date BETWEEN ?1 AND ?2 ORDER BY t.date DESC, t.id DESC"
        ))?
        .query_map((start, end), map_row_with_category)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            amount REAL NOT NULL CHECK (amount > 0),
            type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
            category_id INTEGER,
            description TEXT NOT NULL DEFAULT '',
            recurring_id INTEGER,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE SET NULL,
            FOREIGN KEY(recurring_id) REFERENCES recurring_transaction(id)
                ON UPDATE CASCADE ON DELETE SET NULL
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_date_category
            ON \"transaction\"(date, category_id);

        CREATE UNIQUE INDEX IF NOT EXISTS idx_transaction_recurring_date
            ON \"transaction\"(recurring_id, date) WHERE recurring_id IS NOT NULL;",
    )
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        date: row.get(1)?,
        amount: row.get(2)?,
        kind: row.get(3)?,
        category_id: row.get(4)?,
        description: row.get(5)?,
        recurring_id: row.get(6)?,
    })
}

fn map_row_with_category(row: &Row) -> Result<TransactionWithCategory, rusqlite::Error> {
    Ok(TransactionWithCategory {
        transaction: map_transaction_row(row)?,
        category_name: row.get(7)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
