//! Database operations for categories.

use std::collections::HashMap;

use rusqlite::{Connection, Row};

use crate::{
    Error,
    category::{Category, CategoryId, CategoryName},
    transaction::TransactionType,
};

fn map_unique_error(error: rusqlite::Error, name: &CategoryName) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
            },
            _,
        ) => Error::DuplicateCategoryName(name.to_string()),
        error => error.into(),
    }
}

/// Create a category and return it with its generated ID.
///
/// # Errors
/// Returns [Error::DuplicateCategoryName] if a category with the same name and
/// type already exists.
pub fn create_category(
    name: CategoryName,
    kind: TransactionType,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .execute(
            "INSERT INTO category (name, type) VALUES (?1, ?2);",
            (name.as_ref(), kind),
        )
        .map_err(|error| map_unique_error(error, &name))?;

    let id = connection.last_insert_rowid();

    Ok(Category { id, name, kind })
}

/// Retrieve a single category by ID.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name, type FROM category WHERE id = :id;")?
        .query_row(&[(":id", &category_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all categories ordered alphabetically by name.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name, type FROM category ORDER BY name COLLATE NOCASE ASC;")?
        .query_map([], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the categories of one transaction type ordered alphabetically by name.
pub fn get_categories_by_type(
    kind: TransactionType,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, name, type FROM category WHERE type = ?1 ORDER BY name COLLATE NOCASE ASC;",
        )?
        .query_map([kind], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Check that a category exists and is for `kind` transactions.
///
/// # Errors
/// Returns [Error::InvalidCategory] for an unknown category and
/// [Error::CategoryTypeMismatch] for a category of the other type.
pub fn check_category_type(
    category_id: CategoryId,
    kind: TransactionType,
    connection: &Connection,
) -> Result<(), Error> {
    let category_kind: TransactionType = connection
        .query_row(
            "SELECT type FROM category WHERE id = ?1",
            [category_id],
            |row| row.get(0),
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::InvalidCategory(Some(category_id)),
            error => error.into(),
        })?;

    if category_kind != kind {
        return Err(Error::CategoryTypeMismatch);
    }

    Ok(())
}

/// Rename a category or change its type.
///
/// # Errors
/// Returns a:
/// - [Error::CategoryTypeMismatch] if the type changes while transactions or
///   recurring transactions of the old type still use the category,
/// - [Error::DuplicateCategoryName] if the new name is taken,
/// - [Error::UpdateMissingCategory] if the category does not exist.
pub fn update_category(
    category_id: CategoryId,
    name: CategoryName,
    kind: TransactionType,
    connection: &Connection,
) -> Result<(), Error> {
    let users_of_other_type: u32 = connection.query_row(
        "SELECT
            (SELECT COUNT(1) FROM \"transaction\" WHERE category_id = ?1 AND type != ?2)
          + (SELECT COUNT(1) FROM recurring_transaction WHERE category_id = ?1 AND type != ?2)",
        (category_id, kind),
        |row| row.get(0),
    )?;

    if users_of_other_type > 0 {
        return Err(Error::CategoryTypeMismatch);
    }

    let rows_affected = connection
        .execute(
            "UPDATE category SET name = ?1, type = ?2 WHERE id = ?3",
            (name.as_ref(), kind, category_id),
        )
        .map_err(|error| map_unique_error(error, &name))?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingCategory);
    }

    Ok(())
}

/// Delete a category by ID.
///
/// Transactions and recurring transactions in the category become uncategorized.
///
/// # Errors
/// Returns [Error::DeleteMissingCategory] if the category does not exist.
pub fn delete_category(category_id: CategoryId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM category WHERE id = ?1", [category_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingCategory);
    }

    Ok(())
}

/// The number of transactions in each category. Categories without transactions are omitted.
pub fn count_transactions_per_category(
    connection: &Connection,
) -> Result<HashMap<CategoryId, u32>, Error> {
    let result: Result<HashMap<CategoryId, u32>, rusqlite::Error> = connection
        .prepare(
            "SELECT category_id, COUNT(1) FROM \"transaction\"
             WHERE category_id IS NOT NULL GROUP BY category_id",
        )?
        .query_map((), |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect();

    result.map_err(Error::from)
}

/// Initialize the category table.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
            UNIQUE(name, type)
        );",
    )
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let kind = row.get(2)?;

    Ok(Category {
        id,
        name: CategoryName::new_unchecked(&raw_name),
        kind,
    })
}
