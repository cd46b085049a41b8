//! Database operations for recurring transactions.

use rusqlite::{Connection, Row};
use time::Date;

use crate::{
    Error,
    category::check_category_type,
    recurring::{
        NewRecurringTransaction, RecurringId, RecurringTransaction,
        RecurringTransactionWithCategory,
    },
};

const SELECT_COLUMNS: &str = "r.id, r.type, r.amount, r.category_id, r.description, r.frequency, \
    r.day_of_month, r.is_active, r.last_generated";

fn validate(recurring: &NewRecurringTransaction, connection: &Connection) -> Result<(), Error> {
    if !(recurring.amount.is_finite() && recurring.amount > 0.0) {
        return Err(Error::NonPositiveAmount(recurring.amount));
    }

    match recurring.category_id {
        Some(category_id) => check_category_type(category_id, recurring.kind, connection),
        None => Ok(()),
    }
}

/// Save a new recurring transaction. It starts out active and not yet generated.
///
/// # Errors
/// This function will return a:
/// - [Error::NonPositiveAmount] if the amount is zero, negative or not a number,
/// - [Error::InvalidCategory] if the category ID does not refer to a real category,
/// - [Error::CategoryTypeMismatch] if the category is for the other transaction type,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_recurring_transaction(
    recurring: NewRecurringTransaction,
    connection: &Connection,
) -> Result<RecurringTransaction, Error> {
    validate(&recurring, connection)?;

    connection
        .prepare(
            "INSERT INTO recurring_transaction
                (type, amount, category_id, description, frequency, day_of_month)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, type, amount, category_id, description, frequency,
                day_of_month, is_active, last_generated",
        )?
        .query_row(
            (
                recurring.kind,
                recurring.amount,
                recurring.category_id,
                &recurring.description,
                recurring.frequency,
                recurring.day_of_month,
            ),
            map_row,
        )
        .map_err(|error| error.into())
}

pub fn get_recurring_transaction(
    id: RecurringId,
    connection: &Connection,
) -> Result<RecurringTransaction, Error> {
    connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM recurring_transaction r WHERE r.id = :id"
        ))?
        .query_row(&[(":id", &id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve a recurring transaction with the name of its category.
pub fn get_recurring_transaction_with_category(
    id: RecurringId,
    connection: &Connection,
) -> Result<RecurringTransactionWithCategory, Error> {
    connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS}, c.name FROM recurring_transaction r
             LEFT JOIN category c ON c.id = r.category_id
             WHERE r.id = :id"
        ))?
        .query_row(&[(":id", &id)], map_row_with_category)
        .map_err(|error| error.into())
}

/// Retrieve every recurring transaction, active ones first.
pub fn get_all_recurring_transactions(
    connection: &Connection,
) -> Result<Vec<RecurringTransactionWithCategory>, Error> {
    connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS}, c.name FROM recurring_transaction r
             LEFT JOIN category c ON c.id = r.category_id
             ORDER BY r.is_active DESC, r.id ASC"
        ))?
        .query_map([], map_row_with_category)?
        .map(|maybe_recurring| maybe_recurring.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the recurring transactions that the generator should evaluate.
pub fn get_active_recurring_transactions(
    connection: &Connection,
) -> Result<Vec<RecurringTransaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM recurring_transaction r
             WHERE r.is_active = 1
             ORDER BY r.id ASC"
        ))?
        .query_map([], map_row)?
        .map(|maybe_recurring| maybe_recurring.map_err(|error| error.into()))
        .collect()
}

/// Replace the user editable fields of a recurring transaction.
///
/// Whether the recurring transaction is active and when it was last generated
/// are left unchanged.
///
/// # Errors
/// Returns the same validation errors as [create_recurring_transaction] and
/// [Error::UpdateMissingRecurringTransaction] if `id` does not exist.
pub fn update_recurring_transaction(
    id: RecurringId,
    recurring: NewRecurringTransaction,
    connection: &Connection,
) -> Result<(), Error> {
    validate(&recurring, connection)?;

    let rows_affected = connection.execute(
        "UPDATE recurring_transaction
         SET type = ?1, amount = ?2, category_id = ?3, description = ?4, frequency = ?5,
             day_of_month = ?6
         WHERE id = ?7",
        (
            recurring.kind,
            recurring.amount,
            recurring.category_id,
            &recurring.description,
            recurring.frequency,
            recurring.day_of_month,
            id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingRecurringTransaction);
    }

    Ok(())
}

/// Activate or pause a recurring transaction.
pub fn set_recurring_transaction_active(
    id: RecurringId,
    is_active: bool,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE recurring_transaction SET is_active = ?1 WHERE id = ?2",
        (is_active, id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingRecurringTransaction);
    }

    Ok(())
}

/// Record the date of the latest transaction generated from a recurring transaction.
pub fn update_last_generated(
    id: RecurringId,
    date: Date,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE recurring_transaction SET last_generated = ?1 WHERE id = ?2",
        (date, id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingRecurringTransaction);
    }

    Ok(())
}

/// Delete a recurring transaction.
///
/// Transactions it already generated stay in the ledger.
pub fn delete_recurring_transaction(id: RecurringId, connection: &Connection) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM recurring_transaction WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingRecurringTransaction);
    }

    Ok(())
}

pub fn create_recurring_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS recurring_transaction (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
            amount REAL NOT NULL CHECK (amount > 0),
            category_id INTEGER,
            description TEXT NOT NULL DEFAULT '',
            frequency TEXT NOT NULL CHECK (frequency IN ('monthly', 'weekly')),
            day_of_month INTEGER NOT NULL DEFAULT 1 CHECK (day_of_month BETWEEN 1 AND 31),
            is_active INTEGER NOT NULL DEFAULT 1,
            last_generated TEXT,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE SET NULL
        );

        CREATE INDEX IF NOT EXISTS idx_recurring_transaction_active
            ON recurring_transaction(is_active);",
    )
}

fn map_row(row: &Row) -> Result<RecurringTransaction, rusqlite::Error> {
    Ok(RecurringTransaction {
        id: row.get(0)?,
        kind: row.get(1)?,
        amount: row.get(2)?,
        category_id: row.get(3)?,
        description: row.get(4)?,
        frequency: row.get(5)?,
        day_of_month: row.get(6)?,
        is_active: row.get(7)?,
        last_generated: row.get(8)?,
    })
}

fn map_row_with_category(row: &Row) -> Result<RecurringTransactionWithCategory, rusqlite::Error> {
    Ok(RecurringTransactionWithCategory {
        recurring: map_row(row)?,
        category_name: row.get(9)?,
    })
}

#[cfg(test)]
mod recurring_query_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        category::{CategoryName, create_category, delete_category},
        recurring::{
            DayOfMonth, Frequency, NewRecurringTransaction, create_recurring_transaction,
            delete_recurring_transaction, get_active_recurring_transactions,
            get_all_recurring_transactions, get_recurring_transaction,
            set_recurring_transaction_active, update_last_generated,
            update_recurring_transaction,
        },
        test_utils::get_test_connection,
        transaction::TransactionType,
    };

    fn rent(day: u8) -> NewRecurringTransaction {
        NewRecurringTransaction::new(
            1200.0,
            TransactionType::Expense,
            Frequency::Monthly,
            DayOfMonth::new(day).unwrap(),
        )
        .description("Shop rent")
    }

    fn create_rent(connection: &Connection) -> i64 {
        create_recurring_transaction(rent(5), connection)
            .expect("Could not create recurring transaction")
            .id
    }

    #[test]
    fn create_and_get() {
        let conn = get_test_connection();

        let created = create_recurring_transaction(rent(5), &conn).unwrap();

        assert_eq!(created.description, "Shop rent");
        assert_eq!(created.day_of_month.get(), 5);
        assert!(created.is_active);
        assert_eq!(created.last_generated, None);
        assert_eq!(get_recurring_transaction(created.id, &conn), Ok(created));
    }

    #[test]
    fn create_rejects_non_positive_amount() {
        let conn = get_test_connection();
        let mut recurring = rent(5);
        recurring.amount = 0.0;

        let result = create_recurring_transaction(recurring, &conn);

        assert_eq!(result, Err(Error::NonPositiveAmount(0.0)));
    }

    #[test]
    fn create_rejects_category_of_other_type() {
        let conn = get_test_connection();
        let sales = create_category(
            CategoryName::new_unchecked("Sales"),
            TransactionType::Income,
            &conn,
        )
        .unwrap();

        let result = create_recurring_transaction(rent(5).category_id(Some(sales.id)), &conn);

        assert_eq!(result, Err(Error::CategoryTypeMismatch));
    }

    #[test]
    fn create_rejects_unknown_category() {
        let conn = get_test_connection();

        let result = create_recurring_transaction(rent(5).category_id(Some(99)), &conn);

        assert_eq!(result, Err(Error::InvalidCategory(Some(99))));
    }

    #[test]
    fn active_excludes_paused() {
        let conn = get_test_connection();
        let active_id = create_rent(&conn);
        let paused_id = create_rent(&conn);
        set_recurring_transaction_active(paused_id, false, &conn).unwrap();

        let active: Vec<_> = get_active_recurring_transactions(&conn)
            .unwrap()
            .into_iter()
            .map(|recurring| recurring.id)
            .collect();

        assert_eq!(active, [active_id]);
        assert_eq!(get_all_recurring_transactions(&conn).unwrap().len(), 2);
    }

    #[test]
    fn all_lists_active_first_with_category_name() {
        let conn = get_test_connection();
        let category = create_category(
            CategoryName::new_unchecked("Rent"),
            TransactionType::Expense,
            &conn,
        )
        .unwrap();
        let paused_id = create_rent(&conn);
        set_recurring_transaction_active(paused_id, false, &conn).unwrap();
        let active = create_recurring_transaction(rent(1).category_id(Some(category.id)), &conn)
            .unwrap();

        let all = get_all_recurring_transactions(&conn).unwrap();

        assert_eq!(all[0].recurring.id, active.id);
        assert_eq!(all[0].category_name.as_deref(), Some("Rent"));
        assert_eq!(all[1].recurring.id, paused_id);
        assert_eq!(all[1].category_name, None);
    }

    #[test]
    fn update_keeps_activity_and_last_generated() {
        let conn = get_test_connection();
        let id = create_rent(&conn);
        update_last_generated(id, date!(2024 - 03 - 05), &conn).unwrap();
        set_recurring_transaction_active(id, false, &conn).unwrap();

        update_recurring_transaction(id, rent(20), &conn).unwrap();

        let updated = get_recurring_transaction(id, &conn).unwrap();
        assert_eq!(updated.day_of_month.get(), 20);
        assert!(!updated.is_active);
        assert_eq!(updated.last_generated, Some(date!(2024 - 03 - 05)));
    }

    #[test]
    fn update_missing_fails() {
        let conn = get_test_connection();

        assert_eq!(
            update_recurring_transaction(7, rent(1), &conn),
            Err(Error::UpdateMissingRecurringTransaction)
        );
        assert_eq!(
            set_recurring_transaction_active(7, true, &conn),
            Err(Error::UpdateMissingRecurringTransaction)
        );
        assert_eq!(
            update_last_generated(7, date!(2024 - 01 - 01), &conn),
            Err(Error::UpdateMissingRecurringTransaction)
        );
    }

    #[test]
    fn delete_removes_row() {
        let conn = get_test_connection();
        let id = create_rent(&conn);

        delete_recurring_transaction(id, &conn).unwrap();

        assert_eq!(get_recurring_transaction(id, &conn), Err(Error::NotFound));
        assert_eq!(
            delete_recurring_transaction(id, &conn),
            Err(Error::DeleteMissingRecurringTransaction)
        );
    }

    #[test]
    fn deleting_category_uncategorizes_recurring_transaction() {
        let conn = get_test_connection();
        let category = create_category(
            CategoryName::new_unchecked("Rent"),
            TransactionType::Expense,
            &conn,
        )
        .unwrap();
        let recurring =
            create_recurring_transaction(rent(1).category_id(Some(category.id)), &conn).unwrap();

        delete_category(category.id, &conn).unwrap();

        assert_eq!(
            get_recurring_transaction(recurring.id, &conn).map(|recurring| recurring.category_id),
            Ok(None)
        );
    }

    #[test]
    fn table_rejects_out_of_range_day() {
        let conn = get_test_connection();

        let result = conn.execute(
            "INSERT INTO recurring_transaction (type, amount, frequency, day_of_month)
             VALUES ('expense', 10.0, 'monthly', 32)",
            (),
        );

        assert!(result.is_err());
    }
}
