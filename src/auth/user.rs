//! The single user of the app and their stored password.

use std::fmt::Display;

use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::{Error, auth::PasswordHash};

/// The ID of the only user, the app has a single password.
pub const SOLE_USER_ID: UserID = UserID(1);

/// A newtype wrapper for integer user IDs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A user of the application.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The user's password hash.
    pub password_hash: PasswordHash,
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                password TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Insert the user with `password_hash`.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn create_user(password_hash: PasswordHash, connection: &Connection) -> Result<User, Error> {
    connection.execute(
        "INSERT INTO user (id, password) VALUES (?1, ?2)",
        (SOLE_USER_ID.as_i64(), password_hash.as_ref()),
    )?;

    Ok(User {
        id: SOLE_USER_ID,
        password_hash,
    })
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if there is no such user.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    connection
        .query_row(
            "SELECT id, password FROM user WHERE id = :id",
            &[(":id", &user_id.as_i64())],
            |row| {
                Ok(User {
                    id: UserID::new(row.get(0)?),
                    password_hash: PasswordHash::new_unchecked(&row.get::<_, String>(1)?),
                })
            },
        )
        .map_err(Error::from)
}

/// Replace the password of `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if there is no such user.
pub fn update_password(
    user_id: UserID,
    password_hash: &PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_updated = connection.execute(
        "UPDATE user SET password = ?1 WHERE id = ?2",
        (password_hash.as_ref(), user_id.as_i64()),
    )?;

    match rows_updated {
        0 => Err(Error::NotFound),
        _ => Ok(()),
    }
}

/// Get the number of users in the database.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn count_users(connection: &Connection) -> Result<usize, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM user", [], |row| row.get(0))
        .map_err(Error::from)
}

/// Whether the password has been set yet.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn user_exists(connection: &Connection) -> Result<bool, Error> {
    connection
        .query_row("SELECT 1 FROM user LIMIT 1", [], |_| Ok(()))
        .optional()
        .map(|row| row.is_some())
        .map_err(Error::from)
}
