//! Pharmacy Ledger is a small bookkeeping web app for recording a pharmacy's
//! income and expenses.
//!
//! This library provides a REST API that directly serves HTML pages. Besides
//! manual bookkeeping, it generates ledger entries from recurring definitions
//! (rent, salaries, subscriptions) once per log-in.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod category;
mod charts;
mod dashboard;
mod db;
mod endpoints;
mod html;
mod internal_server_error;
mod logging;
mod month;
mod navigation;
mod not_found;
mod recurring;
mod reports;
mod routing;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{
    PasswordHash, SOLE_USER_ID, User, UserID, ValidatedPassword, create_user, get_user_by_id,
    update_password,
};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use timezone::get_local_offset;

/// Functions for seeding a database, used by the `create_test_db` binary.
pub mod seed {
    pub use crate::category::{CategoryName, create_category, get_categories_by_type};
    pub use crate::recurring::{
        DayOfMonth, Frequency, NewRecurringTransaction, create_recurring_transaction,
    };
    pub use crate::transaction::{Transaction, TransactionType, create_transaction};
}

use crate::{
    alert::Alert, internal_server_error::InternalServerError,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an invalid password.
    #[error("invalid password")]
    InvalidCredentials,

    /// The auth token cookie is missing from the cookie jar in the request.
    #[error("no cookies in the cookie jar :(")]
    CookieMissing,

    /// The auth token could not be serialized or deserialized.
    #[error("could not read the auth token: {0}")]
    InvalidToken(String),

    /// The new expiry of the auth cookie could not be computed.
    #[error("could not compute the auth cookie expiry")]
    InvalidExpiry,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// An empty string was used to create a category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// The category ID does not refer to an existing category.
    #[error("the category ID does not refer to a valid category")]
    InvalidCategory(Option<i64>),

    /// The category exists, but it is for income when an expense was given or
    /// vice versa.
    #[error("the category does not match the transaction type")]
    CategoryTypeMismatch,

    /// A category with the same name and type already exists.
    #[error("the category \"{0}\" already exists")]
    DuplicateCategoryName(String),

    /// Amounts are always positive, the direction of the money is given by
    /// the transaction type.
    #[error("{0} is not a valid amount, amounts must be greater than zero")]
    NonPositiveAmount(f64),

    /// The day of the month for a recurring transaction must be in 1..=31.
    #[error("{0} is not a valid day of the month, use a number from 1 to 31")]
    InvalidDayOfMonth(u8),

    /// A string could not be parsed as a year and month, e.g. "2024-03".
    #[error("\"{0}\" is not a valid month, use the format YYYY-MM")]
    InvalidMonth(String),

    /// A query parameter of a page could not be read, e.g. `year=abc`.
    #[error("invalid query parameter {0}")]
    InvalidQuery(String),

    /// A recurring definition already produced a ledger transaction for this date.
    #[error("a transaction was already generated for this recurring transaction on this date")]
    DuplicateRecurringTransaction,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update a category that does not exist
    #[error("tried to update a category that is not in the database")]
    UpdateMissingCategory,

    /// Tried to delete a category that does not exist
    #[error("tried to delete a category that is not in the database")]
    DeleteMissingCategory,

    /// Tried to update a recurring transaction that does not exist
    #[error("tried to update a recurring transaction that is not in the database")]
    UpdateMissingRecurringTransaction,

    /// Tried to delete a recurring transaction that does not exist
    #[error("tried to delete a recurring transaction that is not in the database")]
    DeleteMissingRecurringTransaction,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    && desc.contains("transaction.recurring_id") =>
            {
                Error::DuplicateRecurringTransaction
            }
            rusqlite::Error::SqliteFailure(sql_error, _)
                if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
            {
                Error::InvalidCategory(None)
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::InvalidMonth(month) => InternalServerError {
                description: "Invalid Month",
                fix: &format!("Could not read the month \"{month}\", use the format YYYY-MM."),
            }
            .into_response(),
            Error::InvalidQuery(parameter) => InternalServerError {
                description: "Invalid Page Options",
                fix: &format!("Could not read the option \"{parameter}\", check the page address."),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                        ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            Error::NonPositiveAmount(amount) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid amount".to_owned(),
                    details: format!(
                        "{amount} is not a valid amount. Enter an amount greater than zero \
                        and choose income or expense with the transaction type."
                    ),
                },
            ),
            Error::InvalidDayOfMonth(day) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid day of the month".to_owned(),
                    details: format!("{day} is not a day of the month, choose from 1 to 31."),
                },
            ),
            Error::InvalidCategory(category_id) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid category".to_owned(),
                    details: match category_id {
                        Some(id) => format!("Could not find a category with the ID {id}."),
                        None => "Could not find the selected category.".to_owned(),
                    },
                },
            ),
            Error::CategoryTypeMismatch => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid category".to_owned(),
                    details: "Choose an income category for income and an expense category \
                        for expenses."
                        .to_owned(),
                },
            ),
            Error::DuplicateCategoryName(name) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Duplicate category name".to_owned(),
                    details: format!(
                        "The category {name} already exists. \
                        Choose a different name, or edit the existing category."
                    ),
                },
            ),
            Error::UpdateMissingTransaction => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update transaction".to_owned(),
                    details: "The transaction could not be found.".to_owned(),
                },
            ),
            Error::DeleteMissingTransaction => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete transaction".to_owned(),
                    details: "The transaction could not be found. \
                        Try refreshing the page to see if the transaction has already been deleted."
                        .to_owned(),
                },
            ),
            Error::UpdateMissingCategory => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update category".to_owned(),
                    details: "The category could not be found.".to_owned(),
                },
            ),
            Error::DeleteMissingCategory => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete category".to_owned(),
                    details: "The category could not be found. \
                        Try refreshing the page to see if the category has already been deleted."
                        .to_owned(),
                },
            ),
            Error::UpdateMissingRecurringTransaction => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update recurring transaction".to_owned(),
                    details: "The recurring transaction could not be found.".to_owned(),
                },
            ),
            Error::DeleteMissingRecurringTransaction => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete recurring transaction".to_owned(),
                    details: "The recurring transaction could not be found. \
                        Try refreshing the page to see if it has already been deleted."
                        .to_owned(),
                },
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::ErrorSimple {
                    message: "The requested resource could not be found.".to_owned(),
                },
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details: "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                },
            ),
        };

        (status_code, alert.into_html()).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::http::StatusCode;
    use rusqlite::Connection;

    use crate::Error;

    #[test]
    fn no_rows_maps_to_not_found() {
        let connection = Connection::open_in_memory().unwrap();

        let error: Error = connection
            .query_row("SELECT 1 WHERE 1 = 0", [], |row| row.get::<_, i64>(0))
            .unwrap_err()
            .into();

        assert_eq!(error, Error::NotFound);
    }

    #[test]
    fn validation_errors_are_bad_requests() {
        let response = Error::NonPositiveAmount(-1.0).into_alert_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_rows_are_not_found() {
        let response = Error::DeleteMissingCategory.into_alert_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn unexpected_errors_are_internal_server_errors() {
        let response = Error::DatabaseLockError.into_alert_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
