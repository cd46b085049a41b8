//! Pausing and resuming recurring transactions from the list page.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    recurring::{
        RecurringId, get_recurring_transaction_with_category, list::recurring_row,
        set_recurring_transaction_active,
    },
};

/// The state needed for pausing and resuming a recurring transaction.
#[derive(Debug, Clone)]
pub struct ToggleRecurringState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ToggleRecurringState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Flip whether a recurring transaction is active and return its updated table row.
pub async fn toggle_recurring_endpoint(
    Path(recurring_id): Path<RecurringId>,
    State(state): State<ToggleRecurringState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let result = get_recurring_transaction_with_category(recurring_id, &connection)
        .and_then(|mut row| {
            row.recurring.is_active = !row.recurring.is_active;
            set_recurring_transaction_active(recurring_id, row.recurring.is_active, &connection)?;
            Ok(row)
        });

    match result {
        Ok(row) => {
            tracing::info!(
                "Recurring transaction {recurring_id} is now {}",
                if row.recurring.is_active { "active" } else { "paused" }
            );
            recurring_row(&row).into_response()
        }
        Err(error @ Error::NotFound) => error.into_alert_response(),
        Err(error) => {
            tracing::error!("could not toggle recurring transaction {recurring_id}: {error}");
            error.into_alert_response()
        }
    }
}
