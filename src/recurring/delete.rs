//! Recurring transaction deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    recurring::{RecurringId, delete_recurring_transaction},
};

/// The state needed for deleting a recurring transaction.
#[derive(Debug, Clone)]
pub struct DeleteRecurringState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteRecurringState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete a recurring transaction, the transactions it generated are kept.
pub async fn delete_recurring_endpoint(
    Path(recurring_id): Path<RecurringId>,
    State(state): State<DeleteRecurringState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_recurring_transaction(recurring_id, &connection) {
        Ok(()) => Alert::SuccessSimple {
            message: "Recurring transaction deleted successfully".to_owned(),
        }
        .into_response(),
        Err(Error::DeleteMissingRecurringTransaction) => {
            Error::DeleteMissingRecurringTransaction.into_alert_response()
        }
        Err(error) => {
            tracing::error!("could not delete recurring transaction {recurring_id}: {error}");
            error.into_alert_response()
        }
    }
}
