//! The page and endpoint for editing a recurring transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{Category, get_all_categories},
    endpoints::{self, format_endpoint},
    html::{FORM_CONTAINER_STYLE, FormAction, base, dollar_input_styles},
    navigation::NavBar,
    recurring::{
        RecurringId, RecurringTransaction,
        form::{RecurringForm, RecurringFormDefaults, recurring_form_view},
        get_recurring_transaction, update_recurring_transaction,
    },
};

/// The state needed to edit a recurring transaction.
#[derive(Debug, Clone)]
pub struct EditRecurringState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditRecurringState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn edit_recurring_view(recurring: &RecurringTransaction, categories: &[Category]) -> Markup {
    let nav_bar = NavBar::new(endpoints::RECURRING_VIEW).into_html();
    let endpoint = format_endpoint(endpoints::RECURRING_TRANSACTION, recurring.id);
    let form = recurring_form_view(
        FormAction::Update {
            endpoint: &endpoint,
        },
        &RecurringFormDefaults::from(recurring),
        categories,
        "",
    );

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold mb-4" { "Edit Recurring Transaction" }

            @if let Some(last_generated) = recurring.last_generated {
                p id="last-generated" class="mb-4 text-sm text-gray-500 dark:text-gray-400"
                {
                    "Last generated on " (last_generated) "."
                }
            }

            (form)
        }
    };

    base("Edit Recurring Transaction", &[dollar_input_styles()], &content)
}

/// Renders the page for editing a recurring transaction.
pub async fn get_edit_recurring_page(
    Path(recurring_id): Path<RecurringId>,
    State(state): State<EditRecurringState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let recurring = get_recurring_transaction(recurring_id, &connection)?;
    let categories = get_all_categories(&connection)?;

    Ok(edit_recurring_view(&recurring, &categories).into_response())
}

/// Save changes to a recurring transaction, redirects to the recurring transactions page on success.
pub async fn update_recurring_endpoint(
    Path(recurring_id): Path<RecurringId>,
    State(state): State<EditRecurringState>,
    Form(form): Form<RecurringForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let recurring = match form.to_new_recurring() {
        Ok(recurring) => recurring,
        Err(error) => {
            let categories = match get_all_categories(&connection) {
                Ok(categories) => categories,
                Err(error) => return error.into_alert_response(),
            };
            let endpoint = format_endpoint(endpoints::RECURRING_TRANSACTION, recurring_id);

            return recurring_form_view(
                FormAction::Update {
                    endpoint: &endpoint,
                },
                &RecurringFormDefaults::from(&form),
                &categories,
                &format!("Error: {error}"),
            )
            .into_response();
        }
    };

    match update_recurring_transaction(recurring_id, recurring, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::RECURRING_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::UpdateMissingRecurringTransaction) => {
            Error::UpdateMissingRecurringTransaction.into_alert_response()
        }
        Err(error) => {
            tracing::error!("could not update recurring transaction {recurring_id}: {error}");
            error.into_alert_response()
        }
    }
}
