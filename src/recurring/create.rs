//! The page and endpoint for adding a recurring transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
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
    endpoints,
    html::{FORM_CONTAINER_STYLE, FormAction, base, dollar_input_styles},
    navigation::NavBar,
    recurring::{
        create_recurring_transaction,
        form::{RecurringForm, RecurringFormDefaults, recurring_form_view},
    },
};

/// The state needed to show the form for and create a recurring transaction.
#[derive(Debug, Clone)]
pub struct CreateRecurringState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateRecurringState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn new_recurring_view(categories: &[Category]) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_RECURRING_VIEW).into_html();
    let form = recurring_form_view(
        FormAction::Create,
        &RecurringFormDefaults::default(),
        categories,
        "",
    );

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold mb-4" { "New Recurring Transaction" }
            (form)
        }
    };

    base("Create Recurring Transaction", &[dollar_input_styles()], &content)
}

/// Renders the page for creating a recurring transaction.
pub async fn get_new_recurring_page(
    State(state): State<CreateRecurringState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = get_all_categories(&connection).inspect_err(|error| {
        tracing::error!("Failed to retrieve categories for new recurring transaction page: {error}")
    })?;

    Ok(new_recurring_view(&categories).into_response())
}

/// Create a recurring transaction, redirects to the recurring transactions page on success.
pub async fn create_recurring_endpoint(
    State(state): State<CreateRecurringState>,
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

            return recurring_form_view(
                FormAction::Create,
                &RecurringFormDefaults::from(&form),
                &categories,
                &format!("Error: {error}"),
            )
            .into_response();
        }
    };

    match create_recurring_transaction(recurring, &connection) {
        Ok(recurring) => {
            tracing::info!(
                "Created {} recurring transaction {}",
                recurring.frequency.as_str(),
                recurring.id
            );

            (
                HxRedirect(endpoints::RECURRING_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("could not create recurring transaction: {error}");
            error.into_alert_response()
        }
    }
}
