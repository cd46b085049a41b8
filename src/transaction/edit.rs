//! The page and endpoint for editing an existing transaction.

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
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, dollar_input_styles, loading_spinner,
    },
    month::YearMonth,
    navigation::NavBar,
    transaction::{
        Transaction, TransactionId,
        core::{get_transaction, update_transaction},
        form::{TransactionForm, TransactionFormDefaults, transaction_form_fields},
    },
};

/// The state needed to edit a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn edit_transaction_view(transaction: &Transaction, categories: &[Category]) -> Markup {
    let edit_url = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
    let update_url = format_endpoint(endpoints::TRANSACTION, transaction.id);
    let nav_bar = NavBar::new(&edit_url).into_html();
    let defaults = TransactionFormDefaults {
        kind: transaction.kind,
        amount: Some(transaction.amount),
        date: transaction.date,
        description: Some(&transaction.description),
        category_id: transaction.category_id,
    };

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(update_url)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Edit Transaction" }

                @if transaction.recurring_id.is_some() {
                    p class="text-sm text-gray-500 dark:text-gray-400"
                    {
                        "This transaction was generated from a recurring transaction."
                    }
                }

                (transaction_form_fields(&defaults, categories))

                button type="submit" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span id="indicator" class="inline htmx-indicator" { (loading_spinner()) }
                    " Save Changes"
                }
            }
        }
    };

    base("Edit Transaction", &[dollar_input_styles()], &content)
}

/// Renders the page for editing a transaction.
pub async fn get_edit_transaction_page(
    Path(transaction_id): Path<TransactionId>,
    State(state): State<EditTransactionState>,
) -> Result<Response, Error> {
    let (transaction, categories) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let transaction = get_transaction(transaction_id, &connection)?;
        let categories = get_all_categories(&connection)
            .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

        (transaction, categories)
    };

    Ok(edit_transaction_view(&transaction, &categories).into_response())
}

/// A route handler for updating a transaction, redirects to the transactions
/// page for the transaction's month on success.
pub async fn update_transaction_endpoint(
    Path(transaction_id): Path<TransactionId>,
    State(state): State<EditTransactionState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let builder = Transaction::build(form.amount, form.kind, form.date, &form.description)
        .category_id(form.category_id);

    if let Err(error) = update_transaction(transaction_id, builder, &connection) {
        tracing::error!("could not update transaction {transaction_id}: {error}");
        return error.into_alert_response();
    }

    (
        HxRedirect(format!(
            "{}?month={}",
            endpoints::TRANSACTIONS_VIEW,
            YearMonth::from_date(form.date)
        )),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
