//! The page and endpoint for recording a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    category::{Category, get_all_categories},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, dollar_input_styles, loading_spinner,
    },
    month::YearMonth,
    navigation::NavBar,
    timezone::local_today,
    transaction::{
        Transaction, TransactionType,
        core::create_transaction,
        form::{TransactionForm, TransactionFormDefaults, transaction_form_fields},
    },
};

/// The state needed to show the form for and create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

fn create_transaction_view(today: Date, categories: &[Category]) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html();
    let defaults = TransactionFormDefaults {
        kind: TransactionType::Expense,
        amount: None,
        date: today,
        description: None,
        category_id: None,
    };

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::TRANSACTIONS_API)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "New Transaction" }

                (transaction_form_fields(&defaults, categories))

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span id="indicator" class="inline htmx-indicator" { (loading_spinner()) }
                    " Create Transaction"
                }
            }
        }
    };

    base("Create Transaction", &[dollar_input_styles()], &content)
}

/// Renders the page for creating a transaction.
pub async fn get_create_transaction_page(
    State(state): State<CreateTransactionState>,
) -> Result<Response, Error> {
    let categories = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_all_categories(&connection).inspect_err(|error| {
            tracing::error!("Failed to retrieve categories for new transaction page: {error}")
        })?
    };

    let today = local_today(&state.local_timezone)?;

    Ok(create_transaction_view(today, &categories).into_response())
}

/// A route handler for creating a new transaction, redirects to transactions view on success.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let transaction = Transaction::build(form.amount, form.kind, form.date, &form.description)
        .category_id(form.category_id);

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = create_transaction(transaction, &connection) {
        tracing::error!("could not create transaction: {error}");
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

#[cfg(test)]
mod create_transaction_tests {
    use axum::{extract::State, http::StatusCode, response::IntoResponse};
    use axum_extra::extract::Form;
    use time::{Duration, OffsetDateTime, macros::date};

    use crate::{
        category::{CategoryName, create_category},
        endpoints,
        test_utils::{
            assert_form_input, assert_form_select, assert_hx_endpoint, assert_hx_redirect,
            assert_valid_html, get_test_connection, must_get_form, parse_html_document,
            shared_connection,
        },
        transaction::{
            TransactionType,
            core::get_transaction,
            create::{
                CreateTransactionState, create_transaction_endpoint, get_create_transaction_page,
            },
            form::TransactionForm,
        },
    };

    fn get_state() -> CreateTransactionState {
        CreateTransactionState {
            db_connection: shared_connection(get_test_connection()),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    #[tokio::test]
    async fn page_has_transaction_form() {
        let state = get_state();
        create_category(
            CategoryName::new_unchecked("Rent"),
            TransactionType::Expense,
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = get_create_transaction_page(State(state)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::TRANSACTIONS_API, "hx-post");
        assert_form_input(&form, "type", "radio");
        assert_form_input(&form, "amount", "number");
        assert_form_input(&form, "date", "date");
        assert_eq!(assert_form_select(&form, "category_id"), ["", "1"]);
    }

    #[tokio::test]
    async fn can_create_transaction() {
        let state = get_state();
        let date = date!(2024 - 03 - 05);
        let form = TransactionForm {
            kind: TransactionType::Income,
            amount: 250.0,
            date,
            category_id: None,
            description: "Prescription sales".to_owned(),
        };

        let response = create_transaction_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, "/transactions?month=2024-03");
        let transaction = get_transaction(1, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(transaction.amount, 250.0);
        assert_eq!(transaction.kind, TransactionType::Income);
        assert_eq!(transaction.description, "Prescription sales");
    }

    #[tokio::test]
    async fn can_record_upcoming_bill() {
        let state = get_state();
        let due_date = OffsetDateTime::now_utc().date() + Duration::days(14);
        let form = TransactionForm {
            kind: TransactionType::Expense,
            amount: 320.0,
            date: due_date,
            category_id: None,
            description: "Power bill".to_owned(),
        };

        let response = create_transaction_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let transaction = get_transaction(1, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(transaction.date, due_date);
        assert_eq!(transaction.description, "Power bill");
    }

    #[tokio::test]
    async fn rejects_zero_amount() {
        let state = get_state();
        let form = TransactionForm {
            kind: TransactionType::Expense,
            amount: 0.0,
            date: date!(2024 - 03 - 05),
            category_id: None,
            description: String::new(),
        };

        let response = create_transaction_endpoint(State(state), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
