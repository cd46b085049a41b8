//! The page listing recurring transactions.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        TABLE_STYLE, base, edit_delete_action_links, format_currency,
    },
    navigation::NavBar,
    recurring::{Frequency, RecurringTransactionWithCategory, get_all_recurring_transactions},
    transaction::{UNCATEGORIZED_LABEL, type_badge},
};

/// The state needed for the recurring transactions page.
#[derive(Debug, Clone)]
pub struct RecurringPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RecurringPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the list of recurring transactions.
pub async fn get_recurring_page(
    State(state): State<RecurringPageState>,
) -> Result<Response, Error> {
    let recurring_transactions = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_all_recurring_transactions(&connection).inspect_err(|error| {
            tracing::error!("Failed to retrieve recurring transactions: {error}")
        })?
    };

    Ok(recurring_view(&recurring_transactions).into_response())
}

fn schedule_text(row: &RecurringTransactionWithCategory) -> String {
    match row.recurring.frequency {
        Frequency::Monthly => format!("Monthly on day {}", row.recurring.day_of_month),
        Frequency::Weekly => "Weekly".to_owned(),
    }
}

/// A table row for one recurring transaction, also returned when it is paused or resumed.
pub(crate) fn recurring_row(row: &RecurringTransactionWithCategory) -> Markup {
    let recurring = &row.recurring;
    let edit_url = format_endpoint(endpoints::EDIT_RECURRING_VIEW, recurring.id);
    let delete_url = format_endpoint(endpoints::RECURRING_TRANSACTION, recurring.id);
    let toggle_url = format_endpoint(endpoints::TOGGLE_RECURRING, recurring.id);
    let confirm_message = format!(
        "Are you sure you want to delete this recurring {} of {}? \
        Transactions it already generated will be kept.",
        recurring.kind.as_str(),
        format_currency(recurring.amount)
    );
    let (status_text, status_style, toggle_text) = if recurring.is_active {
        ("Active", "text-green-600 dark:text-green-400", "Pause")
    } else {
        ("Paused", "text-gray-500 dark:text-gray-400", "Resume")
    };

    html! {
        tr id={ "recurring-" (recurring.id) } class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (type_badge(recurring.kind)) }
            td class={ (TABLE_CELL_STYLE) " text-right whitespace-nowrap" }
            {
                (format_currency(recurring.amount))
            }
            td class=(TABLE_CELL_STYLE)
            {
                (row.category_name.as_deref().unwrap_or(UNCATEGORIZED_LABEL))
            }
            td class=(TABLE_CELL_STYLE) { (recurring.description) }
            td class=(TABLE_CELL_STYLE) data-schedule { (schedule_text(row)) }
            td class=(TABLE_CELL_STYLE) data-last-generated
            {
                @match recurring.last_generated {
                    Some(date) => { time datetime=(date) { (date) } }
                    None => { "Never" }
                }
            }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex items-center gap-2"
                {
                    span class=(status_style) data-status { (status_text) }

                    button
                        type="button"
                        hx-put=(toggle_url)
                        hx-target="closest tr"
                        hx-swap="outerHTML"
                        hx-target-error="#alert-container"
                        class=(LINK_STYLE)
                    {
                        (toggle_text)
                    }
                }
            }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    (edit_delete_action_links(
                        &edit_url,
                        &delete_url,
                        &confirm_message,
                        "closest tr",
                        "delete",
                    ))
                }
            }
        }
    }
}

fn recurring_view(recurring_transactions: &[RecurringTransactionWithCategory]) -> Markup {
    let nav_bar = NavBar::new(endpoints::RECURRING_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Recurring Transactions" }

                    a href=(endpoints::NEW_RECURRING_VIEW) class=(LINK_STYLE)
                    {
                        "Create Recurring Transaction"
                    }
                }

                p class="text-sm text-gray-500 dark:text-gray-400"
                {
                    "Active recurring transactions are added to the ledger when you log in."
                }

                section class="overflow-x-auto dark:bg-gray-800 w-full"
                {
                    table id="recurring-table" class=(TABLE_STYLE)
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Schedule" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Last Generated" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for row in recurring_transactions {
                                (recurring_row(row))
                            }
                        }
                    }

                    @if recurring_transactions.is_empty() {
                        p class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                        {
                            "No recurring transactions yet."
                        }
                    }
                }
            }
        }
    };

    base("Recurring Transactions", &[], &content)
}

#[cfg(test)]
mod recurring_page_tests {
    use axum::extract::State;
    use time::macros::date;

    use crate::{
        category::{CategoryName, create_category},
        recurring::{
            DayOfMonth, Frequency, NewRecurringTransaction, create_recurring_transaction,
            set_recurring_transaction_active, update_last_generated,
        },
        test_utils::{
            assert_status_ok, assert_valid_html, count_table_rows, get_test_connection,
            must_get_text, parse_html_document, shared_connection,
        },
        transaction::TransactionType,
    };

    use super::{RecurringPageState, get_recurring_page};

    #[tokio::test]
    async fn lists_recurring_transactions() {
        let connection = get_test_connection();
        let rent = create_category(
            CategoryName::new_unchecked("Rent"),
            TransactionType::Expense,
            &connection,
        )
        .unwrap();
        let monthly = create_recurring_transaction(
            NewRecurringTransaction::new(
                1200.0,
                TransactionType::Expense,
                Frequency::Monthly,
                DayOfMonth::new(5).unwrap(),
            )
            .category_id(Some(rent.id)),
            &connection,
        )
        .unwrap();
        update_last_generated(monthly.id, date!(2024 - 03 - 05), &connection).unwrap();
        let weekly = create_recurring_transaction(
            NewRecurringTransaction::new(
                300.0,
                TransactionType::Income,
                Frequency::Weekly,
                DayOfMonth::default(),
            ),
            &connection,
        )
        .unwrap();
        set_recurring_transaction_active(weekly.id, false, &connection).unwrap();
        let state = RecurringPageState {
            db_connection: shared_connection(connection),
        };

        let response = get_recurring_page(State(state)).await.unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(count_table_rows(&html, "recurring-table"), 2);
        assert_eq!(
            must_get_text(&html, "#recurring-1 [data-schedule]"),
            "Monthly on day 5"
        );
        assert_eq!(
            must_get_text(&html, "#recurring-1 [data-last-generated]"),
            "2024-03-05"
        );
        assert_eq!(must_get_text(&html, "#recurring-1 [data-status]"), "Active");
        assert_eq!(must_get_text(&html, "#recurring-2 [data-schedule]"), "Weekly");
        assert_eq!(
            must_get_text(&html, "#recurring-2 [data-last-generated]"),
            "Never"
        );
        assert_eq!(must_get_text(&html, "#recurring-2 [data-status]"), "Paused");
    }

    #[tokio::test]
    async fn empty_list_shows_message() {
        let state = RecurringPageState {
            db_connection: shared_connection(get_test_connection()),
        };

        let response = get_recurring_page(State(state)).await.unwrap();

        let html = parse_html_document(response).await;
        assert_eq!(count_table_rows(&html, "recurring-table"), 0);
        assert_eq!(
            must_get_text(&html, "section p.text-center"),
            "No recurring transactions yet."
        );
    }
}
