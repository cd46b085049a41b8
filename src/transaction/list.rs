//! The page listing the transactions of one month.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    html::{
        CARD_STYLE, EXPENSE_BADGE_STYLE, INCOME_BADGE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TABLE_STYLE, base,
        edit_delete_action_links, format_currency,
    },
    month::{MonthQuery, YearMonth, month_navigation, month_or_current},
    navigation::NavBar,
    timezone::local_today,
    transaction::{
        TransactionType, TransactionWithCategory, core::get_transactions_in_range, totals::Totals,
    },
};

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render the transactions of the month in `?month=YYYY-MM`, or the current month.
pub async fn get_transactions_page(
    State(state): State<TransactionsPageState>,
    Query(query): Query<MonthQuery>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;
    let month = month_or_current(query.month.as_deref(), today)?;

    let transactions = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_transactions_in_range(month.first_day(), month.last_day(), &connection)
            .inspect_err(|error| tracing::error!("Failed to retrieve transactions: {error}"))?
    };

    Ok(transactions_view(month, &transactions).into_response())
}

pub fn type_badge(kind: TransactionType) -> Markup {
    let style = match kind {
        TransactionType::Income => INCOME_BADGE_STYLE,
        TransactionType::Expense => EXPENSE_BADGE_STYLE,
    };

    html!( span class=(style) { (kind) } )
}

/// Cards with the income, expenses and net of `totals`.
pub fn totals_summary(totals: &Totals) -> Markup {
    html! {
        div class="grid grid-cols-1 sm:grid-cols-3 gap-4 w-full" id="month-summary"
        {
            div class=(CARD_STYLE)
            {
                p class="text-sm text-gray-500 dark:text-gray-400" { "Income" }
                p class="text-xl font-semibold text-green-600" data-total="income"
                {
                    (format_currency(totals.income))
                }
            }

            div class=(CARD_STYLE)
            {
                p class="text-sm text-gray-500 dark:text-gray-400" { "Expenses" }
                p class="text-xl font-semibold text-red-600" data-total="expense"
                {
                    (format_currency(totals.expense))
                }
            }

            div class=(CARD_STYLE)
            {
                p class="text-sm text-gray-500 dark:text-gray-400" { "Net" }
                p class="text-xl font-semibold" data-total="net"
                {
                    (format_currency(totals.net()))
                }
            }
        }
    }
}

fn transactions_view(month: YearMonth, transactions: &[TransactionWithCategory]) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let totals = Totals::from_transactions(transactions.iter().map(|row| &row.transaction));

    let table_row = |row: &TransactionWithCategory| {
        let transaction = &row.transaction;
        let edit_url = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
        let delete_url = format_endpoint(endpoints::TRANSACTION, transaction.id);
        let confirm_message = format!(
            "Are you sure you want to delete the {} transaction of {} on {}?",
            transaction.kind.as_str(),
            format_currency(transaction.amount),
            transaction.date
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    time datetime=(transaction.date) { (transaction.date) }
                }
                td class=(TABLE_CELL_STYLE) { (type_badge(transaction.kind)) }
                td class=(TABLE_CELL_STYLE)
                {
                    (row.category_label())
                }
                td class=(TABLE_CELL_STYLE)
                {
                    (transaction.description)

                    @if transaction.recurring_id.is_some() {
                        " "
                        span
                            class="text-xs text-gray-400"
                            title="Generated from a recurring transaction"
                        {
                            "↻"
                        }
                    }
                }
                td class={ (TABLE_CELL_STYLE) " text-right whitespace-nowrap" }
                {
                    (format_currency(transaction.kind.signed(transaction.amount)))
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
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Transactions" }

                    a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                    {
                        "Create Transaction"
                    }
                }

                (month_navigation(endpoints::TRANSACTIONS_VIEW, month))

                (totals_summary(&totals))

                section class="overflow-x-auto dark:bg-gray-800 w-full"
                {
                    table id="transactions-table" class=(TABLE_STYLE)
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for row in transactions {
                                (table_row(row))
                            }
                        }
                    }

                    @if transactions.is_empty() {
                        p class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                        {
                            "No transactions in " (month.label()) "."
                        }
                    }
                }
            }
        }
    );

    base("Transactions", &[], &content)
}

#[cfg(test)]
mod transactions_page_tests {
    use axum::extract::{Query, State};
    use time::macros::date;

    use crate::{
        Error,
        category::{CategoryName, create_category},
        month::MonthQuery,
        test_utils::{
            assert_status_ok, assert_valid_html, count_table_rows, get_test_connection,
            must_get_text, parse_html_document, shared_connection,
        },
        transaction::{Transaction, TransactionType, core::create_transaction},
    };

    use super::{TransactionsPageState, get_transactions_page};

    fn get_state() -> TransactionsPageState {
        let connection = get_test_connection();
        let rent = create_category(
            CategoryName::new_unchecked("Rent"),
            TransactionType::Expense,
            &connection,
        )
        .unwrap();
        for (amount, kind, date) in [
            (1000.0, TransactionType::Income, date!(2024 - 03 - 02)),
            (400.0, TransactionType::Expense, date!(2024 - 03 - 05)),
            (99.0, TransactionType::Expense, date!(2024 - 04 - 01)),
        ] {
            let category_id = (kind == TransactionType::Expense).then_some(rent.id);
            create_transaction(
                Transaction::build(amount, kind, date, "").category_id(category_id),
                &connection,
            )
            .unwrap();
        }

        TransactionsPageState {
            db_connection: shared_connection(connection),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    #[tokio::test]
    async fn shows_transactions_of_selected_month() {
        let state = get_state();

        let response = get_transactions_page(
            State(state),
            Query(MonthQuery {
                month: Some("2024-03".to_owned()),
            }),
        )
        .await
        .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(count_table_rows(&html, "transactions-table"), 2);
        assert_eq!(must_get_text(&html, "[data-total=income]"), "$1,000.00");
        assert_eq!(must_get_text(&html, "[data-total=expense]"), "$400.00");
        assert_eq!(must_get_text(&html, "[data-total=net]"), "$600.00");
        assert_eq!(must_get_text(&html, "a[rel=prev]"), "← February 2024");
        assert_eq!(must_get_text(&html, "a[rel=next]"), "April 2024 →");
    }

    #[tokio::test]
    async fn empty_month_shows_message() {
        let state = get_state();

        let response = get_transactions_page(
            State(state),
            Query(MonthQuery {
                month: Some("2023-01".to_owned()),
            }),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;
        assert_eq!(count_table_rows(&html, "transactions-table"), 0);
        assert_eq!(
            must_get_text(&html, "section p.text-center"),
            "No transactions in January 2023."
        );
    }

    #[tokio::test]
    async fn invalid_month_is_an_error() {
        let state = get_state();

        let result = get_transactions_page(
            State(state),
            Query(MonthQuery {
                month: Some("March".to_owned()),
            }),
        )
        .await;

        assert_eq!(result.err(), Some(Error::InvalidMonth("March".to_owned())));
    }
}
