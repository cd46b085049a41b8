//! The page listing income and expense categories.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{
        Category, CategoryId,
        db::{count_transactions_per_category, get_all_categories},
    },
    endpoints::{self, format_endpoint},
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        TABLE_STYLE, base, edit_delete_action_links,
    },
    navigation::NavBar,
    transaction::TransactionType,
};

/// The state needed for the categories page.
#[derive(Debug, Clone)]
pub struct CategoriesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoriesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the categories page with one table per transaction type.
pub async fn get_categories_page(
    State(state): State<CategoriesPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;
    let transaction_counts = count_transactions_per_category(&connection)?;

    Ok(categories_view(&categories, &transaction_counts).into_response())
}

fn delete_confirm_message(category: &Category, transaction_count: u32) -> String {
    match transaction_count {
        0 => format!("Are you sure you want to delete the category \"{}\"?", category.name),
        1 => format!(
            "Are you sure you want to delete the category \"{}\"? \
            1 transaction will become uncategorized.",
            category.name
        ),
        count => format!(
            "Are you sure you want to delete the category \"{}\"? \
            {count} transactions will become uncategorized.",
            category.name
        ),
    }
}

fn category_table(
    kind: TransactionType,
    categories: &[&Category],
    transaction_counts: &HashMap<CategoryId, u32>,
) -> Markup {
    let (title, table_id) = match kind {
        TransactionType::Income => ("Income Categories", "income-categories"),
        TransactionType::Expense => ("Expense Categories", "expense-categories"),
    };

    html! {
        section class="space-y-2 w-full"
        {
            h2 class="text-lg font-semibold" { (title) }

            div class="overflow-x-auto dark:bg-gray-800"
            {
                table id=(table_id) class=(TABLE_STYLE)
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Transactions" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for category in categories {
                            @let count = transaction_counts.get(&category.id).copied().unwrap_or(0);

                            tr class=(TABLE_ROW_STYLE)
                            {
                                td class=(TABLE_CELL_STYLE) { (category.name) }
                                td class=(TABLE_CELL_STYLE) data-transaction-count { (count) }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    div class="flex gap-4"
                                    {
                                        (edit_delete_action_links(
                                            &format_endpoint(endpoints::EDIT_CATEGORY_VIEW, category.id),
                                            &format_endpoint(endpoints::CATEGORY, category.id),
                                            &delete_confirm_message(category, count),
                                            "closest tr",
                                            "delete",
                                        ))
                                    }
                                }
                            }
                        }
                    }
                }

                @if categories.is_empty() {
                    p class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                    {
                        "No " (kind.as_str()) " categories yet."
                    }
                }
            }
        }
    }
}

fn categories_view(categories: &[Category], transaction_counts: &HashMap<CategoryId, u32>) -> Markup {
    let nav_bar = NavBar::new(endpoints::CATEGORIES_VIEW).into_html();
    let (income, expense): (Vec<&Category>, Vec<&Category>) = categories
        .iter()
        .partition(|category| category.kind == TransactionType::Income);

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-6 w-full lg:max-w-3xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Categories" }

                    a href=(endpoints::NEW_CATEGORY_VIEW) class=(LINK_STYLE)
                    {
                        "Create Category"
                    }
                }

                (category_table(TransactionType::Income, &income, transaction_counts))
                (category_table(TransactionType::Expense, &expense, transaction_counts))
            }
        }
    };

    base("Categories", &[], &content)
}

#[cfg(test)]
mod categories_page_tests {
    use axum::extract::State;
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        category::{CategoryName, create_category},
        test_utils::{
            assert_status_ok, assert_valid_html, count_table_rows, get_test_connection,
            must_get_text, parse_html_document, shared_connection,
        },
        transaction::{Transaction, TransactionType, create_transaction},
    };

    use super::{CategoriesPageState, get_categories_page};

    #[tokio::test]
    async fn lists_categories_by_type() {
        let connection = get_test_connection();
        create_category(
            CategoryName::new_unchecked("Prescriptions"),
            TransactionType::Income,
            &connection,
        )
        .unwrap();
        let rent = create_category(
            CategoryName::new_unchecked("Rent"),
            TransactionType::Expense,
            &connection,
        )
        .unwrap();
        create_category(
            CategoryName::new_unchecked("Wages"),
            TransactionType::Expense,
            &connection,
        )
        .unwrap();
        for _ in 0..2 {
            create_transaction(
                Transaction::build(5.0, TransactionType::Expense, date!(2024 - 01 - 01), "")
                    .category_id(Some(rent.id)),
                &connection,
            )
            .unwrap();
        }
        let state = CategoriesPageState {
            db_connection: shared_connection(connection),
        };

        let response = get_categories_page(State(state)).await.unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(count_table_rows(&html, "income-categories"), 1);
        assert_eq!(count_table_rows(&html, "expense-categories"), 2);
        assert_eq!(
            must_get_text(&html, "#expense-categories tbody tr td[data-transaction-count]"),
            "2"
        );

        let delete_button = html
            .select(&Selector::parse("#expense-categories button[hx-delete]").unwrap())
            .next()
            .expect("No delete button");
        assert_eq!(
            delete_button.value().attr("hx-confirm"),
            Some(
                "Are you sure you want to delete the category \"Rent\"? \
                2 transactions will become uncategorized."
            )
        );
    }

    #[tokio::test]
    async fn empty_sections_show_message() {
        let state = CategoriesPageState {
            db_connection: shared_connection(get_test_connection()),
        };

        let response = get_categories_page(State(state)).await.unwrap();

        let html = parse_html_document(response).await;
        assert_eq!(count_table_rows(&html, "income-categories"), 0);
        assert_eq!(
            must_get_text(&html, "section p.text-center"),
            "No income categories yet."
        );
    }
}
