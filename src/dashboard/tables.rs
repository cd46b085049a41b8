//! Table views for the dashboard: recent transactions and the category breakdown.

use maud::{Markup, html};

use crate::{
    dashboard::aggregation::CategoryTotal,
    endpoints,
    html::{
        CARD_STYLE, LINK_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TABLE_STYLE,
        date_datetime_attr, format_currency,
    },
    transaction::{TransactionType, TransactionWithCategory, type_badge},
};

const TABLE_CELL_GREEN_STYLE: &str = "text-green-600 dark:text-green-400";
const TABLE_CELL_RED_STYLE: &str = "text-red-600 dark:text-red-400";

/// Gets the CSS class for coloring amounts by transaction type.
fn amount_color_class(kind: TransactionType) -> &'static str {
    match kind {
        TransactionType::Income => TABLE_CELL_GREEN_STYLE,
        TransactionType::Expense => TABLE_CELL_RED_STYLE,
    }
}

/// Renders the latest transactions of the selected month, newest first.
pub(super) fn recent_transactions_table(transactions: &[TransactionWithCategory]) -> Markup {
    html! {
        section class=(CARD_STYLE)
        {
            div class="flex justify-between items-baseline mb-4"
            {
                h3 class="text-xl font-semibold" { "Recent Transactions" }
                a href=(endpoints::TRANSACTIONS_VIEW) class={ (LINK_STYLE) " text-sm" } { "View all" }
            }

            @if transactions.is_empty() {
                p class="text-gray-500 dark:text-gray-400" { "No transactions this month." }
            } @else {
                div class="overflow-x-auto"
                {
                    table id="recent-transactions" class=(TABLE_STYLE)
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Amount" }
                            }
                        }

                        tbody
                        {
                            @for row in transactions {
                                @let transaction = &row.transaction;

                                tr class=(TABLE_ROW_STYLE)
                                {
                                    td class={ (TABLE_CELL_STYLE) " whitespace-nowrap" }
                                    {
                                        time datetime=(date_datetime_attr(transaction.date))
                                        {
                                            (transaction.date)
                                        }
                                    }
                                    td class=(TABLE_CELL_STYLE) { (transaction.description) }
                                    td class=(TABLE_CELL_STYLE) { (row.category_label()) }
                                    td
                                        class={
                                            (TABLE_CELL_STYLE) " text-right whitespace-nowrap "
                                            (amount_color_class(transaction.kind))
                                        }
                                    {
                                        (format_currency(transaction.kind.signed(transaction.amount)))
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Renders the month's totals per category, in the order given.
pub(super) fn category_breakdown_table(breakdown: &[CategoryTotal]) -> Markup {
    html! {
        section class=(CARD_STYLE)
        {
            h3 class="text-xl font-semibold mb-4" { "By Category" }

            div class="overflow-x-auto"
            {
                table id="category-breakdown" class=(TABLE_STYLE)
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                            th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Total" }
                        }
                    }

                    tbody
                    {
                        @for category in breakdown {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                th scope="row" class={ (TABLE_CELL_STYLE) " font-medium" }
                                {
                                    (category.name)
                                }
                                td class=(TABLE_CELL_STYLE) { (type_badge(category.kind)) }
                                td
                                    class={
                                        (TABLE_CELL_STYLE) " text-right whitespace-nowrap "
                                        (amount_color_class(category.kind))
                                    }
                                {
                                    (format_currency(category.total))
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
