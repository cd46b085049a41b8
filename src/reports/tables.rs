//! Tables for the reports page.

use std::cmp::Ordering;

use maud::{Markup, html};

use crate::{
    html::{
        CARD_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TABLE_STYLE,
        format_currency, format_percent_change,
    },
    reports::aggregation::{CategoryTrend, MonthComparison, MonthlyTotals},
    transaction::{Totals, TransactionType, type_badge},
};

const NUMBER_CELL_STYLE: &str = "px-6 py-4 text-right whitespace-nowrap";
const GOOD_CHANGE_STYLE: &str = "text-green-600 dark:text-green-400";
const BAD_CHANGE_STYLE: &str = "text-red-600 dark:text-red-400";
const NEUTRAL_CHANGE_STYLE: &str = "text-gray-500 dark:text-gray-400";

/// Whether a rise in the value is good news, e.g. income, or bad news, e.g. expenses.
#[derive(Clone, Copy)]
enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

impl Direction {
    fn for_type(kind: TransactionType) -> Self {
        match kind {
            TransactionType::Income => Direction::HigherIsBetter,
            TransactionType::Expense => Direction::LowerIsBetter,
        }
    }
}

fn change_cell(percent: f64, direction: Direction) -> Markup {
    let style = match (percent.partial_cmp(&0.0), direction) {
        (Some(Ordering::Greater), Direction::HigherIsBetter)
        | (Some(Ordering::Less), Direction::LowerIsBetter) => GOOD_CHANGE_STYLE,
        (Some(Ordering::Less), Direction::HigherIsBetter)
        | (Some(Ordering::Greater), Direction::LowerIsBetter) => BAD_CHANGE_STYLE,
        _ => NEUTRAL_CHANGE_STYLE,
    };

    html!(
        td class={ (NUMBER_CELL_STYLE) " " (style) } data-change
        {
            (format_percent_change(percent))
        }
    )
}

/// The income, expenses and net of each month with a row for the whole year.
pub(super) fn monthly_table(months: &[MonthlyTotals], year_totals: &Totals) -> Markup {
    html! {
        div class="overflow-x-auto w-full"
        {
            table id="monthly-breakdown" class=(TABLE_STYLE)
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Month" }
                        th scope="col" class=(NUMBER_CELL_STYLE) { "Income" }
                        th scope="col" class=(NUMBER_CELL_STYLE) { "Expenses" }
                        th scope="col" class=(NUMBER_CELL_STYLE) { "Net" }
                    }
                }

                tbody
                {
                    @for month in months {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            th scope="row" class={ (TABLE_CELL_STYLE) " font-medium" }
                            {
                                (month.month.month())
                            }
                            td class=(NUMBER_CELL_STYLE) { (format_currency(month.totals.income)) }
                            td class=(NUMBER_CELL_STYLE) { (format_currency(month.totals.expense)) }
                            td class=(NUMBER_CELL_STYLE) { (format_currency(month.totals.net())) }
                        }
                    }
                }

                tfoot
                {
                    tr class="font-semibold text-gray-900 dark:text-white"
                    {
                        th scope="row" class=(TABLE_CELL_STYLE) { "Total" }
                        td class=(NUMBER_CELL_STYLE) { (format_currency(year_totals.income)) }
                        td class=(NUMBER_CELL_STYLE) { (format_currency(year_totals.expense)) }
                        td class=(NUMBER_CELL_STYLE) { (format_currency(year_totals.net())) }
                    }
                }
            }
        }
    }
}

/// The average and maximum of a category trend.
pub(super) fn trend_summary(trend: &CategoryTrend) -> Markup {
    html! {
        dl class="grid grid-cols-2 gap-4 w-full" id="trend-summary"
        {
            div class=(CARD_STYLE)
            {
                dt class="text-sm text-gray-500 dark:text-gray-400" { "Monthly average" }
                dd class="text-xl font-semibold" data-trend="average"
                {
                    (format_currency(trend.average))
                }
            }

            div class=(CARD_STYLE)
            {
                dt class="text-sm text-gray-500 dark:text-gray-400" { "Highest month" }
                dd class="text-xl font-semibold" data-trend="maximum"
                {
                    (format_currency(trend.maximum))
                }
            }
        }
    }
}

/// The totals of the compared months followed by the per category comparison.
pub(super) fn comparison_tables(comparison: &MonthComparison) -> Markup {
    let rows = [
        (
            "Income",
            comparison.current.income,
            comparison.previous.income,
            comparison.income_change(),
            Direction::HigherIsBetter,
        ),
        (
            "Expenses",
            comparison.current.expense,
            comparison.previous.expense,
            comparison.expense_change(),
            Direction::LowerIsBetter,
        ),
        (
            "Net",
            comparison.current.net(),
            comparison.previous.net(),
            comparison.net_change(),
            Direction::HigherIsBetter,
        ),
    ];

    html! {
        div class="overflow-x-auto w-full"
        {
            table id="month-comparison" class=(TABLE_STYLE)
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) {}
                        th scope="col" class=(NUMBER_CELL_STYLE) { (comparison.current_month.label()) }
                        th scope="col" class=(NUMBER_CELL_STYLE) { (comparison.previous_month.label()) }
                        th scope="col" class=(NUMBER_CELL_STYLE) { "Change" }
                    }
                }

                tbody
                {
                    @for (label, current, previous, change, direction) in rows {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            th scope="row" class={ (TABLE_CELL_STYLE) " font-medium" } { (label) }
                            td class=(NUMBER_CELL_STYLE) { (format_currency(current)) }
                            td class=(NUMBER_CELL_STYLE) { (format_currency(previous)) }
                            (change_cell(change, direction))
                        }
                    }
                }
            }
        }

        h3 class="text-lg font-semibold mt-6 mb-2 w-full" { "By Category" }

        @if comparison.categories.is_empty() {
            p class="w-full text-gray-500 dark:text-gray-400"
            {
                "No transactions in either month."
            }
        } @else {
            div class="overflow-x-auto w-full"
            {
                table id="category-comparison" class=(TABLE_STYLE)
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                            th scope="col" class=(NUMBER_CELL_STYLE) { (comparison.current_month.label()) }
                            th scope="col" class=(NUMBER_CELL_STYLE) { (comparison.previous_month.label()) }
                            th scope="col" class=(NUMBER_CELL_STYLE) { "Change" }
                        }
                    }

                    tbody
                    {
                        @for category in &comparison.categories {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                th scope="row" class={ (TABLE_CELL_STYLE) " font-medium" }
                                {
                                    (category.name)
                                }
                                td class=(TABLE_CELL_STYLE) { (type_badge(category.kind)) }
                                td class=(NUMBER_CELL_STYLE) { (format_currency(category.current)) }
                                td class=(NUMBER_CELL_STYLE) { (format_currency(category.previous)) }
                                (change_cell(category.change(), Direction::for_type(category.kind)))
                            }
                        }
                    }
                }
            }
        }
    }
}
