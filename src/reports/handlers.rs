//! The reports page: a year at a glance, the trend of one category and a
//! comparison of a month with the month before.

use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Month;

use crate::{
    AppState, Error,
    category::{Category, CategoryId, get_all_categories, get_category},
    charts::{ChartView, chart_container, chart_head_elements},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, base,
    },
    month::YearMonth,
    navigation::NavBar,
    reports::{
        aggregation::{
            CategoryTrend, MonthComparison, MonthlyTotals, TREND_MONTH_COUNT, category_trend,
            compare_months, monthly_breakdown, yearly_totals,
        },
        charts::{MONTHLY_CHART_ID, TREND_CHART_ID, category_trend_chart, monthly_chart},
        tables::{comparison_tables, monthly_table, trend_summary},
    },
    timezone::local_today,
    transaction::{Totals, TransactionType, get_transactions_in_range, totals_summary},
};

/// The state needed for the reports page.
#[derive(Debug, Clone)]
pub struct ReportsState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for ReportsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query parameters of the reports page.
///
/// Values are read as text so that the empty options of the filter form mean "default".
#[derive(Debug, Default, Deserialize)]
pub struct ReportsQuery {
    /// The year to report on, defaults to the current year.
    pub year: Option<String>,
    /// The category whose trend is shown, no trend is shown when missing.
    pub category_id: Option<String>,
    /// The month of `year` (1 to 12) to compare with the month before it,
    /// defaults to the current month.
    pub compare_month: Option<String>,
}

/// The parsed options of the reports page.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ReportOptions {
    year: i32,
    category_id: Option<CategoryId>,
    compare_month: Month,
}

fn parse_option<T: FromStr>(name: &str, value: Option<&str>) -> Result<Option<T>, Error> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text
            .parse()
            .map(Some)
            .map_err(|_| Error::InvalidQuery(format!("{name}={text}"))),
    }
}

impl ReportOptions {
    fn from_query(query: &ReportsQuery, current_month: YearMonth) -> Result<Self, Error> {
        let year = parse_option::<i32>("year", query.year.as_deref())?
            .unwrap_or(current_month.year());

        if !(1..=9999).contains(&year) {
            return Err(Error::InvalidQuery(format!("year={year}")));
        }

        let category_id = parse_option("category_id", query.category_id.as_deref())?;

        let compare_month = parse_option::<u8>("compare_month", query.compare_month.as_deref())?
            .map(|month| {
                Month::try_from(month)
                    .map_err(|_| Error::InvalidQuery(format!("compare_month={month}")))
            })
            .transpose()?
            .unwrap_or(current_month.month());

        Ok(Self {
            year,
            category_id,
            compare_month,
        })
    }
}

/// The trend of the selected category.
struct SelectedCategoryTrend {
    category: Category,
    trend: CategoryTrend,
}

/// Holds all the data needed to render the reports page.
struct ReportData {
    options: ReportOptions,
    categories: Vec<Category>,
    months: Vec<MonthlyTotals>,
    year_totals: Totals,
    trend: Option<SelectedCategoryTrend>,
    comparison: MonthComparison,
}

/// Display the reports for the year, category and month in the query.
pub async fn get_reports_page(
    State(state): State<ReportsState>,
    Query(query): Query<ReportsQuery>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;
    let current_month = YearMonth::from_date(today);
    let options = ReportOptions::from_query(&query, current_month)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let data = build_report_data(options, current_month, &connection)?;
    drop(connection);

    Ok(reports_view(&data).into_response())
}

fn build_report_data(
    options: ReportOptions,
    current_month: YearMonth,
    connection: &Connection,
) -> Result<ReportData, Error> {
    let categories = get_all_categories(connection)
        .inspect_err(|error| tracing::error!("Could not get categories: {error}"))?;

    let first_month = YearMonth::new(options.year, Month::January);
    let last_month = YearMonth::new(options.year, Month::December);
    let year_transactions =
        get_transactions_in_range(first_month.first_day(), last_month.last_day(), connection)
            .inspect_err(|error| {
                tracing::error!("Could not get transactions for {}: {error}", options.year)
            })?;
    let months = monthly_breakdown(
        options.year,
        year_transactions.iter().map(|row| &row.transaction),
    );
    let year_totals = yearly_totals(&months);

    let trend = match options.category_id {
        Some(category_id) => {
            let category = get_category(category_id, connection).inspect_err(|error| {
                tracing::error!("Could not get category {category_id}: {error}")
            })?;
            let trend_start = current_month.months_back(TREND_MONTH_COUNT - 1);
            let trend_transactions = get_transactions_in_range(
                trend_start.first_day(),
                current_month.last_day(),
                connection,
            )?;
            let trend = category_trend(
                category_id,
                current_month,
                trend_transactions.iter().map(|row| &row.transaction),
            );

            Some(SelectedCategoryTrend { category, trend })
        }
        None => None,
    };

    let compared_month = YearMonth::new(options.year, options.compare_month);
    let previous_month = compared_month.previous();
    let compared_transactions = get_transactions_in_range(
        compared_month.first_day(),
        compared_month.last_day(),
        connection,
    )?;
    let previous_transactions = get_transactions_in_range(
        previous_month.first_day(),
        previous_month.last_day(),
        connection,
    )?;
    let comparison = compare_months(
        compared_month,
        &compared_transactions,
        &previous_transactions,
    );

    Ok(ReportData {
        options,
        categories,
        months,
        year_totals,
        trend,
        comparison,
    })
}

fn report_filters_form(options: &ReportOptions, categories: &[Category]) -> Markup {
    html! {
        form
            id="report-filters"
            method="get"
            action=(endpoints::REPORTS_VIEW)
            class={ (CARD_STYLE) " grid grid-cols-1 md:grid-cols-4 gap-4 items-end w-full" }
        {
            div
            {
                label for="year" class=(FORM_LABEL_STYLE) { "Year" }
                input
                    type="number"
                    name="year"
                    id="year"
                    min="1"
                    max="9999"
                    value=(options.year)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="category_id" class=(FORM_LABEL_STYLE) { "Category trend" }
                select name="category_id" id="category_id" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "None" }

                    @for kind in [TransactionType::Income, TransactionType::Expense] {
                        optgroup label=(kind)
                        {
                            @for category in categories.iter().filter(|category| category.kind == kind) {
                                option
                                    value=(category.id)
                                    selected[options.category_id == Some(category.id)]
                                {
                                    (category.name)
                                }
                            }
                        }
                    }
                }
            }

            div
            {
                label for="compare_month" class=(FORM_LABEL_STYLE) { "Compare month" }
                select name="compare_month" id="compare_month" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for number in 1..=12u8 {
                        @if let Ok(month) = Month::try_from(number) {
                            option value=(number) selected[options.compare_month == month]
                            {
                                (month)
                            }
                        }
                    }
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Show" }
        }
    }
}

fn year_navigation(year: i32) -> Markup {
    html! {
        nav class="flex items-center justify-between gap-4 w-full" aria-label="Year navigation"
        {
            a href={ (endpoints::REPORTS_VIEW) "?year=" (year - 1) } class=(LINK_STYLE) rel="prev"
            {
                "← " (year - 1)
            }

            h2 class="text-lg font-semibold" { (year) }

            a href={ (endpoints::REPORTS_VIEW) "?year=" (year + 1) } class=(LINK_STYLE) rel="next"
            {
                (year + 1) " →"
            }
        }
    }
}

fn reports_view(data: &ReportData) -> Markup {
    let nav_bar = NavBar::new(endpoints::REPORTS_VIEW).into_html();

    let mut charts = vec![ChartView::new(
        MONTHLY_CHART_ID,
        &monthly_chart(data.options.year, &data.months),
    )];
    if let Some(selected) = &data.trend {
        charts.push(ChartView::new(
            TREND_CHART_ID,
            &category_trend_chart(selected.category.name.as_ref(), &selected.trend),
        ));
    }

    let content = html!(
        (nav_bar)

        div
            id="reports-content"
            class={ (PAGE_CONTAINER_STYLE) " max-w-screen-xl gap-6 lg:px-6" }
        {
            (year_navigation(data.options.year))

            (report_filters_form(&data.options, &data.categories))

            section id="yearly-report" class="w-full flex flex-col gap-4"
            {
                h2 class="text-xl font-bold" { "Year " (data.options.year) }

                (totals_summary(&data.year_totals))

                div class="grid grid-cols-1 xl:grid-cols-2 gap-4 w-full"
                {
                    (chart_container(&charts[0]))
                    (monthly_table(&data.months, &data.year_totals))
                }
            }

            section id="category-trend" class="w-full flex flex-col gap-4"
            {
                h2 class="text-xl font-bold" { "Category Trend" }

                @if let Some(selected) = &data.trend {
                    (trend_summary(&selected.trend))

                    @for chart in charts.iter().skip(1) {
                        (chart_container(chart))
                    }
                } @else {
                    p class="text-gray-500 dark:text-gray-400"
                    {
                        "Choose a category above to see its totals for the last six months."
                    }
                }
            }

            section id="month-comparison-section" class="w-full flex flex-col gap-2"
            {
                h2 class="text-xl font-bold"
                {
                    (data.comparison.current_month.label())
                    " vs. "
                    (data.comparison.previous_month.label())
                }

                (comparison_tables(&data.comparison))
            }
        }
    );

    base("Reports", &chart_head_elements(&charts), &content)
}
