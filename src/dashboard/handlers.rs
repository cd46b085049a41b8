//! Dashboard HTTP handler and view rendering.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    charts::{ChartView, chart_container, chart_head_elements},
    dashboard::{
        aggregation::{CategoryTotal, category_breakdown, expense_totals},
        cards::{empty_month_view, generated_notice},
        charts::{EXPENSES_CHART_ID, expenses_pie_chart},
        tables::{category_breakdown_table, recent_transactions_table},
    },
    endpoints,
    html::{PAGE_CONTAINER_STYLE, base},
    month::{YearMonth, month_navigation, month_or_current},
    navigation::NavBar,
    timezone::local_today,
    transaction::{Totals, TransactionWithCategory, get_transactions_in_range, totals_summary},
};

/// How many of the month's latest transactions are listed on the dashboard.
const RECENT_TRANSACTION_COUNT: usize = 8;

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query parameters of the dashboard page.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// The month to show as "YYYY-MM", defaults to the current month.
    pub month: Option<String>,
    /// How many recurring transactions were generated at log-in.
    pub generated: Option<usize>,
}

/// Holds all the data needed to render the dashboard.
struct DashboardData {
    month: YearMonth,
    generated_count: usize,
    totals: Totals,
    recent_transactions: Vec<TransactionWithCategory>,
    breakdown: Vec<CategoryTotal>,
}

/// Display a page with an overview of one month of the ledger.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;
    let month = month_or_current(query.month.as_deref(), today)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let month_transactions =
        get_transactions_in_range(month.first_day(), month.last_day(), &connection)
            .inspect_err(|error| {
                tracing::error!("Could not get transactions for {month}: {error}")
            })?;
    drop(connection);

    // Already sorted newest first.
    let recent_transactions = month_transactions
        .iter()
        .take(RECENT_TRANSACTION_COUNT)
        .cloned()
        .collect();

    let data = DashboardData {
        month,
        generated_count: query.generated.unwrap_or_default(),
        totals: Totals::from_transactions(month_transactions.iter().map(|row| &row.transaction)),
        breakdown: category_breakdown(&month_transactions),
        recent_transactions,
    };

    Ok(dashboard_view(&data).into_response())
}

fn dashboard_view(data: &DashboardData) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let expenses = expense_totals(&data.breakdown);
    let charts: Vec<ChartView> = if expenses.is_empty() {
        Vec::new()
    } else {
        vec![ChartView::new(
            EXPENSES_CHART_ID,
            &expenses_pie_chart(data.month, &expenses),
        )]
    };

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class={ (PAGE_CONTAINER_STYLE) " max-w-screen-xl gap-4 lg:px-6" }
        {
            (generated_notice(data.generated_count))

            (month_navigation(endpoints::DASHBOARD_VIEW, data.month))

            (totals_summary(&data.totals))

            @if data.breakdown.is_empty() {
                (empty_month_view())
            } @else {
                div class="grid grid-cols-1 xl:grid-cols-2 gap-4 w-full"
                {
                    (category_breakdown_table(&data.breakdown))

                    @for chart in &charts {
                        (chart_container(chart))
                    }
                }
            }

            div class="w-full"
            {
                (recent_transactions_table(&data.recent_transactions))
            }
        }
    );

    base("Dashboard", &chart_head_elements(&charts), &content)
}
