//! Charts for the reports page.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisLabel, AxisType, Emphasis, EmphasisFocus, LineStyle, LineStyleType},
    series::{Bar, Line},
};

use crate::{
    charts::{currency_axis_tooltip, currency_formatter},
    reports::aggregation::{CategoryTrend, MonthlyTotals},
};

pub(super) const MONTHLY_CHART_ID: &str = "monthly-chart";
pub(super) const TREND_CHART_ID: &str = "category-trend-chart";

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

fn value_axis() -> Axis {
    Axis::new()
        .type_(AxisType::Value)
        .axis_label(AxisLabel::new().formatter(currency_formatter()))
}

fn grid() -> Grid {
    Grid::new()
        .left("3%")
        .right("4%")
        .bottom("3%")
        .top(80)
        .contain_label(true)
}

/// Income and expense bars side by side for each month of `year`.
pub(super) fn monthly_chart(year: i32, months: &[MonthlyTotals]) -> Chart {
    let labels: Vec<String> = months.iter().map(|month| month.month.short_label()).collect();
    let income: Vec<f64> = months
        .iter()
        .map(|month| round_cents(month.totals.income))
        .collect();
    let expenses: Vec<f64> = months
        .iter()
        .map(|month| round_cents(month.totals.expense))
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("Income and expenses")
                .subtext(year.to_string()),
        )
        .tooltip(currency_axis_tooltip())
        .legend(Legend::new().top("1%").right("4%"))
        .grid(grid())
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(value_axis())
        .series(
            Bar::new()
                .name("Income")
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(income),
        )
        .series(
            Bar::new()
                .name("Expenses")
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(expenses),
        )
}

/// The monthly totals of one category with a dashed line at their average.
pub(super) fn category_trend_chart(category_name: &str, trend: &CategoryTrend) -> Chart {
    let labels: Vec<String> = trend
        .points
        .iter()
        .map(|point| point.month.short_label())
        .collect();
    let totals: Vec<f64> = trend
        .points
        .iter()
        .map(|point| round_cents(point.total))
        .collect();
    let average = vec![round_cents(trend.average); totals.len()];

    Chart::new()
        .title(
            Title::new()
                .text(category_name)
                .subtext("Last six months"),
        )
        .tooltip(currency_axis_tooltip())
        .legend(Legend::new().top("1%").right("4%"))
        .grid(grid())
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(value_axis())
        .series(Line::new().name("Total").data(totals))
        .series(
            Line::new()
                .name("Average")
                .line_style(LineStyle::new().type_(LineStyleType::Dashed))
                .show_symbol(false)
                .data(average),
        )
}

#[cfg(test)]
mod report_charts_tests {
    use time::Month;

    use crate::{
        month::YearMonth,
        reports::aggregation::{CategoryTrend, TrendPoint, monthly_breakdown},
    };

    use super::{category_trend_chart, monthly_chart};

    #[test]
    fn monthly_chart_has_income_and_expense_series() {
        let months = monthly_breakdown(2024, &[]);

        let options = monthly_chart(2024, &months).to_string();

        assert!(options.contains("\"Income\""), "{options}");
        assert!(options.contains("\"Expenses\""), "{options}");
        assert!(options.contains("\"Jan 24\""), "{options}");
        assert!(options.contains("\"Dec 24\""), "{options}");
    }

    #[test]
    fn trend_chart_labels_months() {
        let trend = CategoryTrend {
            points: vec![
                TrendPoint {
                    month: YearMonth::new(2023, Month::December),
                    total: 10.0,
                },
                TrendPoint {
                    month: YearMonth::new(2024, Month::January),
                    total: 30.0,
                },
            ],
            average: 20.0,
            maximum: 30.0,
        };

        let options = category_trend_chart("Stock", &trend).to_string();

        assert!(options.contains("\"Stock\""), "{options}");
        assert!(options.contains("\"Dec 23\""), "{options}");
        assert!(options.contains("\"Average\""), "{options}");
    }
}
