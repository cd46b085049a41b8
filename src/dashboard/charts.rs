//! The pie chart of the month's expenses by category.

use charming::{
    Chart,
    component::{Legend, Title},
    element::ItemStyle,
    series::Pie,
};

use crate::{
    charts::currency_item_tooltip, dashboard::aggregation::CategoryTotal, month::YearMonth,
};

pub(super) const EXPENSES_CHART_ID: &str = "expenses-chart";

/// A pie chart of `expenses`, one slice per category.
pub(super) fn expenses_pie_chart(month: YearMonth, expenses: &[&CategoryTotal]) -> Chart {
    let data: Vec<(f64, &str)> = expenses
        .iter()
        .map(|category| (round_cents(category.total), category.name.as_str()))
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("Expenses by category")
                .subtext(month.label())
                .left("center"),
        )
        .tooltip(currency_item_tooltip())
        .legend(Legend::new().bottom("1%").left("center"))
        .series(
            Pie::new()
                .name("Expenses")
                .radius(vec!["35%", "65%"])
                .center(vec!["50%", "50%"])
                .item_style(ItemStyle::new().border_radius(6))
                .data(data),
        )
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod expenses_pie_chart_tests {
    use time::Month;

    use crate::{
        dashboard::aggregation::CategoryTotal, month::YearMonth, transaction::TransactionType,
    };

    use super::expenses_pie_chart;

    #[test]
    fn has_a_slice_per_category() {
        let rent = CategoryTotal {
            name: "Rent".to_owned(),
            kind: TransactionType::Expense,
            total: 1200.0,
        };
        let stock = CategoryTotal {
            name: "Stock".to_owned(),
            kind: TransactionType::Expense,
            total: 345.678,
        };

        let options =
            expenses_pie_chart(YearMonth::new(2024, Month::March), &[&rent, &stock]).to_string();

        assert!(options.contains("\"Rent\""), "{options}");
        assert!(options.contains("\"Stock\""), "{options}");
        assert!(options.contains("345.68"), "{options}");
        assert!(options.contains("March 2024"), "{options}");
    }
}
