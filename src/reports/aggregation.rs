//! Calculations behind the reports page: monthly totals for a year, the
//! trend of a single category and the comparison of two months.

use std::collections::HashMap;

use time::Month;

use crate::{
    category::CategoryId,
    dashboard::category_breakdown,
    month::YearMonth,
    transaction::{Totals, Transaction, TransactionType, TransactionWithCategory},
};

/// How many months, including the current one, the category trend covers.
pub(super) const TREND_MONTH_COUNT: u32 = 6;

/// The income and expenses of one calendar month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct MonthlyTotals {
    pub month: YearMonth,
    pub totals: Totals,
}

/// Sums `transactions` for each month of `year`.
///
/// Always returns twelve rows, January first. Transactions outside `year` are ignored.
pub(super) fn monthly_breakdown<'a>(
    year: i32,
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> Vec<MonthlyTotals> {
    let mut months: Vec<MonthlyTotals> = (1..=12u8)
        .filter_map(|month| Month::try_from(month).ok())
        .map(|month| MonthlyTotals {
            month: YearMonth::new(year, month),
            totals: Totals::default(),
        })
        .collect();

    for transaction in transactions {
        if transaction.date.year() != year {
            continue;
        }

        let index = usize::from(u8::from(transaction.date.month())) - 1;
        months[index]
            .totals
            .add(transaction.kind, transaction.amount);
    }

    months
}

/// The sum of every month in `months`.
pub(super) fn yearly_totals(months: &[MonthlyTotals]) -> Totals {
    months.iter().fold(Totals::default(), |mut totals, month| {
        totals.income += month.totals.income;
        totals.expense += month.totals.expense;
        totals
    })
}

/// The total of a category in one month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct TrendPoint {
    pub month: YearMonth,
    pub total: f64,
}

/// A category's monthly totals with their average and maximum.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct CategoryTrend {
    pub points: Vec<TrendPoint>,
    pub average: f64,
    pub maximum: f64,
}

/// The totals of `category_id` for the [TREND_MONTH_COUNT] months ending with `last_month`,
/// oldest first.
pub(super) fn category_trend<'a>(
    category_id: CategoryId,
    last_month: YearMonth,
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> CategoryTrend {
    let mut points: Vec<TrendPoint> = (0..TREND_MONTH_COUNT)
        .rev()
        .map(|months_back| TrendPoint {
            month: last_month.months_back(months_back),
            total: 0.0,
        })
        .collect();

    for transaction in transactions {
        if transaction.category_id != Some(category_id) {
            continue;
        }

        let month = YearMonth::from_date(transaction.date);
        if let Some(point) = points.iter_mut().find(|point| point.month == month) {
            point.total += transaction.amount;
        }
    }

    let sum: f64 = points.iter().map(|point| point.total).sum();
    let maximum = points
        .iter()
        .map(|point| point.total)
        .fold(0.0, f64::max);

    CategoryTrend {
        average: sum / points.len() as f64,
        maximum,
        points,
    }
}

/// The change from `previous` to `current` as a percentage of `previous`.
///
/// When `previous` is zero the change is 100% if `current` is positive and 0% otherwise.
pub(super) fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        if current > 0.0 { 100.0 } else { 0.0 }
    } else {
        (current - previous) / previous.abs() * 100.0
    }
}

/// A category's totals in the compared month and the month before.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct CategoryComparison {
    pub name: String,
    pub kind: TransactionType,
    pub current: f64,
    pub previous: f64,
}

impl CategoryComparison {
    pub fn change(&self) -> f64 {
        percent_change(self.current, self.previous)
    }
}

/// The totals of a month next to those of the month before it.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct MonthComparison {
    pub current_month: YearMonth,
    pub previous_month: YearMonth,
    pub current: Totals,
    pub previous: Totals,
    /// Sorted by the current month's total, largest first.
    pub categories: Vec<CategoryComparison>,
}

impl MonthComparison {
    pub fn income_change(&self) -> f64 {
        percent_change(self.current.income, self.previous.income)
    }

    pub fn expense_change(&self) -> f64 {
        percent_change(self.current.expense, self.previous.expense)
    }

    pub fn net_change(&self) -> f64 {
        percent_change(self.current.net(), self.previous.net())
    }
}

/// Compare the transactions of `current_month` with those of the calendar month before it.
///
/// `current` and `previous` should hold the transactions of each month.
pub(super) fn compare_months(
    current_month: YearMonth,
    current: &[TransactionWithCategory],
    previous: &[TransactionWithCategory],
) -> MonthComparison {
    let mut categories: HashMap<(String, TransactionType), CategoryComparison> = HashMap::new();

    for category in category_breakdown(current) {
        categories.insert(
            (category.name.clone(), category.kind),
            CategoryComparison {
                name: category.name,
                kind: category.kind,
                current: category.total,
                previous: 0.0,
            },
        );
    }

    for category in category_breakdown(previous) {
        categories
            .entry((category.name.clone(), category.kind))
            .or_insert_with(|| CategoryComparison {
                name: category.name,
                kind: category.kind,
                current: 0.0,
                previous: 0.0,
            })
            .previous = category.total;
    }

    let mut categories: Vec<CategoryComparison> = categories.into_values().collect();
    categories.sort_by(|a, b| {
        b.current
            .total_cmp(&a.current)
            .then_with(|| b.previous.total_cmp(&a.previous))
            .then_with(|| a.name.cmp(&b.name))
    });

    MonthComparison {
        current_month,
        previous_month: current_month.previous(),
        current: Totals::from_transactions(current.iter().map(|row| &row.transaction)),
        previous: Totals::from_transactions(previous.iter().map(|row| &row.transaction)),
        categories,
    }
}

#[cfg(test)]
mod monthly_breakdown_tests {
    use time::{Date, Month, macros::date};

    use crate::{
        month::YearMonth,
        transaction::{Totals, Transaction, TransactionType},
    };

    use super::{monthly_breakdown, yearly_totals};

    fn transaction(amount: f64, kind: TransactionType, date: Date) -> Transaction {
        Transaction {
            id: 1,
            date,
            amount,
            kind,
            category_id: None,
            description: String::new(),
            recurring_id: None,
        }
    }

    #[test]
    fn always_has_twelve_months() {
        let months = monthly_breakdown(2024, &[]);

        assert_eq!(months.len(), 12);
        assert_eq!(months[0].month, YearMonth::new(2024, Month::January));
        assert_eq!(months[11].month, YearMonth::new(2024, Month::December));
        assert!(months.iter().all(|month| month.totals == Totals::default()));
    }

    #[test]
    fn sums_into_the_right_month() {
        let transactions = [
            transaction(100.0, TransactionType::Income, date!(2024 - 01 - 31)),
            transaction(40.0, TransactionType::Expense, date!(2024 - 02 - 01)),
            transaction(60.0, TransactionType::Expense, date!(2024 - 02 - 29)),
            transaction(999.0, TransactionType::Income, date!(2023 - 12 - 31)),
        ];

        let months = monthly_breakdown(2024, &transactions);

        assert_eq!(months[0].totals.income, 100.0);
        assert_eq!(months[1].totals.expense, 100.0);
        assert_eq!(months[11].totals, Totals::default());

        let totals = yearly_totals(&months);
        assert_eq!(totals.income, 100.0);
        assert_eq!(totals.expense, 100.0);
        assert_eq!(totals.net(), 0.0);
    }
}

#[cfg(test)]
mod category_trend_tests {
    use time::{Date, Month, macros::date};

    use crate::{
        month::YearMonth,
        transaction::{Transaction, TransactionType},
    };

    use super::category_trend;

    fn expense(amount: f64, date: Date, category_id: Option<i64>) -> Transaction {
        Transaction {
            id: 1,
            date,
            amount,
            kind: TransactionType::Expense,
            category_id,
            description: String::new(),
            recurring_id: None,
        }
    }

    #[test]
    fn covers_six_months_across_a_year_boundary() {
        let trend = category_trend(1, YearMonth::new(2024, Month::March), &[]);

        let months: Vec<YearMonth> = trend.points.iter().map(|point| point.month).collect();
        assert_eq!(
            months,
            vec![
                YearMonth::new(2023, Month::October),
                YearMonth::new(2023, Month::November),
                YearMonth::new(2023, Month::December),
                YearMonth::new(2024, Month::January),
                YearMonth::new(2024, Month::February),
                YearMonth::new(2024, Month::March),
            ]
        );
        assert_eq!(trend.average, 0.0);
        assert_eq!(trend.maximum, 0.0);
    }

    #[test]
    fn only_counts_selected_category() {
        let transactions = [
            expense(120.0, date!(2024 - 03 - 05), Some(1)),
            expense(30.0, date!(2024 - 03 - 20), Some(1)),
            expense(450.0, date!(2024 - 01 - 15), Some(1)),
            expense(1000.0, date!(2024 - 03 - 05), Some(2)),
            expense(80.0, date!(2024 - 02 - 11), None),
            expense(75.0, date!(2023 - 09 - 30), Some(1)),
        ];

        let trend = category_trend(1, YearMonth::new(2024, Month::March), &transactions);

        let totals: Vec<f64> = trend.points.iter().map(|point| point.total).collect();
        assert_eq!(totals, vec![0.0, 0.0, 0.0, 450.0, 0.0, 150.0]);
        assert_eq!(trend.average, 100.0);
        assert_eq!(trend.maximum, 450.0);
    }
}
