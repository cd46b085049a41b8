//! Decides when a recurring transaction is due and what it generates.

use std::fmt::Display;

use time::{Date, Duration};

use crate::{
    category::CategoryId,
    month::last_day_of_month,
    recurring::{DayOfMonth, Frequency, RecurringId, RecurringTransaction},
    transaction::{Transaction, TransactionBuilder, TransactionType},
};

/// Appended to the description of every generated transaction.
const AUTOMATIC_SUFFIX: &str = "(automatic)";

/// Why a recurring transaction was not generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Inactive,
    AlreadyGeneratedThisMonth,
    DayNotReached,
    GeneratedWithinWeek,
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Inactive => write!(f, "inactive"),
            SkipReason::AlreadyGeneratedThisMonth => write!(f, "already generated this month"),
            SkipReason::DayNotReached => write!(f, "day of the month not reached yet"),
            SkipReason::GeneratedWithinWeek => write!(f, "generated in the last seven days"),
        }
    }
}

/// The ledger transaction to create for a recurring transaction that is due.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedTransaction {
    pub recurring_id: RecurringId,
    pub date: Date,
    pub amount: f64,
    pub kind: TransactionType,
    pub category_id: Option<CategoryId>,
    pub description: String,
}

impl GeneratedTransaction {
    /// The transaction to insert, linked back to its recurring transaction.
    pub fn to_builder(&self) -> TransactionBuilder {
        Transaction::build(self.amount, self.kind, self.date, &self.description)
            .category_id(self.category_id)
            .recurring_id(Some(self.recurring_id))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationDecision {
    Skip(SkipReason),
    Generate(GeneratedTransaction),
}

/// Decide whether `recurring` is due on `today`.
///
/// Monthly transactions are due once per calendar month, once `today` reaches
/// their day of the month. The generated date is that day in the current month,
/// or the last day of the month when the month is shorter.
///
/// Weekly transactions are due when they have not been generated in the seven
/// days before `today`, and are dated `today`.
pub fn evaluate(recurring: &RecurringTransaction, today: Date) -> GenerationDecision {
    if !recurring.is_active {
        return GenerationDecision::Skip(SkipReason::Inactive);
    }

    let date = match recurring.frequency {
        Frequency::Monthly => {
            match monthly_date(recurring.day_of_month, recurring.last_generated, today) {
                Ok(date) => date,
                Err(reason) => return GenerationDecision::Skip(reason),
            }
        }
        Frequency::Weekly => match weekly_date(recurring.last_generated, today) {
            Ok(date) => date,
            Err(reason) => return GenerationDecision::Skip(reason),
        },
    };

    GenerationDecision::Generate(GeneratedTransaction {
        recurring_id: recurring.id,
        date,
        amount: recurring.amount,
        kind: recurring.kind,
        category_id: recurring.category_id,
        description: generated_description(&recurring.description, recurring.frequency),
    })
}

fn monthly_date(
    day_of_month: DayOfMonth,
    last_generated: Option<Date>,
    today: Date,
) -> Result<Date, SkipReason> {
    let generated_this_month = last_generated.is_some_and(|last_generated| {
        (last_generated.year(), last_generated.month()) == (today.year(), today.month())
    });

    if generated_this_month {
        return Err(SkipReason::AlreadyGeneratedThisMonth);
    }

    let last_day = last_day_of_month(today.year(), today.month());
    let target_day = day_of_month.get().min(last_day.day());

    if today.day() < target_day {
        return Err(SkipReason::DayNotReached);
    }

    Ok(today.replace_day(target_day).unwrap_or(last_day))
}

fn weekly_date(last_generated: Option<Date>, today: Date) -> Result<Date, SkipReason> {
    let week_ago = today.saturating_sub(Duration::days(7));

    match last_generated {
        Some(last_generated) if last_generated > week_ago => Err(SkipReason::GeneratedWithinWeek),
        _ => Ok(today),
    }
}

fn generated_description(description: &str, frequency: Frequency) -> String {
    let description = description.trim();

    if !description.is_empty() {
        return format!("{description} {AUTOMATIC_SUFFIX}");
    }

    match frequency {
        Frequency::Monthly => "Automatic recurring transaction".to_owned(),
        Frequency::Weekly => "Automatic weekly transaction".to_owned(),
    }
}

#[cfg(test)]
mod evaluate_tests {
    use time::{Date, macros::date};

    use crate::{
        recurring::{DayOfMonth, Frequency, RecurringTransaction},
        transaction::TransactionType,
    };

    use super::{GeneratedTransaction, GenerationDecision, SkipReason, evaluate};

    fn monthly(day: u8, last_generated: Option<Date>) -> RecurringTransaction {
        RecurringTransaction {
            id: 1,
            kind: TransactionType::Expense,
            amount: 1200.0,
            category_id: Some(3),
            description: "Shop rent".to_owned(),
            frequency: Frequency::Monthly,
            day_of_month: DayOfMonth::new(day).unwrap(),
            is_active: true,
            last_generated,
        }
    }

    fn weekly(last_generated: Option<Date>) -> RecurringTransaction {
        RecurringTransaction {
            id: 2,
            kind: TransactionType::Income,
            amount: 350.0,
            category_id: None,
            description: String::new(),
            frequency: Frequency::Weekly,
            day_of_month: DayOfMonth::default(),
            is_active: true,
            last_generated,
        }
    }

    fn generated_date(decision: GenerationDecision) -> Date {
        match decision {
            GenerationDecision::Generate(generated) => generated.date,
            GenerationDecision::Skip(reason) => panic!("want Generate, got Skip({reason})"),
        }
    }

    #[test]
    fn monthly_generates_on_target_day_of_current_month() {
        let decision = evaluate(&monthly(5, None), date!(2024 - 03 - 10));

        assert_eq!(
            decision,
            GenerationDecision::Generate(GeneratedTransaction {
                recurring_id: 1,
                date: date!(2024 - 03 - 05),
                amount: 1200.0,
                kind: TransactionType::Expense,
                category_id: Some(3),
                description: "Shop rent (automatic)".to_owned(),
            })
        );
    }

    #[test]
    fn monthly_skips_when_generated_this_month() {
        let recurring = monthly(5, Some(date!(2024 - 03 - 05)));

        let decision = evaluate(&recurring, date!(2024 - 03 - 20));

        assert_eq!(
            decision,
            GenerationDecision::Skip(SkipReason::AlreadyGeneratedThisMonth)
        );
    }

    #[test]
    fn monthly_skips_before_target_day() {
        let decision = evaluate(&monthly(20, None), date!(2024 - 03 - 10));

        assert_eq!(decision, GenerationDecision::Skip(SkipReason::DayNotReached));
    }

    #[test]
    fn monthly_generates_on_the_target_day_itself() {
        let decision = evaluate(&monthly(10, None), date!(2024 - 03 - 10));

        assert_eq!(generated_date(decision), date!(2024 - 03 - 10));
    }

    #[test]
    fn monthly_compares_year_as_well_as_month() {
        let recurring = monthly(5, Some(date!(2023 - 03 - 05)));

        let decision = evaluate(&recurring, date!(2024 - 03 - 10));

        assert_eq!(generated_date(decision), date!(2024 - 03 - 05));
    }

    #[test]
    fn monthly_generated_last_month_is_due_again() {
        let recurring = monthly(5, Some(date!(2024 - 02 - 05)));

        let decision = evaluate(&recurring, date!(2024 - 03 - 05));

        assert_eq!(generated_date(decision), date!(2024 - 03 - 05));
    }

    #[test]
    fn monthly_skip_for_same_month_ignores_day() {
        // Generated late in the month, the earlier target day must not trigger again.
        let recurring = monthly(1, Some(date!(2024 - 03 - 28)));

        let decision = evaluate(&recurring, date!(2024 - 03 - 31));

        assert_eq!(
            decision,
            GenerationDecision::Skip(SkipReason::AlreadyGeneratedThisMonth)
        );
    }

    #[test]
    fn monthly_day_past_end_of_month_is_clamped() {
        let decision = evaluate(&monthly(31, None), date!(2024 - 04 - 30));

        assert_eq!(generated_date(decision), date!(2024 - 04 - 30));
    }

    #[test]
    fn monthly_clamp_handles_leap_years() {
        let leap_year = evaluate(&monthly(30, None), date!(2024 - 02 - 29));
        let common_year = evaluate(&monthly(30, None), date!(2023 - 02 - 28));

        assert_eq!(generated_date(leap_year), date!(2024 - 02 - 29));
        assert_eq!(generated_date(common_year), date!(2023 - 02 - 28));
    }

    #[test]
    fn monthly_clamped_day_is_not_reached_before_month_end() {
        let decision = evaluate(&monthly(31, None), date!(2024 - 04 - 29));

        assert_eq!(decision, GenerationDecision::Skip(SkipReason::DayNotReached));
    }

    #[test]
    fn weekly_generates_after_more_than_seven_days() {
        let recurring = weekly(Some(date!(2024 - 03 - 01)));

        let decision = evaluate(&recurring, date!(2024 - 03 - 09));

        assert_eq!(generated_date(decision), date!(2024 - 03 - 09));
    }

    #[test]
    fn weekly_skips_within_seven_days() {
        let recurring = weekly(Some(date!(2024 - 03 - 05)));

        let decision = evaluate(&recurring, date!(2024 - 03 - 09));

        assert_eq!(
            decision,
            GenerationDecision::Skip(SkipReason::GeneratedWithinWeek)
        );
    }

    #[test]
    fn weekly_generates_exactly_seven_days_later() {
        let recurring = weekly(Some(date!(2024 - 03 - 02)));

        let decision = evaluate(&recurring, date!(2024 - 03 - 09));

        assert_eq!(generated_date(decision), date!(2024 - 03 - 09));
    }

    #[test]
    fn weekly_skips_six_days_later() {
        let recurring = weekly(Some(date!(2024 - 03 - 03)));

        let decision = evaluate(&recurring, date!(2024 - 03 - 09));

        assert_eq!(
            decision,
            GenerationDecision::Skip(SkipReason::GeneratedWithinWeek)
        );
    }

    #[test]
    fn weekly_never_generated_is_due_today() {
        let decision = evaluate(&weekly(None), date!(2024 - 03 - 09));

        assert_eq!(
            decision,
            GenerationDecision::Generate(GeneratedTransaction {
                recurring_id: 2,
                date: date!(2024 - 03 - 09),
                amount: 350.0,
                kind: TransactionType::Income,
                category_id: None,
                description: "Automatic weekly transaction".to_owned(),
            })
        );
    }

    #[test]
    fn monthly_without_description_gets_default() {
        let mut recurring = monthly(1, None);
        recurring.description = "   ".to_owned();

        let decision = evaluate(&recurring, date!(2024 - 03 - 01));

        match decision {
            GenerationDecision::Generate(generated) => {
                assert_eq!(generated.description, "Automatic recurring transaction")
            }
            skip => panic!("want Generate, got {skip:?}"),
        }
    }

    #[test]
    fn inactive_is_skipped() {
        let mut recurring = monthly(1, None);
        recurring.is_active = false;

        let decision = evaluate(&recurring, date!(2024 - 03 - 10));

        assert_eq!(decision, GenerationDecision::Skip(SkipReason::Inactive));
    }

    #[test]
    fn generated_builder_links_recurring_transaction() {
        let GenerationDecision::Generate(generated) =
            evaluate(&monthly(5, None), date!(2024 - 03 - 10))
        else {
            panic!("want Generate");
        };

        let builder = generated.to_builder();

        assert_eq!(builder.recurring_id, Some(1));
        assert_eq!(builder.category_id, Some(3));
        assert_eq!(builder.date, date!(2024 - 03 - 05));
        assert_eq!(builder.description, "Shop rent (automatic)");
    }
}
