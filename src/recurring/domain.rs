//! The recurring transaction definitions that the generator turns into ledger transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, category::CategoryId, transaction::TransactionType};

/// Database identifier for a recurring transaction.
pub type RecurringId = i64;

/// How often a recurring transaction is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Once per calendar month, on [RecurringTransaction::day_of_month].
    Monthly,
    /// Once per seven days.
    Weekly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Monthly => "monthly",
            Frequency::Weekly => "weekly",
        }
    }
}

impl Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Frequency::Monthly => write!(f, "Monthly"),
            Frequency::Weekly => write!(f, "Weekly"),
        }
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "monthly" => Ok(Frequency::Monthly),
            "weekly" => Ok(Frequency::Weekly),
            other => Err(format!("unknown frequency {other:?}")),
        }
    }
}

impl ToSql for Frequency {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Frequency {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: String| FromSqlError::Other(error.into()))
    }
}

/// The day of the month a monthly transaction is generated on, from 1 to 31.
///
/// Days past the end of a short month fall on the last day of that month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct DayOfMonth(u8);

impl DayOfMonth {
    /// # Errors
    /// Returns [Error::InvalidDayOfMonth] if `day` is not between 1 and 31.
    pub fn new(day: u8) -> Result<Self, Error> {
        if (1..=31).contains(&day) {
            Ok(Self(day))
        } else {
            Err(Error::InvalidDayOfMonth(day))
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl Default for DayOfMonth {
    fn default() -> Self {
        Self(1)
    }
}

impl Display for DayOfMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql for DayOfMonth {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for DayOfMonth {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let day = value.as_i64()?;

        u8::try_from(day)
            .ok()
            .and_then(|day| DayOfMonth::new(day).ok())
            .ok_or(FromSqlError::OutOfRange(day))
    }
}

/// A template for an income or expense that is added to the ledger automatically.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecurringTransaction {
    pub id: RecurringId,
    pub kind: TransactionType,
    /// The amount of each generated transaction, always greater than zero.
    pub amount: f64,
    pub category_id: Option<CategoryId>,
    /// Empty when the user did not give a description.
    pub description: String,
    pub frequency: Frequency,
    /// Only used by monthly transactions, weekly transactions store the default.
    pub day_of_month: DayOfMonth,
    /// Inactive transactions are never generated.
    pub is_active: bool,
    /// The date of the most recent transaction generated from this one.
    pub last_generated: Option<Date>,
}

/// A recurring transaction together with the name of its category.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurringTransactionWithCategory {
    pub recurring: RecurringTransaction,
    /// `None` for uncategorized recurring transactions.
    pub category_name: Option<String>,
}

/// The user editable fields of a recurring transaction.
///
/// New recurring transactions start out active and have never been generated.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecurringTransaction {
    /// Whether the generated transactions are income or expenses.
    pub kind: TransactionType,
    /// The amount of each generated transaction, always positive.
    pub amount: f64,
    pub category_id: Option<CategoryId>,
    pub description: String,
    pub frequency: Frequency,
    /// The day a monthly transaction is generated on.
    pub day_of_month: DayOfMonth,
}

impl NewRecurringTransaction {
    /// Weekly transactions ignore `day_of_month` and store the default day.
    pub fn new(
        amount: f64,
        kind: TransactionType,
        frequency: Frequency,
        day_of_month: DayOfMonth,
    ) -> Self {
        let day_of_month = match frequency {
            Frequency::Monthly => day_of_month,
            Frequency::Weekly => DayOfMonth::default(),
        };

        Self {
            kind,
            amount,
            category_id: None,
            description: String::new(),
            frequency,
            day_of_month,
        }
    }

    pub fn category_id(mut self, category_id: Option<CategoryId>) -> Self {
        self.category_id = category_id;
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        description.trim().clone_into(&mut self.description);
        self
    }
}
