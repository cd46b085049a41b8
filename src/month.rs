//! Calendar months, used to select which period the ledger pages show.

use std::{fmt::Display, str::FromStr};

use maud::{Markup, html};
use serde::Deserialize;
use time::{Date, Month};

use crate::{Error, html::LINK_STYLE};

/// A calendar month in a specific year, e.g. March 2024.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: Month,
}

impl YearMonth {
    pub const fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    /// The month that `date` falls in.
    pub fn from_date(date: Date) -> Self {
        Self::new(date.year(), date.month())
    }

    pub const fn year(&self) -> i32 {
        self.year
    }

    pub const fn month(&self) -> Month {
        self.month
    }

    pub fn first_day(&self) -> Date {
        first_day_of_month(self.year, self.month)
    }

    pub fn last_day(&self) -> Date {
        last_day_of_month(self.year, self.month)
    }

    /// The month before this one, December of the previous year for January.
    pub fn previous(&self) -> Self {
        match self.month {
            Month::January => Self::new(self.year - 1, Month::December),
            month => Self::new(self.year, month.previous()),
        }
    }

    /// The month after this one, January of the next year for December.
    pub fn next(&self) -> Self {
        match self.month {
            Month::December => Self::new(self.year + 1, Month::January),
            month => Self::new(self.year, month.next()),
        }
    }

    /// The month `count` months before this one.
    pub fn months_back(&self, count: u32) -> Self {
        (0..count).fold(*self, |month, _| month.previous())
    }

    /// A human readable label, e.g. "March 2024".
    pub fn label(&self) -> String {
        format!("{} {}", self.month, self.year)
    }

    /// A short label for chart axes, e.g. "Mar 24".
    pub fn short_label(&self) -> String {
        let month = self.month.to_string();
        let year = self.year.rem_euclid(100);

        format!("{} {year:02}", &month[..3])
    }
}

/// Formats as the query string value "YYYY-MM".
impl Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month as u8)
    }
}

impl FromStr for YearMonth {
    type Err = Error;

    /// Parses "YYYY-MM", e.g. "2024-03".
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidMonth(text.to_owned());

        let (year, month) = text.trim().split_once('-').ok_or_else(invalid)?;

        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u8 = month.parse().map_err(|_| invalid())?;
        let month = Month::try_from(month).map_err(|_| invalid())?;

        Ok(Self::new(year, month))
    }
}

/// Parses an optional "YYYY-MM" query parameter, falling back to the month of `today`.
pub fn month_or_current(month: Option<&str>, today: Date) -> Result<YearMonth, Error> {
    match month {
        Some(month) if !month.is_empty() => month.parse(),
        _ => Ok(YearMonth::from_date(today)),
    }
}

/// The query parameters for pages that show a single month.
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    /// The month to show as "YYYY-MM", defaults to the current month.
    pub month: Option<String>,
}

/// Links to the previous and next month around the label of `month`.
pub fn month_navigation(route: &str, month: YearMonth) -> Markup {
    html! {
        nav class="flex items-center justify-between gap-4 w-full" aria-label="Month navigation"
        {
            a
                href={ (route) "?month=" (month.previous()) }
                class=(LINK_STYLE)
                rel="prev"
            {
                "← " (month.previous().label())
            }

            h2 class="text-lg font-semibold" { (month.label()) }

            a
                href={ (route) "?month=" (month.next()) }
                class=(LINK_STYLE)
                rel="next"
            {
                (month.next().label()) " →"
            }
        }
    }
}

pub fn first_day_of_month(year: i32, month: Month) -> Date {
    // Every month has a first day, so this only fails for years outside the supported range.
    Date::from_calendar_date(year, month, 1).unwrap_or(Date::MIN)
}

/// The last day of the month, e.g. 29 February for 2024.
pub fn last_day_of_month(year: i32, month: Month) -> Date {
    let next_month = YearMonth::new(year, month).next();

    next_month
        .first_day()
        .previous_day()
        .unwrap_or_else(|| first_day_of_month(year, month))
}
