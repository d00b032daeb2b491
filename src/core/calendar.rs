//! # Business Calendar
//!
//! Business-day arithmetic with weekend and holiday rules.
//!
//! Used for settlement date calculations (T+1, T+2, etc.). Supports
//! explicit holiday dates and recurring (month, day) holidays, with
//! factory presets for the NYSE, LSE, and TSE calendars.
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use synthex::core::BusinessCalendar;
//!
//! let calendar = BusinessCalendar::nyse();
//! let friday = NaiveDate::from_ymd_opt(2026, 7, 31).unwrap();
//!
//! // T+2 from a Friday lands on the following Tuesday.
//! let settle = calendar.add_business_days(friday, 2);
//! assert_eq!(settle, NaiveDate::from_ymd_opt(2026, 8, 4).unwrap());
//! ```

use crate::domain::errors::{HarnessError, HarnessResult};
use chrono::{Datelike, Days, NaiveDate, Weekday};
use std::collections::HashSet;
use std::fmt;
use tracing::trace;

/// Business calendar with explicit and recurring holiday sets.
///
/// # Invariants
///
/// - A date is a non-business day iff it is a Saturday or Sunday, a member
///   of the explicit holiday set, or its (month, day) is in the recurring
///   holiday set
/// - Membership tests are O(1)
#[derive(Debug, Clone)]
pub struct BusinessCalendar {
    name: String,
    holidays: HashSet<NaiveDate>,
    recurring_holidays: HashSet<(u32, u32)>,
}

impl BusinessCalendar {
    /// Creates an empty calendar (weekends only) with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            holidays: HashSet::new(),
            recurring_holidays: HashSet::new(),
        }
    }

    /// Creates a NYSE calendar with the standard recurring US holidays.
    ///
    /// Recurring dates only; explicit-date holidays are caller-supplied.
    #[must_use]
    pub fn nyse() -> Self {
        Self::new("NYSE")
            .with_recurring_holiday(1, 1) // New Year's Day
            .with_recurring_holiday(7, 4) // Independence Day
            .with_recurring_holiday(12, 25) // Christmas Day
    }

    /// Creates an LSE calendar with the standard recurring UK holidays.
    #[must_use]
    pub fn lse() -> Self {
        Self::new("LSE")
            .with_recurring_holiday(1, 1) // New Year's Day
            .with_recurring_holiday(12, 25) // Christmas Day
            .with_recurring_holiday(12, 26) // Boxing Day
    }

    /// Creates a TSE calendar with the standard recurring Japanese holidays.
    #[must_use]
    pub fn tse() -> Self {
        Self::new("TSE")
            .with_recurring_holiday(1, 1) // New Year's Day
            .with_recurring_holiday(1, 2) // Bank Holiday
            .with_recurring_holiday(1, 3) // Bank Holiday
            .with_recurring_holiday(12, 31) // New Year's Eve
    }

    /// Adds a specific holiday date.
    #[must_use]
    pub fn with_holiday(mut self, date: NaiveDate) -> Self {
        self.holidays.insert(date);
        self
    }

    /// Adds a recurring holiday (same month/day every year).
    #[must_use]
    pub fn with_recurring_holiday(mut self, month: u32, day: u32) -> Self {
        self.recurring_holidays.insert((month, day));
        self
    }

    /// Returns the calendar name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Checks if a given date is a business day.
    #[must_use]
    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            return false;
        }
        if self.holidays.contains(&date) {
            return false;
        }
        !self.recurring_holidays.contains(&(date.month(), date.day()))
    }

    /// Adds the specified number of business days to the given date.
    ///
    /// Skips weekends and holidays. Adding zero days returns the start date
    /// unchanged; for `business_days >= 1` the result is always a business
    /// day.
    #[must_use]
    pub fn add_business_days(&self, start_date: NaiveDate, business_days: u32) -> NaiveDate {
        let mut date = start_date;
        let mut added = 0;
        while added < business_days {
            date = date + Days::new(1);
            if self.is_business_day(date) {
                added += 1;
            }
        }
        trace!(
            calendar = %self.name,
            start = %start_date,
            days = business_days,
            result = %date,
            "Added business days"
        );
        date
    }

    /// Counts the business days in the interval `(start, end]`.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::InvalidRange` if `end` is before `start`.
    pub fn business_days_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> HarnessResult<u32> {
        if end < start {
            return Err(HarnessError::InvalidRange(format!(
                "end date {} is before start date {}",
                end, start
            )));
        }
        let mut count = 0;
        let mut date = start;
        while date < end {
            date = date + Days::new(1);
            if self.is_business_day(date) {
                count += 1;
            }
        }
        Ok(count)
    }
}

impl Default for BusinessCalendar {
    fn default() -> Self {
        Self::new("DEFAULT")
    }
}

impl fmt::Display for BusinessCalendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BusinessCalendar{{name='{}', holidays={}, recurring={}}}",
            self.name,
            self.holidays.len(),
            self.recurring_holidays.len(),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    mod business_days {
        use super::*;

        #[test]
        fn weekdays_are_business_days() {
            let calendar = BusinessCalendar::default();
            // 2026-08-03 is a Monday
            for offset in 0..5 {
                assert!(calendar.is_business_day(date(2026, 8, 3 + offset)));
            }
        }

        #[test]
        fn weekends_are_not_business_days() {
            let calendar = BusinessCalendar::default();
            assert!(!calendar.is_business_day(date(2026, 8, 1))); // Saturday
            assert!(!calendar.is_business_day(date(2026, 8, 2))); // Sunday
        }

        #[test]
        fn explicit_holiday_is_not_business_day() {
            let calendar = BusinessCalendar::default().with_holiday(date(2026, 8, 5));
            assert!(!calendar.is_business_day(date(2026, 8, 5)));
            assert!(calendar.is_business_day(date(2026, 8, 6)));
        }

        #[test]
        fn recurring_holiday_applies_every_year() {
            let calendar = BusinessCalendar::default().with_recurring_holiday(12, 25);
            assert!(!calendar.is_business_day(date(2025, 12, 25))); // Thursday
            assert!(!calendar.is_business_day(date(2026, 12, 25))); // Friday
        }
    }

    mod add_business_days {
        use super::*;

        #[test]
        fn zero_days_returns_start() {
            let calendar = BusinessCalendar::default();
            let start = date(2026, 8, 3);
            assert_eq!(calendar.add_business_days(start, 0), start);
        }

        #[test]
        fn skips_weekend() {
            let calendar = BusinessCalendar::default();
            // Friday + 2 business days = Tuesday
            let friday = date(2026, 7, 31);
            assert_eq!(calendar.add_business_days(friday, 2), date(2026, 8, 4));
        }

        #[test]
        fn skips_explicit_holiday() {
            // Dec 25 2026 is a Friday; Thursday + 1 business day = Monday
            let calendar = BusinessCalendar::default().with_holiday(date(2026, 12, 25));
            let thursday = date(2026, 12, 24);
            assert_eq!(calendar.add_business_days(thursday, 1), date(2026, 12, 28));
        }

        #[test]
        fn result_is_business_day_when_n_positive() {
            let calendar = BusinessCalendar::nyse();
            let mut start = date(2026, 1, 1);
            for n in 1..10 {
                let result = calendar.add_business_days(start, n);
                assert!(calendar.is_business_day(result));
                start = start + Days::new(3);
            }
        }

        #[test]
        fn adding_zero_to_result_is_idempotent() {
            let calendar = BusinessCalendar::nyse();
            let start = date(2026, 7, 2);
            let settled = calendar.add_business_days(start, 2);
            assert_eq!(calendar.add_business_days(settled, 0), settled);
        }
    }

    mod business_days_between {
        use super::*;

        #[test]
        fn counts_exclusive_of_start() {
            let calendar = BusinessCalendar::default();
            // Monday to Friday of the same week: Tue, Wed, Thu, Fri
            let count = calendar
                .business_days_between(date(2026, 8, 3), date(2026, 8, 7))
                .unwrap();
            assert_eq!(count, 4);
        }

        #[test]
        fn full_week_spans_weekend() {
            let calendar = BusinessCalendar::default();
            let count = calendar
                .business_days_between(date(2026, 8, 3), date(2026, 8, 10))
                .unwrap();
            assert_eq!(count, 5);
        }

        #[test]
        fn same_day_is_zero() {
            let calendar = BusinessCalendar::default();
            let d = date(2026, 8, 3);
            assert_eq!(calendar.business_days_between(d, d).unwrap(), 0);
        }

        #[test]
        fn end_before_start_fails() {
            let calendar = BusinessCalendar::default();
            let result = calendar.business_days_between(date(2026, 8, 7), date(2026, 8, 3));
            assert!(matches!(result, Err(HarnessError::InvalidRange(_))));
        }
    }

    mod presets {
        use super::*;

        #[test]
        fn nyse_recurring_holidays() {
            let calendar = BusinessCalendar::nyse();
            assert_eq!(calendar.name(), "NYSE");
            assert!(!calendar.is_business_day(date(2026, 1, 1))); // Thursday
            assert!(!calendar.is_business_day(date(2025, 7, 4))); // Friday
            assert!(!calendar.is_business_day(date(2026, 12, 25))); // Friday
        }

        #[test]
        fn lse_boxing_day() {
            let calendar = BusinessCalendar::lse();
            assert!(!calendar.is_business_day(date(2025, 12, 26))); // Friday
        }

        #[test]
        fn tse_new_year_window() {
            let calendar = BusinessCalendar::tse();
            assert!(!calendar.is_business_day(date(2025, 12, 31))); // Wednesday
            assert!(!calendar.is_business_day(date(2026, 1, 1))); // Thursday
            assert!(!calendar.is_business_day(date(2026, 1, 2))); // Friday
        }
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn weekends_never_business_days(offset in 0u64..3650) {
                let calendar = BusinessCalendar::nyse();
                let d = date(2020, 1, 4) + Days::new(offset * 7); // Saturdays
                prop_assert!(!calendar.is_business_day(d));
                prop_assert!(!calendar.is_business_day(d + Days::new(1))); // Sundays
            }

            #[test]
            fn add_then_zero_is_identity(offset in 0u64..1000, n in 1u32..30) {
                let calendar = BusinessCalendar::nyse();
                let start = date(2024, 1, 1) + Days::new(offset);
                let settled = calendar.add_business_days(start, n);
                prop_assert_eq!(calendar.add_business_days(settled, 0), settled);
                prop_assert!(calendar.is_business_day(settled));
            }
        }
    }
}
