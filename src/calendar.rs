//! Business-day calendar
//!
//! All alignment, lagging and horizon arithmetic in the pipeline runs on a
//! single Monday-to-Friday calendar built once per run and passed explicitly
//! to each stage.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::error::{PipelineError, Result};

/// Check whether a date falls on a weekday
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// The first business day on or after `date`
pub fn next_business_day_on_or_after(date: NaiveDate) -> NaiveDate {
    let mut day = date;
    while !is_business_day(day) {
        day += Duration::days(1);
    }
    day
}

/// Advance `date` by `n` business days
///
/// With `n == 0` the date is returned unchanged, weekend or not.
pub fn add_business_days(date: NaiveDate, n: usize) -> NaiveDate {
    let mut day = date;
    for _ in 0..n {
        day += Duration::days(1);
        while !is_business_day(day) {
            day += Duration::days(1);
        }
    }
    day
}

/// Canonical business-day index for one pipeline run
#[derive(Debug, Clone)]
pub struct BusinessCalendar {
    days: Vec<NaiveDate>,
    index: HashMap<NaiveDate, usize>,
}

impl BusinessCalendar {
    /// Materialize every business day in `[start, end]`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(PipelineError::Config(format!(
                "calendar start {start} is after end {end}"
            )));
        }

        let mut days = Vec::new();
        let mut day = start;
        while day <= end {
            if is_business_day(day) {
                days.push(day);
            }
            day += Duration::days(1);
        }

        if days.is_empty() {
            return Err(PipelineError::Config(format!(
                "no business days between {start} and {end}"
            )));
        }

        let index = days.iter().enumerate().map(|(i, d)| (*d, i)).collect();
        Ok(Self { days, index })
    }

    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn start(&self) -> NaiveDate {
        self.days[0]
    }

    pub fn end(&self) -> NaiveDate {
        self.days[self.days.len() - 1]
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.index.contains_key(&date)
    }

    /// Position of an exact calendar date
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.index.get(&date).copied()
    }

    /// Position of the first calendar date on or after `date`
    ///
    /// Returns `None` when `date` is past the end of the calendar.
    pub fn position_on_or_after(&self, date: NaiveDate) -> Option<usize> {
        let pos = self.days.partition_point(|d| *d < date);
        if pos < self.days.len() {
            Some(pos)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_calendar_skips_weekends() {
        // 2024-01-01 is a Monday
        let cal = BusinessCalendar::new(date(2024, 1, 1), date(2024, 1, 14)).unwrap();
        assert_eq!(cal.len(), 10);
        assert!(cal.contains(date(2024, 1, 5)));
        assert!(!cal.contains(date(2024, 1, 6))); // Saturday
        assert_eq!(cal.start(), date(2024, 1, 1));
        assert_eq!(cal.end(), date(2024, 1, 12));
    }

    #[test]
    fn test_add_business_days_over_weekend() {
        // Friday + 2 business days lands on Tuesday
        assert_eq!(add_business_days(date(2024, 1, 5), 2), date(2024, 1, 9));
        // n = 0 leaves the date untouched
        assert_eq!(add_business_days(date(2024, 1, 6), 0), date(2024, 1, 6));
    }

    #[test]
    fn test_next_business_day_on_or_after() {
        assert_eq!(
            next_business_day_on_or_after(date(2024, 1, 6)),
            date(2024, 1, 8)
        );
        assert_eq!(
            next_business_day_on_or_after(date(2024, 1, 8)),
            date(2024, 1, 8)
        );
    }

    #[test]
    fn test_position_on_or_after() {
        let cal = BusinessCalendar::new(date(2024, 1, 1), date(2024, 1, 12)).unwrap();
        assert_eq!(cal.position_on_or_after(date(2024, 1, 6)), Some(5)); // Sat -> Mon 8th
        assert_eq!(cal.position_on_or_after(date(2023, 12, 1)), Some(0));
        assert_eq!(cal.position_on_or_after(date(2024, 2, 1)), None);
    }

    #[test]
    fn test_rejects_reversed_range() {
        assert!(BusinessCalendar::new(date(2024, 2, 1), date(2024, 1, 1)).is_err());
    }
}
