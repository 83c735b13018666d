//! Calendar-based week numbering.
//!
//! Week 1 starts on the program start date and weeks advance every seven
//! days. Setting the program to a given week moves the start date so that
//! weeks flip over on a fixed weekday (Sunday unless configured otherwise).

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// How the tracker decides which week is current
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeekMode {
    /// Derived from the program start date
    #[default]
    Date,
    /// First week that still has unlogged days
    Completion,
}

/// Current week for a start date, clamped to `1..=cap`
pub fn date_current_week(start: NaiveDate, today: NaiveDate, cap: u32) -> u32 {
    let days = (today - start).num_days();
    let week = days.div_euclid(7) + 1;
    week.clamp(1, i64::from(cap.max(1))) as u32
}

/// Start date that makes `target_week` the current week as of `today`
///
/// The result is the most recent `week_starts_on` day on or before today,
/// moved back `target_week - 1` whole weeks.
pub fn start_date_for_week(target_week: u32, today: NaiveDate, week_starts_on: Weekday) -> NaiveDate {
    let days_since_boundary = (7 + today.weekday().num_days_from_monday()
        - week_starts_on.num_days_from_monday())
        % 7;
    let boundary = today - Duration::days(i64::from(days_since_boundary));
    boundary - Duration::weeks(i64::from(target_week.saturating_sub(1)))
}

/// Next day on which the week number advances
pub fn next_week_boundary(today: NaiveDate, week_starts_on: Weekday) -> NaiveDate {
    let days_until = (7 + week_starts_on.num_days_from_monday()
        - today.weekday().num_days_from_monday())
        % 7;
    let days_until = if days_until == 0 { 7 } else { days_until };
    today + Duration::days(i64::from(days_until))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_one_on_start_day() {
        let start = date(2024, 1, 7);
        assert_eq!(date_current_week(start, start, 16), 1);
        assert_eq!(date_current_week(start, date(2024, 1, 13), 16), 1);
        assert_eq!(date_current_week(start, date(2024, 1, 14), 16), 2);
    }

    #[test]
    fn test_two_weeks_in_is_week_three() {
        let today = date(2024, 3, 20);
        let start = today - Duration::days(14);
        assert_eq!(date_current_week(start, today, 16), 3);
    }

    #[test]
    fn test_clamped_to_range() {
        let today = date(2024, 3, 20);
        assert_eq!(date_current_week(date(2024, 4, 1), today, 16), 1);
        assert_eq!(date_current_week(date(2020, 1, 1), today, 16), 16);
    }

    #[test]
    fn test_start_date_lands_on_boundary() {
        // 2024-03-20 is a Wednesday; previous Sunday is 2024-03-17
        let today = date(2024, 3, 20);
        assert_eq!(start_date_for_week(1, today, Weekday::Sun), date(2024, 3, 17));
        assert_eq!(start_date_for_week(3, today, Weekday::Sun), date(2024, 3, 3));
        assert_eq!(start_date_for_week(1, today, Weekday::Mon), date(2024, 3, 18));
        assert_eq!(start_date_for_week(1, today, Weekday::Wed), today);
    }

    #[test]
    fn test_start_date_round_trips_through_current_week() {
        let today = date(2024, 3, 23);
        for week in 1..=16 {
            let start = start_date_for_week(week, today, Weekday::Sun);
            assert_eq!(date_current_week(start, today, 16), week);
        }
    }

    #[test]
    fn test_next_week_boundary() {
        let wednesday = date(2024, 3, 20);
        assert_eq!(next_week_boundary(wednesday, Weekday::Sun), date(2024, 3, 24));
        let sunday = date(2024, 3, 24);
        assert_eq!(next_week_boundary(sunday, Weekday::Sun), date(2024, 3, 31));
    }
}
