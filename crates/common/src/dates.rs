//! UTC calendar helpers.
//!
//! Streaks, leaderboards and diary validation all reason about calendar days
//! in UTC, so the boundaries live in one place.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, TimeZone, Utc};

/// Today's date in UTC.
#[must_use]
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// The day before `date`, saturating at the minimum representable date.
#[must_use]
pub fn yesterday_of(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(1)).unwrap_or(date)
}

/// Whether `last` keeps a streak alive on `today`.
#[must_use]
pub fn is_today_or_yesterday(last: NaiveDate, today: NaiveDate) -> bool {
    last == today || last == yesterday_of(today)
}

/// Midnight UTC of the Monday starting the week containing `now`.
#[must_use]
pub fn week_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let date = now.date_naive();
    let offset = u64::from(date.weekday().num_days_from_monday());
    let monday = date.checked_sub_days(Days::new(offset)).unwrap_or(date);
    midnight(monday)
}

/// Midnight UTC of the first day of the month containing `now`.
#[must_use]
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let date = now.date_naive();
    let first = date.with_day(1).unwrap_or(date);
    midnight(first)
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_today_or_yesterday() {
        let today = date(2024, 3, 1);
        assert!(is_today_or_yesterday(today, today));
        assert!(is_today_or_yesterday(date(2024, 2, 29), today));
        assert!(!is_today_or_yesterday(date(2024, 2, 28), today));
        assert!(!is_today_or_yesterday(date(2024, 3, 2), today));
    }

    #[test]
    fn test_week_starts_on_monday() {
        // 2024-06-13 is a Thursday.
        let now = Utc.with_ymd_and_hms(2024, 6, 13, 15, 30, 0).unwrap();
        let start = week_start(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap());

        // A Monday is its own week start.
        let monday = Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 1).unwrap();
        assert_eq!(week_start(monday), start);
    }

    #[test]
    fn test_sunday_belongs_to_previous_monday() {
        let sunday = Utc.with_ymd_and_hms(2024, 6, 16, 23, 59, 59).unwrap();
        assert_eq!(
            week_start(sunday),
            Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_month_start() {
        let now = Utc.with_ymd_and_hms(2024, 2, 29, 8, 0, 0).unwrap();
        assert_eq!(
            month_start(now),
            Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()
        );
    }
}
