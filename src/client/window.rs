use std::fmt::Display;

use chrono::{DateTime, Duration, Months, TimeZone, Utc};
use clap::ValueEnum;
use now::DateTimeNow;

/// Selects which trackers get materialized in a listing. Day and week follow
/// the calendar of the caller's time zone, weeks start on Monday.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum TimeWindow {
    #[default]
    All,
    Day,
    Week,
    Month,
}

impl Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeWindow::All => write!(f, "all"),
            TimeWindow::Day => write!(f, "day"),
            TimeWindow::Week => write!(f, "week"),
            TimeWindow::Month => write!(f, "month"),
        }
    }
}

impl TimeWindow {
    /// Translates the selector into the half-open interval used as a query
    /// predicate over tracker start times. `all` carries no interval.
    ///
    /// The result depends on the `now` passed in, so two calls that straddle a
    /// boundary (say midnight) produce different intervals. That's expected.
    pub fn interval<Tz: TimeZone>(&self, now: DateTime<Tz>) -> Option<TimeRange<Tz>> {
        let range = match self {
            TimeWindow::All => return None,
            TimeWindow::Day => TimeRange {
                start: now.clone().beginning_of_day(),
                end: (now + Duration::days(1)).beginning_of_day(),
            },
            TimeWindow::Week => TimeRange {
                start: now.clone().beginning_of_week(),
                end: (now + Duration::weeks(1)).beginning_of_week(),
            },
            TimeWindow::Month => TimeRange {
                start: now.clone().beginning_of_month(),
                end: now.beginning_of_month() + Months::new(1),
            },
        };
        Some(range)
    }
}

/// Half-open `[start, end)` interval over tracker start times.
///
/// Trackers are matched by start time only: one that started yesterday and is
/// still running does not show up in today's window.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeRange<Tz: TimeZone> {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl<Tz: TimeZone> TimeRange<Tz> {
    pub fn contains(&self, moment: &DateTime<Tz>) -> bool {
        &self.start <= moment && moment < &self.end
    }

    /// The service speaks UTC, local intervals get converted right before the
    /// query is issued.
    pub fn to_utc(&self) -> TimeRange<Utc> {
        TimeRange {
            start: self.start.to_utc(),
            end: self.end.to_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{
        Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
    };

    use super::{TimeRange, TimeWindow};

    // A Wednesday.
    const TEST_DATE: NaiveDate = NaiveDate::from_ymd_opt(2024, 4, 3).unwrap();

    fn test_now() -> chrono::DateTime<FixedOffset> {
        Utc.fix().from_utc_datetime(&NaiveDateTime::new(
            TEST_DATE,
            NaiveTime::from_hms_opt(15, 30, 11).unwrap(),
        ))
    }

    fn at_midnight(date: NaiveDate) -> chrono::DateTime<FixedOffset> {
        Utc.fix()
            .from_utc_datetime(&NaiveDateTime::new(date, NaiveTime::MIN))
    }

    #[test]
    fn all_has_no_interval() {
        assert_eq!(TimeWindow::All.interval(test_now()), None);
    }

    #[test]
    fn day_covers_the_current_day() {
        let range = TimeWindow::Day.interval(test_now()).unwrap();

        assert_eq!(range.start, at_midnight(TEST_DATE));
        assert_eq!(
            range.end,
            at_midnight(NaiveDate::from_ymd_opt(2024, 4, 4).unwrap())
        );
    }

    #[test]
    fn week_runs_monday_to_monday() {
        let range = TimeWindow::Week.interval(test_now()).unwrap();

        assert_eq!(
            range.start,
            at_midnight(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap())
        );
        assert_eq!(
            range.end,
            at_midnight(NaiveDate::from_ymd_opt(2024, 4, 8).unwrap())
        );
    }

    #[test]
    fn month_is_a_clean_calendar_month() {
        let range = TimeWindow::Month.interval(test_now()).unwrap();

        assert_eq!(
            range.start,
            at_midnight(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap())
        );
        assert_eq!(
            range.end,
            at_midnight(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
        );
    }

    #[test]
    fn month_crosses_year_end() {
        let december = Utc.fix().from_utc_datetime(&NaiveDateTime::new(
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
            NaiveTime::from_hms_opt(23, 59, 59).unwrap(),
        ));
        let range = TimeWindow::Month.interval(december).unwrap();

        assert_eq!(
            range.start,
            at_midnight(NaiveDate::from_ymd_opt(2023, 12, 1).unwrap())
        );
        assert_eq!(
            range.end,
            at_midnight(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        );
    }

    #[test]
    fn range_is_half_open() {
        let range = TimeWindow::Day.interval(test_now()).unwrap();

        assert!(range.contains(&range.start.clone()));
        assert!(range.contains(&(range.end.clone() - Duration::nanoseconds(1))));
        assert!(!range.contains(&range.end.clone()));
        assert!(!range.contains(&(range.start.clone() - Duration::nanoseconds(1))));
    }

    #[test]
    fn utc_conversion_keeps_the_instant() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let local_midnight = offset
            .with_ymd_and_hms(2024, 4, 3, 0, 0, 0)
            .unwrap();
        let range = TimeRange {
            start: local_midnight.clone(),
            end: local_midnight + Duration::days(1),
        };

        let utc = range.to_utc();
        assert_eq!(
            utc.start,
            Utc.with_ymd_and_hms(2024, 4, 2, 22, 0, 0).unwrap()
        );
        assert_eq!(utc.end, Utc.with_ymd_and_hms(2024, 4, 3, 22, 0, 0).unwrap());
    }
}
