use chrono::{DateTime, Duration, Local, Utc};

use crate::client::entities::TrackerEntity;

const TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// One line per tracker with a humanized elapsed column. Elapsed is computed
/// against the `now` passed in, so running trackers keep growing between
/// listings while stopped ones never move again.
pub fn print_trackers(trackers: &[TrackerEntity], now: DateTime<Utc>) {
    for tracker in trackers {
        println!("{}", tracker_line(tracker, now));
    }
}

pub fn print_tracker(tracker: &TrackerEntity, now: DateTime<Utc>) {
    println!("id:      {}", tracker.id);
    println!("name:    {}", tracker.name);
    println!("start:   {}", local_timestamp(tracker.start));
    println!("end:     {}", end_column(tracker));
    println!("elapsed: {}", humanize_duration(tracker.elapsed(now)));
    println!("version: {}", tracker.version);
}

fn tracker_line(tracker: &TrackerEntity, now: DateTime<Utc>) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}",
        tracker.id,
        tracker.name,
        local_timestamp(tracker.start),
        end_column(tracker),
        humanize_duration(tracker.elapsed(now)),
    )
}

fn local_timestamp(moment: DateTime<Utc>) -> String {
    moment.with_timezone(&Local).format(TIME_FORMAT).to_string()
}

fn end_column(tracker: &TrackerEntity) -> String {
    match tracker.end {
        Some(end) => local_timestamp(end),
        None => "ongoing".to_string(),
    }
}

/// Rough duration for humans, largest whole unit only. 90 seconds reads
/// "1 minute", a stopped hour reads exactly "1 hour".
pub fn humanize_duration(v: Duration) -> String {
    let (amount, unit) = if v.num_days() > 0 {
        (v.num_days(), "day")
    } else if v.num_hours() > 0 {
        (v.num_hours(), "hour")
    } else if v.num_minutes() > 0 {
        (v.num_minutes(), "minute")
    } else {
        (v.num_seconds().max(0), "second")
    };

    if amount == 1 {
        format!("1 {unit}")
    } else {
        format!("{amount} {unit}s")
    }
}
