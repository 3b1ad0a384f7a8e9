//! Timestamp formatting for axis category labels.

use chrono::{TimeZone, Utc};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateFormat {
    Year,
    MonthYear,
    DayMonth,
    DayMonthHourMin,
    HourMin,
}

/// Picks a label granularity from the covered time span, in milliseconds.
pub fn determine_date_format(span_ms: i64) -> DateFormat {
    const MINUTE: i64 = 60 * 1000;
    const HOUR: i64 = 60 * MINUTE;
    const DAY: i64 = 24 * HOUR;
    const MONTH: i64 = 30 * DAY;
    const YEAR: i64 = 365 * DAY;

    if span_ms > 2 * YEAR {
        DateFormat::Year
    } else if span_ms > 2 * MONTH {
        DateFormat::MonthYear
    } else if span_ms > 3 * DAY {
        DateFormat::DayMonth
    } else if span_ms > 6 * HOUR {
        DateFormat::DayMonthHourMin
    } else {
        DateFormat::HourMin
    }
}

pub fn format_timestamp(time_ms: i64, format: DateFormat) -> String {
    let dt = match Utc.timestamp_millis_opt(time_ms) {
        chrono::LocalResult::Single(dt) => dt,
        chrono::LocalResult::Ambiguous(dt, _) => dt,
        chrono::LocalResult::None => return time_ms.to_string(),
    };
    match format {
        DateFormat::Year => dt.format("%Y").to_string(),
        DateFormat::MonthYear => dt.format("%b %Y").to_string(),
        DateFormat::DayMonth => dt.format("%d %b").to_string(),
        DateFormat::DayMonthHourMin => dt.format("%d %b %H:%M").to_string(),
        DateFormat::HourMin => dt.format("%H:%M").to_string(),
    }
}

/// Category labels for the X axis, one per bar, granularity chosen from the
/// whole covered span.
pub fn category_labels(bars: &[crate::data_types::Bar]) -> Vec<String> {
    let span = match (bars.first(), bars.last()) {
        (Some(first), Some(last)) => last.time - first.time,
        _ => 0,
    };
    let format = determine_date_format(span);
    bars.iter()
        .map(|bar| format_timestamp(bar.time, format))
        .collect()
}
