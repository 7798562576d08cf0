use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};

/// Calendar days from `today` until `end`; negative once the date has passed.
pub fn days_until(end: NaiveDate, today: NaiveDate) -> i64 {
    (end - today).num_days()
}

/// Monday to Friday days in `(from, to]`, negated when `to` precedes `from`.
pub fn working_days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    if to < from {
        return -working_days_between(to, from);
    }

    let span = (to - from).num_days();
    let full_weeks = span / 7;
    let mut count = full_weeks * 5;

    let mut cursor = from + Duration::days(full_weeks * 7);
    while cursor < to {
        cursor += Duration::days(1);
        if !matches!(cursor.weekday(), Weekday::Sat | Weekday::Sun) {
            count += 1;
        }
    }

    count
}

/// Hours worked in one entry after subtracting the break, never negative.
pub fn entry_hours(start: DateTime<Utc>, end: DateTime<Utc>, break_minutes: Option<u32>) -> f64 {
    let worked = (end - start).num_seconds() as f64 / 3600.0;
    let breaks = f64::from(break_minutes.unwrap_or(0)) / 60.0;
    (worked - breaks).max(0.0)
}

/// Round half up to a whole number (`2.5 -> 3`, `-2.5 -> -2`).
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor + 0.5).floor() / factor
}
