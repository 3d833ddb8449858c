//! Display formatting for dates, ratings and fighter measurements.

use chrono::{Datelike, NaiveDate};
use tracing::warn;

use crate::models::parse_date;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan.", "Feb.", "Mar.", "Apr.", "May", "Jun.", "Jul.", "Aug.", "Sep.", "Oct.", "Nov.", "Dec.",
];

/// Label shown when a chart has no rows.
pub const NO_DATA_LABEL: &str = "No data available";

/// Ordinal suffix for a day of the month.
fn day_suffix(day: u32) -> &'static str {
    if (4..=20).contains(&day) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// Format a date as "Mon. Dth, YYYY" (e.g. "Dec. 19th, 2005").
pub fn format_date(date: NaiveDate) -> String {
    let month = MONTH_ABBREVIATIONS[date.month0() as usize];
    let day = date.day();
    format!("{} {}{}, {}", month, day, day_suffix(day), date.year())
}

/// Format a `YYYY-MM-DD` string; empty if it cannot be parsed.
pub fn format_date_str(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    match parse_date(value) {
        Ok(date) => format_date(date),
        Err(e) => {
            warn!("Cannot format date {:?}: {}", value, e);
            String::new()
        }
    }
}

/// "first - last" label for a chart's date range.
pub fn date_range_label(range: Option<(NaiveDate, NaiveDate)>) -> String {
    match range {
        Some((first, last)) => format!("{} - {}", format_date(first), format_date(last)),
        None => NO_DATA_LABEL.to_string(),
    }
}

/// True when `date` is strictly after `today`.
pub fn is_future_date(date: NaiveDate, today: NaiveDate) -> bool {
    date > today
}

/// Age in whole years on `today`.
pub fn calculate_age(date_of_birth: NaiveDate, today: NaiveDate) -> Option<u32> {
    today.years_since(date_of_birth)
}

/// Height in feet and inches, e.g. `5'11"`.
pub fn format_height(height_in: u32) -> String {
    format!("{}'{}\"", height_in / 12, height_in % 12)
}

/// Ratings are stored with fractional precision but shown rounded.
pub fn format_rating(rating: f64) -> String {
    format!("{}", rating.round() as i64)
}

/// Rounded rating change with an explicit "+" for gains.
pub fn format_rating_change(change: f64) -> String {
    let rounded = change.round() as i64;
    if change > 0.0 {
        format!("+{}", rounded)
    } else {
        format!("{}", rounded)
    }
}

/// Shorten long IDs for narrow columns: first four characters then "..".
pub fn truncate_id(id: &str) -> String {
    if id.chars().count() < 4 {
        return id.to_string();
    }
    let head: String = id.chars().take(4).collect();
    format!("{}..", head)
}
