use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use log::error;
use std::fmt::Write;

/// `Mar 01, 2024`
pub const DEFAULT_DATE_FORMAT: &str = "%b %d, %Y";
/// `Mar 01, 2024 3:05 PM`
pub const DATE_TIME_FORMAT: &str = "%b %d, %Y %-I:%M %p";
/// ISO-8601 without an offset, as naive backend datetimes are sent.
const NAIVE_DATE_TIME: &str = "%Y-%m-%dT%H:%M:%S%.f";
const PLAIN_DATE: &str = "%Y-%m-%d";

/// Parses RFC 3339, a naive date-time or a plain date. Values without an offset are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, NAIVE_DATE_TIME) {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(raw, PLAIN_DATE)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Formats an ISO-8601 timestamp with a strftime pattern.
///
/// Offset-aware timestamps are rendered in their own offset. On a parse failure
/// or an invalid pattern the input is returned unchanged.
pub fn format_date(date: &str, format: &str) -> String {
    match try_format(date, format) {
        Some(formatted) => formatted,
        None => {
            error!("Error formatting date {:?} with {:?}", date, format);
            date.to_string()
        }
    }
}

pub fn format_date_time(date: &str) -> String {
    format_date(date, DATE_TIME_FORMAT)
}

fn try_format(date: &str, format: &str) -> Option<String> {
    let items = StrftimeItems::new(format);
    if items.clone().any(|item| matches!(item, Item::Error)) {
        return None;
    }

    let date = date.trim();
    let mut out = String::new();
    let written = if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        write!(out, "{}", dt.format_with_items(items))
    } else if let Ok(dt) = NaiveDateTime::parse_from_str(date, NAIVE_DATE_TIME) {
        write!(out, "{}", dt.format_with_items(items))
    } else if let Ok(d) = NaiveDate::parse_from_str(date, PLAIN_DATE) {
        // A plain date has no time fields to render
        write!(out, "{}", d.format_with_items(items))
    } else {
        return None;
    };

    written.ok().map(|_| out)
}
