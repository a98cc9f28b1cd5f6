// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Display strings derived from loaded records. Every input is optional and
//! every function is total: absent or unusable values render as a neutral
//! placeholder instead of failing.

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, UtcOffset};

pub const NOT_AVAILABLE: &str = "N/A";

/// Returns the first non-blank of the shared and fetched names, else `fallback`.
pub fn display_name(shared: Option<&str>, fetched: Option<&str>, fallback: &str) -> String {
    [shared, fetched]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|name| !name.is_empty())
        .unwrap_or(fallback)
        .to_owned()
}

pub fn or_not_available(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_owned(),
        _ => NOT_AVAILABLE.to_owned(),
    }
}

pub fn format_count(value: Option<u32>) -> String {
    value
        .map(|count| count.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_owned())
}

/// USD with thousands separators. Zero is treated like an absent amount.
pub fn format_currency(amount: Option<f64>) -> String {
    let Some(amount) = amount.filter(|value| value.is_finite() && *value != 0.0) else {
        return NOT_AVAILABLE.to_owned();
    };

    let cents = (amount * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let absolute = cents.unsigned_abs();
    format!(
        "{sign}${}.{:02}",
        group_thousands(absolute / 100),
        absolute % 100
    )
}

pub fn format_percent(value: Option<f64>) -> String {
    match value.filter(|value| value.is_finite() && *value != 0.0) {
        Some(value) => format!("{value:.1}%"),
        None => "0%".to_owned(),
    }
}

pub fn format_level(level: Option<u32>) -> String {
    match level.filter(|level| *level != 0) {
        Some(level) => format!("Level {level}"),
        None => NOT_AVAILABLE.to_owned(),
    }
}

/// `M/D/YYYY` in UTC.
pub fn format_date(raw: Option<&str>) -> String {
    match raw.and_then(parse_timestamp) {
        Some(timestamp) => short_date(timestamp.date()),
        None => NOT_AVAILABLE.to_owned(),
    }
}

/// `M/D/YYYY, h:mm:ss AM` in UTC.
pub fn format_datetime(raw: Option<&str>) -> String {
    let Some(timestamp) = raw.and_then(parse_timestamp) else {
        return NOT_AVAILABLE.to_owned();
    };

    let hour = timestamp.hour();
    let meridiem = if hour < 12 { "AM" } else { "PM" };
    let hour12 = match hour % 12 {
        0 => 12,
        other => other,
    };
    format!(
        "{}, {hour12}:{:02}:{:02} {meridiem}",
        short_date(timestamp.date()),
        timestamp.minute(),
        timestamp.second(),
    )
}

/// Accepts RFC 3339, the platform's `+0000` offset form, or a bare date.
pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(parsed) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Some(parsed.to_offset(UtcOffset::UTC));
    }

    let platform = format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond][offset_hour sign:mandatory][offset_minute]"
    );
    if let Ok(parsed) = OffsetDateTime::parse(trimmed, platform) {
        return Some(parsed.to_offset(UtcOffset::UTC));
    }

    let date = Date::parse(trimmed.get(..10)?, format_description!("[year]-[month]-[day]")).ok()?;
    Some(date.midnight().assume_utc())
}

fn short_date(date: Date) -> String {
    format!("{}/{}/{}", u8::from(date.month()), date.day(), date.year())
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{
        NOT_AVAILABLE, display_name, format_count, format_currency, format_date,
        format_datetime, format_level, format_percent, or_not_available, parse_timestamp,
    };

    #[test]
    fn currency_formats_usd() {
        assert_eq!(format_currency(Some(49.99)), "$49.99");
        assert_eq!(format_currency(Some(1234.5)), "$1,234.50");
        assert_eq!(format_currency(Some(1_000_000.0)), "$1,000,000.00");
        assert_eq!(format_currency(Some(-12.0)), "-$12.00");
        assert_eq!(format_currency(Some(0.004)), "$0.00");
    }

    #[test]
    fn currency_absent_or_zero_is_not_available() {
        assert_eq!(format_currency(None), NOT_AVAILABLE);
        assert_eq!(format_currency(Some(0.0)), NOT_AVAILABLE);
        assert_eq!(format_currency(Some(f64::NAN)), NOT_AVAILABLE);
    }

    #[test]
    fn percent_keeps_one_decimal() {
        assert_eq!(format_percent(Some(42.345)), "42.3%");
        assert_eq!(format_percent(None), "0%");
    }

    #[test]
    fn level_prefix() {
        assert_eq!(format_level(Some(4)), "Level 4");
        assert_eq!(format_level(None), NOT_AVAILABLE);
        assert_eq!(format_level(Some(0)), NOT_AVAILABLE);
    }

    #[test]
    fn dates_render_month_day_year() {
        assert_eq!(format_date(Some("2025-01-05")), "1/5/2025");
        assert_eq!(format_date(Some("2025-11-30T23:10:00Z")), "11/30/2025");
        assert_eq!(format_date(Some("2025-03-02T08:00:00.000+0000")), "3/2/2025");
        assert_eq!(format_date(Some("not a date")), NOT_AVAILABLE);
        assert_eq!(format_date(Some("")), NOT_AVAILABLE);
        assert_eq!(format_date(None), NOT_AVAILABLE);
    }

    #[test]
    fn datetimes_use_twelve_hour_clock() {
        assert_eq!(
            format_datetime(Some("2025-01-15T00:05:09Z")),
            "1/15/2025, 12:05:09 AM"
        );
        assert_eq!(
            format_datetime(Some("2025-01-15T13:30:00.000+0000")),
            "1/15/2025, 1:30:00 PM"
        );
        assert_eq!(format_datetime(None), NOT_AVAILABLE);
    }

    #[test]
    fn offsets_normalize_to_utc() {
        let parsed = parse_timestamp("2025-06-30T22:00:00-04:00").expect("valid timestamp");
        assert_eq!(parsed.hour(), 2);
        assert_eq!(format_date(Some("2025-06-30T22:00:00-04:00")), "7/1/2025");
    }

    #[test]
    fn display_name_precedence() {
        assert_eq!(display_name(Some("Shared"), Some("Fetched"), "PNC"), "Shared");
        assert_eq!(display_name(Some("  "), Some("Fetched"), "PNC"), "Fetched");
        assert_eq!(display_name(None, None, "PNC"), "PNC");
        assert_eq!(display_name(None, Some(""), "PNC"), "PNC");
    }

    #[test]
    fn plain_fallbacks() {
        assert_eq!(or_not_available(Some("Premium")), "Premium");
        assert_eq!(or_not_available(Some(" ")), NOT_AVAILABLE);
        assert_eq!(format_count(Some(7)), "7");
        assert_eq!(format_count(None), NOT_AVAILABLE);
    }
}
