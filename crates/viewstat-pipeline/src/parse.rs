//! Best-effort cell and header parsers.
//!
//! Both return `None` instead of an error: a value that does not parse is
//! dropped by the caller, never coerced to a default.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

/// Date with `-`, `/` or `.` separators, then an optional time of day with
/// optional seconds, fraction and 12-hour marker.
static DATE_TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)^
        (\d{4})[-/.](\d{1,2})[-/.](\d{1,2})
        (?:
            (?:T|\s+)
            (\d{1,2}):(\d{2})
            (?::(\d{2})(?:\.(\d{1,9}))?)?
            (?:\s*([AaPp][Mm]))?
        )?
        $",
    )
    .expect("valid date-time regex")
});

/// Parses a viewer count.
///
/// Accepts any finite, non-negative decimal (`"10"`, `"10.5"`, `"1e3"`,
/// `"+7"`). Blank cells, text, thousands separators, `NaN`/`inf` and negative
/// numbers yield `None`.
#[must_use]
pub fn parse_count(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value = trimmed.parse::<f64>().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    // Folds "-0" into 0.
    Some(value.abs())
}

/// Parses a time-bucket header permissively.
///
/// Recognized forms (after trimming):
/// - `2024-01-05`, `2024/1/5`, `2024.01.05` (midnight)
/// - any of the above followed by `T` or whitespace and `13:00`, `13:00:30`
///   or `13:00:30.250`, optionally with an `AM`/`PM` suffix
/// - RFC 3339 with an offset, kept as local wall-clock time
#[must_use]
pub fn parse_timestamp(header: &str) -> Option<NaiveDateTime> {
    let trimmed = header.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }

    parse_date_time_pattern(trimmed)
}

fn parse_date_time_pattern(s: &str) -> Option<NaiveDateTime> {
    let caps = DATE_TIME_RE.captures(s)?;
    let number = |idx: usize| -> Option<u32> { caps.get(idx)?.as_str().parse().ok() };

    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, number(2)?, number(3)?)?;

    if caps.get(4).is_none() {
        return date.and_hms_opt(0, 0, 0);
    }

    let mut hour = number(4)?;
    let minute = number(5)?;
    let second = number(6).unwrap_or(0);
    let nanos = caps
        .get(7)
        .map_or(Some(0), |m| fraction_to_nanos(m.as_str()))?;

    if let Some(marker) = caps.get(8) {
        if !(1..=12).contains(&hour) {
            return None;
        }
        let is_pm = marker.as_str().eq_ignore_ascii_case("pm");
        hour = match (hour, is_pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, true) => h + 12,
            (h, false) => h,
        };
    }

    let time = NaiveTime::from_hms_nano_opt(hour, minute, second, nanos)?;
    Some(date.and_time(time))
}

/// Converts the digits after the decimal point of a seconds field into
/// nanoseconds (`"25"` → 250 000 000).
fn fraction_to_nanos(digits: &str) -> Option<u32> {
    let padded = format!("{digits:0<9}");
    padded.get(..9)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    // -----------------------------------------------------------------------
    // parse_count
    // -----------------------------------------------------------------------

    #[test]
    fn count_integer() {
        assert_eq!(parse_count("10"), Some(10.0));
    }

    #[test]
    fn count_fractional_and_padded() {
        assert_eq!(parse_count("  12.5 "), Some(12.5));
    }

    #[test]
    fn count_exponent_and_plus_sign() {
        assert_eq!(parse_count("1e3"), Some(1000.0));
        assert_eq!(parse_count("+7"), Some(7.0));
    }

    #[test]
    fn count_zero_is_kept() {
        assert_eq!(parse_count("0"), Some(0.0));
        assert_eq!(parse_count("-0"), Some(0.0));
    }

    #[test]
    fn count_rejects_blank_text_and_punctuation() {
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("   "), None);
        assert_eq!(parse_count("bad"), None);
        assert_eq!(parse_count("--"), None);
        assert_eq!(parse_count("."), None);
    }

    #[test]
    fn count_rejects_thousands_separator() {
        assert_eq!(parse_count("1,234"), None);
    }

    #[test]
    fn count_rejects_non_finite_and_negative() {
        assert_eq!(parse_count("NaN"), None);
        assert_eq!(parse_count("inf"), None);
        assert_eq!(parse_count("-5"), None);
    }

    // -----------------------------------------------------------------------
    // parse_timestamp
    // -----------------------------------------------------------------------

    #[test]
    fn timestamp_dash_separated_with_minutes() {
        assert_eq!(
            parse_timestamp("2024-01-01 00:00"),
            Some(ts(2024, 1, 1, 0, 0, 0))
        );
    }

    #[test]
    fn timestamp_slash_separated_single_digit_fields() {
        assert_eq!(
            parse_timestamp("2024/1/5 9:30:15"),
            Some(ts(2024, 1, 5, 9, 30, 15))
        );
    }

    #[test]
    fn timestamp_iso_t_separator() {
        assert_eq!(
            parse_timestamp("2024-03-10T21:05"),
            Some(ts(2024, 3, 10, 21, 5, 0))
        );
    }

    #[test]
    fn timestamp_date_only_is_midnight() {
        assert_eq!(parse_timestamp("2024.02.29"), Some(ts(2024, 2, 29, 0, 0, 0)));
    }

    #[test]
    fn timestamp_fractional_seconds() {
        let parsed = parse_timestamp("2024-01-01 10:00:00.25").unwrap();
        assert_eq!(parsed.and_utc().timestamp_subsec_millis(), 250);
    }

    #[test]
    fn timestamp_twelve_hour_clock() {
        assert_eq!(
            parse_timestamp("2024/01/01 1:15 PM"),
            Some(ts(2024, 1, 1, 13, 15, 0))
        );
        assert_eq!(
            parse_timestamp("2024/01/01 12:00 am"),
            Some(ts(2024, 1, 1, 0, 0, 0))
        );
        assert_eq!(
            parse_timestamp("2024/01/01 12:30pm"),
            Some(ts(2024, 1, 1, 12, 30, 0))
        );
    }

    #[test]
    fn timestamp_twelve_hour_clock_rejects_hour_13() {
        assert_eq!(parse_timestamp("2024/01/01 13:00 PM"), None);
    }

    #[test]
    fn timestamp_rfc3339_keeps_wall_clock() {
        assert_eq!(
            parse_timestamp("2024-01-01T08:00:00+08:00"),
            Some(ts(2024, 1, 1, 8, 0, 0))
        );
    }

    #[test]
    fn timestamp_rejects_invalid_calendar_date() {
        assert_eq!(parse_timestamp("2023-02-29 10:00"), None);
        assert_eq!(parse_timestamp("2024-13-01"), None);
    }

    #[test]
    fn timestamp_rejects_out_of_range_time() {
        assert_eq!(parse_timestamp("2024-01-01 25:00"), None);
        assert_eq!(parse_timestamp("2024-01-01 10:75"), None);
    }

    #[test]
    fn timestamp_rejects_non_dates() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("video title"), None);
        assert_eq!(parse_timestamp("Unnamed: 7"), None);
        assert_eq!(parse_timestamp("2024-01-01 10:00 extra"), None);
    }
}
