//! Tolerant filename timestamp recovery.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Parses an observation timestamp from a granule filename.
///
/// The filename is split on underscores; fields 1 and 2 are interpreted as
/// `DDMonYYYY` (e.g. `30NOV2023`) and `HHMM` (e.g. `0045`). Any parse
/// failure (too few fields, an unrecognised month, an out-of-range
/// day/hour/minute) returns `None` rather than raising, matching the
/// deliberately tolerant recovery contract.
pub fn parse_timestamp(filename: &str) -> Option<DateTime<Utc>> {
    let basename = std::path::Path::new(filename)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);

    let parts: Vec<&str> = basename.split('_').collect();
    if parts.len() < 3 {
        return None;
    }

    let date = parse_ddmonyyyy(parts[1])?;
    let time = parse_hhmm(parts[2])?;

    Some(DateTime::from_naive_utc_and_offset(
        NaiveDateTime::new(date, time),
        Utc,
    ))
}

fn parse_ddmonyyyy(s: &str) -> Option<NaiveDate> {
    if s.len() != 9 {
        return None;
    }
    let day: u32 = s[0..2].parse().ok()?;
    let month = month_from_abbrev(&s[2..5])?;
    let year: i32 = s[5..9].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_hhmm(s: &str) -> Option<NaiveTime> {
    if s.len() != 4 {
        return None;
    }
    let hour: u32 = s[0..2].parse().ok()?;
    let minute: u32 = s[2..4].parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn month_from_abbrev(s: &str) -> Option<u32> {
    match s.to_uppercase().as_str() {
        "JAN" => Some(1),
        "FEB" => Some(2),
        "MAR" => Some(3),
        "APR" => Some(4),
        "MAY" => Some(5),
        "JUN" => Some(6),
        "JUL" => Some(7),
        "AUG" => Some(8),
        "SEP" => Some(9),
        "OCT" => Some(10),
        "NOV" => Some(11),
        "DEC" => Some(12),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_valid_filename() {
        let dt = parse_timestamp("3RIMG_30NOV2023_0045_L1C_ASIA_MER_V01R00.h5").unwrap();
        assert_eq!(dt.year(), 2023);
        assert_eq!(dt.month(), 11);
        assert_eq!(dt.day(), 30);
        assert_eq!(dt.hour(), 0);
        assert_eq!(dt.minute(), 45);
    }

    #[test]
    fn returns_none_on_malformed_filename() {
        assert!(parse_timestamp("not_a_matching_name.h5").is_none());
        assert!(parse_timestamp("too_few.h5").is_none());
        assert!(parse_timestamp("x_99FOO9999_9999_y.h5").is_none());
    }
}
