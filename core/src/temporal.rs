//! Date and timestamp conversions.
//!
//! Dates are stored as days since the Unix epoch, timestamps as milliseconds
//! since the Unix epoch (UTC).

use crate::{ValueError, ValueResult};

const MS_PER_DAY: i64 = 86_400_000;

/// Parse an ISO 8601 calendar date (`2024-01-15`) to days since epoch.
pub fn parse_date(text: &str) -> ValueResult<i64> {
    let parts: Vec<&str> = text.split('-').collect();
    if parts.len() != 3 || parts[0].is_empty() {
        return Err(ValueError::invalid_date(text, "expected YYYY-MM-DD"));
    }

    let year: i32 = parts[0]
        .parse()
        .map_err(|_| ValueError::invalid_date(text, format!("invalid year: {}", parts[0])))?;
    let month: u32 = parts[1]
        .parse()
        .map_err(|_| ValueError::invalid_date(text, format!("invalid month: {}", parts[1])))?;
    let day: u32 = parts[2]
        .parse()
        .map_err(|_| ValueError::invalid_date(text, format!("invalid day: {}", parts[2])))?;

    if !(1..=12).contains(&month) {
        return Err(ValueError::invalid_date(
            text,
            format!("month out of range: {}", month),
        ));
    }
    if day < 1 || day > days_in_month(year, month) {
        return Err(ValueError::invalid_date(
            text,
            format!("day out of range: {}", day),
        ));
    }

    Ok(days_from_civil(year, month, day))
}

/// Parse an ISO 8601 timestamp to milliseconds since epoch.
///
/// Accepted forms: `2024-01-15T10:30:00Z`, `2024-01-15T10:30:00.500Z`,
/// `2024-01-15T10:30:00+05:30`, `2024-01-15T10:30` (UTC assumed).
pub fn parse_date_time(text: &str) -> ValueResult<i64> {
    let Some((date_part, rest)) = text.split_once('T') else {
        return Err(ValueError::invalid_timestamp(text, "missing 'T' separator"));
    };
    let days = parse_date(date_part).map_err(|e| ValueError::invalid_timestamp(text, e.to_string()))?;

    let (time_part, offset_ms) = if let Some(stripped) = rest.strip_suffix('Z') {
        (stripped, 0i64)
    } else if let Some(pos) = rest.rfind(['+', '-']) {
        let (time, tz) = rest.split_at(pos);
        (time, parse_tz_offset(text, tz)?)
    } else {
        (rest, 0i64)
    };

    let (time_main, millis) = match time_part.split_once('.') {
        Some((main, fraction)) => {
            let digits: String = fraction.chars().take(3).collect();
            let scale = 10i64.pow(3 - digits.len() as u32);
            let ms: i64 = digits.parse().map_err(|_| {
                ValueError::invalid_timestamp(text, format!("invalid fraction: {}", fraction))
            })?;
            (main, ms * scale)
        }
        None => (time_part, 0),
    };

    let fields: Vec<&str> = time_main.split(':').collect();
    if fields.len() < 2 || fields.len() > 3 {
        return Err(ValueError::invalid_timestamp(text, "expected HH:MM[:SS]"));
    }
    let mut parsed = [0i64; 3];
    for (slot, field) in parsed.iter_mut().zip(fields.iter()) {
        *slot = field
            .parse()
            .map_err(|_| ValueError::invalid_timestamp(text, format!("invalid time field: {}", field)))?;
    }
    let [hour, minute, second] = parsed;
    if hour > 23 || minute > 59 || second > 59 {
        return Err(ValueError::invalid_timestamp(text, "time out of range"));
    }

    Ok(days * MS_PER_DAY + hour * 3_600_000 + minute * 60_000 + second * 1_000 + millis
        - offset_ms)
}

/// Parse a timezone offset like `+05:30` or `-08:00` to milliseconds.
fn parse_tz_offset(text: &str, tz: &str) -> ValueResult<i64> {
    let sign = if tz.starts_with('-') { -1i64 } else { 1i64 };
    let clean = tz.trim_start_matches(['+', '-']);
    let (hours, minutes) = clean.split_once(':').unwrap_or((clean, "0"));

    let hours: i64 = hours
        .parse()
        .map_err(|_| ValueError::invalid_timestamp(text, format!("invalid tz hours: {}", hours)))?;
    let minutes: i64 = minutes
        .parse()
        .map_err(|_| ValueError::invalid_timestamp(text, format!("invalid tz minutes: {}", minutes)))?;

    Ok(sign * (hours * 3_600_000 + minutes * 60_000))
}

/// Format days since epoch as `YYYY-MM-DD`.
pub fn format_date(days: i64) -> String {
    let (year, month, day) = civil_from_days(days);
    format!("{:04}-{:02}-{:02}", year, month, day)
}

/// Format milliseconds since epoch as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn format_date_time(millis: i64) -> String {
    let days = millis.div_euclid(MS_PER_DAY);
    let in_day = millis.rem_euclid(MS_PER_DAY);
    format!(
        "{}T{:02}:{:02}:{:02}.{:03}Z",
        format_date(days),
        in_day / 3_600_000,
        (in_day / 60_000) % 60,
        (in_day / 1_000) % 60,
        in_day % 1_000
    )
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Days since 1970-01-01 for a proleptic Gregorian date.
fn days_from_civil(year: i32, month: u32, day: u32) -> i64 {
    let y = i64::from(year) - i64::from(month <= 2);
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let m = i64::from(month);
    let doy = (153 * (if m > 2 { m - 3 } else { m + 9 }) + 2) / 5 + i64::from(day) - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Inverse of `days_from_civil`.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_epoch() {
        assert_eq!(parse_date("1970-01-01").unwrap(), 0);
        assert_eq!(parse_date("1970-01-02").unwrap(), 1);
        assert_eq!(parse_date("2000-03-01").unwrap(), 11_017);
    }

    #[test]
    fn test_parse_date_rejects_invalid_day() {
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("2024-02-29").is_ok());
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("2024-01").is_err());
    }

    #[test]
    fn test_format_date_inverts_parse() {
        for text in ["1970-01-01", "1999-12-31", "2024-02-29", "1969-07-20"] {
            assert_eq!(format_date(parse_date(text).unwrap()), text);
        }
    }

    #[test]
    fn test_parse_date_time_with_offset() {
        let utc = parse_date_time("2024-01-15T10:30:00Z").unwrap();
        let shifted = parse_date_time("2024-01-15T16:00:00+05:30").unwrap();
        assert_eq!(utc, shifted);

        let with_millis = parse_date_time("2024-01-15T10:30:00.5Z").unwrap();
        assert_eq!(with_millis - utc, 500);
    }

    #[test]
    fn test_format_date_time() {
        let ms = parse_date_time("2024-01-15T10:30:00.250Z").unwrap();
        assert_eq!(format_date_time(ms), "2024-01-15T10:30:00.250Z");
    }
}
