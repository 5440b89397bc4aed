//! ISO-8601 style durations (`PnYnMnWnDTnHnMnS`)
//!
//! Calendar units are converted with fixed ratios: a year is 365 days, a month
//! is a twelfth of a year and a week is 7 days. Converting back to text does not
//! give the original calendar units, e.g. `P30D` formats as `P4W2D`.

use std::{fmt::Write as _, sync::LazyLock};

use chrono::Duration;
use regex::Regex;
use thiserror::Error;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;
const SECONDS_PER_WEEK: i64 = SECONDS_PER_DAY * 7;
const SECONDS_PER_YEAR: i64 = SECONDS_PER_DAY * 365;
const SECONDS_PER_MONTH: i64 = SECONDS_PER_YEAR / 12;

static PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^P(?:(?P<year>\d+)Y)?(?:(?P<month>\d+)M)?(?:(?P<week>\d+)W)?(?:(?P<day>\d+)D)?(?:T(?:(?P<hour>\d+)H)?(?:(?P<minute>\d+)M)?(?:(?P<second>\d+)S)?)?$")
        .expect("duration pattern is a valid regex")
});

struct Unit {
    group: &'static str,
    seconds: i64,
    symbol: char,
    is_time: bool,
}

// Largest first, `format` relies on this order
const UNITS: [Unit; 7] = [
    Unit { group: "year", seconds: SECONDS_PER_YEAR, symbol: 'Y', is_time: false },
    Unit { group: "month", seconds: SECONDS_PER_MONTH, symbol: 'M', is_time: false },
    Unit { group: "week", seconds: SECONDS_PER_WEEK, symbol: 'W', is_time: false },
    Unit { group: "day", seconds: SECONDS_PER_DAY, symbol: 'D', is_time: false },
    Unit { group: "hour", seconds: 60 * 60, symbol: 'H', is_time: true },
    Unit { group: "minute", seconds: 60, symbol: 'M', is_time: true },
    Unit { group: "second", seconds: 1, symbol: 'S', is_time: true },
];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DurationFormatError {
    #[error("`{0}` is not a valid ISO-8601 duration")]
    Malformed(String),
    #[error("`{0}` is too large to be represented as a duration")]
    Overflow(String),
}

pub fn parse(text: &str) -> Result<Duration, DurationFormatError> {
    let captures = PATTERN
        .captures(text)
        .ok_or_else(|| DurationFormatError::Malformed(text.to_owned()))?;

    let overflow = || DurationFormatError::Overflow(text.to_owned());

    let mut seconds: i64 = 0;
    for unit in &UNITS {
        let Some(value) = captures.name(unit.group) else {
            continue;
        };

        // The pattern only admits digits, so a failed parse means the number is too large
        let value: i64 = value.as_str().parse().map_err(|_| overflow())?;

        seconds = value
            .checked_mul(unit.seconds)
            .and_then(|value| seconds.checked_add(value))
            .ok_or_else(overflow)?;
    }

    Duration::try_seconds(seconds).ok_or_else(overflow)
}

/// Renders `duration` in whole seconds, largest unit first
pub fn format(duration: Duration) -> String {
    let seconds = duration.num_seconds();
    if seconds == 0 {
        return "PT0S".to_owned();
    }

    let mut remaining = seconds.unsigned_abs();
    let mut text = String::from("P");
    let mut in_time = false;

    for unit in &UNITS {
        let size = unit.seconds.unsigned_abs();
        if remaining < size {
            continue;
        }

        if unit.is_time && !in_time {
            text.push('T');
            in_time = true;
        }

        let _ = write!(text, "{}{}", remaining / size, unit.symbol);
        remaining %= size;
    }

    if seconds < 0 {
        format!("-{text}")
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(parse("PT3H"), Ok(Duration::hours(3)));
        assert_eq!(parse("PT1H30M"), Ok(Duration::minutes(90)));
        assert_eq!(parse("PT45S"), Ok(Duration::seconds(45)));
        assert_eq!(parse("P1D"), Ok(Duration::days(1)));
        assert_eq!(parse("P2W"), Ok(Duration::weeks(2)));
        assert_eq!(parse("P1Y"), Ok(Duration::days(365)));
        assert_eq!(parse("P1M"), Ok(Duration::hours(730)));
        assert_eq!(parse("P1DT2H3M4S"), Ok(Duration::seconds(86_400 + 7_200 + 180 + 4)));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for text in ["", "3H", "PT1.5H", "P-1D", "PT1H ", "pt1h", "P1H", "PT1D", "P1M1Y"] {
            assert_eq!(parse(text), Err(DurationFormatError::Malformed(text.to_owned())), "{text}");
        }
    }

    #[test]
    fn test_parse_overflow() {
        let text = "P99999999999999999999Y";
        assert_eq!(parse(text), Err(DurationFormatError::Overflow(text.to_owned())));

        let text = "P9999999999999Y";
        assert_eq!(parse(text), Err(DurationFormatError::Overflow(text.to_owned())));
    }

    #[test]
    fn test_format() {
        assert_eq!(format(Duration::zero()), "PT0S");
        assert_eq!(format(Duration::hours(3)), "PT3H");
        assert_eq!(format(Duration::minutes(90)), "PT1H30M");
        assert_eq!(format(Duration::days(1) + Duration::hours(2)), "P1DT2H");
        assert_eq!(format(Duration::days(365) + Duration::hours(1)), "P1YT1H");
        assert_eq!(format(Duration::days(8)), "P1W1D");
        assert_eq!(format(-Duration::minutes(90)), "-PT1H30M");
    }

    #[test]
    fn test_format_drops_sub_second_remainder() {
        assert_eq!(format(Duration::milliseconds(1_500)), "PT1S");
        assert_eq!(format(Duration::milliseconds(400)), "PT0S");
    }

    #[test]
    fn test_time_only_round_trip() {
        for hours in 0..30 {
            for minutes in [0, 1, 15, 59] {
                for seconds in [0, 1, 30, 59] {
                    let duration = Duration::hours(hours) + Duration::minutes(minutes) + Duration::seconds(seconds);
                    assert_eq!(parse(&format(duration)), Ok(duration));
                }
            }
        }
    }

    #[test]
    fn test_calendar_units_are_lossy() {
        // The amount survives, the calendar units do not
        let thirty_days = parse("P30D").unwrap();
        assert_eq!(format(thirty_days), "P4W2D");
        assert_eq!(parse(&format(thirty_days)), Ok(thirty_days));

        let five_weeks = parse("P5W").unwrap();
        assert_eq!(format(five_weeks), "P1M4DT14H");

        assert_eq!(format(parse("P365D").unwrap()), "P1Y");
        assert_eq!(format(parse("P12M").unwrap()), "P1Y");
    }
}
