use crate::error::{FunctionError, Result};
use chrono::{NaiveDate, NaiveDateTime};

/// Formats tried when no input format is given
const FALLBACK_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
];

pub const DEFAULT_OUTPUT_FORMAT: &str = "%Y-%m-%d";

/// Parse a date or datetime; date-only formats land on midnight
pub fn parse_datetime(value: &str, format: Option<&str>) -> Result<NaiveDateTime> {
    let value = value.trim();
    match format {
        Some(format) => parse_with(value, format).ok_or_else(|| FunctionError::InvalidDate {
            value: value.to_string(),
            format: format.to_string(),
        }),
        None => FALLBACK_FORMATS
            .iter()
            .find_map(|format| parse_with(value, format))
            .ok_or_else(|| FunctionError::InvalidDate {
                value: value.to_string(),
                format: "<auto>".to_string(),
            }),
    }
}

fn parse_with(value: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, format).ok().or_else(|| {
        NaiveDate::parse_from_str(value, format)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_explicit_datetime() {
        let dt = parse_datetime("2023-12-25 14:30:45", Some("%Y-%m-%d %H:%M:%S")).unwrap();
        assert_eq!(dt.year(), 2023);
        assert_eq!(dt.hour(), 14);
    }

    #[test]
    fn test_parse_date_only_is_midnight() {
        let dt = parse_datetime("25/12/2023", Some("%d/%m/%Y")).unwrap();
        assert_eq!(dt.day(), 25);
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn test_parse_fallback_formats() {
        assert!(parse_datetime("2024-02-29", None).is_ok());
        assert!(parse_datetime("2024-02-29T08:00:00", None).is_ok());
    }

    #[test]
    fn test_parse_failure() {
        let err = parse_datetime("not a date", Some("%Y-%m-%d")).unwrap_err();
        assert!(matches!(err, FunctionError::InvalidDate { .. }));
    }
}
