//! Date parsing for time-series column headers.

use chrono::NaiveDate;

use crate::error::{Result, TransformError};

fn month_day_year(label: &str) -> Option<(u32, u32, Option<i32>)> {
    let mut parts = label.trim().split('/');
    let month = parts.next()?.trim().parse().ok()?;
    let day = parts.next()?.trim().parse().ok()?;
    let year = match parts.next() {
        Some(year) => Some(year.trim().parse().ok()?),
        None => None,
    };
    if parts.next().is_some() {
        return None;
    }
    Some((month, day, year))
}

fn invalid(label: &str) -> TransformError {
    TransformError::InvalidDate {
        label: label.to_string(),
    }
}

/// Parses an `M/D/YY` header; two-digit years are read as `20YY`.
///
/// ```
/// use chrono::NaiveDate;
/// use epi_transform::dates::parse_wide_date;
///
/// assert_eq!(
///     parse_wide_date("3/14/20").unwrap(),
///     NaiveDate::from_ymd_opt(2020, 3, 14).unwrap()
/// );
/// ```
pub fn parse_wide_date(label: &str) -> Result<NaiveDate> {
    let (month, day, year) = month_day_year(label).ok_or_else(|| invalid(label))?;
    let year = year.ok_or_else(|| invalid(label))?;
    let year = if (0..100).contains(&year) { 2000 + year } else { year };
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| invalid(label))
}

/// Takes month and day from an `M/D[/YY]` header and places them in `year`.
///
/// Whatever year the label carries is ignored.
pub fn parse_label_date(label: &str, year: i32) -> Result<NaiveDate> {
    let (month, day, _) = month_day_year(label).ok_or_else(|| invalid(label))?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| invalid(label))
}

/// Days since 1970-01-01, the physical representation of a polars `Date`.
pub(crate) fn epoch_days(date: NaiveDate) -> i32 {
    date.signed_duration_since(NaiveDate::default()).num_days() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn both_parsers_agree_on_short_labels() {
        assert_eq!(parse_wide_date("3/14/20").unwrap(), ymd(2020, 3, 14));
        assert_eq!(parse_label_date("3/14/20", 2020).unwrap(), ymd(2020, 3, 14));
        assert_eq!(parse_wide_date("12/1/2021").unwrap(), ymd(2021, 12, 1));
    }

    #[test]
    fn label_date_uses_fixed_year() {
        assert_eq!(parse_label_date("1/22/21", 2020).unwrap(), ymd(2020, 1, 22));
        assert_eq!(parse_label_date("1/22", 2020).unwrap(), ymd(2020, 1, 22));
    }

    #[test]
    fn rejects_malformed_labels() {
        for label in ["Lat", "13/1/20", "2/30/20", "1/2/3/4", "1/22"] {
            assert!(
                matches!(parse_wide_date(label), Err(TransformError::InvalidDate { .. })),
                "{label}"
            );
        }
    }

    #[test]
    fn epoch_days_counts_from_unix_epoch() {
        assert_eq!(epoch_days(ymd(1970, 1, 1)), 0);
        assert_eq!(epoch_days(ymd(2020, 1, 1)), 18262);
    }
}
