//! Cell parsing helpers.
//!
//! Raw tables keep every cell as text; missing values are empty strings.
//! These helpers turn cells into numbers and assemble composite labels.

/// Returns true when a raw cell carries no value.
pub fn is_missing(value: &str) -> bool {
    value.trim().is_empty()
}

/// Parses a string as `f64`, returning `None` for invalid or empty strings.
///
/// # Examples
///
/// ```
/// use epi_common::parse_f64;
///
/// assert_eq!(parse_f64(" 2.5 "), Some(2.5));
/// assert_eq!(parse_f64(""), None);
/// ```
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Parses a string as `i64`, returning `None` for invalid or empty strings.
///
/// Integral floats such as `"101.0"` are accepted since some exports write
/// integer codes that way.
pub fn parse_i64(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = trimmed.parse::<i64>() {
        return Some(parsed);
    }
    let float = trimmed.parse::<f64>().ok()?;
    if float.is_finite() && float.fract() == 0.0 {
        Some(float as i64)
    } else {
        None
    }
}

/// Joins the non-empty parts with `separator`, broadest part first.
///
/// Empty (or whitespace-only) parts are skipped, so the result never
/// contains a doubled or dangling separator.
///
/// # Examples
///
/// ```
/// use epi_common::join_non_empty;
///
/// assert_eq!(join_non_empty(["US", "", "Autauga"], " / "), "US / Autauga");
/// assert_eq!(join_non_empty(["Italy", ""], " / "), "Italy");
/// ```
pub fn join_non_empty<'a, I>(parts: I, separator: &str) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut joined = String::new();
    for part in parts {
        if is_missing(part) {
            continue;
        }
        if !joined.is_empty() {
            joined.push_str(separator);
        }
        joined.push_str(part);
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_f64() {
        assert_eq!(parse_f64(""), None);
        assert_eq!(parse_f64("  "), None);
        assert_eq!(parse_f64("3.25"), Some(3.25));
        assert_eq!(parse_f64("  -89.5  "), Some(-89.5));
        assert_eq!(parse_f64("invalid"), None);
    }

    #[test]
    fn test_parse_i64() {
        assert_eq!(parse_i64(""), None);
        assert_eq!(parse_i64("101"), Some(101));
        assert_eq!(parse_i64(" 0229 "), Some(229));
        assert_eq!(parse_i64("19.0"), Some(19));
        assert_eq!(parse_i64("19.5"), None);
        assert_eq!(parse_i64("n/a"), None);
    }

    #[test]
    fn test_join_skips_empty_parts() {
        assert_eq!(join_non_empty(["Italy", ""], " / "), "Italy");
        assert_eq!(join_non_empty(["US", "California"], " / "), "US / California");
        assert_eq!(join_non_empty(["", "", "x"], " - "), "x");
        assert_eq!(join_non_empty(["", " "], " / "), "");
    }

    proptest! {
        #[test]
        fn join_never_doubles_separator(parts in proptest::collection::vec("[a-z]{0,3}", 0..6)) {
            let joined = join_non_empty(parts.iter().map(String::as_str), "/");
            prop_assert!(!joined.contains("//"));
            prop_assert!(!joined.starts_with('/'));
            prop_assert!(!joined.ends_with('/'));
            let expected = parts.iter().filter(|p| !p.is_empty()).count();
            let segments = if joined.is_empty() { 0 } else { joined.split('/').count() };
            prop_assert_eq!(segments, expected);
        }
    }
}
