//! Compact number parsing and formatting.
//!
//! The catalog feed reports audience sizes as display strings such as
//! `"7.98m+"`, `"850k+"` or `"1,204"`. These helpers turn them into raw
//! values for sorting and scaling, and format raw values back for display
//! when the feed did not supply a pre-formatted string.

/// Parses a compact numeric string into a raw value.
///
/// Thousands separators are stripped and the input is lowercased. A trailing
/// `m` multiplies the leading number by 1,000,000 and a trailing `k` by
/// 1,000; either may be followed by `+`. Anything else is parsed as a plain
/// number, reading the longest numeric prefix.
///
/// Empty, missing, non-numeric and negative inputs all yield `0.0`, so the
/// result is always finite and non-negative.
#[must_use]
pub fn parse_compact_number(input: Option<&str>) -> f64 {
    let Some(raw) = input else {
        return 0.0;
    };

    let cleaned = raw.trim().to_lowercase().replace(',', "");
    if cleaned.is_empty() {
        return 0.0;
    }

    let unsuffixed = cleaned.strip_suffix('+').unwrap_or(&cleaned);
    let (number, multiplier) = if let Some(n) = unsuffixed.strip_suffix('m') {
        (n, 1_000_000.0)
    } else if let Some(n) = unsuffixed.strip_suffix('k') {
        (n, 1_000.0)
    } else {
        (cleaned.as_str(), 1.0)
    };

    let value = leading_float(number).map_or(0.0, |v| v * multiplier);
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Formats a raw value as a compact display string.
///
/// Values of at least one million render with one decimal and an `M`
/// suffix, values of at least one thousand with no decimals and a `K`
/// suffix, and anything smaller as a whole number.
#[must_use]
pub fn format_compact_number(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.0}K", value / 1_000.0)
    } else {
        format!("{:.0}", value.trunc())
    }
}

/// Reads the longest prefix of `s` that forms a decimal number.
///
/// Returns `None` when no digits lead the string.
fn leading_float(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    while let Some(&b) = bytes.get(end) {
        match b {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }

    if !seen_digit {
        return None;
    }
    s[..end].trim_end_matches('.').parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_million_suffix() {
        assert!((parse_compact_number(Some("7.98m+")) - 7_980_000.0).abs() < 1e-6);
    }

    #[test]
    fn parses_thousand_suffix() {
        assert!((parse_compact_number(Some("850k+")) - 850_000.0).abs() < 1e-6);
    }

    #[test]
    fn parses_uppercase_suffix_and_separators() {
        assert!((parse_compact_number(Some("1.2M+")) - 1_200_000.0).abs() < 1e-6);
        assert!((parse_compact_number(Some("1,204")) - 1_204.0).abs() < 1e-6);
    }

    #[test]
    fn parses_suffix_without_plus() {
        assert!((parse_compact_number(Some("3k")) - 3_000.0).abs() < 1e-6);
    }

    #[test]
    fn plain_number_reads_numeric_prefix() {
        assert!((parse_compact_number(Some("63")) - 63.0).abs() < 1e-9);
        assert!((parse_compact_number(Some("12 ads")) - 12.0).abs() < 1e-9);
    }

    #[test]
    fn empty_and_missing_are_zero() {
        assert!(parse_compact_number(Some("")).abs() < f64::EPSILON);
        assert!(parse_compact_number(Some("   ")).abs() < f64::EPSILON);
        assert!(parse_compact_number(None).abs() < f64::EPSILON);
    }

    #[test]
    fn non_numeric_clamps_to_zero() {
        assert!(parse_compact_number(Some("abc")).abs() < f64::EPSILON);
        assert!(parse_compact_number(Some("m+")).abs() < f64::EPSILON);
        assert!(parse_compact_number(Some(".")).abs() < f64::EPSILON);
    }

    #[test]
    fn negative_clamps_to_zero() {
        assert!(parse_compact_number(Some("-5k+")).abs() < f64::EPSILON);
    }

    #[test]
    fn monotonic_across_suffixes() {
        let ordered = ["0", "999", "1k+", "999k+", "1m+", "2.5m+", "10m+"];
        let values: Vec<f64> = ordered
            .iter()
            .map(|s| parse_compact_number(Some(s)))
            .collect();
        for pair in values.windows(2) {
            assert!(pair[0] < pair[1], "{} !< {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn formats_millions_with_one_decimal() {
        assert_eq!(format_compact_number(7_980_000.0), "8.0M");
        assert_eq!(format_compact_number(1_240_000.0), "1.2M");
    }

    #[test]
    fn formats_thousands_without_decimals() {
        assert_eq!(format_compact_number(850_000.0), "850K");
        assert_eq!(format_compact_number(1_000.0), "1K");
    }

    #[test]
    fn formats_small_values_as_integers() {
        assert_eq!(format_compact_number(63.0), "63");
        assert_eq!(format_compact_number(0.0), "0");
        assert_eq!(format_compact_number(999.9), "999");
    }
}
