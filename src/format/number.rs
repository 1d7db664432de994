//! Fixed-width value formatting.
//!
//! Reals are right-justified with the column's precision and always keep at
//! least one leading blank, so adjacent columns stay separate tokens. A value
//! that does not fit falls back to zero decimals and, if it still does not
//! fit, is written wider than the column instead of being truncated.

use crate::constants::MISSING_VALUE;
use crate::series::is_missing;
use tracing::warn;

/// Format a real right-justified in `width` characters
pub fn format_real(value: f64, width: usize, precision: usize) -> String {
    let value = if is_missing(value) {
        MISSING_VALUE
    } else {
        value
    };
    let formatted = format!("{:>width$.precision$}", value);
    if formatted.starts_with(' ') {
        return formatted;
    }
    let whole = format!("{:>width$.0}", value);
    if !whole.starts_with(' ') {
        warn!(
            "Value {} does not fit a {}-character column with a leading blank",
            value, width
        );
    }
    whole
}

/// Format an integer right-justified in `width` characters
pub fn format_int(value: i64, width: usize) -> String {
    format!("{:>width$}", value)
}

/// Format text left-justified in `width` characters, truncating if needed
pub fn format_text(value: &str, width: usize) -> String {
    if value.chars().count() > width {
        warn!(
            "Truncating \"{}\" to {} characters to fit its column",
            value, width
        );
        value.chars().take(width).collect()
    } else {
        format!("{:<width$}", value)
    }
}

/// Round a value the way it would appear after formatting
pub fn round_to(value: f64, precision: usize) -> f64 {
    format!("{:.precision$}", value)
        .parse::<f64>()
        .unwrap_or(value)
}

/// Compare two values as they would appear when formatted
pub fn formatted_equal(a: f64, b: f64, precision: usize) -> bool {
    format!("{:.precision$}", a) == format!("{:.precision$}", b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_real_fits() {
        assert_eq!(format_real(12.345, 10, 1), "      12.3");
        assert_eq!(format_real(0.5, 6, 2), "  0.50");
    }

    #[test]
    fn test_format_real_overflow_falls_back_to_zero_decimals() {
        assert_eq!(format_real(1234567.8, 8, 1), " 1234568");
        // Still too wide: written in full rather than truncated
        assert_eq!(format_real(123456789.0, 6, 2), "123456789");
    }

    #[test]
    fn test_format_real_keeps_leading_blank() {
        assert_eq!(format_real(123456.7, 8, 1), "  123457");
        assert_eq!(format_real(99999.9, 8, 1), " 99999.9");
        let line = format!("{}{}", format_real(0.8, 6, 2), format_real(123456.7, 8, 1));
        assert_eq!(line.split_whitespace().count(), 2);
    }

    #[test]
    fn test_format_missing_uses_sentinel() {
        assert_eq!(format_real(f64::NAN, 8, 1), "  -999.0");
        assert_eq!(format_real(-999.0, 6, 2), "  -999");
    }

    #[test]
    fn test_format_text() {
        assert_eq!(format_text("ALFALFA", 10), "ALFALFA   ");
        assert_eq!(format_text("VERY_LONG_CROP_NAME", 8), "VERY_LON");
    }

    #[test]
    fn test_formatted_equal() {
        assert!(formatted_equal(10.04, 10.0, 1));
        assert!(!formatted_equal(10.06, 10.0, 1));
        assert_eq!(round_to(2.345, 1), 2.3);
    }
}
