//! Display formatting for converted quantities

/// Decimal places shown for a converted value
pub const DISPLAY_DECIMALS: usize = 6;

/// Format a quantity for display: six decimals with trailing zeros and a
/// dangling decimal point removed.
///
/// Examples:
/// - 2.5 -> "2.5"
/// - 3.0 -> "3"
/// - 176.66666666 -> "176.666667"
pub fn format_quantity(value: f64) -> String {
    let fixed = format!("{:.*}", DISPLAY_DECIMALS, value);
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed.as_str()
    };

    // Tiny negatives round to "-0"
    if trimmed == "-0" {
        return "0".to_string();
    }
    trimmed.to_string()
}

/// Text placed on the clipboard for a converted value, e.g. "2.5 kg"
pub fn clipboard_text(formatted: &str, symbol: &str) -> String {
    format!("{} {}", formatted, symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_strips_trailing_zeros() {
        assert_eq!(format_quantity(2.5), "2.5");
        assert_eq!(format_quantity(3.0), "3");
        assert_eq!(format_quantity(120.0), "120");
        assert_eq!(format_quantity(0.0), "0");
    }

    #[test]
    fn test_format_rounds_to_six_decimals() {
        assert_eq!(format_quantity(176.666_666_666), "176.666667");
        assert_eq!(format_quantity(1.0 / 3.0), "0.333333");
        assert_eq!(format_quantity(2.000_000_4), "2");
    }

    #[test]
    fn test_format_negative_values() {
        assert_eq!(format_quantity(-17.5), "-17.5");
        assert_eq!(format_quantity(-0.000_000_1), "0");
        assert_eq!(format_quantity(-0.0), "0");
    }

    #[test]
    fn test_clipboard_text() {
        assert_eq!(clipboard_text("2.5", "kg"), "2.5 kg");
        assert_eq!(clipboard_text("212", "°F"), "212 °F");
    }
}
