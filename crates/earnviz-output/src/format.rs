//! Human-readable dollar amounts and markup-safe text.

use std::borrow::Cow;

const BILLION: i64 = 1_000_000_000;
const MILLION: f64 = 1_000_000.0;

/// Escape text for XML or HTML content and attribute values.
///
/// ```
/// use earnviz_output::escape_markup;
///
/// assert_eq!(escape_markup("R&D <b>"), "R&amp;D &lt;b&gt;");
/// ```
pub fn escape_markup(text: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(text)
}

/// Abbreviate a whole-dollar amount for chart labels.
///
/// Amounts of a billion or more (in absolute value) print as billions with
/// one decimal; everything else prints as whole millions.
///
/// ```
/// use earnviz_output::format_dollar_amount;
///
/// assert_eq!(format_dollar_amount(1_500_000_000), "$1.5B");
/// assert_eq!(format_dollar_amount(450_000_000), "$450M");
/// assert_eq!(format_dollar_amount(-2_000_000_000), "$-2.0B");
/// ```
pub fn format_dollar_amount(amount: i64) -> String {
    if amount.unsigned_abs() >= BILLION.unsigned_abs() {
        format!("${:.1}B", amount as f64 / BILLION as f64)
    } else {
        format!("${:.0}M", amount as f64 / MILLION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1_500_000_000, "$1.5B")]
    #[case(450_000_000, "$450M")]
    #[case(1_000_000_000, "$1.0B")]
    #[case(999_000_000, "$999M")]
    #[case(20_699_000_000, "$20.7B")]
    #[case(249_000_000, "$249M")]
    #[case(0, "$0M")]
    #[case(-450_000_000, "$-450M")]
    #[case(-1_000_000_000, "$-1.0B")]
    fn test_format_dollar_amount(#[case] amount: i64, #[case] expected: &str) {
        assert_eq!(format_dollar_amount(amount), expected);
    }

    #[rstest]
    #[case("Net Profit", "Net Profit")]
    #[case(r#"SG&A <"x">"#, "SG&amp;A &lt;&quot;x&quot;&gt;")]
    #[case("O'Brien's", "O&apos;Brien&apos;s")]
    #[case(r#""><script>"#, "&quot;&gt;&lt;script&gt;")]
    fn test_escape_markup(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(escape_markup(text), expected);
    }

    #[test]
    fn test_escape_markup_borrows_clean_text() {
        assert!(matches!(escape_markup("Revenue"), Cow::Borrowed("Revenue")));
    }
}
