//! Card number formatting for the input field.
//!
//! Formatting walks the brand's display template left to right. A
//! placeholder consumes the next input character; any other template
//! character is a separator and is copied without consuming input. The walk
//! stops as soon as either side is exhausted, so a separator is only emitted
//! when a digit follows it and input beyond the template is dropped.
//!
//! # Example
//!
//! ```
//! use payze::format::{format_card_number, format_for_brand};
//! use payze::CardBrand;
//!
//! assert_eq!(format_for_brand("378282246310005", CardBrand::Amex), "3782 822463 10005");
//! assert_eq!(format_for_brand("45320", CardBrand::Visa), "4532 0");
//!
//! // Unknown brand falls back to the Visa grouping
//! assert_eq!(format_card_number("9999 88887", None), "9999 8888 7");
//! ```

use crate::card::DIGIT_PLACEHOLDER;
use crate::CardBrand;

/// Brand whose template is used while the brand is still unknown.
pub const FALLBACK_BRAND: CardBrand = CardBrand::Visa;

/// Substitutes `digits` into `template`.
pub fn apply_template(digits: &str, template: &str) -> String {
    let mut input = digits.chars().peekable();
    let mut result = String::with_capacity(template.len());

    for slot in template.chars() {
        if input.peek().is_none() {
            break;
        }

        if slot == DIGIT_PLACEHOLDER {
            if let Some(c) = input.next() {
                result.push(c);
            }
        } else {
            result.push(slot);
        }
    }

    result
}

/// Formats raw digits using the display template of `brand`.
#[inline]
pub fn format_for_brand(digits: &str, brand: CardBrand) -> String {
    apply_template(digits, brand.display_format())
}

/// Formats whatever the user typed, re-deriving the grouping from scratch.
///
/// Whitespace (including previously inserted separators) is removed first.
/// When `brand` is `None` the [`FALLBACK_BRAND`] template is used.
pub fn format_card_number(input: &str, brand: Option<CardBrand>) -> String {
    format_for_brand(&strip_whitespace(input), brand.unwrap_or(FALLBACK_BRAND))
}

/// Removes all whitespace from the input.
///
/// # Example
///
/// ```
/// use payze::format::strip_whitespace;
///
/// assert_eq!(strip_whitespace(" 4532 0151\t1283 0366 "), "4532015112830366");
/// ```
pub fn strip_whitespace(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_visa_16() {
        assert_eq!(
            format_for_brand("4532015112830366", CardBrand::Visa),
            "4532 0151 1283 0366"
        );
    }

    #[test]
    fn test_format_amex() {
        assert_eq!(
            format_for_brand("378282246310005", CardBrand::Amex),
            "3782 822463 10005"
        );
    }

    #[test]
    fn test_separator_waits_for_next_digit() {
        assert_eq!(format_for_brand("4532", CardBrand::Visa), "4532");
        assert_eq!(format_for_brand("45320", CardBrand::Visa), "4532 0");
        assert_eq!(format_for_brand("3782822463", CardBrand::Amex), "3782 822463");
    }

    #[test]
    fn test_input_longer_than_template_is_truncated() {
        assert_eq!(
            format_for_brand("45320151128303661234", CardBrand::Visa),
            "4532 0151 1283 0366"
        );
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(format_for_brand("", CardBrand::Visa), "");
        assert_eq!(format_card_number("   ", None), "");
    }

    #[test]
    fn test_unknown_brand_uses_visa_grouping() {
        assert_eq!(format_card_number("123456", None), "1234 56");
    }

    #[test]
    fn test_reformatting_is_stable() {
        let once = format_card_number("378282246310005", Some(CardBrand::Amex));
        let twice = format_card_number(&once, Some(CardBrand::Amex));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_custom_template() {
        assert_eq!(apply_template("1234", "##-##"), "12-34");
        assert_eq!(apply_template("12", "##-##"), "12");
    }
}
