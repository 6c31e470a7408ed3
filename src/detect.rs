//! Card brand detection from the bin prefix.
//!
//! Classification looks at progressively longer prefixes: one digit for
//! Visa, two for Amex and the 51-55 Mastercard range, four for UzCard, Humo
//! and the 2221-2720 Mastercard range. Input shorter than a rule needs is
//! simply not matched by that rule, so a partial bin yields `None` rather
//! than an error and the caller re-runs classification as digits arrive.

use crate::CardBrand;
use thiserror::Error;

/// Reasons a bin cannot be classified at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BinError {
    /// The bin was empty after removing whitespace.
    #[error("bin is empty")]
    Empty,

    /// The bin contains something other than digits and whitespace.
    #[error("invalid character '{}' at position {position} in bin", character.escape_default())]
    InvalidCharacter {
        /// Position in the whitespace-stripped bin (0-indexed).
        position: usize,
        /// The offending character.
        character: char,
    },
}

/// Detects the card brand from a sequence of digits (values 0-9).
///
/// # Example
///
/// ```
/// use payze::detect::detect_brand;
/// use payze::CardBrand;
///
/// assert_eq!(detect_brand(&[4]), Some(CardBrand::Visa));
/// assert_eq!(detect_brand(&[3, 7]), Some(CardBrand::Amex));
/// assert_eq!(detect_brand(&[9, 8, 6, 0]), Some(CardBrand::Humo));
/// assert_eq!(detect_brand(&[2, 2]), None);
/// ```
#[inline]
pub fn detect_brand(digits: &[u8]) -> Option<CardBrand> {
    match digits {
        [4, ..] => Some(CardBrand::Visa),

        [3, 4 | 7, ..] => Some(CardBrand::Amex),
        [5, 1..=5, ..] => Some(CardBrand::Mastercard),

        [8, 6, 0, 0, ..] | [5, 6, 1, 4, ..] => Some(CardBrand::UzCard),
        [9, 8, 6, 0, ..] => Some(CardBrand::Humo),

        // Mastercard 2-series: 2221-2720
        [2, 2, 2, 1..=9, ..] => Some(CardBrand::Mastercard),
        [2, 2, 3..=9, _, ..] => Some(CardBrand::Mastercard),
        [2, 3..=6, _, _, ..] => Some(CardBrand::Mastercard),
        [2, 7, 0..=1, _, ..] => Some(CardBrand::Mastercard),
        [2, 7, 2, 0, ..] => Some(CardBrand::Mastercard),

        _ => None,
    }
}

/// Parses a bin string into digit values, ignoring whitespace.
pub fn parse_bin(bin: &str) -> Result<Vec<u8>, BinError> {
    let mut digits = Vec::with_capacity(bin.len());

    for character in bin.chars().filter(|c| !c.is_whitespace()) {
        match character.to_digit(10) {
            Some(d) if character.is_ascii_digit() => digits.push(d as u8),
            _ => {
                return Err(BinError::InvalidCharacter {
                    position: digits.len(),
                    character,
                })
            }
        }
    }

    if digits.is_empty() {
        return Err(BinError::Empty);
    }

    Ok(digits)
}

/// Classifies a bin string into a card brand.
///
/// Whitespace is ignored. Empty input and input with non-digit characters
/// are rejected; a well-formed bin that matches no rule (yet) is `Ok(None)`.
///
/// # Example
///
/// ```
/// use payze::detect::{classify, BinError};
/// use payze::CardBrand;
///
/// assert_eq!(classify("4532 0151"), Ok(Some(CardBrand::Visa)));
/// assert_eq!(classify("2"), Ok(None));
/// assert_eq!(classify("2221"), Ok(Some(CardBrand::Mastercard)));
/// assert_eq!(classify(""), Err(BinError::Empty));
/// ```
pub fn classify(bin: &str) -> Result<Option<CardBrand>, BinError> {
    parse_bin(bin).map(|digits| detect_brand(&digits))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visa_detection() {
        assert_eq!(detect_brand(&[4]), Some(CardBrand::Visa));
        assert_eq!(
            detect_brand(&[4, 5, 3, 2, 0, 1, 5, 1, 1, 2, 8, 3, 0, 3, 6, 6]),
            Some(CardBrand::Visa)
        );
    }

    #[test]
    fn test_amex_detection() {
        assert_eq!(detect_brand(&[3, 4]), Some(CardBrand::Amex));
        assert_eq!(detect_brand(&[3, 7, 8, 2]), Some(CardBrand::Amex));
        assert_eq!(detect_brand(&[3, 5, 0, 0]), None);
        assert_eq!(detect_brand(&[3]), None);
    }

    #[test]
    fn test_mastercard_detection() {
        assert_eq!(detect_brand(&[5, 1]), Some(CardBrand::Mastercard));
        assert_eq!(detect_brand(&[5, 5, 0, 0]), Some(CardBrand::Mastercard));
        assert_eq!(detect_brand(&[5, 0, 0, 0]), None);
        assert_eq!(detect_brand(&[5, 6, 0, 0]), None);
    }

    #[test]
    fn test_mastercard_two_series_bounds() {
        assert_eq!(detect_brand(&[2, 2, 2, 0]), None);
        assert_eq!(detect_brand(&[2, 2, 2, 1]), Some(CardBrand::Mastercard));
        assert_eq!(detect_brand(&[2, 2, 9, 9]), Some(CardBrand::Mastercard));
        assert_eq!(detect_brand(&[2, 5, 0, 0]), Some(CardBrand::Mastercard));
        assert_eq!(detect_brand(&[2, 7, 1, 9]), Some(CardBrand::Mastercard));
        assert_eq!(detect_brand(&[2, 7, 2, 0]), Some(CardBrand::Mastercard));
        assert_eq!(detect_brand(&[2, 7, 2, 1]), None);
        assert_eq!(detect_brand(&[2, 2, 2]), None);
    }

    #[test]
    fn test_uzcard_detection() {
        assert_eq!(detect_brand(&[8, 6, 0, 0]), Some(CardBrand::UzCard));
        assert_eq!(detect_brand(&[5, 6, 1, 4, 6, 8]), Some(CardBrand::UzCard));
        assert_eq!(detect_brand(&[8, 6, 0]), None);
    }

    #[test]
    fn test_humo_detection() {
        assert_eq!(detect_brand(&[9, 8, 6, 0, 1, 2]), Some(CardBrand::Humo));
        assert_eq!(detect_brand(&[9, 8, 6, 1]), None);
    }

    #[test]
    fn test_unknown_brand() {
        assert_eq!(detect_brand(&[]), None);
        assert_eq!(detect_brand(&[0, 0, 0, 0]), None);
        assert_eq!(detect_brand(&[1, 2, 3, 4, 5, 6]), None);
        assert_eq!(detect_brand(&[6, 0, 1, 1]), None);
    }

    #[test]
    fn test_classify_strips_whitespace() {
        assert_eq!(classify(" 8600 1234 "), Ok(Some(CardBrand::UzCard)));
        assert_eq!(classify("3 7"), Ok(Some(CardBrand::Amex)));
    }

    #[test]
    fn test_classify_rejects_invalid_input() {
        assert_eq!(classify(""), Err(BinError::Empty));
        assert_eq!(classify("   "), Err(BinError::Empty));
        assert_eq!(
            classify("41a1"),
            Err(BinError::InvalidCharacter {
                position: 2,
                character: 'a'
            })
        );
        // Non-ASCII digits are not card digits
        assert!(classify("٤١١١").is_err());
    }

    #[test]
    fn test_classification_changes_as_digits_arrive() {
        assert_eq!(classify("2"), Ok(None));
        assert_eq!(classify("22"), Ok(None));
        assert_eq!(classify("222"), Ok(None));
        assert_eq!(classify("2221"), Ok(Some(CardBrand::Mastercard)));
    }
}
