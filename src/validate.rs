//! Card number validation.
//!
//! Rules, in order:
//! 1. the number is not empty once whitespace is removed
//! 2. it has at least [`MIN_CARD_LENGTH`] characters
//! 3. it consists of digits only and passes the Luhn check
//! 4. when a brand is known, the digit count equals the brand's length

use crate::error::CardNumberError;
use crate::format::strip_whitespace;
use crate::luhn;
use crate::CardBrand;

/// Minimum number of digits accepted for any card.
pub const MIN_CARD_LENGTH: usize = 15;

/// Validates a card number against an optional detected brand.
///
/// # Example
///
/// ```
/// use payze::validate::validate_card_number;
/// use payze::{CardBrand, CardNumberError};
///
/// assert!(validate_card_number("4532 0151 1283 0366", Some(CardBrand::Visa)).is_ok());
/// assert_eq!(
///     validate_card_number("4532015112830367", None),
///     Err(CardNumberError::InvalidChecksum)
/// );
/// ```
pub fn validate_card_number(
    number: &str,
    brand: Option<CardBrand>,
) -> Result<(), CardNumberError> {
    let number = strip_whitespace(number);

    if number.is_empty() {
        return Err(CardNumberError::Empty);
    }

    let length = number.chars().count();
    if length < MIN_CARD_LENGTH {
        return Err(CardNumberError::TooShort {
            length,
            minimum: MIN_CARD_LENGTH,
        });
    }

    let mut digits = Vec::with_capacity(length);
    for (position, character) in number.chars().enumerate() {
        if !character.is_ascii_digit() {
            return Err(CardNumberError::InvalidCharacter {
                position,
                character,
            });
        }
        digits.push(character as u8 - b'0');
    }

    if !luhn::passes(&digits) {
        return Err(CardNumberError::InvalidChecksum);
    }

    if let Some(brand) = brand {
        let expected = brand.expected_length();
        if digits.len() != expected {
            return Err(CardNumberError::InvalidLengthForBrand {
                brand,
                length: digits.len(),
                expected,
            });
        }
    }

    Ok(())
}

/// Quick yes/no form of [`validate_card_number`].
#[inline]
pub fn is_valid(number: &str, brand: Option<CardBrand>) -> bool {
    validate_card_number(number, brand).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VISA_VALID: &str = "4532015112830366";
    const AMEX_VALID: &str = "378282246310005";
    const MASTERCARD_VALID: &str = "5555555555554444";

    #[test]
    fn test_valid_numbers() {
        assert_eq!(validate_card_number(VISA_VALID, Some(CardBrand::Visa)), Ok(()));
        assert_eq!(validate_card_number(AMEX_VALID, Some(CardBrand::Amex)), Ok(()));
        assert_eq!(
            validate_card_number(MASTERCARD_VALID, Some(CardBrand::Mastercard)),
            Ok(())
        );
    }

    #[test]
    fn test_formatted_input() {
        assert!(is_valid("4532 0151 1283 0366", Some(CardBrand::Visa)));
        assert!(is_valid("3782 822463 10005", Some(CardBrand::Amex)));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(validate_card_number("", None), Err(CardNumberError::Empty));
        assert_eq!(validate_card_number("   ", None), Err(CardNumberError::Empty));
    }

    #[test]
    fn test_too_short() {
        assert_eq!(
            validate_card_number("45320151128303", None),
            Err(CardNumberError::TooShort {
                length: 14,
                minimum: 15
            })
        );
    }

    #[test]
    fn test_invalid_character() {
        assert_eq!(
            validate_card_number("4532-0151-1283-0366", None),
            Err(CardNumberError::InvalidCharacter {
                position: 4,
                character: '-'
            })
        );
    }

    #[test]
    fn test_invalid_checksum() {
        assert_eq!(
            validate_card_number("4532015112830367", None),
            Err(CardNumberError::InvalidChecksum)
        );
    }

    #[test]
    fn test_length_must_match_brand() {
        // 15-digit Amex number declared as Visa
        assert_eq!(
            validate_card_number(AMEX_VALID, Some(CardBrand::Visa)),
            Err(CardNumberError::InvalidLengthForBrand {
                brand: CardBrand::Visa,
                length: 15,
                expected: 16
            })
        );
    }

    #[test]
    fn test_unknown_brand_skips_length_check() {
        assert!(is_valid(AMEX_VALID, None));
        // 19 digits, passes Luhn
        assert!(is_valid("4000000000000000006", None));
        assert!(!is_valid("4000000000000000006", Some(CardBrand::Visa)));
    }
}
