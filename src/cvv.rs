//! CVV/CVC/CID validation.
//!
//! The required length comes from the detected brand: 4 digits for
//! American Express, 3 for Visa and Mastercard. Humo and UzCard cards have
//! no CVV, and while the brand is still unknown there is nothing to check
//! against, so both cases always pass.
//!
//! # Example
//!
//! ```
//! use payze::cvv::validate_cvv;
//! use payze::CardBrand;
//!
//! assert!(validate_cvv("123", Some(CardBrand::Visa)).is_ok());
//! assert!(validate_cvv("1234", Some(CardBrand::Amex)).is_ok());
//! assert!(validate_cvv("1234", Some(CardBrand::Visa)).is_err());
//! assert!(validate_cvv("", Some(CardBrand::Humo)).is_ok());
//! ```

use crate::CardBrand;
use thiserror::Error;

/// Errors that can occur during CVV validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CvvError {
    /// The CVV contains non-digit characters.
    #[error("invalid character '{}' at position {position}", character.escape_default())]
    InvalidCharacter {
        /// The invalid character found.
        character: char,
        /// Position of the invalid character.
        position: usize,
    },

    /// The CVV length doesn't match the card brand requirements.
    #[error("{} cards require {expected} digit CVV, got {length}", brand.name())]
    WrongLengthForBrand {
        /// The card brand.
        brand: CardBrand,
        /// Actual length provided.
        length: usize,
        /// Expected length for this brand.
        expected: usize,
    },
}

/// Validates a CVV for an optional detected brand.
pub fn validate_cvv(input: &str, brand: Option<CardBrand>) -> Result<(), CvvError> {
    let Some(brand) = brand else {
        return Ok(());
    };

    if let Some((position, character)) = input
        .chars()
        .enumerate()
        .find(|(_, c)| !c.is_ascii_digit())
    {
        return Err(CvvError::InvalidCharacter {
            character,
            position,
        });
    }

    let Some(expected) = brand.cvv_length() else {
        return Ok(());
    };

    let length = input.len();
    if length != expected {
        return Err(CvvError::WrongLengthForBrand {
            brand,
            length,
            expected,
        });
    }

    Ok(())
}

/// Quick yes/no form of [`validate_cvv`].
#[inline]
pub fn is_valid_cvv(input: &str, brand: Option<CardBrand>) -> bool {
    validate_cvv(input, brand).is_ok()
}
