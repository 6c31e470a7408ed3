//! Field-scoped validation errors.
//!
//! Validation failures are returned values, never panics: the presentation
//! layer shows the message of the first failing field inline. The field
//! order used on submit is card number, cardholder name, expiration date,
//! CVV (see [`Field::SUBMIT_ORDER`]).

use crate::cvv::CvvError;
use crate::expiry::ExpiryError;
use crate::holder::HolderError;
use crate::localization::MessageKey;
use crate::CardBrand;
use thiserror::Error;

/// Reasons a card number is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardNumberError {
    /// The input was empty after removing whitespace.
    #[error("card number is empty")]
    Empty,

    /// The card number has too few characters.
    #[error("card number too short: got {length} digits, minimum is {minimum}")]
    TooShort {
        /// The actual number of characters provided.
        length: usize,
        /// The minimum required digits.
        minimum: usize,
    },

    /// A non-digit character was found.
    #[error("invalid character '{}' at position {position} (only digits allowed)", character.escape_default())]
    InvalidCharacter {
        /// Position in the whitespace-stripped number (0-indexed).
        position: usize,
        /// The invalid character.
        character: char,
    },

    /// The Luhn checksum failed, usually a typo.
    #[error("invalid checksum (Luhn check failed) - please verify the card number")]
    InvalidChecksum,

    /// The digit count does not match the detected brand.
    #[error("{brand} cards must have {expected} digits, got {length}")]
    InvalidLengthForBrand {
        /// The detected card brand.
        brand: CardBrand,
        /// The actual number of digits.
        length: usize,
        /// The length required by the brand's template.
        expected: usize,
    },
}

/// Input fields of the payment form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Card number field.
    CardNumber,
    /// Cardholder name field.
    CardHolder,
    /// Expiration date field.
    ExpirationDate,
    /// CVV field.
    Cvv,
}

impl Field {
    /// Order in which fields are validated on submit.
    pub const SUBMIT_ORDER: [Field; 4] = [
        Field::CardNumber,
        Field::CardHolder,
        Field::ExpirationDate,
        Field::Cvv,
    ];
}

/// The first field that failed validation, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The card number is invalid.
    #[error(transparent)]
    CardNumber(#[from] CardNumberError),

    /// The cardholder name is invalid.
    #[error(transparent)]
    CardHolder(#[from] HolderError),

    /// The expiration date is invalid or in the past.
    #[error(transparent)]
    ExpirationDate(#[from] ExpiryError),

    /// The CVV is invalid for the brand.
    #[error(transparent)]
    Cvv(#[from] CvvError),
}

impl ValidationError {
    /// Returns the field this error belongs to.
    pub const fn field(&self) -> Field {
        match self {
            Self::CardNumber(_) => Field::CardNumber,
            Self::CardHolder(_) => Field::CardHolder,
            Self::ExpirationDate(_) => Field::ExpirationDate,
            Self::Cvv(_) => Field::Cvv,
        }
    }

    /// Returns the localization key of the inline message for this error.
    pub const fn message_key(&self) -> MessageKey {
        match self.field() {
            Field::CardNumber => MessageKey::CardNumberError,
            Field::CardHolder => MessageKey::CardHolderError,
            Field::ExpirationDate => MessageKey::ExpirationDateError,
            Field::Cvv => MessageKey::CvvError,
        }
    }
}
