//! Cardholder name validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which rule the cardholder name must satisfy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HolderNameRule {
    /// At least one alphabetic character.
    #[default]
    AnyLetter,
    /// At least two whitespace-separated non-empty tokens (first and last name).
    TwoTokens,
}

/// Reasons a cardholder name is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HolderError {
    /// The name contains no letter.
    #[error("cardholder name must contain at least one letter")]
    NoLetters,

    /// The name has fewer than two words.
    #[error("cardholder name must contain first and last name, got {tokens} word(s)")]
    TooFewTokens {
        /// Number of words found.
        tokens: usize,
    },
}

/// Validates a cardholder name with the default [`HolderNameRule::AnyLetter`] rule.
///
/// # Example
///
/// ```
/// use payze::holder::validate_card_holder;
///
/// assert!(validate_card_holder("Jane Doe").is_ok());
/// assert!(validate_card_holder("Ж").is_ok());
/// assert!(validate_card_holder("1234 !").is_err());
/// ```
pub fn validate_card_holder(name: &str) -> Result<(), HolderError> {
    validate_card_holder_with(name, HolderNameRule::AnyLetter)
}

/// Validates a cardholder name with an explicit rule.
pub fn validate_card_holder_with(name: &str, rule: HolderNameRule) -> Result<(), HolderError> {
    match rule {
        HolderNameRule::AnyLetter => {
            if name.chars().any(char::is_alphabetic) {
                Ok(())
            } else {
                Err(HolderError::NoLetters)
            }
        }
        HolderNameRule::TwoTokens => {
            let tokens = name.split_whitespace().count();
            if tokens >= 2 {
                Ok(())
            } else {
                Err(HolderError::TooFewTokens { tokens })
            }
        }
    }
}
