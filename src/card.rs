//! Card brand type and the static facts each brand carries.
//!
//! A brand is derived purely from the bin prefix (see [`crate::detect`]) and
//! is never persisted. Each brand knows its display template, which fixes the
//! digit grouping shown in the card number field and the number of digits the
//! card must have, and its CVV length.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder character standing for one digit in a display template.
pub const DIGIT_PLACEHOLDER: char = '#';

/// Card brands accepted by the payment screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardBrand {
    /// Visa - Prefix 4, 16 digits, 3 digit CVV
    #[serde(rename = "visa", alias = "Visa")]
    Visa,
    /// Mastercard - Prefix 51-55, 2221-2720, 16 digits, 3 digit CVV
    #[serde(rename = "mastercard", alias = "Mastercard")]
    Mastercard,
    /// American Express - Prefix 34, 37, 15 digits, 4 digit CVV
    #[serde(rename = "Amex", alias = "amex")]
    Amex,
    /// Humo (Uzbekistan) - Prefix 9860, 16 digits, no CVV
    #[serde(rename = "Humo", alias = "humo")]
    Humo,
    /// UzCard (Uzbekistan) - Prefix 8600, 5614, 16 digits, no CVV
    #[serde(rename = "uzCard", alias = "UzCard", alias = "uzcard")]
    UzCard,
}

impl CardBrand {
    /// Every supported brand, in declaration order.
    pub const ALL: [CardBrand; 5] = [
        CardBrand::Visa,
        CardBrand::Mastercard,
        CardBrand::Amex,
        CardBrand::Humo,
        CardBrand::UzCard,
    ];

    /// Returns the display template for this brand.
    ///
    /// Each [`DIGIT_PLACEHOLDER`] stands for one digit; spaces are literal
    /// group separators.
    #[inline]
    pub const fn display_format(&self) -> &'static str {
        match self {
            Self::Visa | Self::Mastercard | Self::Humo | Self::UzCard => "#### #### #### ####",
            Self::Amex => "#### ###### #####",
        }
    }

    /// Returns the CVV length, or `None` for brands without a CVV.
    #[inline]
    pub const fn cvv_length(&self) -> Option<usize> {
        match self {
            Self::Visa | Self::Mastercard => Some(3),
            Self::Amex => Some(4),
            Self::Humo | Self::UzCard => None,
        }
    }

    /// Returns true if cards of this brand carry a CVV.
    #[inline]
    pub const fn has_cvv(&self) -> bool {
        self.cvv_length().is_some()
    }

    /// Number of digits a card of this brand must have.
    ///
    /// Derived from the placeholder count of [`display_format`](Self::display_format).
    pub fn expected_length(&self) -> usize {
        self.display_format()
            .chars()
            .filter(|&c| c == DIGIT_PLACEHOLDER)
            .count()
    }

    /// Returns a human-readable name for the card brand.
    #[inline]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Visa => "Visa",
            Self::Mastercard => "Mastercard",
            Self::Amex => "American Express",
            Self::Humo => "Humo",
            Self::UzCard => "UzCard",
        }
    }

    /// Parses a brand from a loose user-supplied name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "visa" => Some(Self::Visa),
            "mastercard" | "mc" => Some(Self::Mastercard),
            "amex" | "american express" => Some(Self::Amex),
            "humo" => Some(Self::Humo),
            "uzcard" | "uz card" => Some(Self::UzCard),
            _ => None,
        }
    }
}

impl fmt::Display for CardBrand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_lengths() {
        assert_eq!(CardBrand::Visa.expected_length(), 16);
        assert_eq!(CardBrand::Mastercard.expected_length(), 16);
        assert_eq!(CardBrand::Humo.expected_length(), 16);
        assert_eq!(CardBrand::UzCard.expected_length(), 16);
        assert_eq!(CardBrand::Amex.expected_length(), 15);
    }

    #[test]
    fn test_cvv_lengths() {
        assert_eq!(CardBrand::Visa.cvv_length(), Some(3));
        assert_eq!(CardBrand::Mastercard.cvv_length(), Some(3));
        assert_eq!(CardBrand::Amex.cvv_length(), Some(4));
        assert_eq!(CardBrand::Humo.cvv_length(), None);
        assert!(!CardBrand::UzCard.has_cvv());
        assert!(CardBrand::Visa.has_cvv());
    }

    #[test]
    fn test_card_brand_names() {
        assert_eq!(CardBrand::Amex.name(), "American Express");
        assert_eq!(CardBrand::UzCard.to_string(), "UzCard");
    }

    #[test]
    fn test_from_name() {
        assert_eq!(CardBrand::from_name("VISA"), Some(CardBrand::Visa));
        assert_eq!(CardBrand::from_name(" uzcard "), Some(CardBrand::UzCard));
        assert_eq!(CardBrand::from_name("discover"), None);
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&CardBrand::Amex).unwrap(), "\"Amex\"");
        assert_eq!(serde_json::to_string(&CardBrand::UzCard).unwrap(), "\"uzCard\"");
        let brand: CardBrand = serde_json::from_str("\"Humo\"").unwrap();
        assert_eq!(brand, CardBrand::Humo);
        let brand: CardBrand = serde_json::from_str("\"visa\"").unwrap();
        assert_eq!(brand, CardBrand::Visa);
    }

    #[test]
    fn test_card_brand_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CardBrand>();
    }
}
