//! Integration tests for the card-entry engine.
//!
//! These walk through what the payment screen does as the user types:
//! classify the bin, reformat the field, then validate every field in order.

use payze::expiry::{self, YearMonth};
use payze::holder::{self, HolderNameRule};
use payze::localization::{localize, Language, MessageKey};
use payze::money::{Currency, Money};
use payze::redirect::{PaymentCompletion, RedirectClassifier};
use payze::{
    classify, cvv, format, is_valid, luhn, mask, validate_card_number, BinError, CardBrand,
    CardNumberError, Configuration, ServiceEnvironment,
};

// =============================================================================
// TEST CARD NUMBERS
// =============================================================================
// They pass the Luhn check but are not real cards.

mod test_cards {
    pub const VISA_1: &str = "4532015112830366";
    pub const VISA_2: &str = "4111111111111111";
    pub const VISA_3: &str = "4242424242424242";

    pub const MC_1: &str = "5555555555554444";
    pub const MC_2: &str = "5105105105105100";
    pub const MC_2SERIES_LOW: &str = "2221000000000009";
    pub const MC_2SERIES_HIGH: &str = "2720999999999996";

    pub const AMEX_1: &str = "378282246310005";
    pub const AMEX_2: &str = "371449635398431";

    pub const HUMO: &str = "9860123456789015";
    pub const UZCARD_8600: &str = "8600123456789012";
    pub const UZCARD_5614: &str = "5614123456789012";
}

use test_cards::*;

// =============================================================================
// CLASSIFICATION
// =============================================================================

#[test]
fn test_every_test_card_classifies() {
    let cases = [
        (VISA_1, CardBrand::Visa),
        (VISA_2, CardBrand::Visa),
        (VISA_3, CardBrand::Visa),
        (MC_1, CardBrand::Mastercard),
        (MC_2, CardBrand::Mastercard),
        (MC_2SERIES_LOW, CardBrand::Mastercard),
        (MC_2SERIES_HIGH, CardBrand::Mastercard),
        (AMEX_1, CardBrand::Amex),
        (AMEX_2, CardBrand::Amex),
        (HUMO, CardBrand::Humo),
        (UZCARD_8600, CardBrand::UzCard),
        (UZCARD_5614, CardBrand::UzCard),
    ];

    for (number, brand) in cases {
        assert_eq!(classify(number), Ok(Some(brand)), "{number}");
        assert!(is_valid(number, Some(brand)), "{number}");
    }
}

#[test]
fn test_classification_as_digits_arrive() {
    // "2" is ambiguous, "22" is not yet enough, "2221" is Mastercard
    assert_eq!(classify("2"), Ok(None));
    assert_eq!(classify("22"), Ok(None));
    assert_eq!(classify("222"), Ok(None));
    assert_eq!(classify("2221"), Ok(Some(CardBrand::Mastercard)));

    // 56 is not Mastercard on two digits, 5614 is UzCard on four
    assert_eq!(classify("56"), Ok(None));
    assert_eq!(classify("5614"), Ok(Some(CardBrand::UzCard)));

    assert_eq!(classify("3"), Ok(None));
    assert_eq!(classify("34"), Ok(Some(CardBrand::Amex)));
}

#[test]
fn test_mastercard_2_series_boundaries() {
    assert_eq!(classify("2220"), Ok(None));
    assert_eq!(classify("2221"), Ok(Some(CardBrand::Mastercard)));
    assert_eq!(classify("2720"), Ok(Some(CardBrand::Mastercard)));
    assert_eq!(classify("2721"), Ok(None));
}

#[test]
fn test_invalid_bins_are_rejected() {
    assert_eq!(classify(""), Err(BinError::Empty));
    assert_eq!(classify("   "), Err(BinError::Empty));
    assert!(matches!(
        classify("4532-0151"),
        Err(BinError::InvalidCharacter { character: '-', .. })
    ));
}

// =============================================================================
// TYPING FLOW
// =============================================================================

#[test]
fn test_field_text_while_typing_amex() {
    let typed = "378282246310005";
    let mut shown = Vec::new();

    for end in 1..=typed.len() {
        let prefix = &typed[..end];
        let brand = classify(prefix).unwrap();
        shown.push(format::format_card_number(prefix, brand));
    }

    assert_eq!(shown[0], "3");
    assert_eq!(shown[3], "3782");
    assert_eq!(shown[4], "3782 8");
    assert_eq!(shown[10], "3782 822463 1");
    assert_eq!(shown.last().unwrap(), "3782 822463 10005");
}

#[test]
fn test_reformatting_previous_output_is_stable() {
    for number in [VISA_1, AMEX_1, HUMO] {
        let brand = classify(number).unwrap();
        let once = format::format_card_number(number, brand);
        let twice = format::format_card_number(&once, brand);
        assert_eq!(once, twice);
    }
}

#[test]
fn test_extra_digits_are_dropped_by_template() {
    assert_eq!(
        format::format_card_number("45320151128303661234", Some(CardBrand::Visa)),
        "4532 0151 1283 0366"
    );
}

// =============================================================================
// NUMBER VALIDATION
// =============================================================================

#[test]
fn test_rule_order() {
    assert_eq!(validate_card_number("", None), Err(CardNumberError::Empty));
    assert_eq!(
        validate_card_number("4532 0151", None),
        Err(CardNumberError::TooShort {
            length: 8,
            minimum: 15
        })
    );
    assert_eq!(
        validate_card_number("4532015112830367", None),
        Err(CardNumberError::InvalidChecksum)
    );
    assert_eq!(
        validate_card_number(AMEX_1, Some(CardBrand::Visa)),
        Err(CardNumberError::InvalidLengthForBrand {
            brand: CardBrand::Visa,
            length: 15,
            expected: 16
        })
    );
}

#[test]
fn test_luhn_vectors() {
    assert!(luhn::passes_str(VISA_1));
    assert!(!luhn::passes_str("4532015112830367"));
    assert_eq!(luhn::check_digit(&[4, 5, 3, 2, 0, 1, 5, 1, 1, 2, 8, 3, 0, 3, 6]), 6);
}

// =============================================================================
// OTHER FIELDS
// =============================================================================

#[test]
fn test_expiration_relative_to_fixed_month() {
    let today = YearMonth::new(2025, 6).unwrap();

    assert!(expiry::validate_expiry_at("06/2025", today).is_ok());
    assert!(expiry::validate_expiry_at("07/2025", today).is_ok());
    assert!(expiry::validate_expiry_at("01/2026", today).is_ok());
    assert!(expiry::validate_expiry_at("05/2025", today).is_err());
    assert!(expiry::validate_expiry_at("12/2024", today).is_err());

    assert!(expiry::validate_expiry_at("6/2025", today).is_ok());
    assert!(expiry::validate_expiry_at("06/25", today).is_err());
    assert!(expiry::validate_expiry_at("00/2030", today).is_err());
    assert!(expiry::validate_expiry_at("06/2025/01", today).is_err());
}

#[test]
fn test_submission_format() {
    assert_eq!(expiry::to_submission_format("07/2027").as_deref(), Some("07/27"));
    assert_eq!(expiry::to_submission_format("12/2099").as_deref(), Some("12/99"));
    assert_eq!(expiry::to_submission_format("07/27"), None);
}

#[test]
fn test_cardholder_rules() {
    assert!(holder::validate_card_holder("Jane").is_ok());
    assert!(holder::validate_card_holder("  ").is_err());
    assert!(holder::validate_card_holder_with("Jane", HolderNameRule::TwoTokens).is_err());
    assert!(holder::validate_card_holder_with("Jane Doe", HolderNameRule::TwoTokens).is_ok());
}

#[test]
fn test_cvv_per_brand() {
    for brand in CardBrand::ALL {
        let valid = match brand.cvv_length() {
            Some(3) => "123",
            Some(4) => "1234",
            _ => "",
        };
        assert!(cvv::is_valid_cvv(valid, Some(brand)), "{brand}");
    }
    assert!(!cvv::is_valid_cvv("12", Some(CardBrand::Mastercard)));
}

// =============================================================================
// PRESENTATION HELPERS
// =============================================================================

#[test]
fn test_masking_never_leaks_number() {
    for number in [VISA_1, AMEX_1, HUMO] {
        let masked = mask::mask_number(number);
        assert!(!masked.contains(number));
        assert!(masked.ends_with(&number[number.len() - 4..]));
    }
}

#[test]
fn test_validation_messages_are_localized() {
    let error = payze::ValidationError::from(CardNumberError::InvalidChecksum);
    assert_eq!(localize(error.message_key(), Language::English), "Invalid card number");
    assert_eq!(localize(MessageKey::CvvError, Language::Uzbek), "CVV noto'g'ri");
}

#[test]
fn test_money_banner() {
    assert_eq!(Money::new(1234.5, Currency::from_code("usd")).to_string(), "$1 234.50");
    assert_eq!(Money::new(150000.0, Currency::Uzs).to_string(), "150 000.00 UZS");
}

#[test]
fn test_default_configuration_redirects() {
    let config = Configuration::new(ServiceEnvironment::Production);
    let classifier: RedirectClassifier = config.redirect_classifier();

    assert_eq!(
        classifier.classify_str("https://paygate.payze.uz/payment/success?id=1"),
        Some(PaymentCompletion::Succeeded)
    );
    assert_eq!(
        classifier.classify_str("https://paygate.payze.io/fail"),
        Some(PaymentCompletion::Failed)
    );
    assert_eq!(classifier.classify_str("https://acs.bank.example/success"), None);
}
