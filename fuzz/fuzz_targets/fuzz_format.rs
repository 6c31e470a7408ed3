//! Fuzz target for card number formatting.

#![no_main]

use libfuzzer_sys::fuzz_target;
use payze::{format, CardBrand};

fuzz_target!(|data: &str| {
    let digits = format::strip_whitespace(data);

    for brand in CardBrand::ALL {
        let formatted = format::format_for_brand(&digits, brand);
        let kept = format::strip_whitespace(&formatted);
        assert!(digits.starts_with(&kept), "formatting must keep the leading characters");
        assert_eq!(format::format_card_number(&formatted, Some(brand)), formatted);
    }
});
