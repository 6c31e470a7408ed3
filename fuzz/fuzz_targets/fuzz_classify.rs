//! Fuzz target for bin classification and card number validation.

#![no_main]

use libfuzzer_sys::fuzz_target;
use payze::{classify, is_valid, validate_card_number, BinError, CardBrand};

fuzz_target!(|data: &str| {
    let detected = classify(data);
    if let Err(BinError::Empty) = detected {
        assert!(data.chars().all(char::is_whitespace));
    }

    let _ = validate_card_number(data, detected.clone().ok().flatten());
    for brand in CardBrand::ALL {
        let _ = is_valid(data, Some(brand));
    }
});
