//! Fuzz target for CVV validation.

#![no_main]

use libfuzzer_sys::fuzz_target;
use payze::{cvv, CardBrand};

fuzz_target!(|data: &str| {
    assert!(cvv::is_valid_cvv(data, None), "unknown brand accepts any CVV");

    for brand in CardBrand::ALL {
        if cvv::is_valid_cvv(data, Some(brand)) {
            if let Some(expected) = brand.cvv_length() {
                assert_eq!(data.len(), expected);
            }
        }
    }
});
