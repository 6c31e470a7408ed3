//! Fuzz target for the Luhn checksum.

#![no_main]

use libfuzzer_sys::fuzz_target;
use payze::luhn;

fuzz_target!(|data: &[u8]| {
    let digits: Vec<u8> = data.iter().map(|&b| b % 10).collect();

    if digits.is_empty() {
        return;
    }

    let _ = luhn::passes(&digits);

    if digits.len() <= 18 {
        let check = luhn::check_digit(&digits);
        assert!(check <= 9, "check digit out of range");

        let mut with_check = digits.clone();
        with_check.push(check);
        assert!(luhn::passes(&with_check), "appended check digit must pass");
    }
});
