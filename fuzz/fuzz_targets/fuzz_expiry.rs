//! Fuzz target for expiration date parsing.

#![no_main]

use libfuzzer_sys::fuzz_target;
use payze::expiry;

fuzz_target!(|data: &str| {
    let _ = expiry::validate_expiry(data);

    if let Ok(parsed) = expiry::parse_expiry(data) {
        assert!((1..=12).contains(&parsed.month()));
        let short = expiry::to_submission_format(data);
        assert!(short.is_some(), "parsed expiry must have a submission form");
        let _ = parsed.format_short();
    }
});
