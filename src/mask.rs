//! Masking of sensitive card data for logs and `Debug` output.
//!
//! Only the last four digits of a card number may be shown. A CVV is never
//! shown at all.

/// Masks a card number, keeping only the last four non-whitespace characters.
///
/// # Example
///
/// ```
/// use payze::mask::mask_number;
///
/// assert_eq!(mask_number("4532 0151 1283 0366"), "************0366");
/// assert_eq!(mask_number("123"), "***");
/// ```
pub fn mask_number(number: &str) -> String {
    let chars: Vec<char> = number.chars().filter(|c| !c.is_whitespace()).collect();

    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }

    let visible = chars.len() - 4;
    std::iter::repeat('*')
        .take(visible)
        .chain(chars[visible..].iter().copied())
        .collect()
}

/// Masks every character of a secret (CVV).
#[inline]
pub fn mask_secret(secret: &str) -> String {
    "*".repeat(secret.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_number() {
        let masked = mask_number("4532015112830366");
        assert!(!masked.contains("4532015112830366"));
        assert!(masked.ends_with("0366"));
        assert_eq!(masked.len(), 16);
    }

    #[test]
    fn test_mask_short_input_hides_everything() {
        assert_eq!(mask_number("4532"), "****");
        assert_eq!(mask_number(""), "");
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("123"), "***");
        assert_eq!(mask_secret("1234"), "****");
    }
}
