//! Luhn (modulus 10) checksum.
//!
//! Digits are processed right to left; every digit at an odd index (0-based
//! from the right) is doubled, and doubled values above 9 have 9 subtracted.
//! A number is valid iff the total is divisible by 10.

/// Doubled digit with 9 subtracted when the result exceeds 9, indexed by digit.
const DOUBLE_TABLE: [u8; 10] = [0, 2, 4, 6, 8, 1, 3, 5, 7, 9];

/// Computes the Luhn sum (not reduced modulo 10) of digit values 0-9.
#[inline]
pub fn checksum(digits: &[u8]) -> u32 {
    digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                DOUBLE_TABLE[d as usize] as u32
            } else {
                d as u32
            }
        })
        .sum()
}

/// Returns true if the digit values pass the Luhn check.
///
/// An empty slice never passes.
///
/// # Example
///
/// ```
/// use payze::luhn;
///
/// assert!(luhn::passes(&[4, 5, 3, 2, 0, 1, 5, 1, 1, 2, 8, 3, 0, 3, 6, 6]));
/// assert!(!luhn::passes(&[4, 5, 3, 2, 0, 1, 5, 1, 1, 2, 8, 3, 0, 3, 6, 7]));
/// ```
#[inline]
pub fn passes(digits: &[u8]) -> bool {
    !digits.is_empty() && checksum(digits) % 10 == 0
}

/// Returns true if the string consists of ASCII digits only and passes the
/// Luhn check.
pub fn passes_str(number: &str) -> bool {
    let digits: Option<Vec<u8>> = number
        .chars()
        .map(|c| c.is_ascii_digit().then(|| c as u8 - b'0'))
        .collect();

    digits.map_or(false, |d| passes(&d))
}

/// Computes the check digit to append to `payload` so the result passes.
///
/// # Example
///
/// ```
/// use payze::luhn;
///
/// assert_eq!(luhn::check_digit(&[4, 5, 3, 2, 0, 1, 5, 1, 1, 2, 8, 3, 0, 3, 6]), 6);
/// ```
pub fn check_digit(payload: &[u8]) -> u8 {
    // Appending a digit shifts every payload digit one position left, so the
    // rightmost payload digit lands on a doubled position.
    let sum: u32 = payload
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 0 {
                DOUBLE_TABLE[d as usize] as u32
            } else {
                d as u32
            }
        })
        .sum();

    ((10 - sum % 10) % 10) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_vectors() {
        assert!(passes_str("4532015112830366"));
        assert!(!passes_str("4532015112830367"));
        assert!(passes_str("378282246310005"));
        assert!(passes_str("5555555555554444"));
        assert!(passes_str("2221000000000009"));
    }

    #[test]
    fn test_non_digits_fail() {
        assert!(!passes_str("4532 0151 1283 0366"));
        assert!(!passes_str("453201511283036a"));
        assert!(!passes_str(""));
    }

    #[test]
    fn test_empty_input() {
        assert!(!passes(&[]));
    }

    #[test]
    fn test_single_digit() {
        assert!(passes(&[0]));
        assert!(!passes(&[5]));
    }

    #[test]
    fn test_check_digit_completes_number() {
        let payload = [8, 6, 0, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 0, 1];
        let mut full = payload.to_vec();
        full.push(check_digit(&payload));
        assert!(passes(&full));

        let payload = [3, 7, 8, 2, 8, 2, 2, 4, 6, 3, 1, 0, 0, 0];
        assert_eq!(check_digit(&payload), 5);
    }

    #[test]
    fn test_double_table_values() {
        for i in 0..10 {
            let doubled = i * 2;
            let expected = if doubled > 9 { doubled - 9 } else { doubled };
            assert_eq!(DOUBLE_TABLE[i], expected as u8);
        }
    }
}
