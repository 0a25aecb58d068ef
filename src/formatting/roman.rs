//! Roman numeral conversion

use crate::error::SeError;

/// Largest value with a standard Roman numeral (no vinculum)
pub const MAX_ROMAN: u32 = 4999;

const NUMERALS: &[(u32, &str)] = &[
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

/// Convert a number in 1..=4999 to an uppercase Roman numeral
pub fn to_roman(mut number: u32) -> Result<String, SeError> {
    if number == 0 || number > MAX_ROMAN {
        return Err(SeError::InvalidInput(format!(
            "Number out of range (must be 1..{}): {}",
            MAX_ROMAN, number
        )));
    }

    let mut output = String::new();
    for &(value, numeral) in NUMERALS {
        while number >= value {
            output.push_str(numeral);
            number -= value;
        }
    }
    Ok(output)
}

/// Convert a Roman numeral back to a number
///
/// Accepts either case. Only canonical numerals are accepted, so the result
/// always converts back to the same string.
pub fn from_roman(numeral: &str) -> Result<u32, SeError> {
    let invalid = || SeError::InvalidInput(format!("Invalid Roman numeral: {}", numeral));
    let upper = numeral.trim().to_ascii_uppercase();
    if upper.is_empty() {
        return Err(invalid());
    }

    let mut rest = upper.as_str();
    let mut total = 0;
    for &(value, symbol) in NUMERALS {
        while let Some(stripped) = rest.strip_prefix(symbol) {
            total += value;
            rest = stripped;
        }
    }

    if !rest.is_empty() || total == 0 || total > MAX_ROMAN {
        return Err(invalid());
    }

    // Reject non-canonical forms such as IIII or VX
    if to_roman(total)? != upper {
        return Err(invalid());
    }

    Ok(total)
}
