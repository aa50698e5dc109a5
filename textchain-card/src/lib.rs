//! Payment card utilities
//!
//! Brand identification, Luhn checksum, full validation with collected
//! error messages, and display formatting.
//!
//! Two normalizations are in play: checks strip only spaces and hyphens so
//! stray characters are still reported, while [`format`] strips every
//! non-digit before grouping.

mod brands;

pub use brands::{find_brand, CardBrand, CARD_BRANDS, UNKNOWN};

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Card numbers are 13-19 digits
pub const MIN_LENGTH: usize = 13;
pub const MAX_LENGTH: usize = 19;

pub const ERR_INVALID_CHARACTERS: &str =
    "Contains invalid characters (only digits, spaces, and hyphens allowed)";
pub const ERR_INVALID_LENGTH: &str = "Invalid length: must be 13-19 digits";
pub const ERR_NOT_DIGITS: &str = "Must contain only digits";
pub const ERR_LUHN: &str = "Invalid card number (failed Luhn check)";

/// Outcome of [`validate`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub card_type: String,
    pub errors: Vec<String>,
}

/// Strip spaces and hyphens, keep everything else
pub fn normalize(input: &str) -> String {
    input.chars().filter(|c| *c != ' ' && *c != '-').collect()
}

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn length_in_range(len: usize) -> bool {
    (MIN_LENGTH..=MAX_LENGTH).contains(&len)
}

/// Display name of the first matching brand, or `"Unknown"`
pub fn identify_brand(input: &str) -> &'static str {
    let digits = normalize(input);
    if !is_all_digits(&digits) {
        return UNKNOWN;
    }
    brand_of_digits(&digits)
}

fn brand_of_digits(digits: &str) -> &'static str {
    CARD_BRANDS
        .iter()
        .find(|brand| brand.pattern.is_match(digits))
        .map_or(UNKNOWN, |brand| brand.name)
}

/// Luhn checksum over a 13-19 digit number (spaces and hyphens ignored)
pub fn luhn_check(input: &str) -> bool {
    let digits = normalize(input);
    if !is_all_digits(&digits) || !length_in_range(digits.len()) {
        return false;
    }

    let mut sum = 0u32;
    let mut double = false;
    for b in digits.bytes().rev() {
        let mut d = u32::from(b - b'0');
        if double {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        sum += d;
        double = !double;
    }

    sum % 10 == 0
}

/// Run every check and collect all failures in a fixed order
pub fn validate(input: &str) -> ValidationResult {
    let mut errors = Vec::new();
    let digits = normalize(input);

    if input.chars().any(|c| !(c.is_ascii_digit() || c == ' ' || c == '-')) {
        errors.push(ERR_INVALID_CHARACTERS.to_string());
    }

    if digits.is_empty() || !length_in_range(digits.chars().count()) {
        errors.push(ERR_INVALID_LENGTH.to_string());
    }

    if digits.chars().any(|c| !c.is_ascii_digit()) {
        errors.push(ERR_NOT_DIGITS.to_string());
    }

    if !luhn_check(input) {
        errors.push(ERR_LUHN.to_string());
    }

    let card_type = identify_brand(input);
    if let Some(brand) = find_brand(card_type) {
        if !brand.accepts_length(digits.len()) {
            errors.push(format!("Invalid length for {}", brand.name));
        }
    }

    trace!(card_type, errors = errors.len(), "card validated");

    ValidationResult {
        is_valid: errors.is_empty(),
        card_type: card_type.to_string(),
        errors,
    }
}

/// Group digits for display: Amex 4-6-5, Diners Club 4-6-4, otherwise runs of 4
pub fn format(input: &str) -> String {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();

    match brand_of_digits(&digits) {
        "American Express" => group_by(&digits, &[4, 6, 5]),
        "Diners Club" => group_by(&digits, &[4, 6, 4]),
        _ => {
            let chunks: Vec<&str> = digits
                .as_bytes()
                .chunks(4)
                .filter_map(|chunk| std::str::from_utf8(chunk).ok())
                .collect();
            chunks.join(" ")
        }
    }
}

/// Split into groups of the given sizes; any remainder becomes a last group
fn group_by(digits: &str, sizes: &[usize]) -> String {
    let mut groups = Vec::with_capacity(sizes.len() + 1);
    let mut rest = digits;
    for &size in sizes {
        if rest.is_empty() {
            break;
        }
        let (head, tail) = rest.split_at(size.min(rest.len()));
        groups.push(head);
        rest = tail;
    }
    if !rest.is_empty() {
        groups.push(rest);
    }
    groups.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: [(&str, &str); 7] = [
        ("4111111111111111", "Visa"),
        ("6500020000000000009", "Verve"),
        ("5555555555554444", "Mastercard"),
        ("378282246310005", "American Express"),
        ("6011111111111117", "Discover"),
        ("30569309025904", "Diners Club"),
        ("3530111333300000", "JCB"),
    ];

    #[test]
    fn test_samples_pass_luhn_and_identify() {
        for (number, brand) in SAMPLES {
            assert!(luhn_check(number), "luhn failed for {}", number);
            assert_eq!(identify_brand(number), brand, "brand for {}", number);
            assert!(validate(number).is_valid, "validate failed for {}", number);
        }
    }

    #[test]
    fn test_luhn_rejects() {
        assert!(!luhn_check("4111111111111112"));
        assert!(!luhn_check("1234567890")); // too short
        assert!(!luhn_check("41111111111111111111")); // too long
        assert!(!luhn_check("4111x11111111111"));
        assert!(!luhn_check(""));
    }

    #[test]
    fn test_length_bounds_are_inclusive() {
        // 13 digits is the shortest accepted number
        assert!(luhn_check("4222222222222"));
        assert!(validate("4222222222222").is_valid);

        // 12 digits passes the checksum arithmetic but not the range
        assert!(!luhn_check("422222222222"));
        let result = validate("422222222222");
        assert!(!result.is_valid);
        assert!(result.errors.contains(&ERR_INVALID_LENGTH.to_string()));
    }

    #[test]
    fn test_fifteen_digit_jcb_prefixes() {
        for number in ["213100000000001", "180000000000002"] {
            assert!(luhn_check(number), "luhn failed for {}", number);
            let result = validate(number);
            assert_eq!(result.card_type, "JCB");
            assert!(result.is_valid, "{:?}", result.errors);
        }
    }

    #[test]
    fn test_luhn_ignores_spaces_and_hyphens() {
        assert!(luhn_check("4111 1111 1111 1111"));
        assert!(luhn_check("4111-1111-1111-1111"));
    }

    #[test]
    fn test_identify_non_digit_is_unknown() {
        assert_eq!(identify_brand("4111a11111111111"), UNKNOWN);
        assert_eq!(identify_brand(""), UNKNOWN);
        assert_eq!(identify_brand("9999999999999999"), UNKNOWN);
    }

    #[test]
    fn test_validate_noise_tolerance() {
        assert!(validate("4111 1111 1111 1111").is_valid);
        assert!(validate("4111-1111-1111-1111").is_valid);
        assert!(validate("   4111111111111111   ").is_valid);
    }

    #[test]
    fn test_validate_empty() {
        let result = validate("");
        assert!(!result.is_valid);
        assert!(result.errors.contains(&ERR_INVALID_LENGTH.to_string()));
        assert_eq!(result.card_type, UNKNOWN);
    }

    #[test]
    fn test_validate_unknown_brand_fails_luhn() {
        let result = validate("1234567890123456");
        assert!(!result.is_valid);
        assert_eq!(result.card_type, UNKNOWN);
        assert_eq!(result.errors, vec![ERR_LUHN.to_string()]);
    }

    #[test]
    fn test_validate_too_short() {
        let result = validate("123");
        assert_eq!(result.errors, vec![ERR_INVALID_LENGTH.to_string(), ERR_LUHN.to_string()]);
    }

    #[test]
    fn test_validate_letter_reports_digits_not_brand_length() {
        let result = validate("4111a11111111111");
        assert!(!result.is_valid);
        assert_eq!(result.card_type, UNKNOWN);
        assert_eq!(
            result.errors,
            vec![
                ERR_INVALID_CHARACTERS.to_string(),
                ERR_NOT_DIGITS.to_string(),
                ERR_LUHN.to_string(),
            ]
        );
        assert!(!result.errors.iter().any(|e| e.starts_with("Invalid length for")));
    }

    #[test]
    fn test_validate_brand_length_mismatch() {
        // Verve prefix, 17 digits, Luhn-valid
        let number = "65000200000000009";
        assert!(luhn_check(number));
        let result = validate(number);
        assert_eq!(result.card_type, "Verve");
        assert_eq!(result.errors, vec!["Invalid length for Verve".to_string()]);
    }

    #[test]
    fn test_format_default_groups_of_four() {
        assert_eq!(format("4532015112830366"), "4532 0151 1283 0366");
        assert_eq!(format("4532-0151-1283-0366"), "4532 0151 1283 0366");
        assert_eq!(format("4222222222222"), "4222 2222 2222 2");
        assert_eq!(format(""), "");
    }

    #[test]
    fn test_format_amex_and_diners() {
        assert_eq!(format("378282246310005"), "3782 822463 10005");
        assert_eq!(format("30569309025904"), "3056 930902 5904");
    }

    #[test]
    fn test_format_strips_all_non_digits() {
        assert_eq!(format("4111.1111/1111x1111"), "4111 1111 1111 1111");
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let json = serde_json::to_value(validate("4111111111111111")).unwrap();
        assert_eq!(json["isValid"], serde_json::json!(true));
        assert_eq!(json["cardType"], serde_json::json!("Visa"));
        assert_eq!(json["errors"], serde_json::json!([]));
    }
}
