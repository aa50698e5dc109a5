//! Text validation predicates: formats (email, URL, UUID, card, IP, color,
//! date, time, phone), character classes, JSON/Base64 well-formedness,
//! password strength, and caller-supplied patterns.
//!
//! Predicates answer `false` for anything that does not fit; only a malformed
//! caller-supplied pattern is an error.

use textchain_plugin::prelude::*;
use crate::helpers::{get_pattern, text_arg};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use regex::Regex;
use std::net::Ipv6Addr;
use std::sync::OnceLock;

// ============ Compiled regex patterns ============

fn get_email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
    })
}

fn get_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(https?|ftp)://[^\s/$.?#].[^\s]*$").unwrap()
    })
}

fn get_uuid_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$").unwrap()
    })
}

fn get_phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // +1-555-123-4567, (555) 123-4567, 555.123.4567, ...
        Regex::new(r"^[+]?[0-9\s\-().]{7,20}$").unwrap()
    })
}

fn get_hex_color_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap())
}

fn get_ipv4_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:(?:25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])\.){3}(?:25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])$").unwrap()
    })
}

fn get_base64_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:[A-Za-z0-9+/]{4})*(?:[A-Za-z0-9+/]{2}==|[A-Za-z0-9+/]{3}=)?$").unwrap()
    })
}

fn get_strong_password_regex() -> &'static fancy_regex::Regex {
    static RE: OnceLock<fancy_regex::Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // lowercase, uppercase, digit and symbol, at least 8 long
        fancy_regex::Regex::new(r"^(?=.*[a-z])(?=.*[A-Z])(?=.*[0-9])(?=.*[^A-Za-z0-9]).{8,}$").unwrap()
    })
}

fn get_slug_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap())
}

fn get_date_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[0-9]{4}-(?:0[1-9]|1[0-2])-(?:0[1-9]|[12][0-9]|3[01])$").unwrap()
    })
}

fn get_time_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:[01][0-9]|2[0-3]):[0-5][0-9](?::[0-5][0-9])?$").unwrap())
}

fn get_alpha_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z]+$").unwrap())
}

fn get_numeric_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-?[0-9]+(?:\.[0-9]+)?$").unwrap())
}

fn get_alphanumeric_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9]+$").unwrap())
}

// ============ Static functions ============

pub fn is_email(text: &str) -> bool {
    get_email_regex().is_match(text)
}

pub fn is_url(text: &str) -> bool {
    get_url_regex().is_match(text)
}

pub fn is_uuid(text: &str) -> bool {
    get_uuid_regex().is_match(text)
}

/// Full card validation passes (characters, length, Luhn, brand length)
pub fn is_credit_card(text: &str) -> bool {
    textchain_card::validate(text).is_valid
}

pub fn is_hex_color(text: &str) -> bool {
    get_hex_color_regex().is_match(text)
}

pub fn is_ipv4(text: &str) -> bool {
    get_ipv4_regex().is_match(text)
}

pub fn is_ipv6(text: &str) -> bool {
    text.parse::<Ipv6Addr>().is_ok()
}

pub fn is_phone(text: &str) -> bool {
    get_phone_regex().is_match(text)
}

pub fn is_alpha(text: &str) -> bool {
    get_alpha_regex().is_match(text)
}

/// Optionally negative integer or decimal
pub fn is_numeric(text: &str) -> bool {
    get_numeric_regex().is_match(text)
}

pub fn is_alphanumeric(text: &str) -> bool {
    get_alphanumeric_regex().is_match(text)
}

/// Parses as JSON; the parsed value is discarded
pub fn is_json(text: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(text).is_ok()
}

/// Canonical standard Base64: decodes and re-encodes to the same text
pub fn is_base64(text: &str) -> bool {
    if text.is_empty() || !get_base64_regex().is_match(text) {
        return false;
    }
    match STANDARD.decode(text) {
        Ok(bytes) => STANDARD.encode(bytes) == text,
        Err(_) => false,
    }
}

pub fn is_strong_password(text: &str) -> bool {
    get_strong_password_regex().is_match(text).unwrap_or(false)
}

pub fn is_slug(text: &str) -> bool {
    get_slug_regex().is_match(text)
}

/// `YYYY-MM-DD` shape with month 01-12 and day 01-31
pub fn is_date(text: &str) -> bool {
    get_date_regex().is_match(text)
}

/// `HH:MM` or `HH:MM:SS`, 24-hour clock
pub fn is_time(text: &str) -> bool {
    get_time_regex().is_match(text)
}

/// Empty or whitespace-only
pub fn is_empty(text: &str) -> bool {
    text.trim().is_empty()
}

/// Has at least one letter and no uppercase letters
pub fn is_lower_case(text: &str) -> bool {
    text.chars().any(char::is_alphabetic) && !text.chars().any(char::is_uppercase)
}

/// Has at least one letter and no lowercase letters
pub fn is_upper_case(text: &str) -> bool {
    text.chars().any(char::is_alphabetic) && !text.chars().any(char::is_lowercase)
}

/// Whole text matches the pattern
pub fn matches_pattern(text: &str, pattern: &str) -> Result<bool, TextError> {
    let anchored = format!("^(?:{})$", pattern);
    Ok(get_pattern(&anchored)?.is_match(text)?)
}

/// Pattern matches somewhere in the text
pub fn contains_pattern(text: &str, pattern: &str) -> Result<bool, TextError> {
    Ok(get_pattern(pattern)?.is_match(text)?)
}

// ============ Operations ============

const CATEGORY: &str = "text/validate";

/// Declares a predicate with no extra arguments over a `fn(&str) -> bool`
macro_rules! simple_predicate {
    ($ty:ident, $name:literal, $func:ident, $desc:literal, [$($example:literal),*], [$($related:literal),*]) => {
        pub struct $ty;

        impl PredicatePlugin for $ty {
            fn meta(&self) -> OperationMeta {
                OperationMeta {
                    name: $name,
                    description: $desc,
                    usage: concat!($name, "(text)"),
                    args: &[],
                    returns: "Bool",
                    examples: &[$($example),*],
                    category: CATEGORY,
                    related: &[$($related),*],
                }
            }

            fn test(&self, text: &str, _args: &[Value]) -> Result<bool, TextError> {
                Ok($func(text))
            }
        }
    };
}

simple_predicate!(IsEmail, "isEmail", is_email, "Check if text is a valid email address format",
    ["isEmail(\"user@example.com\") → true", "isEmail(\"user@domain\") → false"], ["extractEmails"]);
simple_predicate!(IsUrl, "isUrl", is_url, "Check if text is a valid http(s)/ftp URL",
    ["isUrl(\"https://example.com\") → true"], ["extractUrls"]);
simple_predicate!(IsUuid, "isUuid", is_uuid, "Check if text is a valid UUID",
    ["isUuid(\"550e8400-e29b-41d4-a716-446655440000\") → true"], []);
simple_predicate!(IsCreditCard, "isCreditCard", is_credit_card,
    "Check if text is a valid card number (Luhn, brand length)",
    ["isCreditCard(\"4111 1111 1111 1111\") → true", "isCreditCard(\"1234567890123456\") → false"],
    ["validateCreditCard", "formatCreditCard"]);
simple_predicate!(IsHexColor, "isHexColor", is_hex_color, "Check if text is a #rgb or #rrggbb color",
    ["isHexColor(\"#1a2B3c\") → true"], []);
simple_predicate!(IsIpv4, "isIpv4", is_ipv4, "Check if text is a dotted IPv4 address",
    ["isIpv4(\"192.168.0.1\") → true", "isIpv4(\"256.1.1.1\") → false"], ["isIpv6"]);
simple_predicate!(IsIpv6, "isIpv6", is_ipv6, "Check if text is an IPv6 address",
    ["isIpv6(\"2001:db8::1\") → true"], ["isIpv4"]);
simple_predicate!(IsPhone, "isPhone", is_phone, "Check if text looks like a phone number",
    ["isPhone(\"(555) 123-4567\") → true"], ["onlyNumbers"]);
simple_predicate!(IsAlpha, "isAlpha", is_alpha, "Check if text contains only ASCII letters",
    ["isAlpha(\"abc\") → true", "isAlpha(\"ab1\") → false"], ["isAlphanumeric"]);
simple_predicate!(IsNumeric, "isNumeric", is_numeric, "Check if text is an integer or decimal",
    ["isNumeric(\"-12.5\") → true"], ["extractNumbers"]);
simple_predicate!(IsAlphanumeric, "isAlphanumeric", is_alphanumeric,
    "Check if text contains only ASCII letters and digits",
    ["isAlphanumeric(\"abc123\") → true"], ["isAlpha"]);
simple_predicate!(IsJson, "isJson", is_json, "Check if text parses as JSON",
    ["isJson(\"{\\\"a\\\": 1}\") → true"], []);
simple_predicate!(IsBase64, "isBase64", is_base64, "Check if text is canonical standard Base64",
    ["isBase64(\"aGVsbG8=\") → true"], ["toBase64", "fromBase64"]);
simple_predicate!(IsStrongPassword, "isStrongPassword", is_strong_password,
    "At least 8 characters with lowercase, uppercase, digit and symbol",
    ["isStrongPassword(\"Passw0rd!\") → true"], ["lookahead"]);
simple_predicate!(IsSlug, "isSlug", is_slug, "Check if text is a lowercase hyphenated slug",
    ["isSlug(\"hello-world\") → true"], ["toSlug"]);
simple_predicate!(IsDate, "isDate", is_date, "Check if text is a YYYY-MM-DD date",
    ["isDate(\"2024-02-29\") → true"], ["isTime"]);
simple_predicate!(IsTime, "isTime", is_time, "Check if text is an HH:MM[:SS] time",
    ["isTime(\"23:59:59\") → true"], ["isDate"]);
simple_predicate!(IsEmpty, "isEmpty", is_empty, "Check if text is empty or whitespace-only",
    ["isEmpty(\"  \") → true"], []);
simple_predicate!(IsLowerCase, "isLowerCase", is_lower_case, "Check if text has letters, none uppercase",
    ["isLowerCase(\"abc 1\") → true"], ["isUpperCase"]);
simple_predicate!(IsUpperCase, "isUpperCase", is_upper_case, "Check if text has letters, none lowercase",
    ["isUpperCase(\"ABC 1\") → true"], ["isLowerCase"]);

// ============ MatchesPattern ============

pub struct MatchesPattern;

static PATTERN_ARGS: [ArgMeta; 1] = [ArgMeta::required("pattern", "Text", "Regex pattern")];

impl PredicatePlugin for MatchesPattern {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "matchesPattern",
            description: "Check if the whole text matches a regex pattern",
            usage: "matchesPattern(text, pattern)",
            args: &PATTERN_ARGS,
            returns: "Bool",
            examples: &[
                "matchesPattern(\"AB123\", \"[A-Z]{2}\\\\d{3}\") → true",
                "matchesPattern(\"xAB123\", \"[A-Z]{2}\\\\d{3}\") → false",
            ],
            category: CATEGORY,
            related: &["containsPattern", "extractPattern"],
        }
    }

    fn test(&self, text: &str, args: &[Value]) -> Result<bool, TextError> {
        let pattern = text_arg(args, 0, "matchesPattern", "pattern")?;
        matches_pattern(text, pattern)
    }
}

// ============ ContainsPattern ============

pub struct ContainsPattern;

impl PredicatePlugin for ContainsPattern {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "containsPattern",
            description: "Check if a regex pattern matches anywhere in the text",
            usage: "containsPattern(text, pattern)",
            args: &PATTERN_ARGS,
            returns: "Bool",
            examples: &["containsPattern(\"order #42\", \"#\\\\d+\") → true"],
            category: CATEGORY,
            related: &["matchesPattern"],
        }
    }

    fn test(&self, text: &str, args: &[Value]) -> Result<bool, TextError> {
        let pattern = text_arg(args, 0, "containsPattern", "pattern")?;
        contains_pattern(text, pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_email() {
        assert!(is_email("user@example.com"));
        assert!(!is_email("invalid"));
        assert!(!is_email("user@domain"));
    }

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com"));
        assert!(is_url("http://example.com/path?query=1"));
        assert!(!is_url("not a url"));
    }

    #[test]
    fn test_is_uuid() {
        assert!(is_uuid("550e8400-e29b-41d4-a716-446655440000"));
        assert!(!is_uuid("not-a-uuid"));
    }

    #[test]
    fn test_is_credit_card() {
        assert!(is_credit_card("4111 1111 1111 1111"));
        assert!(is_credit_card("378282246310005"));
        assert!(!is_credit_card("1234567890123456"));
        assert!(!is_credit_card("4111a11111111111"));
    }

    #[test]
    fn test_network_formats() {
        assert!(is_ipv4("192.168.0.1"));
        assert!(!is_ipv4("256.1.1.1"));
        assert!(!is_ipv4("1.2.3"));
        assert!(is_ipv6("2001:db8::1"));
        assert!(is_ipv6("::1"));
        assert!(!is_ipv6("2001:db8:::1"));
        assert!(is_hex_color("#1a2B3c"));
        assert!(is_hex_color("#fff"));
        assert!(!is_hex_color("#ffff"));
    }

    #[test]
    fn test_is_phone() {
        assert!(is_phone("+1-555-123-4567"));
        assert!(is_phone("(555) 123-4567"));
        assert!(!is_phone("123")); // Too short
    }

    #[test]
    fn test_character_classes() {
        assert!(is_alpha("abc"));
        assert!(!is_alpha("ab1"));
        assert!(is_numeric("-12.5"));
        assert!(!is_numeric("1e5"));
        assert!(is_alphanumeric("abc123"));
        assert!(!is_alphanumeric("abc 123"));
        assert!(is_lower_case("abc 1"));
        assert!(!is_lower_case("123"));
        assert!(is_upper_case("ABC 1"));
        assert!(!is_upper_case("AbC"));
    }

    #[test]
    fn test_digit_checks_are_ascii_only() {
        // Arabic-Indic digits
        assert!(!is_numeric("١٢٣"));
        assert!(!is_ipv4("١.١.١.١"));
        assert!(!is_date("٢٠٢٤-01-01"));
        assert!(!is_time("١٢:00"));
        assert!(!is_phone("١٢٣٤٥٦٧"));
        assert!(!is_strong_password("Passwor٣!"));
    }

    #[test]
    fn test_is_json() {
        assert!(is_json(r#"{"a": [1, 2]}"#));
        assert!(is_json("42"));
        assert!(!is_json("{a: 1}"));
        assert!(!is_json(""));
    }

    #[test]
    fn test_is_base64() {
        assert!(is_base64("aGVsbG8="));
        assert!(!is_base64("aGVsbG8"));
        assert!(!is_base64(""));
        assert!(!is_base64("a=bc"));
        // Valid alphabet but non-canonical trailing bits
        assert!(!is_base64("aGVsbG9="));
    }

    #[test]
    fn test_is_strong_password() {
        assert!(is_strong_password("Passw0rd!"));
        assert!(!is_strong_password("password"));
        assert!(!is_strong_password("Pa0!"));
    }

    #[test]
    fn test_dates_and_slugs() {
        assert!(is_date("2024-02-29"));
        assert!(!is_date("2024-13-01"));
        assert!(is_time("23:59:59"));
        assert!(is_time("07:05"));
        assert!(!is_time("24:00"));
        assert!(is_slug("hello-world"));
        assert!(!is_slug("Hello-World"));
        assert!(!is_slug("hello--world"));
    }

    #[test]
    fn test_is_empty() {
        assert!(is_empty(""));
        assert!(is_empty(" \t"));
        assert!(!is_empty("x"));
    }

    #[test]
    fn test_matches_pattern() {
        let args = vec![Value::from(r"[A-Z]{2}\d{3}")];
        assert!(MatchesPattern.test("AB123", &args).unwrap());
        assert!(!MatchesPattern.test("xAB123", &args).unwrap());
        assert!(ContainsPattern.test("xAB123", &args).unwrap());
    }

    #[test]
    fn test_pattern_predicates_with_lookahead() {
        assert!(contains_pattern("price: 30px", r"\d+(?=px)").unwrap());
        assert!(!contains_pattern("price: 30em", r"\d+(?=px)").unwrap());
    }

    #[test]
    fn test_invalid_pattern_is_error_not_false() {
        assert!(MatchesPattern.test("x", &[Value::from("[")]).is_err());
        assert!(ContainsPattern.test("x", &[Value::from("(")]).is_err());
    }
}
