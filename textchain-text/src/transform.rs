//! Text transformations: whitespace, case conversion, character filtering,
//! escaping, truncation, masking, pattern replacement, Base64.

use textchain_plugin::prelude::*;
use crate::helpers::{count_arg_or, get_pattern, int_arg, text_arg, text_arg_or, upper_first, words};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static NON_DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^0-9]").unwrap());
static NON_LETTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z]").unwrap());
static NON_ALNUM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]").unwrap());
static DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]").unwrap());
static SPECIAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9\s]").unwrap());
static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static SLUG_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z0-9]+").unwrap());

// ============ Static functions ============

pub fn trim(text: &str) -> String {
    text.trim().to_string()
}

/// Runs of whitespace become one space; ends are trimmed
pub fn collapse_spaces(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

pub fn remove_all_spaces(text: &str) -> String {
    WHITESPACE.replace_all(text, "").into_owned()
}

pub fn to_lower_case(text: &str) -> String {
    text.to_lowercase()
}

pub fn to_upper_case(text: &str) -> String {
    text.to_uppercase()
}

pub fn capitalize(text: &str) -> String {
    upper_first(text)
}

/// Capitalize first letter of each whitespace-separated word, lowercase the rest
pub fn to_title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut capitalize_next = true;

    for c in text.chars() {
        if c.is_whitespace() {
            result.push(c);
            capitalize_next = true;
        } else if capitalize_next {
            result.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            result.extend(c.to_lowercase());
        }
    }

    result
}

/// Lowercase alphanumeric runs joined by hyphens
pub fn to_slug(text: &str) -> String {
    let lower = text.to_lowercase();
    SLUG_RUN
        .find_iter(&lower)
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join("-")
}

pub fn to_camel_case(text: &str) -> String {
    let mut out = String::new();
    for (i, word) in words(text).iter().enumerate() {
        let lower = word.to_lowercase();
        if i == 0 {
            out.push_str(&lower);
        } else {
            out.push_str(&upper_first(&lower));
        }
    }
    out
}

/// `to_camel_case` with its first character upper-cased
pub fn to_pascal_case(text: &str) -> String {
    upper_first(&to_camel_case(text))
}

fn join_lower(text: &str, sep: &str) -> String {
    words(text)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(sep)
}

pub fn to_snake_case(text: &str) -> String {
    join_lower(text, "_")
}

pub fn to_kebab_case(text: &str) -> String {
    join_lower(text, "-")
}

pub fn only_numbers(text: &str) -> String {
    NON_DIGIT.replace_all(text, "").into_owned()
}

pub fn only_letters(text: &str) -> String {
    NON_LETTER.replace_all(text, "").into_owned()
}

pub fn only_alphanumeric(text: &str) -> String {
    NON_ALNUM.replace_all(text, "").into_owned()
}

pub fn remove_numbers(text: &str) -> String {
    DIGIT.replace_all(text, "").into_owned()
}

/// Drop everything but ASCII letters, digits and whitespace
pub fn remove_special_chars(text: &str) -> String {
    SPECIAL.replace_all(text, "").into_owned()
}

pub fn strip_html(text: &str) -> String {
    HTML_TAG.replace_all(text, "").into_owned()
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Escape regex metacharacters so the text matches literally
pub fn escape_regex(text: &str) -> String {
    regex::escape(text)
}

/// Cut to at most `length` characters, suffix included; a suffix longer
/// than `length` is itself cut
pub fn truncate(text: &str, length: usize, suffix: &str) -> String {
    if text.chars().count() <= length {
        return text.to_string();
    }
    let suffix_len = suffix.chars().count();
    if suffix_len >= length {
        return suffix.chars().take(length).collect();
    }
    let keep = length - suffix_len;
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(suffix);
    out
}

pub fn reverse(text: &str) -> String {
    text.chars().rev().collect()
}

/// Replace all but the last `visible` characters with `mask_char`
pub fn mask(text: &str, visible: usize, mask_char: char) -> String {
    let len = text.chars().count();
    let hidden = len.saturating_sub(visible);
    text.chars()
        .enumerate()
        .map(|(i, c)| if i < hidden { mask_char } else { c })
        .collect()
}

pub fn replace_pattern(text: &str, pattern: &str, replacement: &str) -> Result<String, TextError> {
    Ok(get_pattern(pattern)?.replace_all(text, replacement)?)
}

pub fn remove_pattern(text: &str, pattern: &str) -> Result<String, TextError> {
    replace_pattern(text, pattern, "")
}

pub fn to_base64(text: &str) -> String {
    STANDARD.encode(text.as_bytes())
}

/// Decode standard Base64 into UTF-8 text
pub fn from_base64(text: &str) -> Result<String, TextError> {
    let bytes = STANDARD
        .decode(text.trim())
        .map_err(|e| TextError::decode_error(format!("invalid Base64: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|_| TextError::decode_error("decoded Base64 is not valid UTF-8"))
}

// ============ Operations ============

const CATEGORY: &str = "text/transform";

/// Declares a transformation with no extra arguments over a `fn(&str) -> String`
macro_rules! simple_transform {
    ($ty:ident, $name:literal, $func:ident, $desc:literal, [$($example:literal),*], [$($related:literal),*]) => {
        pub struct $ty;

        impl TransformPlugin for $ty {
            fn meta(&self) -> OperationMeta {
                OperationMeta {
                    name: $name,
                    description: $desc,
                    usage: concat!($name, "(text)"),
                    args: &[],
                    returns: "Text",
                    examples: &[$($example),*],
                    category: CATEGORY,
                    related: &[$($related),*],
                }
            }

            fn call(&self, text: &str, _args: &[Value]) -> Result<Value, TextError> {
                Ok(Value::Text($func(text)))
            }
        }
    };
}

simple_transform!(Trim, "trim", trim, "Remove leading and trailing whitespace",
    ["trim(\"  hi  \") → \"hi\""], ["collapseSpaces"]);
simple_transform!(CollapseSpaces, "collapseSpaces", collapse_spaces,
    "Collapse whitespace runs to single spaces and trim the ends",
    ["collapseSpaces(\"a   b\\n c\") → \"a b c\""], ["trim", "removeAllSpaces"]);
simple_transform!(RemoveAllSpaces, "removeAllSpaces", remove_all_spaces, "Remove all whitespace",
    ["removeAllSpaces(\"a b c\") → \"abc\""], ["collapseSpaces"]);
simple_transform!(ToLowerCase, "toLowerCase", to_lower_case, "Convert text to lowercase",
    ["toLowerCase(\"HeLLo\") → \"hello\""], ["toUpperCase"]);
simple_transform!(ToUpperCase, "toUpperCase", to_upper_case, "Convert text to uppercase",
    ["toUpperCase(\"hello\") → \"HELLO\""], ["toLowerCase"]);
simple_transform!(Capitalize, "capitalize", capitalize, "Capitalize first character of text",
    ["capitalize(\"hello world\") → \"Hello world\""], ["toTitleCase"]);
simple_transform!(ToTitleCase, "toTitleCase", to_title_case, "Capitalize first letter of each word",
    ["toTitleCase(\"hello WORLD\") → \"Hello World\""], ["capitalize"]);
simple_transform!(ToSlug, "toSlug", to_slug, "URL slug: lowercase alphanumeric runs joined by hyphens",
    ["toSlug(\"Hello World!\") → \"hello-world\""], ["toKebabCase", "isSlug"]);
simple_transform!(ToCamelCase, "toCamelCase", to_camel_case, "Convert to camelCase",
    ["toCamelCase(\"Hello World!\") → \"helloWorld\""], ["toPascalCase", "toSnakeCase"]);
simple_transform!(ToPascalCase, "toPascalCase", to_pascal_case, "Convert to PascalCase",
    ["toPascalCase(\"hello world\") → \"HelloWorld\""], ["toCamelCase"]);
simple_transform!(ToSnakeCase, "toSnakeCase", to_snake_case, "Convert to snake_case",
    ["toSnakeCase(\"helloWorld\") → \"hello_world\""], ["toKebabCase", "toCamelCase"]);
simple_transform!(ToKebabCase, "toKebabCase", to_kebab_case, "Convert to kebab-case",
    ["toKebabCase(\"Hello World\") → \"hello-world\""], ["toSnakeCase", "toSlug"]);
simple_transform!(OnlyNumbers, "onlyNumbers", only_numbers, "Keep only digits",
    ["onlyNumbers(\"(555) 123-4567\") → \"5551234567\""], ["removeNumbers", "onlyLetters"]);
simple_transform!(OnlyLetters, "onlyLetters", only_letters, "Keep only ASCII letters",
    ["onlyLetters(\"a1b2c3\") → \"abc\""], ["onlyNumbers", "onlyAlphanumeric"]);
simple_transform!(OnlyAlphanumeric, "onlyAlphanumeric", only_alphanumeric, "Keep only ASCII letters and digits",
    ["onlyAlphanumeric(\"a-1 b_2\") → \"a1b2\""], ["onlyLetters", "removeSpecialChars"]);
simple_transform!(RemoveNumbers, "removeNumbers", remove_numbers, "Remove all digits",
    ["removeNumbers(\"a1b2\") → \"ab\""], ["onlyNumbers"]);
simple_transform!(RemoveSpecialChars, "removeSpecialChars", remove_special_chars,
    "Remove everything except letters, digits and whitespace",
    ["removeSpecialChars(\"Hi, there!\") → \"Hi there\""], ["onlyAlphanumeric"]);
simple_transform!(StripHtml, "stripHtml", strip_html, "Remove HTML tags",
    ["stripHtml(\"<b>bold</b>\") → \"bold\""], ["escapeHtml"]);
simple_transform!(EscapeHtml, "escapeHtml", escape_html, "Escape HTML special characters",
    ["escapeHtml(\"<a>\") → \"&lt;a&gt;\""], ["stripHtml"]);
simple_transform!(EscapeRegex, "escapeRegex", escape_regex, "Escape regex metacharacters",
    ["escapeRegex(\"a.b*\") → \"a\\\\.b\\\\*\""], ["matchesPattern", "anyOf"]);
simple_transform!(Reverse, "reverse", reverse, "Reverse character order",
    ["reverse(\"abc\") → \"cba\""], []);
simple_transform!(ToBase64, "toBase64", to_base64, "Encode UTF-8 text as standard Base64",
    ["toBase64(\"hello\") → \"aGVsbG8=\""], ["fromBase64", "isBase64"]);

// ============ Truncate ============

pub struct Truncate;

static TRUNCATE_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("length", "Int", "Maximum length including the suffix"),
    ArgMeta::optional("suffix", "Text", "Appended when text is cut", "..."),
];

impl TransformPlugin for Truncate {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "truncate",
            description: "Truncate text to a maximum length, ending with a suffix",
            usage: "truncate(text, length, suffix?)",
            args: &TRUNCATE_ARGS,
            returns: "Text",
            examples: &["truncate(\"hello world\", 8) → \"hello...\""],
            category: CATEGORY,
            related: &["mask"],
        }
    }

    fn call(&self, text: &str, args: &[Value]) -> Result<Value, TextError> {
        let length = int_arg(args, 0, "truncate", "length")?;
        let length = usize::try_from(length).map_err(|_| {
            TextError::arg_type("truncate", "length", "non-negative Int", &length.to_string())
        })?;
        let suffix = text_arg_or(args, 1, "...", "truncate", "suffix")?;
        Ok(Value::Text(truncate(text, length, suffix)))
    }
}

// ============ Mask ============

pub struct Mask;

static MASK_ARGS: [ArgMeta; 2] = [
    ArgMeta::optional("visible", "Int", "Trailing characters left visible", "4"),
    ArgMeta::optional("char", "Text", "Masking character", "*"),
];

impl TransformPlugin for Mask {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "mask",
            description: "Mask all but the last characters",
            usage: "mask(text, visible?, char?)",
            args: &MASK_ARGS,
            returns: "Text",
            examples: &[
                "mask(\"4111111111111111\") → \"************1111\"",
                "mask(\"secret\", 2, \"#\") → \"####et\"",
            ],
            category: CATEGORY,
            related: &["truncate", "formatCreditCard"],
        }
    }

    fn call(&self, text: &str, args: &[Value]) -> Result<Value, TextError> {
        let visible = count_arg_or(args, 0, 4, "mask", "visible")?;
        let mask_text = text_arg_or(args, 1, "*", "mask", "char")?;
        let mut chars = mask_text.chars();
        let mask_char = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => return Err(TextError::arg_type("mask", "char", "single character", mask_text)),
        };
        Ok(Value::Text(mask(text, visible, mask_char)))
    }
}

// ============ ReplacePattern ============

pub struct ReplacePattern;

static REPLACE_PATTERN_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("pattern", "Text", "Regex pattern"),
    ArgMeta::required("replacement", "Text", "Replacement ($1, ${name} expand)"),
];

impl TransformPlugin for ReplacePattern {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "replacePattern",
            description: "Replace all regex matches",
            usage: "replacePattern(text, pattern, replacement)",
            args: &REPLACE_PATTERN_ARGS,
            returns: "Text",
            examples: &["replacePattern(\"a1b22\", \"\\\\d+\", \"#\") → \"a#b#\""],
            category: CATEGORY,
            related: &["removePattern", "extractPattern"],
        }
    }

    fn call(&self, text: &str, args: &[Value]) -> Result<Value, TextError> {
        let pattern = text_arg(args, 0, "replacePattern", "pattern")?;
        let replacement = text_arg(args, 1, "replacePattern", "replacement")?;
        replace_pattern(text, pattern, replacement).map(Value::Text)
    }
}

// ============ RemovePattern ============

pub struct RemovePattern;

static REMOVE_PATTERN_ARGS: [ArgMeta; 1] = [ArgMeta::required("pattern", "Text", "Regex pattern")];

impl TransformPlugin for RemovePattern {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "removePattern",
            description: "Remove all regex matches",
            usage: "removePattern(text, pattern)",
            args: &REMOVE_PATTERN_ARGS,
            returns: "Text",
            examples: &["removePattern(\"a1b22\", \"\\\\d\") → \"ab\""],
            category: CATEGORY,
            related: &["replacePattern"],
        }
    }

    fn call(&self, text: &str, args: &[Value]) -> Result<Value, TextError> {
        let pattern = text_arg(args, 0, "removePattern", "pattern")?;
        remove_pattern(text, pattern).map(Value::Text)
    }
}

// ============ FromBase64 ============

pub struct FromBase64;

impl TransformPlugin for FromBase64 {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "fromBase64",
            description: "Decode standard Base64 into text",
            usage: "fromBase64(text)",
            args: &[],
            returns: "Text",
            examples: &["fromBase64(\"aGVsbG8=\") → \"hello\""],
            category: CATEGORY,
            related: &["toBase64", "isBase64"],
        }
    }

    fn call(&self, text: &str, _args: &[Value]) -> Result<Value, TextError> {
        from_base64(text).map(Value::Text)
    }
}
