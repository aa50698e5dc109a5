//! Extraction: pull emails, URLs, numbers, hashtags, mentions, pattern
//! matches and named groups out of text.
//!
//! These are transformations whose results are lists or mappings.

use textchain_plugin::prelude::*;
use crate::helpers::{get_pattern, text_arg, words};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

// ============ Compiled regex patterns ============

fn get_email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap()
    })
}

fn get_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?:https?|ftp)://[^\s<>"']+[^\s<>"'.,;:!?)]"#).unwrap()
    })
}

fn get_number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-?[0-9]+(?:\.[0-9]+)?").unwrap())
}

fn get_hashtag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:^|[^A-Za-z0-9_&])(#[A-Za-z0-9_]+)").unwrap())
}

fn get_mention_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Not preceded by a word character, so email addresses don't count
    RE.get_or_init(|| Regex::new(r"(?:^|[^A-Za-z0-9_.])(@[A-Za-z0-9_]+)").unwrap())
}

fn all_matches(re: &Regex, text: &str) -> Vec<String> {
    re.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

fn first_group(re: &Regex, text: &str) -> Vec<String> {
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

// ============ Static functions ============

pub fn extract_emails(text: &str) -> Vec<String> {
    all_matches(get_email_regex(), text)
}

/// http(s)/ftp URLs, without trailing sentence punctuation
pub fn extract_urls(text: &str) -> Vec<String> {
    all_matches(get_url_regex(), text)
}

/// Integers and decimals, with an optional leading minus
pub fn extract_numbers(text: &str) -> Vec<String> {
    all_matches(get_number_regex(), text)
}

pub fn extract_hashtags(text: &str) -> Vec<String> {
    first_group(get_hashtag_regex(), text)
}

pub fn extract_mentions(text: &str) -> Vec<String> {
    first_group(get_mention_regex(), text)
}

pub fn extract_pattern(text: &str, pattern: &str) -> Result<Vec<String>, TextError> {
    Ok(get_pattern(pattern)?.find_all(text)?)
}

/// Named groups of the first match
pub fn extract_named_groups(text: &str, pattern: &str) -> Result<BTreeMap<String, String>, TextError> {
    Ok(get_pattern(pattern)?.named_captures(text)?)
}

pub fn split_words(text: &str) -> Vec<String> {
    words(text)
}

// ============ Operations ============

const CATEGORY: &str = "text/extract";

/// Declares a list-returning extraction with no extra arguments
macro_rules! list_extract {
    ($ty:ident, $name:literal, $func:ident, $desc:literal, [$($example:literal),*], [$($related:literal),*]) => {
        pub struct $ty;

        impl TransformPlugin for $ty {
            fn meta(&self) -> OperationMeta {
                OperationMeta {
                    name: $name,
                    description: $desc,
                    usage: concat!($name, "(text)"),
                    args: &[],
                    returns: "List<Text>",
                    examples: &[$($example),*],
                    category: CATEGORY,
                    related: &[$($related),*],
                }
            }

            fn call(&self, text: &str, _args: &[Value]) -> Result<Value, TextError> {
                Ok(Value::from($func(text)))
            }
        }
    };
}

list_extract!(ExtractEmails, "extractEmails", extract_emails, "Find all email addresses",
    ["extractEmails(\"a@x.io, b@y.org\") → [\"a@x.io\", \"b@y.org\"]"], ["isEmail", "extractUrls"]);
list_extract!(ExtractUrls, "extractUrls", extract_urls, "Find all http(s)/ftp URLs",
    ["extractUrls(\"see https://a.io/x.\") → [\"https://a.io/x\"]"], ["isUrl", "extractEmails"]);
list_extract!(ExtractNumbers, "extractNumbers", extract_numbers, "Find all integers and decimals",
    ["extractNumbers(\"-3 apples, 2.5 kg\") → [\"-3\", \"2.5\"]"], ["onlyNumbers"]);
list_extract!(ExtractHashtags, "extractHashtags", extract_hashtags, "Find all #hashtags",
    ["extractHashtags(\"#rust is #fun\") → [\"#rust\", \"#fun\"]"], ["extractMentions"]);
list_extract!(ExtractMentions, "extractMentions", extract_mentions, "Find all @mentions (not emails)",
    ["extractMentions(\"hi @ann, mail a@b.io\") → [\"@ann\"]"], ["extractHashtags"]);
list_extract!(SplitWords, "splitWords", split_words, "Split into ASCII words, breaking camelCase humps",
    ["splitWords(\"helloWorld, again\") → [\"hello\", \"World\", \"again\"]"], ["toSnakeCase"]);

// ============ ExtractPattern ============

pub struct ExtractPattern;

static EXTRACT_PATTERN_ARGS: [ArgMeta; 1] = [ArgMeta::required("pattern", "Text", "Regex pattern")];

impl TransformPlugin for ExtractPattern {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "extractPattern",
            description: "Find all regex matches",
            usage: "extractPattern(text, pattern)",
            args: &EXTRACT_PATTERN_ARGS,
            returns: "List<Text>",
            examples: &["extractPattern(\"a1b22c333\", \"\\\\d+\") → [\"1\", \"22\", \"333\"]"],
            category: CATEGORY,
            related: &["extractNamedGroups", "matchesPattern"],
        }
    }

    fn call(&self, text: &str, args: &[Value]) -> Result<Value, TextError> {
        let pattern = text_arg(args, 0, "extractPattern", "pattern")?;
        extract_pattern(text, pattern).map(Value::from)
    }
}

// ============ ExtractNamedGroups ============

pub struct ExtractNamedGroups;

static EXTRACT_NAMED_GROUPS_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("pattern", "Text", "Regex pattern with named groups"),
];

impl TransformPlugin for ExtractNamedGroups {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "extractNamedGroups",
            description: "Map each named group of the first match to its text",
            usage: "extractNamedGroups(text, pattern)",
            args: &EXTRACT_NAMED_GROUPS_ARGS,
            returns: "Object",
            examples: &[
                "extractNamedGroups(\"2024-05\", \"(?<y>\\\\d{4})-(?<m>\\\\d{2})\") → {y: \"2024\", m: \"05\"}",
            ],
            category: CATEGORY,
            related: &["extractPattern", "namedGroup"],
        }
    }

    fn call(&self, text: &str, args: &[Value]) -> Result<Value, TextError> {
        let pattern = text_arg(args, 0, "extractNamedGroups", "pattern")?;
        extract_named_groups(text, pattern).map(Value::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_emails() {
        assert_eq!(
            extract_emails("Contact a.b@x.io or sales@shop.example.com today"),
            vec!["a.b@x.io", "sales@shop.example.com"]
        );
        assert!(extract_emails("no mail here").is_empty());
    }

    #[test]
    fn test_extract_urls_drops_trailing_punctuation() {
        assert_eq!(
            extract_urls("Docs at https://docs.rs/regex. Or http://x.io/a?b=1, ok"),
            vec!["https://docs.rs/regex", "http://x.io/a?b=1"]
        );
    }

    #[test]
    fn test_extract_numbers() {
        assert_eq!(extract_numbers("-3 apples, 2.5 kg and 10"), vec!["-3", "2.5", "10"]);
    }

    #[test]
    fn test_hashtags_and_mentions() {
        assert_eq!(extract_hashtags("#rust is #fun, not&#39;"), vec!["#rust", "#fun"]);
        assert_eq!(extract_mentions("hi @ann and @bob_2, mail a@b.io"), vec!["@ann", "@bob_2"]);
    }

    #[test]
    fn test_builtin_extractors_are_ascii_only() {
        assert!(extract_numbers("x ١٢ y").is_empty());
        assert!(extract_hashtags("#١٢ #éte").is_empty());
        assert!(extract_mentions("@ünï").is_empty());
        assert_eq!(extract_hashtags("#straße"), vec!["#stra"]);
    }

    #[test]
    fn test_extract_pattern_plugin() {
        let out = ExtractPattern.call("a1b22c333", &[Value::from(r"\d+")]).unwrap();
        assert_eq!(out, Value::from(vec!["1".to_string(), "22".to_string(), "333".to_string()]));
    }

    #[test]
    fn test_extract_pattern_with_lookbehind() {
        assert_eq!(extract_pattern("$10 and $25", r"(?<=\$)\d+").unwrap(), vec!["10", "25"]);
    }

    #[test]
    fn test_extract_named_groups_plugin() {
        let out = ExtractNamedGroups
            .call("due 2024-05-17", &[Value::from(r"(?<year>\d{4})-(?<month>\d{2})")])
            .unwrap();
        assert_eq!(out.get("year"), &Value::from("2024"));
        assert_eq!(out.get("month"), &Value::from("05"));
    }

    #[test]
    fn test_invalid_pattern_propagates() {
        assert!(ExtractPattern.call("abc", &[Value::from("(")]).is_err());
    }
}
