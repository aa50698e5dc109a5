//! Pattern fragment builders: lookaround assertions, groups and quantifiers.
//!
//! The input text is a pattern fragment; the output is a bigger fragment.
//! Quantifiers always wrap their operand in a non-capturing group so they
//! apply to the whole fragment.

use textchain_plugin::prelude::*;
use crate::helpers::{int_arg, optional_int_arg, text_arg};
use regex::Regex;
use std::sync::LazyLock;

static GROUP_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

// ============ Static functions ============

pub fn lookahead(pattern: &str) -> String {
    format!("(?={})", pattern)
}

pub fn negative_lookahead(pattern: &str) -> String {
    format!("(?!{})", pattern)
}

pub fn lookbehind(pattern: &str) -> String {
    format!("(?<={})", pattern)
}

pub fn negative_lookbehind(pattern: &str) -> String {
    format!("(?<!{})", pattern)
}

/// Non-capturing group
pub fn group(pattern: &str) -> String {
    format!("(?:{})", pattern)
}

pub fn named_group(pattern: &str, name: &str) -> Result<String, TextError> {
    if !GROUP_NAME.is_match(name) {
        return Err(TextError::arg_type("namedGroup", "name", "identifier", name));
    }
    Ok(format!("(?<{}>{})", name, pattern))
}

pub fn optional(pattern: &str) -> String {
    format!("(?:{})?", pattern)
}

pub fn one_or_more(pattern: &str) -> String {
    format!("(?:{})+", pattern)
}

pub fn zero_or_more(pattern: &str) -> String {
    format!("(?:{})*", pattern)
}

/// `{min}` when `max` is absent, `{min,max}` otherwise
pub fn repeat(pattern: &str, min: u32, max: Option<u32>) -> Result<String, TextError> {
    match max {
        None => Ok(format!("(?:{}){{{}}}", pattern, min)),
        Some(max) if max < min => Err(TextError::arg_type(
            "repeat",
            "max",
            &format!("Int >= {}", min),
            &max.to_string(),
        )),
        Some(max) => Ok(format!("(?:{}){{{},{}}}", pattern, min, max)),
    }
}

/// Character class matching any one of the given characters literally
pub fn any_of(chars: &str) -> String {
    let mut class = String::with_capacity(chars.len() + 2);
    class.push('[');
    for c in chars.chars() {
        if matches!(c, '\\' | ']' | '[' | '^' | '-' | '&' | '~') {
            class.push('\\');
        }
        class.push(c);
    }
    class.push(']');
    class
}

// ============ Operations ============

const CATEGORY: &str = "text/advanced";

/// Declares a builder with no extra arguments over a `fn(&str) -> String`
macro_rules! fragment_builder {
    ($ty:ident, $name:literal, $func:ident, $desc:literal, $example:literal) => {
        pub struct $ty;

        impl TransformPlugin for $ty {
            fn meta(&self) -> OperationMeta {
                OperationMeta {
                    name: $name,
                    description: $desc,
                    usage: concat!($name, "(pattern)"),
                    args: &[],
                    returns: "Text",
                    examples: &[$example],
                    category: CATEGORY,
                    related: &["group", "matchesPattern"],
                }
            }

            fn call(&self, text: &str, _args: &[Value]) -> Result<Value, TextError> {
                Ok(Value::Text($func(text)))
            }
        }
    };
}

fragment_builder!(Lookahead, "lookahead", lookahead, "Zero-width positive lookahead",
    "lookahead(\"px\") → \"(?=px)\"");
fragment_builder!(NegativeLookahead, "negativeLookahead", negative_lookahead,
    "Zero-width negative lookahead", "negativeLookahead(\"px\") → \"(?!px)\"");
fragment_builder!(Lookbehind, "lookbehind", lookbehind, "Zero-width positive lookbehind",
    "lookbehind(\"\\\\$\") → \"(?<=\\\\$)\"");
fragment_builder!(NegativeLookbehind, "negativeLookbehind", negative_lookbehind,
    "Zero-width negative lookbehind", "negativeLookbehind(\"-\") → \"(?<!-)\"");
fragment_builder!(Group, "group", group, "Non-capturing group", "group(\"ab\") → \"(?:ab)\"");
fragment_builder!(Optional, "optional", optional, "Match the fragment zero or one time",
    "optional(\"s\") → \"(?:s)?\"");
fragment_builder!(OneOrMore, "oneOrMore", one_or_more, "Match the fragment one or more times",
    "oneOrMore(\"\\\\d\") → \"(?:\\\\d)+\"");
fragment_builder!(ZeroOrMore, "zeroOrMore", zero_or_more, "Match the fragment any number of times",
    "zeroOrMore(\"ab\") → \"(?:ab)*\"");
fragment_builder!(AnyOf, "anyOf", any_of, "Character class of the given characters, taken literally",
    "anyOf(\"-+\") → \"[\\\\-+]\"");

// ============ NamedGroup ============

pub struct NamedGroup;

static NAMED_GROUP_ARGS: [ArgMeta; 1] = [ArgMeta::required("name", "Text", "Group name (identifier)")];

impl TransformPlugin for NamedGroup {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "namedGroup",
            description: "Named capturing group",
            usage: "namedGroup(pattern, name)",
            args: &NAMED_GROUP_ARGS,
            returns: "Text",
            examples: &["namedGroup(\"\\\\d{4}\", \"year\") → \"(?<year>\\\\d{4})\""],
            category: CATEGORY,
            related: &["extractNamedGroups", "group"],
        }
    }

    fn call(&self, text: &str, args: &[Value]) -> Result<Value, TextError> {
        let name = text_arg(args, 0, "namedGroup", "name")?;
        named_group(text, name).map(Value::Text)
    }
}

// ============ Repeat ============

pub struct Repeat;

static REPEAT_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("min", "Int", "Minimum repetitions"),
    ArgMeta::optional("max", "Int", "Maximum repetitions", "min"),
];

fn repetitions(value: i64, arg: &str) -> Result<u32, TextError> {
    u32::try_from(value)
        .map_err(|_| TextError::arg_type("repeat", arg, "non-negative Int", &value.to_string()))
}

impl TransformPlugin for Repeat {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "repeat",
            description: "Match the fragment a bounded number of times",
            usage: "repeat(pattern, min, max?)",
            args: &REPEAT_ARGS,
            returns: "Text",
            examples: &[
                "repeat(\"\\\\d\", 3) → \"(?:\\\\d){3}\"",
                "repeat(\"ab\", 1, 2) → \"(?:ab){1,2}\"",
            ],
            category: CATEGORY,
            related: &["oneOrMore", "zeroOrMore", "optional"],
        }
    }

    fn call(&self, text: &str, args: &[Value]) -> Result<Value, TextError> {
        let min = repetitions(int_arg(args, 0, "repeat", "min")?, "min")?;
        let max = optional_int_arg(args, 1, "repeat", "max")?
            .map(|m| repetitions(m, "max"))
            .transpose()?;
        repeat(text, min, max).map(Value::Text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::get_pattern;

    #[test]
    fn test_lookaround_builders() {
        assert_eq!(lookahead("px"), "(?=px)");
        assert_eq!(negative_lookahead("px"), "(?!px)");
        assert_eq!(lookbehind(r"\$"), r"(?<=\$)");
        assert_eq!(negative_lookbehind("-"), "(?<!-)");
    }

    #[test]
    fn test_quantifiers_wrap_whole_fragment() {
        assert_eq!(optional("ab"), "(?:ab)?");
        assert_eq!(one_or_more(r"\d"), r"(?:\d)+");
        assert_eq!(zero_or_more("ab"), "(?:ab)*");
        assert_eq!(repeat("ab", 2, None).unwrap(), "(?:ab){2}");
        assert_eq!(repeat("ab", 1, Some(3)).unwrap(), "(?:ab){1,3}");
        assert!(repeat("ab", 3, Some(1)).is_err());
    }

    #[test]
    fn test_named_group() {
        assert_eq!(named_group(r"\d{4}", "year").unwrap(), r"(?<year>\d{4})");
        assert!(named_group("x", "1bad").is_err());
        assert!(named_group("x", "").is_err());
    }

    #[test]
    fn test_any_of_escapes_class_metacharacters() {
        assert_eq!(any_of("-+"), r"[\-+]");
        assert_eq!(any_of("a]^"), r"[a\]\^]");
        let p = get_pattern(&any_of("-]^")).unwrap();
        assert_eq!(p.find_all("a-b]c^").unwrap(), vec!["-", "]", "^"]);
    }

    #[test]
    fn test_built_fragments_compile_and_match() {
        let price = format!("{}{}", lookbehind(r"\$"), one_or_more(r"\d"));
        let p = get_pattern(&price).unwrap();
        assert_eq!(p.find_all("$5, 7, $12").unwrap(), vec!["5", "12"]);
    }

    #[test]
    fn test_repeat_plugin_args() {
        let out = Repeat.call(r"\d", &[Value::Int(2), Value::Int(4)]).unwrap();
        assert_eq!(out, Value::from(r"(?:\d){2,4}"));
        assert!(Repeat.call(r"\d", &[Value::Int(-1)]).is_err());
        assert!(Repeat.call(r"\d", &[Value::Int(3), Value::Int(1)]).is_err());
    }
}
