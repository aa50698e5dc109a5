//! textchain Core - Fundamental types
//!
//! This crate provides the core types used throughout textchain:
//! - `Value`: Runtime values (text, booleans, integers, lists, mappings)
//! - `TextError`: Structured errors for malformed calls
//! - `PatternError`: Dynamic pattern compile/match failures

mod value;
mod error;

pub use value::Value;
pub use error::{TextError, PatternError, codes};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Value, TextError, PatternError};
    pub use crate::error::codes;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    mod value_tests {
        use super::*;

        #[test]
        fn test_fold_text_is_identity() {
            assert_eq!(Value::from("abc").fold_to_text(), "abc");
        }

        #[test]
        fn test_fold_scalars() {
            assert_eq!(Value::Bool(true).fold_to_text(), "true");
            assert_eq!(Value::Int(-42).fold_to_text(), "-42");
            assert_eq!(Value::Null.fold_to_text(), "");
        }

        #[test]
        fn test_fold_list_joins_with_comma() {
            let list = Value::from(vec!["a@x.io".to_string(), "b@y.io".to_string()]);
            assert_eq!(list.fold_to_text(), "a@x.io,b@y.io");
            assert_eq!(Value::List(vec![]).fold_to_text(), "");
        }

        #[test]
        fn test_fold_object_as_json() {
            let mut map = BTreeMap::new();
            map.insert("year".to_string(), "2024".to_string());
            map.insert("month".to_string(), "05".to_string());
            assert_eq!(
                Value::from(map).fold_to_text(),
                r#"{"month":"05","year":"2024"}"#
            );
        }

        #[test]
        fn test_get_missing_field_is_null() {
            let obj = Value::Object(BTreeMap::new());
            assert!(obj.get("nope").is_null());
            assert!(Value::Int(1).get("x").is_null());
        }

        #[test]
        fn test_type_names() {
            assert_eq!(Value::from("x").type_name(), "Text");
            assert_eq!(Value::from(3).type_name(), "Int");
            assert_eq!(Value::Null.type_name(), "Null");
        }
    }

    mod error_tests {
        use super::*;

        #[test]
        fn test_display_includes_code_and_suggestion() {
            let err = TextError::unknown_operation("toSlugg");
            let text = err.to_string();
            assert!(text.starts_with("[UNKNOWN_OPERATION]"));
            assert!(text.contains("toSlugg"));
            assert!(text.contains("suggestion"));
        }

        #[test]
        fn test_arg_count_range_message() {
            let err = TextError::arg_count("truncate", 1, 2, 3);
            assert_eq!(err.code, codes::ARG_COUNT);
            assert!(err.message.contains("1 to 2"));
            assert_eq!(err.operation.as_deref(), Some("truncate"));
        }

        #[test]
        fn test_in_operation_keeps_first() {
            let err = TextError::internal("x").in_operation("a").in_operation("b");
            assert_eq!(err.operation.as_deref(), Some("a"));
        }

        #[test]
        fn test_pattern_error_conversion() {
            let err: TextError = PatternError::Syntax {
                pattern: "[".to_string(),
                details: "unclosed class".to_string(),
            }
            .into();
            assert_eq!(err.code, codes::INVALID_PATTERN);
            assert!(err.message.contains("'['"));
        }
    }
}
