//! textchain Text Operations
//!
//! String transformation, extraction, validation and pattern-building
//! operations. Every operation exists twice: as a typed function in its
//! module (the static surface) and as a plugin registered by
//! [`load_text_library`] (the name-dispatched surface).

pub mod helpers;
pub mod transform;
pub mod extract;
pub mod validate;
pub mod advanced;
pub mod card;

use textchain_plugin::OperationRegistry;

/// Load text operations into registry
pub fn load_text_library(registry: OperationRegistry) -> OperationRegistry {
    registry
        // Transform (27 operations)
        .with_transform(transform::Trim)
        .with_transform(transform::CollapseSpaces)
        .with_transform(transform::RemoveAllSpaces)
        .with_transform(transform::ToLowerCase)
        .with_transform(transform::ToUpperCase)
        .with_transform(transform::Capitalize)
        .with_transform(transform::ToTitleCase)
        .with_transform(transform::ToSlug)
        .with_transform(transform::ToCamelCase)
        .with_transform(transform::ToPascalCase)
        .with_transform(transform::ToSnakeCase)
        .with_transform(transform::ToKebabCase)
        .with_transform(transform::OnlyNumbers)
        .with_transform(transform::OnlyLetters)
        .with_transform(transform::OnlyAlphanumeric)
        .with_transform(transform::RemoveNumbers)
        .with_transform(transform::RemoveSpecialChars)
        .with_transform(transform::StripHtml)
        .with_transform(transform::EscapeHtml)
        .with_transform(transform::EscapeRegex)
        .with_transform(transform::Truncate)
        .with_transform(transform::Reverse)
        .with_transform(transform::Mask)
        .with_transform(transform::ReplacePattern)
        .with_transform(transform::RemovePattern)
        .with_transform(transform::ToBase64)
        .with_transform(transform::FromBase64)

        // Extract (8 operations)
        .with_transform(extract::ExtractEmails)
        .with_transform(extract::ExtractUrls)
        .with_transform(extract::ExtractNumbers)
        .with_transform(extract::ExtractHashtags)
        .with_transform(extract::ExtractMentions)
        .with_transform(extract::ExtractPattern)
        .with_transform(extract::ExtractNamedGroups)
        .with_transform(extract::SplitWords)

        // Validate (22 operations)
        .with_predicate(validate::IsEmail)
        .with_predicate(validate::IsUrl)
        .with_predicate(validate::IsUuid)
        .with_predicate(validate::IsCreditCard)
        .with_predicate(validate::IsHexColor)
        .with_predicate(validate::IsIpv4)
        .with_predicate(validate::IsIpv6)
        .with_predicate(validate::IsPhone)
        .with_predicate(validate::IsAlpha)
        .with_predicate(validate::IsNumeric)
        .with_predicate(validate::IsAlphanumeric)
        .with_predicate(validate::IsJson)
        .with_predicate(validate::IsBase64)
        .with_predicate(validate::IsStrongPassword)
        .with_predicate(validate::IsSlug)
        .with_predicate(validate::IsDate)
        .with_predicate(validate::IsTime)
        .with_predicate(validate::IsEmpty)
        .with_predicate(validate::IsLowerCase)
        .with_predicate(validate::IsUpperCase)
        .with_predicate(validate::MatchesPattern)
        .with_predicate(validate::ContainsPattern)

        // Advanced pattern builders (11 operations)
        .with_transform(advanced::Lookahead)
        .with_transform(advanced::NegativeLookahead)
        .with_transform(advanced::Lookbehind)
        .with_transform(advanced::NegativeLookbehind)
        .with_transform(advanced::Group)
        .with_transform(advanced::NamedGroup)
        .with_transform(advanced::Optional)
        .with_transform(advanced::OneOrMore)
        .with_transform(advanced::ZeroOrMore)
        .with_transform(advanced::Repeat)
        .with_transform(advanced::AnyOf)

        // Card (2 operations)
        .with_transform(card::ValidateCreditCard)
        .with_transform(card::FormatCreditCard)
}

/// Registry holding every text operation
pub fn standard_registry() -> OperationRegistry {
    load_text_library(OperationRegistry::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use textchain_plugin::OperationKind;

    #[test]
    fn test_every_operation_registered_once() {
        // Duplicate names would collapse into one entry
        assert_eq!(standard_registry().len(), 27 + 8 + 22 + 11 + 2);
    }

    #[test]
    fn test_families() {
        let reg = standard_registry();
        assert_eq!(reg.get("toSlug").unwrap().kind(), OperationKind::Transform);
        assert_eq!(reg.get("isCreditCard").unwrap().kind(), OperationKind::Predicate);
        assert_eq!(reg.get("validateCreditCard").unwrap().kind(), OperationKind::Transform);
        assert_eq!(reg.get("lookahead").unwrap().kind(), OperationKind::Transform);
    }

    #[test]
    fn test_registry_dispatch_matches_static_functions() {
        let reg = standard_registry();
        let samples = ["Hello World!", "  a  b  ", "user_id 42", ""];
        for s in samples {
            assert_eq!(reg.call("toSlug", s, &[]).unwrap(), textchain_core::Value::Text(transform::to_slug(s)));
            assert_eq!(reg.call("onlyNumbers", s, &[]).unwrap(), textchain_core::Value::Text(transform::only_numbers(s)));
            assert_eq!(reg.test("isEmpty", s, &[]).unwrap(), validate::is_empty(s));
        }
    }

    #[test]
    fn test_every_operation_has_metadata() {
        let reg = standard_registry();
        for name in reg.names() {
            let meta = reg.get(name).unwrap().meta();
            assert!(!meta.description.is_empty(), "{} lacks description", name);
            assert!(meta.usage.starts_with(name), "{} usage mismatch", name);
            assert!(!meta.examples.is_empty(), "{} lacks examples", name);
        }
    }
}
