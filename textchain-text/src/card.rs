//! Card operations over `textchain-card`

use textchain_plugin::prelude::*;
use textchain_card::ValidationResult;
use std::collections::BTreeMap;

const CATEGORY: &str = "card";

/// Validation result as a `{ isValid, cardType, errors }` object
pub fn validation_to_value(result: ValidationResult) -> Value {
    let mut obj = BTreeMap::new();
    obj.insert("isValid".to_string(), Value::Bool(result.is_valid));
    obj.insert("cardType".to_string(), Value::Text(result.card_type));
    obj.insert("errors".to_string(), Value::from(result.errors));
    Value::Object(obj)
}

// ============ ValidateCreditCard ============

pub struct ValidateCreditCard;

impl TransformPlugin for ValidateCreditCard {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "validateCreditCard",
            description: "Check a card number and report every failed check",
            usage: "validateCreditCard(text)",
            args: &[],
            returns: "Object { isValid: Bool, cardType: Text, errors: List<Text> }",
            examples: &[
                "validateCreditCard(\"4111 1111 1111 1111\") → {isValid: true, cardType: \"Visa\", errors: []}",
                "validateCreditCard(\"123\") → {isValid: false, cardType: \"Unknown\", errors: [...]}",
            ],
            category: CATEGORY,
            related: &["isCreditCard", "formatCreditCard"],
        }
    }

    fn call(&self, text: &str, _args: &[Value]) -> Result<Value, TextError> {
        Ok(validation_to_value(textchain_card::validate(text)))
    }
}

// ============ FormatCreditCard ============

pub struct FormatCreditCard;

impl TransformPlugin for FormatCreditCard {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "formatCreditCard",
            description: "Group card digits for display (Amex 4-6-5, Diners 4-6-4, else 4s)",
            usage: "formatCreditCard(text)",
            args: &[],
            returns: "Text",
            examples: &[
                "formatCreditCard(\"4532015112830366\") → \"4532 0151 1283 0366\"",
                "formatCreditCard(\"378282246310005\") → \"3782 822463 10005\"",
            ],
            category: CATEGORY,
            related: &["validateCreditCard", "mask"],
        }
    }

    fn call(&self, text: &str, _args: &[Value]) -> Result<Value, TextError> {
        Ok(Value::Text(textchain_card::format(text)))
    }
}
