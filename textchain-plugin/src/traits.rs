//! Operation traits

use textchain_core::{TextError, Value};
use serde::Serialize;
use std::sync::Arc;

/// Metadata about an operation argument (the input text is implicit)
#[derive(Debug, Clone, Serialize)]
pub struct ArgMeta {
    pub name: &'static str,
    pub typ: &'static str,
    pub description: &'static str,
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'static str>,
}

impl ArgMeta {
    pub const fn required(name: &'static str, typ: &'static str, description: &'static str) -> Self {
        Self { name, typ, description, optional: false, default: None }
    }

    pub const fn optional(name: &'static str, typ: &'static str, description: &'static str, default: &'static str) -> Self {
        Self { name, typ, description, optional: true, default: Some(default) }
    }
}

/// Metadata for an operation
#[derive(Debug, Clone, Serialize)]
pub struct OperationMeta {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    /// Extra arguments after the input text
    pub args: &'static [ArgMeta],
    pub returns: &'static str,
    pub examples: &'static [&'static str],
    pub category: &'static str,
    pub related: &'static [&'static str],
}

impl OperationMeta {
    /// Number of required extra arguments
    pub fn min_args(&self) -> usize {
        self.args.iter().filter(|a| !a.optional).count()
    }

    /// Maximum number of extra arguments
    pub fn max_args(&self) -> usize {
        self.args.len()
    }

    /// Check an argument slice against the declared arity
    pub fn check_arity(&self, args: &[Value]) -> Result<(), TextError> {
        let (min, max) = (self.min_args(), self.max_args());
        if args.len() < min || args.len() > max {
            return Err(TextError::arg_count(self.name, min, max, args.len()));
        }
        Ok(())
    }
}

/// Operation producing a new value from the input text
pub trait TransformPlugin: Send + Sync {
    fn meta(&self) -> OperationMeta;
    fn call(&self, text: &str, args: &[Value]) -> Result<Value, TextError>;
}

/// Operation classifying the input text
pub trait PredicatePlugin: Send + Sync {
    fn meta(&self) -> OperationMeta;
    fn test(&self, text: &str, args: &[Value]) -> Result<bool, TextError>;
}

/// Which family an operation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Transform,
    Predicate,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Transform => "transformation",
            OperationKind::Predicate => "predicate",
        }
    }
}

/// Registry entry: one of the two operation families
#[derive(Clone)]
pub enum Operation {
    Transform(Arc<dyn TransformPlugin>),
    Predicate(Arc<dyn PredicatePlugin>),
}

impl Operation {
    pub fn meta(&self) -> OperationMeta {
        match self {
            Operation::Transform(t) => t.meta(),
            Operation::Predicate(p) => p.meta(),
        }
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Transform(_) => OperationKind::Transform,
            Operation::Predicate(_) => OperationKind::Predicate,
        }
    }
}

impl std::fmt::Debug for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.kind().as_str(), self.meta().name)
    }
}
