//! textchain Plugin System
//!
//! Provides the two operation families a registry holds:
//! - Transformations (text in, value out)
//! - Predicates (text in, boolean out)

mod traits;
mod registry;

pub use traits::{
    ArgMeta, OperationMeta, OperationKind, Operation,
    TransformPlugin, PredicatePlugin,
};
pub use registry::{OperationRegistry, Outcome};

/// Re-export core types for operation authors
pub mod prelude {
    pub use crate::{
        ArgMeta, OperationMeta, OperationKind, Operation,
        TransformPlugin, PredicatePlugin, OperationRegistry, Outcome,
    };
    pub use textchain_core::prelude::*;
}
