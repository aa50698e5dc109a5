//! textchain - chainable regex string toolkit
//!
//! Two surfaces over one operation table:
//!
//! ```ignore
//! // static
//! let slug = textchain::transform::to_slug("Hello World!");
//! let same = textchain::operations().call("toSlug", "Hello World!", &[])?;
//!
//! // chained
//! let out = textchain::open("  Hello   World!  ")
//!     .apply("collapseSpaces", &[])?
//!     .apply("truncate", &textchain::args![8, ""])?
//!     .into_result();
//! ```

mod chain;

pub use chain::{Chain, Step, TraceStep};
pub use textchain_core::{codes, PatternError, TextError, Value};
pub use textchain_plugin::{Operation, OperationKind, OperationMeta, OperationRegistry, Outcome};
pub use textchain_text::{advanced, extract, transform, validate};
pub use textchain_card as card;

use std::sync::{Arc, LazyLock};
use tracing::debug;

static OPERATIONS: LazyLock<Arc<OperationRegistry>> = LazyLock::new(|| {
    let registry = textchain_text::standard_registry();
    debug!(operations = registry.len(), "standard operations loaded");
    Arc::new(registry)
});

pub(crate) fn shared_operations() -> Arc<OperationRegistry> {
    Arc::clone(&OPERATIONS)
}

/// Process-wide read-only table of the standard operations
pub fn operations() -> &'static OperationRegistry {
    &OPERATIONS
}

/// Open a chain over the standard operations
pub fn open(input: impl Into<String>) -> Chain {
    Chain::with_registry(shared_operations(), input)
}

/// Engine holding a registry and chain options
#[derive(Debug, Clone)]
pub struct Toolkit {
    registry: Arc<OperationRegistry>,
    tracing: bool,
}

impl Toolkit {
    pub fn new(registry: OperationRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            tracing: false,
        }
    }

    /// Shares the process-wide standard table
    pub fn with_standard_library() -> Self {
        Self {
            registry: shared_operations(),
            tracing: false,
        }
    }

    /// Record a trace in every chain this toolkit opens
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.tracing = enabled;
        self
    }

    pub fn open(&self, input: impl Into<String>) -> Chain {
        Chain::with_registry(self.registry.clone(), input).with_tracing(self.tracing)
    }

    pub fn call(&self, name: &str, text: &str, args: &[Value]) -> Result<Value, TextError> {
        self.registry.call(name, text, args)
    }

    pub fn test(&self, name: &str, text: &str, args: &[Value]) -> Result<bool, TextError> {
        self.registry.test(name, text, args)
    }

    pub fn help(&self, name: Option<&str>) -> Value {
        self.registry.help(name)
    }

    pub fn list_operations(&self, category: Option<&str>) -> Value {
        self.registry.list_operations(category)
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }
}

impl Default for Toolkit {
    fn default() -> Self {
        Self::with_standard_library()
    }
}

/// Build an argument list, converting each item with `Value::from`
#[macro_export]
macro_rules! args {
    () => { ::std::vec::Vec::<$crate::Value>::new() };
    ($($value:expr),+ $(,)?) => {
        vec![$($crate::Value::from($value)),+]
    };
}
