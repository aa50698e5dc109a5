//! Fluent chain over one evolving string
//!
//! Each step consumes the chain and hands it back, so a chain has exactly
//! one owner and a predicate call ends it.

use textchain_core::{TextError, Value};
use textchain_plugin::{OperationKind, OperationRegistry};
use std::sync::Arc;
use tracing::debug;

/// One recorded transformation step
#[derive(Debug, Clone, PartialEq)]
pub struct TraceStep {
    pub operation: String,
    pub args: Vec<Value>,
    /// Cursor after the step
    pub cursor: String,
}

/// Result of [`Chain::invoke`]
#[derive(Debug)]
pub enum Step {
    /// A transformation ran; keep chaining
    Chain(Chain),
    /// A predicate ran; the chain is over
    Verdict(bool),
}

/// Composer binding every registry operation to a single cursor string
#[derive(Debug)]
pub struct Chain {
    registry: Arc<OperationRegistry>,
    cursor: String,
    steps: usize,
    tracing: bool,
    trace: Vec<TraceStep>,
}

impl Chain {
    /// Empty cursor over the standard operations
    pub fn new() -> Self {
        Self::with_registry(crate::shared_operations(), "")
    }

    pub fn with_registry(registry: Arc<OperationRegistry>, input: impl Into<String>) -> Self {
        Self {
            registry,
            cursor: input.into(),
            steps: 0,
            tracing: false,
            trace: Vec::new(),
        }
    }

    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.tracing = enabled;
        self
    }

    /// Run a transformation on the cursor and keep chaining
    pub fn apply(mut self, name: &str, args: &[Value]) -> Result<Self, TextError> {
        let step = self.steps + 1;
        let value = self
            .registry
            .call(name, &self.cursor, args)
            .map_err(|e| e.with_note(format!("chain step {}", step)))?;

        self.cursor = value.fold_to_text();
        self.steps = step;
        debug!(operation = name, step, cursor_len = self.cursor.len(), "chain transformation");

        if self.tracing {
            self.trace.push(TraceStep {
                operation: name.to_string(),
                args: args.to_vec(),
                cursor: self.cursor.clone(),
            });
        }
        Ok(self)
    }

    /// Evaluate a predicate against the cursor, ending the chain
    pub fn test(self, name: &str, args: &[Value]) -> Result<bool, TextError> {
        let step = self.steps + 1;
        let verdict = self
            .registry
            .test(name, &self.cursor, args)
            .map_err(|e| e.with_note(format!("chain step {}", step)))?;
        debug!(operation = name, step, verdict, "chain predicate");
        Ok(verdict)
    }

    /// Run any operation, whichever family it belongs to
    pub fn invoke(self, name: &str, args: &[Value]) -> Result<Step, TextError> {
        match self.registry.lookup(name)?.kind() {
            OperationKind::Transform => self.apply(name, args).map(Step::Chain),
            OperationKind::Predicate => self.test(name, args).map(Step::Verdict),
        }
    }

    /// Current cursor
    pub fn result(&self) -> &str {
        &self.cursor
    }

    pub fn into_result(self) -> String {
        self.cursor
    }

    /// Transformations applied so far
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Recorded steps; empty unless tracing is enabled
    pub fn trace(&self) -> &[TraceStep] {
        &self.trace
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}
