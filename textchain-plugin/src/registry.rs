//! Operation Registry

use crate::{Operation, OperationKind, OperationMeta, PredicatePlugin, TransformPlugin};
use textchain_core::{TextError, Value};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

/// What a name-dispatched call produced
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Value(Value),
    Verdict(bool),
}

/// Table of named operations, read-only once built
#[derive(Debug, Default)]
pub struct OperationRegistry {
    operations: HashMap<String, Operation>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self {
            operations: HashMap::new(),
        }
    }

    pub fn with_transform<T: TransformPlugin + 'static>(self, t: T) -> Self {
        self.with_operation(Operation::Transform(Arc::new(t)))
    }

    pub fn with_predicate<P: PredicatePlugin + 'static>(self, p: P) -> Self {
        self.with_operation(Operation::Predicate(Arc::new(p)))
    }

    /// Insert an operation. Names are case-insensitive; on a clash between
    /// families the predicate is kept whatever the insertion order.
    pub fn with_operation(mut self, op: Operation) -> Self {
        let name = op.meta().name.to_lowercase();
        match self.operations.get(&name).map(Operation::kind) {
            Some(OperationKind::Predicate) if op.kind() == OperationKind::Transform => {
                warn!(operation = %name, "transformation shadowed by predicate of the same name");
                return self;
            }
            Some(OperationKind::Transform) if op.kind() == OperationKind::Predicate => {
                warn!(operation = %name, "predicate shadows transformation of the same name");
            }
            Some(existing) => {
                warn!(
                    operation = %name,
                    replaced = existing.as_str(),
                    "operation registered twice, keeping the latest"
                );
            }
            None => {}
        }
        self.operations.insert(name, op);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Operation> {
        self.operations.get(&name.to_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Registered names (as declared, not lowercased), sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.operations.values().map(|op| op.meta().name).collect();
        names.sort_unstable();
        names
    }

    /// Look up an operation, with "did you mean" hints when missing
    pub fn lookup(&self, name: &str) -> Result<&Operation, TextError> {
        if let Some(op) = self.get(name) {
            return Ok(op);
        }

        debug!(operation = name, "unknown operation requested");
        let similar = self.find_similar(name);
        let mut err = TextError::unknown_operation(name);
        if !similar.is_empty() {
            let suggestions: Vec<&str> = similar.iter().take(5).copied().collect();
            err = err.with_suggestion(format!(
                "Similar: {}. Use help() for full list.",
                suggestions.join(", ")
            ));
        }
        Err(err)
    }

    /// Run a transformation by name
    pub fn call(&self, name: &str, text: &str, args: &[Value]) -> Result<Value, TextError> {
        match self.lookup(name)? {
            Operation::Transform(t) => {
                let meta = t.meta();
                meta.check_arity(args)?;
                t.call(text, args).map_err(|e| e.in_operation(meta.name))
            }
            Operation::Predicate(p) => Err(TextError::wrong_kind(
                p.meta().name,
                OperationKind::Transform.as_str(),
                OperationKind::Predicate.as_str(),
            )),
        }
    }

    /// Run a predicate by name
    pub fn test(&self, name: &str, text: &str, args: &[Value]) -> Result<bool, TextError> {
        match self.lookup(name)? {
            Operation::Predicate(p) => {
                let meta = p.meta();
                meta.check_arity(args)?;
                p.test(text, args).map_err(|e| e.in_operation(meta.name))
            }
            Operation::Transform(t) => Err(TextError::wrong_kind(
                t.meta().name,
                OperationKind::Predicate.as_str(),
                OperationKind::Transform.as_str(),
            )),
        }
    }

    /// Run any operation by name
    pub fn invoke(&self, name: &str, text: &str, args: &[Value]) -> Result<Outcome, TextError> {
        match self.lookup(name)?.kind() {
            OperationKind::Transform => self.call(name, text, args).map(Outcome::Value),
            OperationKind::Predicate => self.test(name, text, args).map(Outcome::Verdict),
        }
    }

    /// Find operation names similar to the given name (for error suggestions)
    fn find_similar(&self, name: &str) -> Vec<&'static str> {
        let name_lower = name.to_lowercase();
        let mut matches: Vec<(&'static str, usize)> = self
            .operations
            .iter()
            .filter_map(|(key, op)| {
                let score = Self::similarity_score(&name_lower, key);
                if score > 0 {
                    Some((op.meta().name, score))
                } else {
                    None
                }
            })
            .collect();

        matches.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        matches.into_iter().map(|(name, _)| name).collect()
    }

    /// Higher is more similar; zero means unrelated
    fn similarity_score(query: &str, candidate: &str) -> usize {
        let mut score = 0;

        if candidate.starts_with(query) {
            score += 100;
        } else if candidate.contains(query) {
            score += 50;
        } else if query.contains(candidate) {
            score += 30;
        }

        let query_chars: HashSet<char> = query.chars().collect();
        let candidate_chars: HashSet<char> = candidate.chars().collect();
        let common = query_chars.intersection(&candidate_chars).count();
        // Shared letters alone are noise for short names
        if common * 2 < candidate_chars.len() && score == 0 {
            return 0;
        }
        score += common * 2;

        let len_diff = query.len().abs_diff(candidate.len());
        if len_diff < 5 && score > 0 {
            score += 5 - len_diff;
        }

        score
    }

    pub fn help(&self, name: Option<&str>) -> Value {
        match name {
            Some(n) => self.help_for(n),
            None => self.general_help(),
        }
    }

    fn help_for(&self, name: &str) -> Value {
        match self.get(name) {
            Some(op) => Value::Object(Self::operation_to_help(op.kind(), op.meta())),
            None => Value::Text(format!("No operation named '{}'", name)),
        }
    }

    fn general_help(&self) -> Value {
        let mut by_category: BTreeMap<String, Vec<&'static str>> = BTreeMap::new();
        for op in self.operations.values() {
            let meta = op.meta();
            by_category.entry(meta.category.to_string()).or_default().push(meta.name);
        }

        let mut help = BTreeMap::new();
        help.insert(
            "operations".to_string(),
            Value::Object(
                by_category
                    .into_iter()
                    .map(|(k, mut v)| {
                        v.sort_unstable();
                        (k, Value::List(v.into_iter().map(Value::from).collect()))
                    })
                    .collect(),
            ),
        );
        help.insert(
            "usage".to_string(),
            Value::from("Call help('operation_name') for detailed help."),
        );
        Value::Object(help)
    }

    fn operation_to_help(kind: OperationKind, meta: OperationMeta) -> BTreeMap<String, Value> {
        let mut help = BTreeMap::new();
        help.insert("name".to_string(), Value::from(meta.name));
        help.insert("type".to_string(), Value::from(kind.as_str()));
        help.insert("description".to_string(), Value::from(meta.description));
        help.insert("usage".to_string(), Value::from(meta.usage));
        help.insert("returns".to_string(), Value::from(meta.returns));
        help.insert("category".to_string(), Value::from(meta.category));
        help.insert(
            "args".to_string(),
            Value::List(
                meta.args
                    .iter()
                    .map(|a| {
                        let mut arg = BTreeMap::new();
                        arg.insert("name".to_string(), Value::from(a.name));
                        arg.insert("type".to_string(), Value::from(a.typ));
                        arg.insert("description".to_string(), Value::from(a.description));
                        arg.insert("optional".to_string(), Value::Bool(a.optional));
                        if let Some(default) = a.default {
                            arg.insert("default".to_string(), Value::from(default));
                        }
                        Value::Object(arg)
                    })
                    .collect(),
            ),
        );
        help.insert(
            "examples".to_string(),
            Value::List(meta.examples.iter().map(|e| Value::from(*e)).collect()),
        );
        help.insert(
            "related".to_string(),
            Value::List(meta.related.iter().map(|r| Value::from(*r)).collect()),
        );
        help
    }

    /// Summaries of every operation, optionally restricted to one category
    pub fn list_operations(&self, category: Option<&str>) -> Value {
        let mut metas: Vec<(OperationKind, OperationMeta)> = self
            .operations
            .values()
            .map(|op| (op.kind(), op.meta()))
            .filter(|(_, meta)| category.map_or(true, |c| meta.category == c))
            .collect();
        metas.sort_by_key(|(_, meta)| meta.name);

        Value::List(
            metas
                .into_iter()
                .map(|(kind, meta)| {
                    let mut obj = BTreeMap::new();
                    obj.insert("name".to_string(), Value::from(meta.name));
                    obj.insert("type".to_string(), Value::from(kind.as_str()));
                    obj.insert("description".to_string(), Value::from(meta.description));
                    obj.insert("usage".to_string(), Value::from(meta.usage));
                    obj.insert("category".to_string(), Value::from(meta.category));
                    Value::Object(obj)
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ArgMeta;

    struct Shout;

    static SHOUT_ARGS: [ArgMeta; 1] = [ArgMeta::optional("suffix", "Text", "Appended text", "!")];

    impl TransformPlugin for Shout {
        fn meta(&self) -> OperationMeta {
            OperationMeta {
                name: "shout",
                description: "Uppercase and append a suffix",
                usage: "shout(text, suffix?)",
                args: &SHOUT_ARGS,
                returns: "Text",
                examples: &[],
                category: "test",
                related: &[],
            }
        }

        fn call(&self, text: &str, args: &[Value]) -> Result<Value, TextError> {
            let suffix = args.first().and_then(Value::as_text).unwrap_or("!");
            Ok(Value::Text(format!("{}{}", text.to_uppercase(), suffix)))
        }
    }

    struct IsShort;

    impl PredicatePlugin for IsShort {
        fn meta(&self) -> OperationMeta {
            OperationMeta {
                name: "isShort",
                description: "Fewer than five characters",
                usage: "isShort(text)",
                args: &[],
                returns: "Bool",
                examples: &[],
                category: "test",
                related: &[],
            }
        }

        fn test(&self, text: &str, _args: &[Value]) -> Result<bool, TextError> {
            Ok(text.chars().count() < 5)
        }
    }

    /// Transformation that claims the predicate's name
    struct FakeShort;

    impl TransformPlugin for FakeShort {
        fn meta(&self) -> OperationMeta {
            OperationMeta { name: "isshort", ..Shout.meta() }
        }

        fn call(&self, _text: &str, _args: &[Value]) -> Result<Value, TextError> {
            Ok(Value::Null)
        }
    }

    fn registry() -> OperationRegistry {
        OperationRegistry::new().with_transform(Shout).with_predicate(IsShort)
    }

    #[test]
    fn test_call_transform() {
        let reg = registry();
        assert_eq!(reg.call("shout", "hi", &[]).unwrap(), Value::from("HI!"));
        assert_eq!(reg.call("SHOUT", "hi", &[Value::from("?")]).unwrap(), Value::from("HI?"));
    }

    #[test]
    fn test_predicate() {
        let reg = registry();
        assert!(reg.test("isShort", "abc", &[]).unwrap());
        assert!(!reg.test("isshort", "abcdef", &[]).unwrap());
    }

    #[test]
    fn test_arity_checked() {
        let reg = registry();
        let err = reg
            .call("shout", "hi", &[Value::from("a"), Value::from("b")])
            .unwrap_err();
        assert_eq!(err.code, textchain_core::codes::ARG_COUNT);
    }

    #[test]
    fn test_wrong_kind() {
        let reg = registry();
        let err = reg.call("isShort", "hi", &[]).unwrap_err();
        assert_eq!(err.code, textchain_core::codes::WRONG_KIND);
        let err = reg.test("shout", "hi", &[]).unwrap_err();
        assert_eq!(err.code, textchain_core::codes::WRONG_KIND);
    }

    #[test]
    fn test_invoke_dispatches_by_kind() {
        let reg = registry();
        assert_eq!(reg.invoke("shout", "a", &[]).unwrap(), Outcome::Value(Value::from("A!")));
        assert_eq!(reg.invoke("isShort", "a", &[]).unwrap(), Outcome::Verdict(true));
    }

    #[test]
    fn test_unknown_operation_suggests() {
        let reg = registry();
        let err = reg.call("shou", "x", &[]).unwrap_err();
        assert_eq!(err.code, textchain_core::codes::UNKNOWN_OPERATION);
        assert!(err.suggestion.unwrap().contains("shout"));
    }

    #[test]
    fn test_predicate_wins_name_clash_in_either_order() {
        let a = OperationRegistry::new().with_predicate(IsShort).with_transform(FakeShort);
        let b = OperationRegistry::new().with_transform(FakeShort).with_predicate(IsShort);
        assert_eq!(a.get("isShort").unwrap().kind(), OperationKind::Predicate);
        assert_eq!(b.get("isShort").unwrap().kind(), OperationKind::Predicate);
        assert_eq!(a.len(), 1);
    }

    /// Log sink shared with a fmt subscriber
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn logs_of(register: impl FnOnce()) -> String {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, register);
        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_clash_warnings_name_the_shadowing() {
        let log = logs_of(|| {
            OperationRegistry::new().with_transform(FakeShort).with_predicate(IsShort);
        });
        assert!(log.contains("predicate shadows transformation"), "{}", log);
        assert!(!log.contains("registered twice"), "{}", log);

        let log = logs_of(|| {
            OperationRegistry::new().with_predicate(IsShort).with_transform(FakeShort);
        });
        assert!(log.contains("transformation shadowed by predicate"), "{}", log);

        let log = logs_of(|| {
            OperationRegistry::new().with_transform(Shout).with_transform(Shout);
        });
        assert!(log.contains("registered twice"), "{}", log);
    }

    #[test]
    fn test_names_sorted() {
        assert_eq!(registry().names(), vec!["isShort", "shout"]);
    }

    #[test]
    fn test_help_and_listing() {
        let reg = registry();
        let help = reg.help(Some("shout"));
        assert_eq!(help.get("type"), &Value::from("transformation"));
        assert_eq!(help.get("args").as_list().unwrap().len(), 1);

        let listing = reg.list_operations(Some("test"));
        assert_eq!(listing.as_list().unwrap().len(), 2);
        assert!(reg.list_operations(Some("nope")).as_list().unwrap().is_empty());
    }
}
