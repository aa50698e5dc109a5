//! Helper functions for text operations
//!
//! Argument extraction and dynamic pattern compilation.

use textchain_core::{PatternError, TextError, Value};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::{LazyLock, OnceLock, RwLock};

// ============ Arguments ============

/// Required text argument
pub fn text_arg<'a>(args: &'a [Value], index: usize, op: &str, arg: &str) -> Result<&'a str, TextError> {
    match args.get(index) {
        Some(Value::Text(s)) => Ok(s.as_str()),
        Some(other) => Err(TextError::arg_type(op, arg, "Text", other.type_name())),
        None => Err(TextError::arg_type(op, arg, "Text", "nothing")),
    }
}

/// Optional text argument with default (missing or null)
pub fn text_arg_or<'a>(args: &'a [Value], index: usize, default: &'a str, op: &str, arg: &str) -> Result<&'a str, TextError> {
    match args.get(index) {
        Some(Value::Null) | None => Ok(default),
        Some(_) => text_arg(args, index, op, arg),
    }
}

/// Integer argument; numeric text is accepted too
pub fn int_arg(args: &[Value], index: usize, op: &str, arg: &str) -> Result<i64, TextError> {
    match args.get(index) {
        Some(Value::Int(n)) => Ok(*n),
        Some(Value::Text(s)) => s.trim().parse::<i64>().map_err(|_| {
            TextError::arg_type(op, arg, "Int", &format!("Text '{}'", s))
        }),
        Some(other) => Err(TextError::arg_type(op, arg, "Int", other.type_name())),
        None => Err(TextError::arg_type(op, arg, "Int", "nothing")),
    }
}

/// Optional integer argument (missing or null gives `None`)
pub fn optional_int_arg(args: &[Value], index: usize, op: &str, arg: &str) -> Result<Option<i64>, TextError> {
    match args.get(index) {
        Some(Value::Null) | None => Ok(None),
        Some(_) => int_arg(args, index, op, arg).map(Some),
    }
}

/// Non-negative count argument with default
pub fn count_arg_or(args: &[Value], index: usize, default: usize, op: &str, arg: &str) -> Result<usize, TextError> {
    match optional_int_arg(args, index, op, arg)? {
        None => Ok(default),
        Some(n) => usize::try_from(n)
            .map_err(|_| TextError::arg_type(op, arg, "non-negative Int", &n.to_string())),
    }
}

// ============ Words ============

static CASE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").unwrap());
static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Za-z0-9]+").unwrap());

/// ASCII words, splitting camelCase humps
pub fn words(text: &str) -> Vec<String> {
    let spaced = CASE_BOUNDARY.replace_all(text, "$1 $2");
    WORD.find_iter(&spaced).map(|m| m.as_str().to_string()).collect()
}

/// First character upper-cased, the rest untouched
pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ============ Dynamic patterns ============

/// Compiled caller-supplied pattern.
///
/// Compiled with `regex` when possible; lookaround and backreferences need
/// `fancy_regex`, which is tried second.
#[derive(Debug, Clone)]
pub enum Pattern {
    Basic(Regex),
    Fancy(fancy_regex::Regex),
}

impl Pattern {
    pub fn compile(source: &str) -> Result<Self, PatternError> {
        if let Ok(re) = Regex::new(source) {
            return Ok(Pattern::Basic(re));
        }
        fancy_regex::Regex::new(source)
            .map(Pattern::Fancy)
            .map_err(|e| PatternError::Syntax {
                pattern: source.to_string(),
                details: e.to_string(),
            })
    }

    pub fn as_str(&self) -> &str {
        match self {
            Pattern::Basic(re) => re.as_str(),
            Pattern::Fancy(re) => re.as_str(),
        }
    }

    fn runtime_error(&self, err: fancy_regex::Error) -> PatternError {
        PatternError::Runtime {
            pattern: self.as_str().to_string(),
            details: err.to_string(),
        }
    }

    pub fn is_match(&self, text: &str) -> Result<bool, PatternError> {
        match self {
            Pattern::Basic(re) => Ok(re.is_match(text)),
            Pattern::Fancy(re) => re.is_match(text).map_err(|e| self.runtime_error(e)),
        }
    }

    /// Every non-overlapping match, in order
    pub fn find_all(&self, text: &str) -> Result<Vec<String>, PatternError> {
        match self {
            Pattern::Basic(re) => Ok(re.find_iter(text).map(|m| m.as_str().to_string()).collect()),
            Pattern::Fancy(re) => re
                .find_iter(text)
                .map(|m| m.map(|m| m.as_str().to_string()).map_err(|e| self.runtime_error(e)))
                .collect(),
        }
    }

    /// Named groups of the first match; groups that did not take part are left out
    pub fn named_captures(&self, text: &str) -> Result<BTreeMap<String, String>, PatternError> {
        let mut groups = BTreeMap::new();
        match self {
            Pattern::Basic(re) => {
                if let Some(caps) = re.captures(text) {
                    for name in re.capture_names().flatten() {
                        if let Some(m) = caps.name(name) {
                            groups.insert(name.to_string(), m.as_str().to_string());
                        }
                    }
                }
            }
            Pattern::Fancy(re) => {
                if let Some(caps) = re.captures(text).map_err(|e| self.runtime_error(e))? {
                    for name in re.capture_names().flatten() {
                        if let Some(m) = caps.name(name) {
                            groups.insert(name.to_string(), m.as_str().to_string());
                        }
                    }
                }
            }
        }
        Ok(groups)
    }

    /// Replace every match; `$1` / `${name}` expand as usual
    pub fn replace_all(&self, text: &str, replacement: &str) -> Result<String, PatternError> {
        match self {
            Pattern::Basic(re) => Ok(re.replace_all(text, replacement).into_owned()),
            Pattern::Fancy(re) => re
                .try_replacen(text, 0, replacement)
                .map(|s| s.into_owned())
                .map_err(|e| self.runtime_error(e)),
        }
    }
}

/// Pattern cache for compiled patterns
static PATTERN_CACHE: OnceLock<RwLock<HashMap<String, Pattern>>> = OnceLock::new();

fn get_cache() -> &'static RwLock<HashMap<String, Pattern>> {
    PATTERN_CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Get or compile a pattern with caching
pub fn get_pattern(source: &str) -> Result<Pattern, TextError> {
    let cache = get_cache();

    {
        let read_guard = cache
            .read()
            .map_err(|_| TextError::internal("Failed to acquire pattern cache lock"))?;
        if let Some(p) = read_guard.get(source) {
            return Ok(p.clone());
        }
    }

    let pattern = Pattern::compile(source)?;

    // A poisoned cache only costs a recompile next time
    if let Ok(mut write_guard) = cache.write() {
        write_guard.insert(source.to_string(), pattern.clone());
    }

    Ok(pattern)
}
