//! Argument matchers for expectations.
//!
//! A matcher list is compared positionally against the recorded
//! argument list. `Rest` may appear as the final matcher to accept any
//! remaining arguments, which is how variadic statement arguments are
//! usually matched.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Coarse classification of a JSON argument, for type-only matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One positional argument matcher.
#[derive(Clone)]
pub enum ArgMatcher {
    /// Matches a single argument equal to the given value.
    Eq(Value),
    /// Matches any single argument.
    Any,
    /// Matches all remaining arguments; must be the final matcher.
    Rest,
    /// Matches a single argument of the given kind.
    OfType(ValueKind),
    /// Matches a single argument accepted by the predicate.
    Predicate(Arc<dyn Fn(&Value) -> bool + Send + Sync>),
}

impl ArgMatcher {
    /// Equality matcher from anything JSON-convertible.
    pub fn eq(value: impl Into<Value>) -> Self {
        ArgMatcher::Eq(value.into())
    }

    /// Predicate matcher from a closure.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        ArgMatcher::Predicate(Arc::new(f))
    }

    pub fn matches(&self, value: &Value) -> bool {
        match self {
            ArgMatcher::Eq(expected) => expected == value,
            ArgMatcher::Any | ArgMatcher::Rest => true,
            ArgMatcher::OfType(kind) => ValueKind::of(value) == *kind,
            ArgMatcher::Predicate(f) => f(value),
        }
    }
}

impl fmt::Debug for ArgMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgMatcher::Eq(value) => write!(f, "{value}"),
            ArgMatcher::Any => f.write_str("<any>"),
            ArgMatcher::Rest => f.write_str("<rest>"),
            ArgMatcher::OfType(kind) => write!(f, "<{kind}>"),
            ArgMatcher::Predicate(_) => f.write_str("<predicate>"),
        }
    }
}

/// Match an argument list against a positional matcher list.
///
/// Without a trailing `Rest`, arity must match exactly. A `Rest`
/// anywhere but last never matches.
pub fn match_args(matchers: &[ArgMatcher], args: &[Value]) -> bool {
    let mut idx = 0;
    for (pos, matcher) in matchers.iter().enumerate() {
        if matches!(matcher, ArgMatcher::Rest) {
            return pos == matchers.len() - 1;
        }
        match args.get(idx) {
            Some(value) if matcher.matches(value) => idx += 1,
            _ => return false,
        }
    }
    idx == args.len()
}
