//! Caller-supplied parameter environment.
//!
//! `@name` references resolve against a [`Params`] map at evaluation time.
//! Resolution is lazy: a reference yields the raw bound value, and the
//! consuming operator or function's argument contract drives any coercion
//! (scalar, sequence, numeric). Lookup of an unknown name is `#REF!`.

use std::collections::HashMap;

use crate::value::{ErrorKind, Value};

/// Coarse classification of a bound value, used by lookup-style functions
/// to validate their table arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    Scalar,
    Sequence,
    Record,
    /// A sequence whose elements are all records (a lookup table).
    RecordSequence,
}

impl ValueShape {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Record(_) => ValueShape::Record,
            Value::List(items) => {
                if !items.is_empty() && items.iter().all(|v| matches!(v, Value::Record(_))) {
                    ValueShape::RecordSequence
                } else {
                    ValueShape::Sequence
                }
            }
            _ => ValueShape::Scalar,
        }
    }
}

/// Name → value environment for a single `evaluate` call.
///
/// The evaluator never writes back: the environment is read-only for the
/// duration of the call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    values: HashMap<String, Value>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Resolve a `@name` reference. Names match exactly (case-sensitive).
    pub fn resolve(&self, name: &str) -> Result<&Value, ErrorKind> {
        self.values.get(name).ok_or(ErrorKind::Ref)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<HashMap<String, Value>> for Params {
    fn from(values: HashMap<String, Value>) -> Self {
        Self { values }
    }
}
