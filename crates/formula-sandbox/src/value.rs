use std::fmt;

use indexmap::IndexMap;

/// Error taxonomy for formula evaluation.
///
/// The first six kinds carry the spreadsheet error codes users see
/// (`#VALUE!`, `#REF!`, ...). The remaining kinds are raised by the
/// engine itself: [`ErrorKind::Unsafe`] by the pre-parse safety gate,
/// [`ErrorKind::Compile`] by the lexer/parser, and
/// [`ErrorKind::Expression`] for runtime failures that no more specific
/// kind describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// `#VALUE!`: bad type or failed coercion.
    Value,
    /// `#REF!`: unknown parameter name or index out of bounds.
    Ref,
    /// `#NAME?`: call to an unregistered function.
    Name,
    /// `#NUM!`: numerically invalid operation.
    Num,
    /// `#DIV/0!`: division or modulo by zero.
    Div0,
    /// `#N/A`: value not available.
    NA,
    /// Rejected by the safety gate before parsing.
    Unsafe,
    /// Lexer/parser failure.
    Compile,
    /// Generic runtime failure.
    Expression,
}

impl ErrorKind {
    /// The stable short code for the error (spreadsheet spelling where one
    /// exists, including punctuation).
    pub const fn as_code(self) -> &'static str {
        match self {
            ErrorKind::Value => "#VALUE!",
            ErrorKind::Ref => "#REF!",
            ErrorKind::Name => "#NAME?",
            ErrorKind::Num => "#NUM!",
            ErrorKind::Div0 => "#DIV/0!",
            ErrorKind::NA => "#N/A",
            ErrorKind::Unsafe => "#UNSAFE!",
            ErrorKind::Compile => "#COMPILE!",
            ErrorKind::Expression => "#EXPR!",
        }
    }

    /// Default English message for the kind.
    pub const fn message(self) -> &'static str {
        match self {
            ErrorKind::Value => "value is of the wrong type or could not be coerced",
            ErrorKind::Ref => "reference is not valid",
            ErrorKind::Name => "name is not recognized",
            ErrorKind::Num => "number is not valid for this operation",
            ErrorKind::Div0 => "division by zero",
            ErrorKind::NA => "value is not available",
            ErrorKind::Unsafe => "expression was rejected by the safety gate",
            ErrorKind::Compile => "expression could not be parsed",
            ErrorKind::Expression => "expression evaluation failed",
        }
    }

    /// Parse a spreadsheet error literal (e.g. `#DIV/0!`) back into a kind.
    ///
    /// Returns `None` for unknown literals; the internal codes are accepted
    /// too so that `as_code` round-trips.
    pub fn from_code(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        for kind in [
            ErrorKind::Value,
            ErrorKind::Ref,
            ErrorKind::Name,
            ErrorKind::Num,
            ErrorKind::Div0,
            ErrorKind::NA,
            ErrorKind::Unsafe,
            ErrorKind::Compile,
            ErrorKind::Expression,
        ] {
            if raw.eq_ignore_ascii_case(kind.as_code()) {
                return Some(kind);
            }
        }
        None
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// Insertion-ordered string-keyed record.
pub type Record = IndexMap<String, Value>;

/// A formula value.
///
/// Values are immutable by contract: no built-in mutates its inputs, and
/// flatten/unique style operations return fresh sequences.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    /// IEEE-754 double. Integer-like inputs are widened on construction.
    /// `NaN` is a legal number and is visibly propagated by aggregates.
    Number(f64),
    Text(String),
    /// Ordered, zero-indexed, possibly nested sequence.
    List(Vec<Value>),
    /// Ordered mapping from string keys to values.
    Record(Record),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Render a number the way results are displayed: round-trip shortest
    /// decimal, `-0` normalized to `0`.
    pub(crate) fn format_number(n: f64) -> String {
        if n == 0.0 {
            return "0".to_string();
        }
        n.to_string()
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(value as f64)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => f.write_str(if *b { "true" } else { "false" }),
            Value::Number(n) => f.write_str(&Value::format_number(*n)),
            Value::Text(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Record(fields) => {
                f.write_str("{")?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}
