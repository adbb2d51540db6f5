use thiserror::Error;

use crate::value::ErrorKind;

/// Error surfaced by the public entry points.
///
/// Callers match on [`EvalError::kind`] to catch by kind; the message adds
/// context (which function raised, which name was missing, the parser span).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {}", .kind.as_code(), .message)]
pub struct EvalError {
    pub kind: ErrorKind,
    pub message: String,
}

impl EvalError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The stable short code for this error's kind (`#VALUE!` etc.).
    pub fn code(&self) -> &'static str {
        self.kind.as_code()
    }
}

impl From<ErrorKind> for EvalError {
    fn from(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: kind.message().to_string(),
        }
    }
}
