#![forbid(unsafe_code)]

//! Sandboxed evaluation of spreadsheet-style formulas over named
//! parameters.
//!
//! A single textual expression (`SUM`, `IF`, `VLOOKUP`, infix
//! arithmetic, string and boolean literals, `@name` parameter
//! references) produces a single [`Value`]. Errors carry spreadsheet codes
//! (`#VALUE!`, `#REF!`, `#NUM!`, `#DIV/0!`, `#N/A`, `#NAME?`) via
//! [`ErrorKind`].
//!
//! Evaluation is a pure function of `(expression, parameters)`: no I/O,
//! no clock, no randomness, and a textual safety gate rejects input that
//! tries to escape the formula grammar before any parsing happens. The
//! one locale-dependent operation is `PROPER`'s title-casing, which
//! follows the process locale and can be pinned via [`locale`].
//!
//! ```
//! use formula_sandbox::{evaluate_blocking, Params, Value};
//!
//! let params = Params::new().with("data", vec![10.0, 20.0, 30.0]);
//! let result = evaluate_blocking("AVERAGE(@data)", &params).unwrap();
//! assert_eq!(result, Value::Number(20.0));
//! ```

use std::sync::Arc;

pub mod cache;
pub mod coercion;
pub mod error;
pub mod eval;
pub mod functions;
pub mod locale;
pub mod params;
pub mod parser;
pub mod safety;
pub mod value;

pub use error::EvalError;
pub use eval::Evaluator;
pub use functions::{FunctionRegistry, FunctionSpec};
pub use params::{Params, ValueShape};
pub use parser::{parse_formula, Expr, ParseError};
pub use value::{ErrorKind, Record, Value};

/// Evaluate an expression against a parameter environment.
///
/// The call is exposed as `async` so callers get non-blocking semantics
/// regardless of the backend; the tree-walking evaluator completes
/// synchronously. Use [`evaluate_blocking`] from sync contexts.
pub async fn evaluate(expression: &str, params: &Params) -> Result<Value, EvalError> {
    eval_inner(expression, params, None)
}

/// [`evaluate`], with host-provided functions overlaying the built-ins.
pub async fn evaluate_with_registry(
    expression: &str,
    params: &Params,
    registry: Option<&FunctionRegistry>,
) -> Result<Value, EvalError> {
    eval_inner(expression, params, registry)
}

/// Synchronous twin of [`evaluate`].
pub fn evaluate_blocking(expression: &str, params: &Params) -> Result<Value, EvalError> {
    eval_inner(expression, params, None)
}

/// Synchronous twin of [`evaluate_with_registry`].
pub fn evaluate_blocking_with_registry(
    expression: &str,
    params: &Params,
    registry: Option<&FunctionRegistry>,
) -> Result<Value, EvalError> {
    eval_inner(expression, params, registry)
}

fn eval_inner(
    expression: &str,
    params: &Params,
    registry: Option<&FunctionRegistry>,
) -> Result<Value, EvalError> {
    // Gate before the cache so unsafe input is never parsed or cached.
    safety::check(expression)?;

    let source = expression.trim();
    let ast = match cache::lookup_script(source) {
        Some(ast) => ast,
        None => {
            let expr = parser::parse_formula(source)
                .map_err(|e| EvalError::new(ErrorKind::Compile, e.to_string()))?;
            let ast = Arc::new(expr);
            cache::store_script(source, Arc::clone(&ast));
            ast
        }
    };

    Evaluator::new(params, registry)
        .eval(&ast)
        .map_err(EvalError::from)
}
