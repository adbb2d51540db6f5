use crate::coercion::{to_display_string, to_number};
use crate::functions::{eval_args, flattened_args, FunctionContext, FunctionSpec, VAR_ARGS};
use crate::parser::Expr;
use crate::value::{ErrorKind, Value};

/// Extract a string argument, raising `#VALUE!` for anything else
/// (including null).
fn as_text(value: &Value) -> Result<&str, ErrorKind> {
    match value {
        Value::Text(s) => Ok(s),
        _ => Err(ErrorKind::Value),
    }
}

inventory::submit! {
    FunctionSpec {
        name: "CONCAT",
        min_args: 0,
        max_args: VAR_ARGS,
        implementation: concat_fn,
    }
}

/// Null stringifies to the empty string here, the one place it does.
fn concat_fn(ctx: &dyn FunctionContext, args: &[Expr]) -> Result<Value, ErrorKind> {
    let elements = flattened_args(ctx, args)?;
    let mut out = String::new();
    for element in &elements {
        out.push_str(&to_display_string(element)?);
    }
    Ok(Value::Text(out))
}

inventory::submit! {
    FunctionSpec {
        name: "LEFT",
        min_args: 1,
        max_args: 2,
        implementation: left_fn,
    }
}

fn left_fn(ctx: &dyn FunctionContext, args: &[Expr]) -> Result<Value, ErrorKind> {
    let values = eval_args(ctx, args)?;
    let text = as_text(&values[0])?;
    let count = optional_count(values.get(1))?;
    Ok(Value::Text(text.chars().take(count).collect()))
}

inventory::submit! {
    FunctionSpec {
        name: "RIGHT",
        min_args: 1,
        max_args: 2,
        implementation: right_fn,
    }
}

fn right_fn(ctx: &dyn FunctionContext, args: &[Expr]) -> Result<Value, ErrorKind> {
    let values = eval_args(ctx, args)?;
    let text = as_text(&values[0])?;
    let count = optional_count(values.get(1))?;
    let len = text.chars().count();
    Ok(Value::Text(text.chars().skip(len.saturating_sub(count)).collect()))
}

/// `LEFT`/`RIGHT` count: defaults to 1, truncates toward zero, rejects
/// negatives; clamping to the string length happens at the call site.
fn optional_count(value: Option<&Value>) -> Result<usize, ErrorKind> {
    let Some(value) = value else { return Ok(1) };
    let n = to_number(value)?.trunc();
    if n < 0.0 {
        return Err(ErrorKind::Value);
    }
    Ok(n as usize)
}

inventory::submit! {
    FunctionSpec {
        name: "MID",
        min_args: 3,
        max_args: 3,
        implementation: mid_fn,
    }
}

/// 1-based start; the span clamps to the end of the string.
fn mid_fn(ctx: &dyn FunctionContext, args: &[Expr]) -> Result<Value, ErrorKind> {
    let values = eval_args(ctx, args)?;
    let text = as_text(&values[0])?;
    let start = to_number(&values[1])?.trunc();
    let count = to_number(&values[2])?.trunc();
    if start < 1.0 || count < 0.0 {
        return Err(ErrorKind::Value);
    }
    let out: String = text
        .chars()
        .skip(start as usize - 1)
        .take(count as usize)
        .collect();
    Ok(Value::Text(out))
}

inventory::submit! {
    FunctionSpec {
        name: "TRIM",
        min_args: 1,
        max_args: 1,
        implementation: trim_fn,
    }
}

fn trim_fn(ctx: &dyn FunctionContext, args: &[Expr]) -> Result<Value, ErrorKind> {
    let values = eval_args(ctx, args)?;
    let text = as_text(&values[0])?;
    Ok(Value::Text(text.trim().to_string()))
}

inventory::submit! {
    FunctionSpec {
        name: "UPPER",
        min_args: 1,
        max_args: 1,
        implementation: upper_fn,
    }
}

/// Lenient: a non-string input yields the empty string rather than an
/// error (contrast with `PROPER`/`LEN`/`REPLACE`).
fn upper_fn(ctx: &dyn FunctionContext, args: &[Expr]) -> Result<Value, ErrorKind> {
    let values = eval_args(ctx, args)?;
    match &values[0] {
        Value::Text(s) => Ok(Value::Text(s.to_uppercase())),
        _ => Ok(Value::Text(String::new())),
    }
}

inventory::submit! {
    FunctionSpec {
        name: "LOWER",
        min_args: 1,
        max_args: 1,
        implementation: lower_fn,
    }
}

fn lower_fn(ctx: &dyn FunctionContext, args: &[Expr]) -> Result<Value, ErrorKind> {
    let values = eval_args(ctx, args)?;
    match &values[0] {
        Value::Text(s) => Ok(Value::Text(s.to_lowercase())),
        _ => Ok(Value::Text(String::new())),
    }
}

inventory::submit! {
    FunctionSpec {
        name: "PROPER",
        min_args: 1,
        max_args: 1,
        implementation: proper_fn,
    }
}

/// Title-cases through the process locale's casing rules; hosts that
/// need identical output across machines pin a locale with
/// [`crate::locale::set_proper_locale`].
fn proper_fn(ctx: &dyn FunctionContext, args: &[Expr]) -> Result<Value, ErrorKind> {
    let values = eval_args(ctx, args)?;
    let text = as_text(&values[0])?;
    Ok(Value::Text(crate::locale::proper_locale().title_case(text)))
}

inventory::submit! {
    FunctionSpec {
        name: "LEN",
        min_args: 1,
        max_args: 1,
        implementation: len_fn,
    }
}

fn len_fn(ctx: &dyn FunctionContext, args: &[Expr]) -> Result<Value, ErrorKind> {
    let values = eval_args(ctx, args)?;
    let text = as_text(&values[0])?;
    Ok(Value::Number(text.chars().count() as f64))
}

inventory::submit! {
    FunctionSpec {
        name: "REPLACE",
        min_args: 3,
        max_args: 3,
        implementation: replace_fn,
    }
}

/// Substitutes every occurrence of `old` with `new`. An empty `old`
/// leaves the text unchanged.
fn replace_fn(ctx: &dyn FunctionContext, args: &[Expr]) -> Result<Value, ErrorKind> {
    let values = eval_args(ctx, args)?;
    let text = as_text(&values[0])?;
    let old = as_text(&values[1])?;
    let new = as_text(&values[2])?;
    if old.is_empty() {
        return Ok(Value::Text(text.to_string()));
    }
    Ok(Value::Text(text.replace(old, new)))
}
