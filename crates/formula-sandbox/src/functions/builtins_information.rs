use crate::coercion::parse_decimal;
use crate::functions::{eval_args, FunctionContext, FunctionSpec};
use crate::parser::Expr;
use crate::value::{ErrorKind, Value};

inventory::submit! {
    FunctionSpec {
        name: "ISBLANK",
        min_args: 1,
        max_args: 1,
        implementation: isblank_fn,
    }
}

/// Null and all-whitespace strings count as blank.
fn isblank_fn(ctx: &dyn FunctionContext, args: &[Expr]) -> Result<Value, ErrorKind> {
    let values = eval_args(ctx, args)?;
    let blank = match &values[0] {
        Value::Null => true,
        Value::Text(s) => s.trim().is_empty(),
        _ => false,
    };
    Ok(Value::Bool(blank))
}

inventory::submit! {
    FunctionSpec {
        name: "ISNUMBER",
        min_args: 1,
        max_args: 1,
        implementation: isnumber_fn,
    }
}

/// True for numeric values and for strings that fully parse as a decimal.
fn isnumber_fn(ctx: &dyn FunctionContext, args: &[Expr]) -> Result<Value, ErrorKind> {
    let values = eval_args(ctx, args)?;
    let numeric = match &values[0] {
        Value::Number(_) => true,
        Value::Text(s) => parse_decimal(s).is_some(),
        _ => false,
    };
    Ok(Value::Bool(numeric))
}
