use crate::coercion::to_number;
use crate::functions::{eval_args, flattened_args, FunctionContext, FunctionSpec, VAR_ARGS};
use crate::parser::Expr;
use crate::value::{ErrorKind, Value};

inventory::submit! {
    FunctionSpec {
        name: "SUM",
        min_args: 0,
        max_args: VAR_ARGS,
        implementation: sum,
    }
}

/// Directly supplied scalars coerce (and raise `#VALUE!`/`#N/A` on
/// failure); elements reached through a sequence contribute only when
/// they are numeric-typed.
fn sum(ctx: &dyn FunctionContext, args: &[Expr]) -> Result<Value, ErrorKind> {
    let mut acc = 0.0;
    for arg in args {
        match ctx.eval_arg(arg)? {
            Value::List(items) => {
                for item in crate::coercion::deep_flatten(&items) {
                    if let Value::Number(n) = item {
                        acc += n;
                    }
                }
            }
            scalar => acc += to_number(&scalar)?,
        }
    }
    Ok(Value::Number(acc))
}

inventory::submit! {
    FunctionSpec {
        name: "AVERAGE",
        min_args: 1,
        max_args: VAR_ARGS,
        implementation: average,
    }
}

fn average(ctx: &dyn FunctionContext, args: &[Expr]) -> Result<Value, ErrorKind> {
    let elements = flattened_args(ctx, args)?;
    let mut acc = 0.0;
    let mut count = 0u64;
    for element in elements.iter().filter(|v| !v.is_null()) {
        // A non-null element that fails numeric coercion poisons the
        // result to NaN rather than raising.
        match to_number(element) {
            Ok(n) => {
                acc += n;
                count += 1;
            }
            Err(_) => return Ok(Value::Number(f64::NAN)),
        }
    }
    if count == 0 {
        return Ok(Value::Number(f64::NAN));
    }
    Ok(Value::Number(acc / count as f64))
}

inventory::submit! {
    FunctionSpec {
        name: "MAX",
        min_args: 1,
        max_args: VAR_ARGS,
        implementation: max_fn,
    }
}

fn max_fn(ctx: &dyn FunctionContext, args: &[Expr]) -> Result<Value, ErrorKind> {
    let elements = flattened_args(ctx, args)?;
    let mut best: Option<f64> = None;
    for element in elements.iter().filter(|v| !v.is_null()) {
        match to_number(element) {
            Ok(n) if n.is_nan() => return Ok(Value::Number(f64::NAN)),
            Ok(n) => best = Some(best.map(|b| b.max(n)).unwrap_or(n)),
            Err(_) => return Ok(Value::Number(f64::NAN)),
        }
    }
    Ok(Value::Number(best.unwrap_or(f64::NAN)))
}

inventory::submit! {
    FunctionSpec {
        name: "MIN",
        min_args: 1,
        max_args: VAR_ARGS,
        implementation: min_fn,
    }
}

/// Unlike `MAX`, `MIN` raises `#VALUE!` on an uncoercible element.
fn min_fn(ctx: &dyn FunctionContext, args: &[Expr]) -> Result<Value, ErrorKind> {
    let elements = flattened_args(ctx, args)?;
    let mut best: Option<f64> = None;
    for element in elements.iter().filter(|v| !v.is_null()) {
        let n = to_number(element).map_err(|_| ErrorKind::Value)?;
        best = Some(best.map(|b| b.min(n)).unwrap_or(n));
    }
    Ok(Value::Number(best.unwrap_or(f64::NAN)))
}

inventory::submit! {
    FunctionSpec {
        name: "COUNT",
        min_args: 0,
        max_args: VAR_ARGS,
        implementation: count_fn,
    }
}

fn count_fn(ctx: &dyn FunctionContext, args: &[Expr]) -> Result<Value, ErrorKind> {
    let elements = flattened_args(ctx, args)?;
    let total = elements
        .iter()
        .filter(|v| matches!(v, Value::Number(_)))
        .count();
    Ok(Value::Number(total as f64))
}

inventory::submit! {
    FunctionSpec {
        name: "COUNTA",
        min_args: 0,
        max_args: VAR_ARGS,
        implementation: counta_fn,
    }
}

fn counta_fn(ctx: &dyn FunctionContext, args: &[Expr]) -> Result<Value, ErrorKind> {
    let elements = flattened_args(ctx, args)?;
    let total = elements.iter().filter(|v| !v.is_null()).count();
    Ok(Value::Number(total as f64))
}

inventory::submit! {
    FunctionSpec {
        name: "ROUND",
        min_args: 2,
        max_args: 2,
        implementation: round_fn,
    }
}

fn round_fn(ctx: &dyn FunctionContext, args: &[Expr]) -> Result<Value, ErrorKind> {
    let values = eval_args(ctx, args)?;
    let n = to_number(&values[0])?;
    let digits = to_number(&values[1])?.trunc() as i32;
    Ok(Value::Number(round_half_away(n, digits)))
}

/// Half-away-from-zero rounding at `digits` decimal places; negative
/// `digits` rounds to multiples of `10^(-digits)`.
pub(crate) fn round_half_away(n: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (n * factor).round() / factor
}

inventory::submit! {
    FunctionSpec {
        name: "ABS",
        min_args: 1,
        max_args: 1,
        implementation: abs_fn,
    }
}

fn abs_fn(ctx: &dyn FunctionContext, args: &[Expr]) -> Result<Value, ErrorKind> {
    let values = eval_args(ctx, args)?;
    Ok(Value::Number(to_number(&values[0])?.abs()))
}

inventory::submit! {
    FunctionSpec {
        name: "INT",
        min_args: 1,
        max_args: 1,
        implementation: int_fn,
    }
}

/// Truncates toward zero.
fn int_fn(ctx: &dyn FunctionContext, args: &[Expr]) -> Result<Value, ErrorKind> {
    let values = eval_args(ctx, args)?;
    Ok(Value::Number(to_number(&values[0])?.trunc()))
}

inventory::submit! {
    FunctionSpec {
        name: "SQRT",
        min_args: 1,
        max_args: 1,
        implementation: sqrt_fn,
    }
}

fn sqrt_fn(ctx: &dyn FunctionContext, args: &[Expr]) -> Result<Value, ErrorKind> {
    let values = eval_args(ctx, args)?;
    let n = to_number(&values[0])?;
    if n < 0.0 {
        return Err(ErrorKind::Num);
    }
    Ok(Value::Number(n.sqrt()))
}

inventory::submit! {
    FunctionSpec {
        name: "POWER",
        min_args: 2,
        max_args: 2,
        implementation: power_fn,
    }
}

fn power_fn(ctx: &dyn FunctionContext, args: &[Expr]) -> Result<Value, ErrorKind> {
    let values = eval_args(ctx, args)?;
    let base = to_number(&values[0])?;
    let exp = to_number(&values[1])?;
    Ok(Value::Number(power(base, exp)?))
}

/// Shared by the `POWER` builtin and the `^` operator.
pub(crate) fn power(base: f64, exp: f64) -> Result<f64, ErrorKind> {
    if base == 0.0 && exp < 0.0 {
        return Err(ErrorKind::Num);
    }
    let out = base.powf(exp);
    // powf yields NaN for a negative base with a fractional exponent.
    if out.is_nan() && !base.is_nan() && !exp.is_nan() {
        return Err(ErrorKind::Num);
    }
    Ok(out)
}

inventory::submit! {
    FunctionSpec {
        name: "MOD",
        min_args: 2,
        max_args: 2,
        implementation: mod_fn,
    }
}

/// Result sign follows the divisor (spreadsheet convention), unlike the
/// `%` operator which keeps the dividend's sign.
fn mod_fn(ctx: &dyn FunctionContext, args: &[Expr]) -> Result<Value, ErrorKind> {
    let values = eval_args(ctx, args)?;
    let a = to_number(&values[0])?;
    let b = to_number(&values[1])?;
    if b == 0.0 {
        return Err(ErrorKind::Div0);
    }
    Ok(Value::Number(a - b * (a / b).floor()))
}
