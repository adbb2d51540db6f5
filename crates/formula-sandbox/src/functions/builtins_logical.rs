use crate::coercion::{loose_eq, to_bool};
use crate::functions::{flattened_args, FunctionContext, FunctionSpec, VAR_ARGS};
use crate::parser::Expr;
use crate::value::{ErrorKind, Value};

inventory::submit! {
    FunctionSpec {
        name: "AND",
        min_args: 1,
        max_args: VAR_ARGS,
        implementation: and_fn,
    }
}

fn and_fn(ctx: &dyn FunctionContext, args: &[Expr]) -> Result<Value, ErrorKind> {
    let elements = flattened_args(ctx, args)?;
    for element in &elements {
        if !to_bool(element)? {
            return Ok(Value::Bool(false));
        }
    }
    Ok(Value::Bool(true))
}

inventory::submit! {
    FunctionSpec {
        name: "OR",
        min_args: 1,
        max_args: VAR_ARGS,
        implementation: or_fn,
    }
}

/// `OR` never raises on a mixed-type element: anything that does not
/// coerce simply does not count as truthy.
fn or_fn(ctx: &dyn FunctionContext, args: &[Expr]) -> Result<Value, ErrorKind> {
    let elements = flattened_args(ctx, args)?;
    let any = elements
        .iter()
        .any(|element| to_bool(element).unwrap_or(false));
    Ok(Value::Bool(any))
}

inventory::submit! {
    FunctionSpec {
        name: "XOR",
        min_args: 1,
        max_args: VAR_ARGS,
        implementation: xor_fn,
    }
}

fn xor_fn(ctx: &dyn FunctionContext, args: &[Expr]) -> Result<Value, ErrorKind> {
    let elements = flattened_args(ctx, args)?;
    let mut truthy = 0u64;
    for element in &elements {
        if to_bool(element)? {
            truthy += 1;
        }
    }
    Ok(Value::Bool(truthy % 2 == 1))
}

inventory::submit! {
    FunctionSpec {
        name: "NOT",
        min_args: 1,
        max_args: 1,
        implementation: not_fn,
    }
}

fn not_fn(ctx: &dyn FunctionContext, args: &[Expr]) -> Result<Value, ErrorKind> {
    let value = ctx.eval_arg(&args[0])?;
    Ok(Value::Bool(!to_bool(&value)?))
}

inventory::submit! {
    FunctionSpec {
        name: "IF",
        min_args: 3,
        max_args: 3,
        implementation: if_fn,
    }
}

/// Only the selected branch evaluates.
fn if_fn(ctx: &dyn FunctionContext, args: &[Expr]) -> Result<Value, ErrorKind> {
    let cond = to_bool(&ctx.eval_arg(&args[0])?)?;
    if cond {
        ctx.eval_arg(&args[1])
    } else {
        ctx.eval_arg(&args[2])
    }
}

inventory::submit! {
    FunctionSpec {
        name: "IFS",
        min_args: 2,
        max_args: VAR_ARGS,
        implementation: ifs_fn,
    }
}

fn ifs_fn(ctx: &dyn FunctionContext, args: &[Expr]) -> Result<Value, ErrorKind> {
    if args.len() % 2 != 0 {
        return Err(ErrorKind::Value);
    }
    for pair in args.chunks_exact(2) {
        if to_bool(&ctx.eval_arg(&pair[0])?)? {
            return ctx.eval_arg(&pair[1]);
        }
    }
    Ok(Value::Null)
}

inventory::submit! {
    FunctionSpec {
        name: "SWITCH",
        min_args: 1,
        max_args: VAR_ARGS,
        implementation: switch_fn,
    }
}

/// `SWITCH(key, c1, v1, ..., [default])`: an odd trailing argument is
/// the default; no match and no default yields null.
fn switch_fn(ctx: &dyn FunctionContext, args: &[Expr]) -> Result<Value, ErrorKind> {
    let key = ctx.eval_arg(&args[0])?;
    let rest = &args[1..];
    let default = if rest.len() % 2 == 1 {
        Some(&rest[rest.len() - 1])
    } else {
        None
    };
    let pairs = &rest[..rest.len() - rest.len() % 2];

    for pair in pairs.chunks_exact(2) {
        let case = ctx.eval_arg(&pair[0])?;
        if loose_eq(&key, &case) {
            return ctx.eval_arg(&pair[1]);
        }
    }
    match default {
        Some(expr) => ctx.eval_arg(expr),
        None => Ok(Value::Null),
    }
}
