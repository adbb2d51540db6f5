//! Criterion strings and the conditional aggregates.
//!
//! A criterion is a text like `">10"` or `"apple"`: an optional relational
//! prefix followed by a value. Prefixes are detected in the order `>=`,
//! `<=`, `<>`, `>`, `<`, `=`; anything else is a bare exact match.

use crate::coercion::{parse_decimal, sequence_of, to_display_string, to_number};
use crate::functions::{eval_args, FunctionContext, FunctionSpec};
use crate::parser::Expr;
use crate::value::{ErrorKind, Value};

/// Tolerance for numeric equality in `=`/bare criteria.
const NUMERIC_EQ_EPSILON: f64 = 1e-7;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Criterion {
    /// `>` `>=` `<` `<=` against a parsed number.
    Relational { op: RelOp, rhs: f64 },
    /// `=` prefix or bare value: display-string equality, or numeric
    /// equality within [`NUMERIC_EQ_EPSILON`] when both sides parse.
    Equal { rhs: String },
    /// `<>`: display-string inequality.
    NotEqual { rhs: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RelOp {
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Criterion {
    /// Parse a criterion argument. Non-text values compare as their
    /// display form (a bare numeric criterion still matches numerically).
    pub(crate) fn parse(input: &Value) -> Result<Self, ErrorKind> {
        match input {
            Value::Text(s) => Self::parse_str(s),
            other => Ok(Criterion::Equal {
                rhs: to_display_string(other)?,
            }),
        }
    }

    fn parse_str(raw: &str) -> Result<Self, ErrorKind> {
        let raw = raw.trim_start();
        for (prefix, op) in [
            (">=", Some(RelOp::Gte)),
            ("<=", Some(RelOp::Lte)),
            ("<>", None),
            (">", Some(RelOp::Gt)),
            ("<", Some(RelOp::Lt)),
        ] {
            if let Some(rest) = raw.strip_prefix(prefix) {
                return match op {
                    Some(op) => {
                        let rhs = parse_decimal(rest).ok_or(ErrorKind::Value)?;
                        Ok(Criterion::Relational { op, rhs })
                    }
                    None => Ok(Criterion::NotEqual {
                        rhs: rest.trim().to_string(),
                    }),
                };
            }
        }
        let rest = raw.strip_prefix('=').unwrap_or(raw);
        Ok(Criterion::Equal {
            rhs: rest.trim().to_string(),
        })
    }

    pub(crate) fn matches(&self, value: &Value) -> bool {
        match self {
            Criterion::Relational { op, rhs } => {
                let Ok(n) = to_number(value) else { return false };
                match op {
                    RelOp::Gt => n > *rhs,
                    RelOp::Gte => n >= *rhs,
                    RelOp::Lt => n < *rhs,
                    RelOp::Lte => n <= *rhs,
                }
            }
            Criterion::Equal { rhs } => {
                let Ok(s) = to_display_string(value) else { return false };
                if s == *rhs {
                    return true;
                }
                match (parse_decimal(&s), parse_decimal(rhs)) {
                    (Some(a), Some(b)) => (a - b).abs() < NUMERIC_EQ_EPSILON,
                    _ => false,
                }
            }
            Criterion::NotEqual { rhs } => match to_display_string(value) {
                Ok(s) => s != *rhs,
                Err(_) => false,
            },
        }
    }
}

/// Pair each range element with its companion; a shorter companion range
/// yields null (which contributes nothing).
fn companion_at(companion: &[Value], idx: usize) -> Value {
    companion.get(idx).cloned().unwrap_or(Value::Null)
}

inventory::submit! {
    FunctionSpec {
        name: "COUNTIF",
        min_args: 2,
        max_args: 2,
        implementation: countif_fn,
    }
}

fn countif_fn(ctx: &dyn FunctionContext, args: &[Expr]) -> Result<Value, ErrorKind> {
    let values = eval_args(ctx, args)?;
    let range = sequence_of(values[0].clone());
    let criterion = Criterion::parse(&values[1])?;
    let count = range.iter().filter(|v| criterion.matches(v)).count();
    Ok(Value::Number(count as f64))
}

inventory::submit! {
    FunctionSpec {
        name: "SUMIF",
        min_args: 2,
        max_args: 3,
        implementation: sumif_fn,
    }
}

fn sumif_fn(ctx: &dyn FunctionContext, args: &[Expr]) -> Result<Value, ErrorKind> {
    let values = eval_args(ctx, args)?;
    let range = sequence_of(values[0].clone());
    let criterion = Criterion::parse(&values[1])?;
    let companion = values
        .get(2)
        .map(|v| sequence_of(v.clone()))
        .unwrap_or_else(|| range.clone());

    let mut acc = 0.0;
    for (idx, element) in range.iter().enumerate() {
        if !criterion.matches(element) {
            continue;
        }
        // Only numeric companions contribute, mirroring SUM over a range.
        if let Value::Number(n) = companion_at(&companion, idx) {
            acc += n;
        }
    }
    Ok(Value::Number(acc))
}

inventory::submit! {
    FunctionSpec {
        name: "AVERAGEIF",
        min_args: 2,
        max_args: 3,
        implementation: averageif_fn,
    }
}

fn averageif_fn(ctx: &dyn FunctionContext, args: &[Expr]) -> Result<Value, ErrorKind> {
    let values = eval_args(ctx, args)?;
    let range = sequence_of(values[0].clone());
    let criterion = Criterion::parse(&values[1])?;
    let companion = values
        .get(2)
        .map(|v| sequence_of(v.clone()))
        .unwrap_or_else(|| range.clone());

    let mut acc = 0.0;
    let mut count = 0u64;
    for (idx, element) in range.iter().enumerate() {
        if !criterion.matches(element) {
            continue;
        }
        if let Value::Number(n) = companion_at(&companion, idx) {
            acc += n;
            count += 1;
        }
    }
    if count == 0 {
        return Ok(Value::Number(f64::NAN));
    }
    Ok(Value::Number(acc / count as f64))
}
