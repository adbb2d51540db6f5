use crate::coercion::{loose_eq, sequence_of, to_bool, to_number};
use crate::functions::{eval_args, flattened_args, FunctionContext, FunctionSpec, VAR_ARGS};
use crate::params::ValueShape;
use crate::parser::Expr;
use crate::value::{ErrorKind, Record, Value};

inventory::submit! {
    FunctionSpec {
        name: "INDEX",
        min_args: 2,
        max_args: 3,
        implementation: index_fn,
    }
}

/// `INDEX(range, row, [col])`: `row` is 1-based and out of bounds is
/// `#REF!`. `col` selects within the row: a 1-based position into a row
/// sequence or a record's insertion-ordered values, or a string key for
/// record lookup.
fn index_fn(ctx: &dyn FunctionContext, args: &[Expr]) -> Result<Value, ErrorKind> {
    let values = eval_args(ctx, args)?;
    let mut values = values.into_iter();
    let range = sequence_of(values.next().unwrap_or(Value::Null));
    let row = to_number(&values.next().unwrap_or(Value::Null))?.trunc();
    if row < 1.0 || row as usize > range.len() {
        return Err(ErrorKind::Ref);
    }
    let element = &range[row as usize - 1];

    let Some(col) = values.next() else {
        return Ok(element.clone());
    };
    match col {
        Value::Text(key) => match element {
            Value::Record(fields) => fields.get(&key).cloned().ok_or(ErrorKind::Ref),
            _ => Err(ErrorKind::Value),
        },
        other => {
            let idx = to_number(&other)?.trunc();
            if idx < 1.0 {
                return Err(ErrorKind::Ref);
            }
            let idx = idx as usize - 1;
            match element {
                Value::List(items) => items.get(idx).cloned().ok_or(ErrorKind::Ref),
                Value::Record(fields) => {
                    fields.values().nth(idx).cloned().ok_or(ErrorKind::Ref)
                }
                _ => Err(ErrorKind::Value),
            }
        }
    }
}

inventory::submit! {
    FunctionSpec {
        name: "VLOOKUP",
        min_args: 3,
        max_args: 4,
        implementation: vlookup_fn,
    }
}

/// `VLOOKUP(key, table, col, [exact])` over a sequence of records.
///
/// Exact match compares the first field of each record with the key;
/// approximate match (the default when `exact` is absent or false)
/// requires numeric keys and returns the record with the largest
/// first-field value that does not exceed the key.
fn vlookup_fn(ctx: &dyn FunctionContext, args: &[Expr]) -> Result<Value, ErrorKind> {
    let values = eval_args(ctx, args)?;
    let key = &values[0];
    let table = &values[1];
    if ValueShape::of(table) != ValueShape::RecordSequence {
        return Err(ErrorKind::Value);
    }
    let Value::List(rows) = table else {
        return Err(ErrorKind::Value);
    };
    let col = to_number(&values[2])?.trunc();
    if col < 1.0 {
        return Err(ErrorKind::Value);
    }
    let exact = match values.get(3) {
        Some(v) => to_bool(v)?,
        None => false,
    };

    let matched = if exact {
        find_exact(rows, key)
    } else {
        match to_number(key) {
            Ok(key_num) => find_floor(rows, key_num),
            // A non-numeric key degrades to exact matching.
            Err(_) => find_exact(rows, key),
        }
    };

    let record = matched.ok_or(ErrorKind::NA)?;
    record
        .values()
        .nth(col as usize - 1)
        .cloned()
        .ok_or(ErrorKind::Ref)
}

fn first_field(record: &Record) -> Option<&Value> {
    record.values().next()
}

fn find_exact<'a>(rows: &'a [Value], key: &Value) -> Option<&'a Record> {
    rows.iter().find_map(|row| match row {
        Value::Record(fields) if first_field(fields).is_some_and(|v| loose_eq(v, key)) => {
            Some(fields)
        }
        _ => None,
    })
}

fn find_floor(rows: &[Value], key: f64) -> Option<&Record> {
    let mut best: Option<(f64, &Record)> = None;
    for row in rows {
        let Value::Record(fields) = row else { continue };
        let Some(first) = first_field(fields) else { continue };
        let Ok(n) = to_number(first) else { continue };
        if n <= key && best.map_or(true, |(b, _)| n > b) {
            best = Some((n, fields));
        }
    }
    best.map(|(_, fields)| fields)
}

inventory::submit! {
    FunctionSpec {
        name: "UNIQUE",
        min_args: 1,
        max_args: VAR_ARGS,
        implementation: unique_fn,
    }
}

/// Deep-flatten, then deduplicate preserving first-seen order. Returns a
/// fresh sequence; inputs are never mutated.
fn unique_fn(ctx: &dyn FunctionContext, args: &[Expr]) -> Result<Value, ErrorKind> {
    let elements = flattened_args(ctx, args)?;
    let mut out: Vec<Value> = Vec::with_capacity(elements.len());
    for element in elements {
        if !out.iter().any(|seen| loose_eq(seen, &element)) {
            out.push(element);
        }
    }
    Ok(Value::List(out))
}
