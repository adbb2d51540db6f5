use formula_sandbox::{ErrorKind, Params, Value};
use pretty_assertions::assert_eq;

use crate::harness::{eval_with, record};

fn lookup_table() -> Value {
    Value::List(vec![
        record(&[("k", Value::Text("a".into())), ("v", Value::Number(1.0))]),
        record(&[("k", Value::Text("b".into())), ("v", Value::Number(2.0))]),
        record(&[("k", Value::Text("c".into())), ("v", Value::Number(3.0))]),
    ])
}

fn tier_table() -> Value {
    Value::List(vec![
        record(&[("min", Value::Number(0.0)), ("name", Value::Text("bronze".into()))]),
        record(&[("min", Value::Number(100.0)), ("name", Value::Text("silver".into()))]),
        record(&[("min", Value::Number(500.0)), ("name", Value::Text("gold".into()))]),
    ])
}

#[test]
fn index_selects_one_based_rows() {
    let params = Params::new().with("arr", vec![10.0, 20.0, 30.0]);
    assert_eq!(eval_with("INDEX(@arr, 1)", &params), Ok(Value::Number(10.0)));
    assert_eq!(eval_with("INDEX(@arr, 3)", &params), Ok(Value::Number(30.0)));
    assert_eq!(eval_with("INDEX(@arr, 0)", &params), Err(ErrorKind::Ref));
    assert_eq!(eval_with("INDEX(@arr, 4)", &params), Err(ErrorKind::Ref));
}

#[test]
fn index_col_selects_within_rows() {
    let rows = Value::List(vec![
        Value::List(vec![Value::Number(1.0), Value::Number(2.0)]),
        Value::List(vec![Value::Number(3.0), Value::Number(4.0)]),
    ]);
    let params = Params::new().with("rows", rows).with("t", lookup_table());

    assert_eq!(eval_with("INDEX(@rows, 2, 1)", &params), Ok(Value::Number(3.0)));
    assert_eq!(eval_with("INDEX(@rows, 1, 2)", &params), Ok(Value::Number(2.0)));
    assert_eq!(eval_with("INDEX(@rows, 1, 3)", &params), Err(ErrorKind::Ref));

    // Numeric col walks a record's insertion order; a string col is a key.
    assert_eq!(eval_with("INDEX(@t, 2, 2)", &params), Ok(Value::Number(2.0)));
    assert_eq!(
        eval_with("INDEX(@t, 2, \"k\")", &params),
        Ok(Value::Text("b".into()))
    );
    assert_eq!(eval_with("INDEX(@t, 2, \"nope\")", &params), Err(ErrorKind::Ref));
}

#[test]
fn index_wraps_scalar_params_in_singletons() {
    let params = Params::new().with("x", 42.0);
    assert_eq!(eval_with("INDEX(@x, 1)", &params), Ok(Value::Number(42.0)));
    assert_eq!(eval_with("INDEX(@x, 2)", &params), Err(ErrorKind::Ref));
}

#[test]
fn vlookup_exact_match() {
    let params = Params::new().with("t", lookup_table());
    assert_eq!(
        eval_with("VLOOKUP(\"b\", @t, 2, true)", &params),
        Ok(Value::Number(2.0))
    );
    assert_eq!(
        eval_with("VLOOKUP(\"z\", @t, 2, true)", &params),
        Err(ErrorKind::NA)
    );
    // Column index past the record width.
    assert_eq!(
        eval_with("VLOOKUP(\"b\", @t, 3, true)", &params),
        Err(ErrorKind::Ref)
    );
}

#[test]
fn vlookup_approximate_takes_floor_record() {
    let params = Params::new().with("t", tier_table());
    assert_eq!(
        eval_with("VLOOKUP(250, @t, 2, false)", &params),
        Ok(Value::Text("silver".into()))
    );
    assert_eq!(
        eval_with("VLOOKUP(500, @t, 2, false)", &params),
        Ok(Value::Text("gold".into()))
    );
    assert_eq!(
        eval_with("VLOOKUP(0 - 1, @t, 2, false)", &params),
        Err(ErrorKind::NA)
    );
    // The flag defaults to approximate when omitted.
    assert_eq!(
        eval_with("VLOOKUP(99, @t, 2)", &params),
        Ok(Value::Text("bronze".into()))
    );
}

#[test]
fn vlookup_requires_a_record_sequence() {
    let params = Params::new().with("arr", vec![1.0, 2.0]);
    assert_eq!(
        eval_with("VLOOKUP(1, @arr, 1, true)", &params),
        Err(ErrorKind::Value)
    );
}

#[test]
fn unique_preserves_first_seen_order() {
    let params = Params::new().with(
        "arr",
        Value::List(vec![
            Value::Number(3.0),
            Value::Number(1.0),
            Value::Number(3.0),
            Value::Text("a".into()),
            Value::Number(1.0),
            Value::Text("a".into()),
        ]),
    );
    assert_eq!(
        eval_with("UNIQUE(@arr)", &params),
        Ok(Value::List(vec![
            Value::Number(3.0),
            Value::Number(1.0),
            Value::Text("a".into()),
        ]))
    );

    // Deep-flattens before deduplicating, and never mutates its input.
    let nested = Value::List(vec![
        Value::List(vec![Value::Number(1.0), Value::Number(2.0)]),
        Value::List(vec![Value::Number(2.0), Value::Number(3.0)]),
    ]);
    let params = Params::new().with("arr", nested.clone());
    assert_eq!(
        eval_with("UNIQUE(@arr)", &params),
        Ok(Value::List(vec![
            Value::Number(1.0),
            Value::Number(2.0),
            Value::Number(3.0),
        ]))
    );
    assert_eq!(params.get("arr"), Some(&nested));
}
