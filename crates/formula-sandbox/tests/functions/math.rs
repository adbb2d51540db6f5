use formula_sandbox::{ErrorKind, Params, Value};
use pretty_assertions::assert_eq;

use crate::harness::{assert_nan, assert_number, eval, eval_with};

#[test]
fn sum_adds_scalars_and_flattens_sequences() {
    assert_number("SUM(1, 2, 3, 4, 5)", 15.0);
    assert_number("SUM()", 0.0);

    let params = Params::new().with("arr", vec![1.0, 2.0, 3.0]);
    assert_eq!(eval_with("SUM(@arr)", &params), Ok(Value::Number(6.0)));

    // Nested sequences flatten.
    let nested = Value::List(vec![
        Value::Number(1.0),
        Value::List(vec![Value::Number(2.0), Value::Number(3.0)]),
    ]);
    let params = Params::new().with("arr", nested);
    assert_eq!(eval_with("SUM(@arr, 4)", &params), Ok(Value::Number(10.0)));
}

#[test]
fn sum_coerces_scalar_args_but_skips_nonnumeric_sequence_elements() {
    // Scalar arguments coerce, and raise on failure.
    assert_number("SUM(\"3\", true)", 4.0);
    assert_eq!(eval("SUM(\"abc\")"), Err(ErrorKind::Value));

    // Sequence elements contribute only when numeric-typed.
    let mixed = Value::List(vec![
        Value::Number(1.0),
        Value::Text("abc".into()),
        Value::Null,
        Value::Bool(true),
        Value::Number(2.0),
    ]);
    let params = Params::new().with("arr", mixed);
    assert_eq!(eval_with("SUM(@arr)", &params), Ok(Value::Number(3.0)));
}

#[test]
fn average_of_sequence_param() {
    let params = Params::new().with("data", vec![10.0, 20.0, 30.0]);
    assert_eq!(eval_with("AVERAGE(@data)", &params), Ok(Value::Number(20.0)));
}

#[test]
fn average_and_max_poison_to_nan_on_uncoercible_elements() {
    let mixed = Value::List(vec![Value::Number(1.0), Value::Text("x".into())]);
    let params = Params::new().with("arr", mixed);
    assert_nan("AVERAGE(@arr)", &params);
    assert_nan("MAX(@arr)", &params);

    // Nulls are filtered, not poisoned.
    let with_null = Value::List(vec![Value::Number(4.0), Value::Null, Value::Number(6.0)]);
    let params = Params::new().with("arr", with_null);
    assert_eq!(eval_with("AVERAGE(@arr)", &params), Ok(Value::Number(5.0)));
    assert_eq!(eval_with("MAX(@arr)", &params), Ok(Value::Number(6.0)));
}

#[test]
fn empty_and_all_null_aggregates_are_nan() {
    let empty = Params::new().with("arr", Value::List(vec![]));
    assert_nan("AVERAGE(@arr)", &empty);
    assert_nan("MAX(@arr)", &empty);
    assert_nan("MIN(@arr)", &empty);

    let nulls = Params::new().with("arr", Value::List(vec![Value::Null, Value::Null]));
    assert_nan("AVERAGE(@arr)", &nulls);
    assert_nan("MAX(@arr)", &nulls);
    assert_nan("MIN(@arr)", &nulls);
}

#[test]
fn min_raises_on_uncoercible_but_filters_nulls() {
    let mixed = Value::List(vec![Value::Number(3.0), Value::Text("x".into())]);
    let params = Params::new().with("arr", mixed);
    assert_eq!(eval_with("MIN(@arr)", &params), Err(ErrorKind::Value));

    let with_null = Value::List(vec![Value::Null, Value::Number(7.0), Value::Number(2.0)]);
    let params = Params::new().with("arr", with_null);
    assert_eq!(eval_with("MIN(@arr)", &params), Ok(Value::Number(2.0)));

    // Numeric strings coerce.
    let coercible = Value::List(vec![Value::Text("5".into()), Value::Number(9.0)]);
    let params = Params::new().with("arr", coercible);
    assert_eq!(eval_with("MIN(@arr)", &params), Ok(Value::Number(5.0)));
}

#[test]
fn count_counts_numeric_elements_only_counta_counts_non_null() {
    let mixed = Value::List(vec![
        Value::Number(1.0),
        Value::Text("2".into()),
        Value::Bool(true),
        Value::Null,
        Value::Number(3.0),
    ]);
    let params = Params::new().with("arr", mixed);
    assert_eq!(eval_with("COUNT(@arr)", &params), Ok(Value::Number(2.0)));
    assert_eq!(eval_with("COUNTA(@arr)", &params), Ok(Value::Number(4.0)));
}

#[test]
fn round_is_half_away_from_zero() {
    assert_number("ROUND(2.5, 0)", 3.0);
    assert_number("ROUND(0 - 2.5, 0)", -3.0);
    assert_number("ROUND(2.44, 1)", 2.4);
    assert_number("ROUND(3.75, 1)", 3.8);
    // Negative digits round to powers of ten.
    assert_number("ROUND(1250, 0 - 2)", 1300.0);
    assert_number("ROUND(1249, 0 - 2)", 1200.0);
}

#[test]
fn abs_int_sqrt_power() {
    assert_number("ABS(0 - 42.5)", 42.5);
    assert_number("INT(2.9)", 2.0);
    assert_number("INT(0 - 2.9)", -2.0);
    assert_number("SQRT(9)", 3.0);
    assert_eq!(eval("SQRT(0 - 1)"), Err(ErrorKind::Num));
    assert_number("POWER(2, 10)", 1024.0);
    assert_eq!(eval("POWER(0, 0 - 2)"), Err(ErrorKind::Num));
}

#[test]
fn mod_sign_follows_divisor() {
    assert_number("MOD(7, 3)", 1.0);
    assert_number("MOD(0 - 7, 3)", 2.0);
    assert_number("MOD(7, 0 - 3)", -2.0);
    assert_eq!(eval("MOD(1, 0)"), Err(ErrorKind::Div0));
}

#[test]
fn variadic_aggregates_are_flatten_idempotent() {
    let flat = Params::new().with("a", 1.0).with("b", 2.0);
    let one_level = Params::new().with("ab", vec![1.0, 2.0]);
    let nested = Params::new().with(
        "ab",
        Value::List(vec![
            Value::List(vec![Value::Number(1.0)]),
            Value::List(vec![Value::Number(2.0)]),
        ]),
    );

    for (src_flat, src_list) in [
        ("SUM(@a, @b)", "SUM(@ab)"),
        ("MAX(@a, @b)", "MAX(@ab)"),
        ("COUNT(@a, @b)", "COUNT(@ab)"),
    ] {
        let direct = eval_with(src_flat, &flat).unwrap();
        assert_eq!(eval_with(src_list, &one_level).unwrap(), direct, "{src_list}");
        assert_eq!(eval_with(src_list, &nested).unwrap(), direct, "{src_list} nested");
    }
}
