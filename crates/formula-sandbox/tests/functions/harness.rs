use formula_sandbox::{evaluate_blocking, ErrorKind, Params, Record, Value};

/// Evaluate with an empty environment.
pub fn eval(src: &str) -> Result<Value, ErrorKind> {
    eval_with(src, &Params::new())
}

pub fn eval_with(src: &str, params: &Params) -> Result<Value, ErrorKind> {
    evaluate_blocking(src, params).map_err(|e| e.kind)
}

pub fn assert_number(src: &str, expected: f64) {
    match eval(src) {
        Ok(Value::Number(n)) => assert!(
            (n - expected).abs() < 1e-9,
            "{src}: expected {expected}, got {n}"
        ),
        other => panic!("{src}: expected number {expected}, got {other:?}"),
    }
}

pub fn assert_nan(src: &str, params: &Params) {
    match eval_with(src, params) {
        Ok(Value::Number(n)) => assert!(n.is_nan(), "{src}: expected NaN, got {n}"),
        other => panic!("{src}: expected NaN, got {other:?}"),
    }
}

pub fn record(pairs: &[(&str, Value)]) -> Value {
    let mut fields = Record::new();
    for (key, value) in pairs {
        fields.insert((*key).to_string(), value.clone());
    }
    Value::Record(fields)
}
