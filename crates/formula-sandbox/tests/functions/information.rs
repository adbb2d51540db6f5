use formula_sandbox::{Params, Value};
use pretty_assertions::assert_eq;

use crate::harness::{eval, eval_with};

#[test]
fn isblank_accepts_null_and_whitespace_strings() {
    let params = Params::new().with("n", Value::Null);
    assert_eq!(eval_with("ISBLANK(@n)", &params), Ok(Value::Bool(true)));
    assert_eq!(eval("ISBLANK(\"   \")"), Ok(Value::Bool(true)));
    assert_eq!(eval("ISBLANK(\"\")"), Ok(Value::Bool(true)));
    assert_eq!(eval("ISBLANK(\"x\")"), Ok(Value::Bool(false)));
    assert_eq!(eval("ISBLANK(0)"), Ok(Value::Bool(false)));
}

#[test]
fn isnumber_accepts_numbers_and_fully_numeric_strings() {
    assert_eq!(eval("ISNUMBER(42)"), Ok(Value::Bool(true)));
    assert_eq!(eval("ISNUMBER(\"42.5\")"), Ok(Value::Bool(true)));
    assert_eq!(eval("ISNUMBER(\" -3 \")"), Ok(Value::Bool(true)));
    assert_eq!(eval("ISNUMBER(\"42px\")"), Ok(Value::Bool(false)));
    assert_eq!(eval("ISNUMBER(true)"), Ok(Value::Bool(false)));

    let params = Params::new().with("n", Value::Null);
    assert_eq!(eval_with("ISNUMBER(@n)", &params), Ok(Value::Bool(false)));
}
