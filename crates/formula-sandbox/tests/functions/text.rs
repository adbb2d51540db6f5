use formula_sandbox::{ErrorKind, Params, Value};
use pretty_assertions::assert_eq;

use crate::harness::{eval, eval_with};

fn assert_text(src: &str, expected: &str) {
    assert_eq!(eval(src), Ok(Value::Text(expected.into())), "{src}");
}

#[test]
fn concat_flattens_and_stringifies() {
    assert_text("CONCAT(\"a\", \"b\", \"c\")", "abc");
    assert_text("CONCAT(\"x=\", 1.5, \" \", true)", "x=1.5 true");
    assert_text("CONCAT()", "");

    // Null stringifies to the empty string in CONCAT only.
    let params = Params::new().with("n", Value::Null);
    assert_eq!(
        eval_with("CONCAT(\"a\", @n, \"b\")", &params),
        Ok(Value::Text("ab".into()))
    );

    // Sequences flatten before joining.
    let params = Params::new().with("arr", vec!["a", "b"]);
    assert_eq!(
        eval_with("CONCAT(@arr, \"c\")", &params),
        Ok(Value::Text("abc".into()))
    );
}

#[test]
fn left_right_take_optional_counts() {
    assert_text("LEFT(\"hello\", 2)", "he");
    assert_text("LEFT(\"hello\")", "h");
    assert_text("RIGHT(\"hello\", 2)", "lo");
    assert_text("RIGHT(\"hello\")", "o");
    // Counts clamp to the string bounds.
    assert_text("LEFT(\"hi\", 10)", "hi");
    assert_text("RIGHT(\"hi\", 10)", "hi");
    // Negative counts and non-string subjects are errors.
    assert_eq!(eval("LEFT(\"hi\", 0 - 1)"), Err(ErrorKind::Value));
    assert_eq!(eval("LEFT(5, 1)"), Err(ErrorKind::Value));
}

#[test]
fn mid_is_one_based_and_clamps() {
    assert_text("MID(\"hello\", 2, 3)", "ell");
    assert_text("MID(\"hello\", 4, 10)", "lo");
    assert_text("MID(\"hello\", 6, 1)", "");
    assert_eq!(eval("MID(\"hello\", 0, 1)"), Err(ErrorKind::Value));
    assert_eq!(eval("MID(5, 1, 1)"), Err(ErrorKind::Value));
}

#[test]
fn trim_strips_outer_whitespace() {
    assert_text("TRIM(\"  john doe  \")", "john doe");
    assert_text("TRIM(\"none\")", "none");
    assert_eq!(eval("TRIM(5)"), Err(ErrorKind::Value));
}

#[test]
fn upper_lower_are_lenient_on_non_strings() {
    assert_text("UPPER(\"abc\")", "ABC");
    assert_text("LOWER(\"ABC\")", "abc");
    assert_text("UPPER(5)", "");
    assert_text("LOWER(true)", "");
}

#[test]
fn proper_title_cases_words() {
    // These fixtures title-case identically under every locale, so they
    // hold regardless of the machine's LANG.
    assert_text("PROPER(\"john doe\")", "John Doe");
    assert_text("PROPER(\"JOHN-PAUL o'brien\")", "John-Paul O'Brien");
    assert_text("PROPER(TRIM(\"  john doe  \"))", "John Doe");
    assert_eq!(eval("PROPER(5)"), Err(ErrorKind::Value));
}

#[test]
fn proper_locale_can_be_pinned() {
    use formula_sandbox::locale::{set_proper_locale, CasingLocale};

    set_proper_locale(Some(CasingLocale::new("tr_TR.UTF-8")));
    assert_text("PROPER(\"istanbul\")", "İstanbul");

    set_proper_locale(Some(CasingLocale::invariant()));
    assert_text("PROPER(\"istanbul\")", "Istanbul");

    // Back to process-locale behavior.
    set_proper_locale(None);
}

#[test]
fn len_counts_chars_strictly() {
    assert_eq!(eval("LEN(\"hello\")"), Ok(Value::Number(5.0)));
    assert_eq!(eval("LEN(\"\")"), Ok(Value::Number(0.0)));
    assert_eq!(eval("LEN(12345)"), Err(ErrorKind::Value));
}

#[test]
fn replace_substitutes_every_occurrence() {
    assert_text("REPLACE(\"a-b-c\", \"-\", \"+\")", "a+b+c");
    assert_text("REPLACE(\"aaa\", \"a\", \"b\")", "bbb");
    assert_text("REPLACE(\"abc\", \"\", \"x\")", "abc");
    assert_eq!(eval("REPLACE(\"abc\", 1, \"x\")"), Err(ErrorKind::Value));

    let params = Params::new().with("n", Value::Null);
    assert_eq!(
        eval_with("REPLACE(\"abc\", @n, \"x\")", &params),
        Err(ErrorKind::Value)
    );
    assert_eq!(
        eval_with("REPLACE(\"abc\", \"a\", @n)", &params),
        Err(ErrorKind::Value)
    );
}
