//! Expression evaluator.
//!
//! Walks the parsed tree top-down. Every node yields exactly one value or
//! raises exactly one [`ErrorKind`]; errors bubble unchanged until an
//! enclosing `IFERROR` catches them or they reach the caller. Parameter
//! references resolve lazily to the raw bound value, and the consuming
//! operator or function's contract drives coercion, so `@x + @y` coerces
//! numerically while `SUM(@arr)` receives the sequence intact.

use std::cmp::Ordering;

use crate::coercion::{loose_eq, to_bool, to_number};
use crate::functions::{self, FunctionContext, FunctionRegistry};
use crate::params::Params;
use crate::parser::{BinaryOp, Expr, UnaryOp};
use crate::value::{ErrorKind, Value};

pub struct Evaluator<'a> {
    params: &'a Params,
    registry: Option<&'a FunctionRegistry>,
}

impl<'a> Evaluator<'a> {
    pub fn new(params: &'a Params, registry: Option<&'a FunctionRegistry>) -> Self {
        Self { params, registry }
    }

    pub fn eval(&self, expr: &Expr) -> Result<Value, ErrorKind> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::ParamRef(name) => self.params.resolve(name).cloned(),
            Expr::Unary { op, expr } => {
                let value = self.eval(expr)?;
                match op {
                    UnaryOp::Neg => Ok(Value::Number(-to_number(&value)?)),
                    UnaryOp::Not => Ok(Value::Bool(!to_bool(&value)?)),
                }
            }
            Expr::Binary { op, left, right } => self.eval_binary(*op, left, right),
            Expr::Call { name, args } => {
                functions::call_function(self, self.registry, name, args)
            }
            Expr::IfError { inner, fallback } => {
                // Any error raised anywhere in the protected subtree is
                // replaced by the fallback literal.
                Ok(self
                    .eval(inner)
                    .unwrap_or_else(|_| Value::Text(fallback.clone())))
            }
        }
    }

    fn eval_binary(&self, op: BinaryOp, left: &Expr, right: &Expr) -> Result<Value, ErrorKind> {
        // Boolean operators short-circuit on the left operand.
        match op {
            BinaryOp::And => {
                if !to_bool(&self.eval(left)?)? {
                    return Ok(Value::Bool(false));
                }
                return Ok(Value::Bool(to_bool(&self.eval(right)?)?));
            }
            BinaryOp::Or => {
                if to_bool(&self.eval(left)?)? {
                    return Ok(Value::Bool(true));
                }
                return Ok(Value::Bool(to_bool(&self.eval(right)?)?));
            }
            _ => {}
        }

        let l = self.eval(left)?;
        let r = self.eval(right)?;

        match op {
            BinaryOp::Eq => Ok(Value::Bool(loose_eq(&l, &r))),
            BinaryOp::Ne => Ok(Value::Bool(!loose_eq(&l, &r))),
            BinaryOp::Lt => Ok(Value::Bool(compare(&l, &r)? == Some(Ordering::Less))),
            BinaryOp::Le => Ok(Value::Bool(matches!(
                compare(&l, &r)?,
                Some(Ordering::Less | Ordering::Equal)
            ))),
            BinaryOp::Gt => Ok(Value::Bool(compare(&l, &r)? == Some(Ordering::Greater))),
            BinaryOp::Ge => Ok(Value::Bool(matches!(
                compare(&l, &r)?,
                Some(Ordering::Greater | Ordering::Equal)
            ))),
            BinaryOp::Add => Ok(Value::Number(to_number(&l)? + to_number(&r)?)),
            BinaryOp::Sub => Ok(Value::Number(to_number(&l)? - to_number(&r)?)),
            BinaryOp::Mul => Ok(Value::Number(to_number(&l)? * to_number(&r)?)),
            BinaryOp::Div => {
                let ln = to_number(&l)?;
                let rn = to_number(&r)?;
                if rn == 0.0 {
                    return Err(ErrorKind::Div0);
                }
                Ok(Value::Number(ln / rn))
            }
            BinaryOp::Rem => {
                let ln = to_number(&l)?;
                let rn = to_number(&r)?;
                if rn == 0.0 {
                    return Err(ErrorKind::Div0);
                }
                // The operator keeps the dividend's sign; the MOD builtin
                // follows the divisor instead.
                Ok(Value::Number(ln % rn))
            }
            BinaryOp::Pow => {
                let base = to_number(&l)?;
                let exp = to_number(&r)?;
                Ok(Value::Number(functions::power(base, exp)?))
            }
            BinaryOp::And | BinaryOp::Or => unreachable!("handled above"),
        }
    }
}

impl FunctionContext for Evaluator<'_> {
    fn eval_arg(&self, expr: &Expr) -> Result<Value, ErrorKind> {
        self.eval(expr)
    }
}

/// Relational ordering: both strings compare lexicographically; otherwise
/// both operands must coerce numerically. `None` means incomparable
/// (NaN involved); every relational test on it is false.
fn compare(left: &Value, right: &Value) -> Result<Option<Ordering>, ErrorKind> {
    if let (Value::Text(a), Value::Text(b)) = (left, right) {
        return Ok(Some(a.cmp(b)));
    }
    let a = to_number(left)?;
    let b = to_number(right)?;
    Ok(a.partial_cmp(&b))
}
