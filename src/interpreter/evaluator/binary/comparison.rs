use std::cmp::Ordering;

use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::value::core::Value,
};

/// Evaluates a comparison, producing `pass` or `fail`.
///
/// Operands are reconciled by the additive rule (the right side converts
/// into the left side's unit), so `1000 m == 1 km` passes and comparing
/// non-convertible dimensions is an error. Strings, paths and `na`
/// compare structurally under `==`/`!=`.
pub fn eval_comparison(op: BinaryOperator,
                       left: &Value,
                       right: &Value,
                       line: usize)
                       -> Result<Value, RuntimeError> {
    use BinaryOperator::{Equal, Greater, GreaterEqual, Less, LessEqual, NotEqual};

    let result = match op {
        Equal | NotEqual => {
            let equal = values_equal(left, right, line)?;
            if op == Equal { equal } else { !equal }
        },
        Less | Greater | LessEqual | GreaterEqual => {
            let ordering = left.as_quantity(line)?.compare(&right.as_quantity(line)?, line)?;
            match op {
                Less => ordering == Ordering::Less,
                Greater => ordering == Ordering::Greater,
                LessEqual => ordering != Ordering::Greater,
                GreaterEqual => ordering != Ordering::Less,
                _ => unreachable!(),
            }
        },
        _ => unreachable!("not a comparison operator"),
    };
    Ok(Value::Bool(result))
}

fn values_equal(left: &Value, right: &Value, line: usize) -> Result<bool, RuntimeError> {
    match (left, right) {
        (Value::Quantity(_) | Value::Bool(_), Value::Quantity(_) | Value::Bool(_)) => {
            let ordering = left.as_quantity(line)?.compare(&right.as_quantity(line)?, line)?;
            Ok(ordering == Ordering::Equal)
        },
        _ => Ok(left == right),
    }
}
