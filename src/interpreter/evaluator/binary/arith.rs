use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::value::core::Value,
};

/// Evaluates an arithmetic operation.
///
/// String concatenation is the one non-numeric case; everything else
/// coerces to quantities and runs through the quantity semantics (unit
/// reconciliation, sig-fig propagation, formula rules).
pub fn eval_arith(op: BinaryOperator,
                  left: &Value,
                  right: &Value,
                  line: usize)
                  -> Result<Value, RuntimeError> {
    use BinaryOperator::{Add, Div, Mod, Mul, Sub};

    if let (Add, Value::Str(a), Value::Str(b)) = (op, left, right) {
        return Ok(Value::Str(format!("{a}{b}")));
    }

    let left = left.as_quantity(line)?;
    let right = right.as_quantity(line)?;

    let result = match op {
        Add => left.add(&right, line)?,
        Sub => left.sub(&right, line)?,
        Mul => left.mul(&right, line)?,
        Div => left.div(&right, line)?,
        Mod => left.rem(&right, line)?,
        _ => unreachable!("not an arithmetic operator"),
    };
    Ok(Value::Quantity(result))
}
