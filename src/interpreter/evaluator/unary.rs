use rust_decimal::Decimal;

use crate::{
    ast::UnaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::Interpreter,
        value::{core::Value, number::ChNumber, quantity::Quantity},
    },
};

impl Interpreter {
    /// Evaluates a unary operation.
    ///
    /// Negation and identity act on the magnitude and keep unit and
    /// formula. `!` negates truthiness. `~` is bitwise not, defined only
    /// for integer-valued dimensionless scalars.
    pub(crate) fn eval_unary(op: UnaryOperator,
                             value: &Value,
                             line: usize)
                             -> Result<Value, RuntimeError> {
        match op {
            UnaryOperator::Negate => Ok(Value::Quantity(value.as_quantity(line)?.neg())),
            UnaryOperator::Identity => Ok(Value::Quantity(value.as_quantity(line)?)),
            UnaryOperator::Not => Ok(Value::Bool(!value.is_truthy())),
            UnaryOperator::Invert => {
                let quantity = value.as_quantity(line)?;
                let integer = if quantity.is_scalar() {
                    quantity.number.to_i64()
                } else {
                    None
                };
                let n = integer.ok_or_else(|| RuntimeError::TypeError {
                    details: format!("bad operand for '~': {quantity}"),
                    line,
                })?;
                Ok(Value::Quantity(Quantity::scalar(ChNumber::exact(Decimal::from(!n)))))
            },
        }
    }
}
