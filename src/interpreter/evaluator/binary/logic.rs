use crate::{
    ast::{BinaryOperator, Expr},
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        value::core::Value,
    },
};

impl Interpreter {
    /// Evaluates `&&` and `||`.
    ///
    /// Short-circuits left to right and returns the deciding operand
    /// itself, so `fail || 3` is `3` and `na && x` is `na` without `x`
    /// ever being evaluated.
    pub(crate) fn eval_logic(&mut self,
                             op: BinaryOperator,
                             left: &Expr,
                             right: &Expr)
                             -> EvalResult<Value> {
        let left = self.eval(left)?;

        match op {
            BinaryOperator::And => {
                if left.is_truthy() { self.eval(right) } else { Ok(left) }
            },
            BinaryOperator::Or => {
                if left.is_truthy() { Ok(left) } else { self.eval(right) }
            },
            _ => unreachable!("not a logical operator"),
        }
    }
}
