use crate::{
    ast::{BinaryOperator, Expr},
    interpreter::{
        evaluator::{
            binary::{arith, comparison},
            core::{EvalResult, Interpreter},
        },
        value::core::Value,
    },
};

impl Interpreter {
    /// Evaluates a binary operation.
    ///
    /// Logical operators receive the unevaluated right operand so they can
    /// short-circuit; everything else evaluates both sides and dispatches
    /// to arithmetic, power or comparison handling.
    pub(crate) fn eval_binary(&mut self,
                              left: &Expr,
                              op: BinaryOperator,
                              right: &Expr,
                              line: usize)
                              -> EvalResult<Value> {
        use BinaryOperator::{
            Add, And, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mod, Mul, NotEqual, Or,
            Pow, Sub,
        };

        if matches!(op, And | Or) {
            return self.eval_logic(op, left, right);
        }

        let left = self.eval(left)?;
        let right = self.eval(right)?;

        let result = match op {
            Add | Sub | Mul | Div | Mod => arith::eval_arith(op, &left, &right, line)?,
            Pow => {
                let base = left.as_quantity(line)?;
                let exponent = right.as_quantity(line)?;
                Value::Quantity(base.pow(&exponent, line)?)
            },
            Less | Greater | LessEqual | GreaterEqual | Equal | NotEqual => {
                comparison::eval_comparison(op, &left, &right, line)?
            },
            And | Or => unreachable!("handled above"),
        };
        Ok(result)
    }
}
