use crate::{
    ast::{Body, Expr},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        value::{core::Value, number::ChNumber, quantity::Quantity},
    },
};

impl Interpreter {
    /// Evaluates a `during` loop: the body repeats while the condition
    /// stays truthy. The loop runs in one child scope; a runaway
    /// condition is the user's problem.
    pub(crate) fn eval_during(&mut self, cond: &Expr, body: &Body) -> EvalResult<Option<Value>> {
        self.scoped(|me| {
                while me.eval(cond)?.is_truthy() {
                    me.run_block(&body.stmts)?;
                }
                Ok(None)
            })
    }

    /// Evaluates a `redo x of a ... b` loop. Each iteration binds the loop
    /// variable to the next integer in its own frame, so closures created
    /// in the body capture distinct cells.
    pub(crate) fn eval_redo(&mut self,
                            var: &str,
                            interval: &Expr,
                            body: &Body,
                            line: usize)
                            -> EvalResult<Option<Value>> {
        let value = self.eval(interval)?;
        let Value::Interval { start, end } = value else {
            return Err(RuntimeError::TypeError { details: format!("'redo … of' needs an \
                                                                   interval, found {}",
                                                                  value.kind()),
                                                 line }.into());
        };

        self.scoped(|me| {
                for i in start..end {
                    me.scoped(|inner| {
                           inner.env.define(var, Value::Quantity(Quantity::scalar(i.into())));
                           inner.run_block(&body.stmts)
                       })?;
                }
                Ok(None)
            })
    }

    /// Evaluates `a ... b` into a half-open integer interval. Both
    /// endpoints must be dimensionless scalars; they are floored.
    pub(crate) fn eval_interval(&mut self,
                                start: &Expr,
                                end: &Expr,
                                line: usize)
                                -> EvalResult<Value> {
        let start = self.eval(start)?;
        let end = self.eval(end)?;
        Ok(Value::Interval { start: interval_bound(&start, line)?,
                             end:   interval_bound(&end, line)?, })
    }
}

fn interval_bound(value: &Value, line: usize) -> Result<i64, RuntimeError> {
    let quantity = value.as_quantity(line)?;
    if !quantity.is_scalar() {
        return Err(RuntimeError::TypeError { details: format!("interval bounds must be \
                                                               dimensionless scalars, found \
                                                               {quantity}"),
                                             line });
    }
    let floored = ChNumber::exact(quantity.number.value.floor());
    floored.to_i64()
           .ok_or_else(|| RuntimeError::TypeError { details: "interval bound is too large"
                                                                 .to_string(),
                                                    line })
}
