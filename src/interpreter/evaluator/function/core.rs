use std::rc::Rc;

use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{
        env::Env,
        evaluator::core::{EvalResult, Interpreter, Interrupt},
        value::{core::Value, work::Work},
    },
};

impl Interpreter {
    /// Evaluates a call expression.
    ///
    /// The callee must evaluate to a work. Arguments are evaluated left to
    /// right, arity is checked, and user works run their body in a fresh
    /// frame extending the definition-time closure. A `submit` inside the
    /// body unwinds to here; without one the body's last value is
    /// returned.
    pub(crate) fn eval_call(&mut self,
                            callee: &Expr,
                            arguments: &[Expr],
                            line: usize)
                            -> EvalResult<Value> {
        let callee = self.eval(callee)?;

        let mut args = Vec::with_capacity(arguments.len());
        for argument in arguments {
            args.push(self.eval(argument)?);
        }

        match callee {
            Value::Work(work) => self.call_work(&work, args, line),
            Value::Native(native) => {
                if args.len() != native.arity {
                    return Err(RuntimeError::ArityError { expected: native.arity,
                                                          found: args.len(),
                                                          line }.into());
                }
                Ok((native.func)(&args, line)?)
            },
            other => Err(RuntimeError::TypeError { details: format!("call to non-work value \
                                                                     ({})",
                                                                    other.kind()),
                                                   line }.into()),
        }
    }

    fn call_work(&mut self, work: &Rc<Work>, args: Vec<Value>, line: usize) -> EvalResult<Value> {
        if args.len() != work.params.len() {
            return Err(RuntimeError::ArityError { expected: work.params.len(),
                                                  found: args.len(),
                                                  line }.into());
        }

        let frame = Env::child(Rc::clone(&work.closure));
        for (param, arg) in work.params.iter().zip(args) {
            frame.define(param, arg);
        }

        let result = self.with_env(frame, |me| me.run_block(&work.body.stmts));
        match result {
            Ok(value) => Ok(value.unwrap_or(Value::Na)),
            Err(Interrupt::Submit(value)) => Ok(value),
            Err(failure) => Err(failure),
        }
    }
}
