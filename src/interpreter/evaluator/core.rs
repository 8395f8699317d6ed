use std::{fs::OpenOptions, io::Write as _, path::Path, rc::Rc};

use crate::{
    ast::{Body, Expr, LiteralValue, Stmt},
    error::RuntimeError,
    interpreter::{
        env::Env,
        evaluator::function::builtin,
        parser::statement::parse_program,
        scanner,
        value::{
            core::Value,
            number::ChNumber,
            quantity::Quantity,
            string::{ChString, Segment},
            unit,
            work::Work,
        },
    },
};

/// Non-local exits of evaluation: a runtime failure, or a `submit`
/// unwinding to the nearest work call.
#[derive(Debug)]
pub enum Interrupt {
    /// `submit` carrying its value up to the active work call.
    Submit(Value),
    /// A runtime error aborting the current top-level statement.
    Failure(RuntimeError),
}

impl From<RuntimeError> for Interrupt {
    fn from(error: RuntimeError) -> Self {
        Self::Failure(error)
    }
}

/// Result type used by the evaluator.
pub type EvalResult<T> = Result<T, Interrupt>;

/// The interpreter state: the current scope chain.
///
/// Constructed once and reused across statements (and REPL entries). The
/// root frame is seeded with the native works and the
/// `show_balanced_equation` switch.
pub struct Interpreter {
    pub(crate) env: Rc<Env>,
}

#[allow(clippy::new_without_default)]
impl Interpreter {
    /// Creates an interpreter with a fresh global scope.
    #[must_use]
    pub fn new() -> Self {
        let env = Env::root();
        env.define("show_balanced_equation", Value::Bool(false));
        for native in builtin::NATIVES {
            env.define(native.name, Value::Native(*native));
        }
        Self { env }
    }

    /// Executes a program and returns the last produced value.
    ///
    /// A top-level `submit` ends the program with its value.
    ///
    /// # Errors
    /// The first runtime error aborts execution.
    pub fn execute(&mut self, stmts: &[Stmt]) -> Result<Option<Value>, RuntimeError> {
        match self.run_block(stmts) {
            Ok(value) => Ok(value),
            Err(Interrupt::Submit(value)) => Ok(Some(value)),
            Err(Interrupt::Failure(error)) => Err(error),
        }
    }

    /// Runs statements in the current scope, keeping the last value any of
    /// them produced.
    pub(crate) fn run_block(&mut self, stmts: &[Stmt]) -> EvalResult<Option<Value>> {
        let mut result = None;
        for stmt in stmts {
            if let Some(value) = self.eval_statement(stmt)? {
                result = Some(value);
            }
        }
        Ok(result)
    }

    /// Runs a statement body. Block bodies get their own scope; one-line
    /// bodies run in the enclosing one.
    pub(crate) fn run_body(&mut self, body: &Body) -> EvalResult<Option<Value>> {
        if body.block {
            self.scoped(|me| me.run_block(&body.stmts))
        } else {
            self.run_block(&body.stmts)
        }
    }

    /// Runs `f` inside a fresh child scope.
    pub(crate) fn scoped<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let previous = Rc::clone(&self.env);
        self.env = Env::child(Rc::clone(&previous));
        let result = f(self);
        self.env = previous;
        result
    }

    /// Runs `f` with an explicit environment, used for work calls.
    pub(crate) fn with_env<T>(&mut self, env: Rc<Env>, f: impl FnOnce(&mut Self) -> T) -> T {
        let previous = std::mem::replace(&mut self.env, env);
        let result = f(self);
        self.env = previous;
        result
    }

    fn eval_statement(&mut self, stmt: &Stmt) -> EvalResult<Option<Value>> {
        match stmt {
            Stmt::Expression { expr, .. } => self.eval(expr).map(Some),
            Stmt::Exam { cond, body, otherwise, .. } => {
                if self.eval(cond)?.is_truthy() {
                    self.run_body(body)
                } else if let Some(next) = otherwise {
                    self.eval_statement(next)
                } else {
                    Ok(None)
                }
            },
            Stmt::During { cond, body, .. } => self.eval_during(cond, body),
            Stmt::Redo { var, interval, body, line } => {
                self.eval_redo(var, interval, body, *line)
            },
            Stmt::Work { name, params, body, line } => {
                let work = Rc::new(Work { name:    name.clone(),
                                          params:  params.clone(),
                                          body:    body.clone(),
                                          closure: Rc::clone(&self.env),
                                          line:    *line, });
                self.env.assign(name, Value::Work(Rc::clone(&work)));
                Ok(Some(Value::Work(work)))
            },
            Stmt::Submit { expr, .. } => {
                let value = match expr {
                    Some(expr) => self.eval(expr)?,
                    None => Value::Na,
                };
                Err(Interrupt::Submit(value))
            },
        }
    }

    /// Evaluates an expression.
    ///
    /// This is the central dispatch; operator semantics live in the
    /// sibling modules and on [`Quantity`].
    pub(crate) fn eval(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Literal { value, line } => self.eval_literal(value, *line),
            Expr::Formula { formula, line } => {
                let molar = formula.molar_mass().map_err(|e| {
                                RuntimeError::UnknownElement { symbol: e.to_string(),
                                                               line:   *line, }
                            })?;
                Ok(Value::Quantity(Quantity::new(ChNumber::exact(molar),
                                                 unit::gram_per_mole(),
                                                 Some(formula.clone()))))
            },
            Expr::Variable { name, line } => {
                self.env
                    .lookup(name)
                    .ok_or_else(|| {
                        Interrupt::from(RuntimeError::UnknownIdentifier { name: name.clone(),
                                                                          line: *line, })
                    })
            },
            Expr::Unary { op, expr, line } => {
                let value = self.eval(expr)?;
                Ok(Self::eval_unary(*op, &value, *line)?)
            },
            Expr::Binary { left, op, right, line } => self.eval_binary(left, *op, right, *line),
            Expr::Assign { name, value, .. } => {
                let value = self.eval(value)?;
                self.env.assign(name, value.clone());
                Ok(value)
            },
            Expr::Call { callee, arguments, line } => self.eval_call(callee, arguments, *line),
            Expr::Interval { start, end, line } => self.eval_interval(start, end, *line),
            Expr::Conversion { value, target, reactions, line } => {
                self.eval_conversion(value, target, reactions, *line)
            },
            Expr::Write { expr, path, line } => self.eval_write(expr, path, *line),
        }
    }

    fn eval_literal(&mut self, literal: &LiteralValue, line: usize) -> EvalResult<Value> {
        match literal {
            LiteralValue::Quantity(q) => Ok(Value::Quantity(q.clone())),
            LiteralValue::Str(s) => {
                if s.interpolated {
                    let resolved = self.interpolate(s, line)?;
                    Ok(Value::Str(resolved))
                } else {
                    Ok(Value::Str(s.text.clone()))
                }
            },
            LiteralValue::Path(p) => Ok(Value::Path(p.clone())),
            LiteralValue::Bool(b) => Ok(Value::Bool(*b)),
            LiteralValue::Na => Ok(Value::Na),
        }
    }

    /// Resolves `{expr}` interpolations by scanning, parsing and
    /// evaluating each embedded expression in the current scope.
    fn interpolate(&mut self, string: &ChString, line: usize) -> EvalResult<String> {
        let invalid = |details: String| RuntimeError::TypeError { details, line };

        let mut out = String::new();
        for segment in string.segments().map_err(invalid)? {
            match segment {
                Segment::Literal(text) => out.push_str(&text),
                Segment::Expression(source) => {
                    let tokens = scanner::scan(&source).map_err(|e| {
                                                           invalid(format!("in interpolation: \
                                                                            {e}"))
                                                       })?;
                    let stmts =
                        parse_program(&tokens).map_err(|errors| {
                                                  invalid(format!("in interpolation: {}",
                                                                  errors[0]))
                                              })?;
                    let value = self.run_block(&stmts)?;
                    match value {
                        Some(value) => out.push_str(&value.to_string()),
                        None => out.push_str("na"),
                    }
                },
            }
        }
        Ok(out)
    }

    /// Appends the printed form of the operand to a file, creating it if
    /// absent. The handle is opened and closed per write.
    fn eval_write(&mut self, expr: &Expr, path: &Path, line: usize) -> EvalResult<Value> {
        let value = self.eval(expr)?;

        let failed = || RuntimeError::FileWrite { path: path.display().to_string(),
                                                  line };
        let mut file = OpenOptions::new().append(true)
                                         .create(true)
                                         .open(path)
                                         .map_err(|_| failed())?;
        file.write_all(value.to_string().as_bytes()).map_err(|_| failed())?;
        Ok(value)
    }
}
