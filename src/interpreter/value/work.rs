use std::rc::Rc;

use crate::{
    ast::Body,
    error::RuntimeError,
    interpreter::{env::Env, value::core::Value},
};

/// A user-defined work: parameters, a body, and the captured definition
/// scope.
///
/// The closure holds the frame chain that was current at definition time,
/// so recursive works resolve their own name through it and counters keep
/// mutating the same cells across calls.
#[derive(Debug)]
pub struct Work {
    pub name:    String,
    pub params:  Vec<String>,
    pub body:    Body,
    pub closure: Rc<Env>,
    pub line:    usize,
}

/// A built-in work implemented natively.
#[derive(Debug, Clone, Copy)]
pub struct NativeWork {
    pub name:  &'static str,
    pub arity: usize,
    pub func:  fn(&[Value], usize) -> Result<Value, RuntimeError>,
}

impl PartialEq for NativeWork {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}
