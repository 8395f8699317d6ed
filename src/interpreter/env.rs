use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::interpreter::value::core::Value;

/// A lexical scope frame.
///
/// Frames form a chain through `parent`; closures capture an `Rc` to their
/// definition-time frame and therefore observe later mutations of the same
/// cells. Assignment to a name that is already bound somewhere on the
/// chain mutates that binding in place; assignment to a new name creates a
/// binding in the innermost frame.
#[derive(Debug)]
pub struct Env {
    bindings: RefCell<HashMap<String, Value>>,
    parent:   Option<Rc<Env>>,
}

impl Env {
    /// Creates a root frame with no parent.
    #[must_use]
    pub fn root() -> Rc<Self> {
        Rc::new(Self { bindings: RefCell::new(HashMap::new()),
                       parent:   None, })
    }

    /// Creates a child frame extending `parent`.
    #[must_use]
    pub fn child(parent: Rc<Self>) -> Rc<Self> {
        Rc::new(Self { bindings: RefCell::new(HashMap::new()),
                       parent:   Some(parent), })
    }

    /// Resolves a name, walking outward through the scope chain.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Some(value.clone());
        }
        self.parent.as_ref().and_then(|parent| parent.lookup(name))
    }

    /// Binds or rebinds a name.
    ///
    /// If the name is bound in this frame or any ancestor, that binding is
    /// overwritten; otherwise a new binding is created here.
    pub fn assign(&self, name: &str, value: Value) {
        if self.try_rebind(name, &value) {
            return;
        }
        self.define(name, value);
    }

    fn try_rebind(&self, name: &str, value: &Value) -> bool {
        let mut bindings = self.bindings.borrow_mut();
        if let Some(cell) = bindings.get_mut(name) {
            *cell = value.clone();
            return true;
        }
        drop(bindings);
        self.parent.as_ref().is_some_and(|parent| parent.try_rebind(name, value))
    }

    /// Binds a name in this frame unconditionally, shadowing any outer
    /// binding of the same name.
    pub fn define(&self, name: &str, value: Value) {
        self.bindings.borrow_mut().insert(name.to_string(), value);
    }
}
