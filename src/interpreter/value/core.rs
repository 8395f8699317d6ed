use std::{path::PathBuf, rc::Rc};

use rust_decimal::Decimal;

use crate::{
    error::RuntimeError,
    interpreter::value::{
        number::ChNumber,
        quantity::Quantity,
        work::{NativeWork, Work},
    },
};

/// Represents a runtime value in the interpreter.
///
/// Every number in flight is a [`Quantity`]; there are no separate numeric
/// types. `Bool` is CL's `pass`/`fail` pair, which coerces to the
/// dimensionless quantities 1/0 wherever a number is expected.
#[derive(Debug, Clone)]
pub enum Value {
    /// A quantity: magnitude, unit, optional formula.
    Quantity(Quantity),
    /// `pass` or `fail`; prints as the literal and numerically acts as 1/0.
    Bool(bool),
    /// A resolved string.
    Str(String),
    /// A filesystem path.
    Path(PathBuf),
    /// A user-defined work (closure).
    Work(Rc<Work>),
    /// A built-in work.
    Native(NativeWork),
    /// An evaluated half-open integer interval.
    Interval {
        /// Inclusive lower bound.
        start: i64,
        /// Exclusive upper bound.
        end:   i64,
    },
    /// The absent value `na`.
    Na,
}

impl Value {
    /// Truthiness: nonzero quantities, `pass`, nonempty strings, and every
    /// work/path/interval are truthy; `fail`, zero and `na` are not.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Quantity(q) => q.is_truthy(),
            Self::Bool(b) => *b,
            Self::Str(s) => !s.is_empty(),
            Self::Na => false,
            Self::Path(_) | Self::Work(_) | Self::Native(_) | Self::Interval { .. } => true,
        }
    }

    /// Coerces the value into a quantity for numeric work.
    ///
    /// `pass` and `fail` become the dimensionless scalars 1 and 0; other
    /// non-numeric values are type errors.
    pub fn as_quantity(&self, line: usize) -> Result<Quantity, RuntimeError> {
        match self {
            Self::Quantity(q) => Ok(q.clone()),
            Self::Bool(b) => {
                let magnitude = if *b { Decimal::ONE } else { Decimal::ZERO };
                Ok(Quantity::scalar(ChNumber::exact(magnitude)))
            },
            other => Err(RuntimeError::TypeError { details: format!("expected a quantity, found \
                                                                     {}",
                                                                    other.kind()),
                                                   line }),
        }
    }

    /// A short human-readable name for the value's variant.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Quantity(_) => "a quantity",
            Self::Bool(_) => "pass/fail",
            Self::Str(_) => "a string",
            Self::Path(_) => "a path",
            Self::Work(_) => "a work",
            Self::Native(_) => "a native work",
            Self::Interval { .. } => "an interval",
            Self::Na => "na",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Quantity(a), Self::Quantity(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Path(a), Self::Path(b)) => a == b,
            (Self::Work(a), Self::Work(b)) => Rc::ptr_eq(a, b),
            (Self::Native(a), Self::Native(b)) => a == b,
            (Self::Interval { start: a, end: b }, Self::Interval { start: c, end: d }) => {
                a == c && b == d
            },
            (Self::Na, Self::Na) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Quantity(q) => write!(f, "{q}"),
            Self::Bool(true) => write!(f, "pass"),
            Self::Bool(false) => write!(f, "fail"),
            Self::Str(s) => write!(f, "{s}"),
            Self::Path(p) => write!(f, "{}", p.display()),
            Self::Work(w) => write!(f, "<work {}>", w.name),
            Self::Native(n) => write!(f, "<native work {}>", n.name),
            Self::Interval { start, end } => write!(f, "{start} ... {end}"),
            Self::Na => write!(f, "na"),
        }
    }
}
