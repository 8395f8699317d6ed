/// Core evaluation logic and interpreter state.
///
/// Contains the `Interpreter`, the statement and expression dispatch,
/// scope management, string interpolation, and the file sink.
pub mod core;

/// Binary operator evaluation.
pub mod binary;

/// Unary operator evaluation.
pub mod unary;

/// Loop constructs: `during`, `redo`, and interval values.
pub mod loops;

/// The `->` conversion pipeline: direct, formula-mediated, and
/// reaction-mediated conversions.
pub mod conversion;

/// Work calls: user-defined closures and native built-ins.
pub mod function;
