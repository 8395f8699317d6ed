/// Scanning and parsing errors.
///
/// Defines all error types that can occur while turning source text into an
/// AST: unknown characters, unterminated literals, malformed formulas, and
/// grammar mismatches.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation: unknown
/// identifiers, unit and formula incompatibilities, division by zero,
/// unbalanceable reactions, and call errors.
pub mod runtime_error;

pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;
