/// Core expression parsing.
///
/// The recursive-descent precedence ladder, from file-sink writes down to
/// atoms, including the `->` conversion chain.
pub mod core;
/// Statement parsing.
///
/// Statement dispatch (`exam`, `during`, `redo`, `work`, `submit`,
/// expressions), block bodies, and program-level error synchronization.
pub mod statement;
/// The reaction sub-grammar used between `:…:`.
pub mod reaction;
/// Shared token-stream helpers.
pub mod utils;
