//! # chemlang
//!
//! chemlang is an interpreter for CL, a small dynamically-typed language
//! for chemistry homework. Every number carries a decimal magnitude, a
//! unit and an optional chemical formula; arithmetic and comparisons
//! propagate significant figures and check dimensions, and the `->`
//! operator converts quantities: directly, through molar mass and
//! Avogadro's number, or through the stoichiometry of a balanced
//! reaction.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
)]
#![allow(clippy::missing_errors_doc)]

/// Defines the structure of parsed code.
///
/// This module declares the `Expr` and `Stmt` types that represent the
/// syntactic structure of source code as a tree. The AST is built by the
/// parser and traversed by the evaluator; nodes carry source lines for
/// error reporting.
pub mod ast;
/// Provides unified error types for parsing and evaluation.
///
/// Defines all errors that can be raised while scanning, parsing or
/// evaluating code, with source lines attached.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// Ties together the lexer, scanner, parser, evaluator and value types,
/// and exposes the entry points for running CL programs.
pub mod interpreter;
/// Digit-level utilities: significant-figure counting, display rounding
/// and Unicode script rendering.
pub mod util;

use crate::{
    ast::Stmt,
    error::ParseError,
    interpreter::{parser::statement::parse_program, scanner::scan, value::core::Value},
};

pub use crate::interpreter::evaluator::core::Interpreter;

/// All errors a failed parse produced, in source order.
///
/// The parser synchronizes to the next statement separator after each
/// error, so several independent mistakes are reported at once.
#[derive(Debug)]
pub struct ParseFailure {
    pub errors: Vec<ParseError>,
}

impl std::fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseFailure {}

/// Scans and parses a program.
///
/// # Errors
/// A scan error, or every grammar error the parser collected.
pub fn parse_source(source: &str) -> Result<Vec<Stmt>, ParseFailure> {
    let tokens = scan(source).map_err(|error| ParseFailure { errors: vec![error] })?;
    parse_program(&tokens).map_err(|errors| ParseFailure { errors })
}

/// Runs a program in an existing interpreter and returns the last value it
/// produced.
///
/// This is the entry point the REPL uses, so that bindings persist across
/// inputs.
///
/// # Errors
/// Returns scan/parse errors, or the runtime error that aborted execution.
pub fn run_with(source: &str,
                interpreter: &mut Interpreter)
                -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let stmts = parse_source(source)?;
    interpreter.execute(&stmts).map_err(Into::into)
}

/// Runs a program in a fresh interpreter.
///
/// # Errors
/// Returns scan/parse errors, or the runtime error that aborted execution.
///
/// # Examples
/// ```
/// use chemlang::evaluate;
///
/// let value = evaluate("1.2345 + 1.2").unwrap().unwrap();
/// assert_eq!(value.to_string(), "2.5");
///
/// assert!(evaluate("10.00 km + 20.00 g NaCl").is_err());
/// ```
pub fn evaluate(source: &str) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let mut interpreter = Interpreter::new();
    run_with(source, &mut interpreter)
}

/// Returns the final evaluation result after execution.
///
/// Parses and executes all statements in the provided source string. With
/// `auto_print`, the last produced value is printed to standard output,
/// which is useful for piping scripts.
///
/// # Errors
/// Returns an error if scanning, parsing or evaluation fails.
pub fn get_result(source: &str, auto_print: bool) -> Result<(), Box<dyn std::error::Error>> {
    let result = evaluate(source)?;
    if auto_print && let Some(value) = result {
        println!("{value}");
    }
    Ok(())
}
