use std::io::BufRead;

use crate::{
    error::RuntimeError,
    interpreter::value::{
        core::Value,
        number::ChNumber,
        quantity::{Quantity, number_error},
        work::NativeWork,
    },
};

/// The native works seeded into the global scope.
///
/// All math built-ins take a dimensionless scalar and preserve its
/// significant figures. `log` is base 2; `ln`, `log2` and `log10` are
/// explicit.
pub const NATIVES: &[NativeWork] = &[
    NativeWork { name: "print", arity: 1, func: print },
    NativeWork { name: "input", arity: 1, func: input },
    NativeWork { name: "log", arity: 1, func: log },
    NativeWork { name: "log2", arity: 1, func: log },
    NativeWork { name: "log10", arity: 1, func: log10 },
    NativeWork { name: "ln", arity: 1, func: ln },
    NativeWork { name: "sin", arity: 1, func: sin },
    NativeWork { name: "cos", arity: 1, func: cos },
    NativeWork { name: "tan", arity: 1, func: tan },
    NativeWork { name: "abs", arity: 1, func: abs },
    NativeWork { name: "sqrt", arity: 1, func: sqrt },
];

/// Extracts the dimensionless scalar a math built-in operates on.
fn scalar_arg(args: &[Value], line: usize) -> Result<ChNumber, RuntimeError> {
    let quantity = args[0].as_quantity(line)?;
    if !quantity.is_scalar() {
        return Err(RuntimeError::TypeError { details: format!("expected a dimensionless \
                                                               scalar, found {quantity}"),
                                             line });
    }
    Ok(quantity.number)
}

/// Wraps an `f64` function as a native work body.
fn apply(args: &[Value], line: usize, f: fn(f64) -> f64) -> Result<Value, RuntimeError> {
    let number = scalar_arg(args, line)?;
    let result = number.map_f64(f).map_err(|e| number_error(e, line))?;
    Ok(Value::Quantity(Quantity::scalar(result)))
}

fn log(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    apply(args, line, f64::log2)
}

fn log10(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    apply(args, line, f64::log10)
}

fn ln(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    apply(args, line, f64::ln)
}

fn sin(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    apply(args, line, f64::sin)
}

fn cos(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    apply(args, line, f64::cos)
}

fn tan(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    apply(args, line, f64::tan)
}

fn sqrt(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    apply(args, line, f64::sqrt)
}

fn abs(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    let number = scalar_arg(args, line)?;
    Ok(Value::Quantity(Quantity::scalar(number.abs())))
}

/// Prints the argument's display form followed by a newline.
fn print(args: &[Value], _line: usize) -> Result<Value, RuntimeError> {
    println!("{}", args[0]);
    Ok(Value::Na)
}

/// Prints the prompt, then reads one line from standard input, without its
/// newline.
fn input(args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    print!("{}", args[0]);
    let _ = std::io::Write::flush(&mut std::io::stdout());

    let mut buffer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut buffer)
        .map_err(|_| RuntimeError::TypeError { details: "could not read from stdin".to_string(),
                                               line })?;
    Ok(Value::Str(buffer.trim_end_matches(['\n', '\r']).to_string()))
}
