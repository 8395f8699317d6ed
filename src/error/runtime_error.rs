#[derive(Debug, Clone, PartialEq)]
/// Represents all errors that can occur during evaluation.
pub enum RuntimeError {
    /// Tried to use an undefined variable.
    UnknownIdentifier {
        /// The name that failed to resolve.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// An element symbol that is not in the periodic table.
    UnknownElement {
        /// The unknown symbol.
        symbol: String,
        /// The source line where the error occurred.
        line:   usize,
    },
    /// Two quantities whose dimensions cannot be reconciled.
    IncompatibleUnits {
        /// The unit being converted from.
        from: String,
        /// The unit being converted to.
        to:   String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Two quantities carrying different chemical formulas.
    IncompatibleFormulas {
        /// The left-hand formula.
        left:  String,
        /// The right-hand formula.
        right: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// Attempted division or modulo by zero.
    DivisionByZero {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A reaction skeleton with no unique positive balancing.
    UnbalanceableReaction {
        /// The reaction as written.
        reaction: String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A conversion between species of which at least one is absent from
    /// the supplied reaction.
    SpeciesNotInReaction {
        /// The missing species.
        species:  String,
        /// The reaction as written.
        reaction: String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A call with the wrong number of arguments.
    ArityError {
        /// How many parameters the callee declares.
        expected: usize,
        /// How many arguments were supplied.
        found:    usize,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A value had an unexpected or incompatible type.
    TypeError {
        /// Details about the mismatch.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// The file sink could not be opened or written.
    FileWrite {
        /// The path that failed.
        path: String,
        /// The source line where the error occurred.
        line: usize,
    },
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownIdentifier { name, line } => {
                write!(f, "Error on line {line}: Unknown identifier '{name}'.")
            },
            Self::UnknownElement { symbol, line } => {
                write!(f, "Error on line {line}: Unknown element '{symbol}'.")
            },
            Self::IncompatibleUnits { from, to, line } => {
                write!(f, "Error on line {line}: Cannot convert '{from}' to '{to}'.")
            },
            Self::IncompatibleFormulas { left, right, line } => {
                write!(f, "Error on line {line}: Incompatible formulas '{left}' and '{right}'.")
            },
            Self::DivisionByZero { line } => {
                write!(f, "Error on line {line}: Division by zero.")
            },
            Self::UnbalanceableReaction { reaction, line } => {
                write!(f, "Error on line {line}: Cannot balance '{reaction}'.")
            },
            Self::SpeciesNotInReaction { species, reaction, line } => {
                write!(f,
                       "Error on line {line}: Species '{species}' does not appear in '{reaction}'.")
            },
            Self::ArityError { expected, found, line } => {
                write!(f,
                       "Error on line {line}: Expected {expected} argument(s) but found {found}.")
            },
            Self::TypeError { details, line } => {
                write!(f, "Error on line {line}: Type error: {details}.")
            },
            Self::FileWrite { path, line } => {
                write!(f, "Error on line {line}: Could not write to file '{path}'.")
            },
        }
    }
}

impl std::error::Error for RuntimeError {}
