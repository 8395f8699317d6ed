#[derive(Debug, Clone, PartialEq)]
/// Represents all errors that can occur while scanning or parsing source
/// code.
pub enum ParseError {
    /// A character the scanner has no rule for.
    UnknownCharacter {
        /// The offending text.
        text: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A string literal without a closing quote.
    UnterminatedString {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A `doc` string without a closing `done`.
    UnterminatedDocstring {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A chemical formula that started but could not be completed.
    FormulaParse {
        /// What went wrong inside the formula.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// Found an unexpected token while parsing.
    UnexpectedToken {
        /// A description of what was found or expected.
        token: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// Reached the end of input unexpectedly.
    UnexpectedEndOfInput {
        /// The source line where the error occurred.
        line: usize,
    },
    /// An identifier was expected but not found.
    ExpectedIdentifier {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A statement body needed an indented block but none followed.
    ExpectedIndent {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A word in unit position that names no known unit.
    UnknownUnit {
        /// The word that failed to resolve.
        word: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// The left-hand side of an assignment was not a plain identifier.
    InvalidAssignmentTarget {
        /// The source line where the error occurred.
        line: usize,
    },
}

impl ParseError {
    /// Whether this error means the input simply stopped too early, which
    /// interactive callers treat as "keep reading".
    #[must_use]
    pub const fn is_incomplete_input(&self) -> bool {
        matches!(self,
                 Self::UnexpectedEndOfInput { .. }
                 | Self::ExpectedIndent { .. }
                 | Self::UnterminatedDocstring { .. })
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownCharacter { text, line } => {
                write!(f, "Error on line {line}: Unknown character '{text}'.")
            },
            Self::UnterminatedString { line } => {
                write!(f, "Error on line {line}: Unterminated string literal.")
            },
            Self::UnterminatedDocstring { line } => {
                write!(f, "Error on line {line}: Docstring is missing its 'done'.")
            },
            Self::FormulaParse { details, line } => {
                write!(f, "Error on line {line}: Invalid formula: {details}.")
            },
            Self::UnexpectedToken { token, line } => {
                write!(f, "Error on line {line}: Unexpected token: {token}.")
            },
            Self::UnexpectedEndOfInput { line } => {
                write!(f, "Error on line {line}: Unexpected end of input.")
            },
            Self::ExpectedIdentifier { line } => {
                write!(f, "Error on line {line}: Expected identifier.")
            },
            Self::ExpectedIndent { line } => {
                write!(f, "Error on line {line}: Expected an indented block.")
            },
            Self::UnknownUnit { word, line } => {
                write!(f, "Error on line {line}: Unknown unit '{word}'.")
            },
            Self::InvalidAssignmentTarget { line } => {
                write!(f, "Error on line {line}: Invalid left-hand side of assignment.")
            },
        }
    }
}

impl std::error::Error for ParseError {}
