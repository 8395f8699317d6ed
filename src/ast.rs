use std::path::PathBuf;

use crate::interpreter::value::{
    formula::Formula, quantity::Quantity, reaction::Reaction, string::ChString, unit::Unit,
};

/// Represents a literal value in the language.
///
/// `LiteralValue` covers the raw constants that can appear directly in
/// source code: quantities (with their unit and formula attached by the
/// parser), strings, paths, the `pass`/`fail` truth literals, and `na`.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// A numeric literal, possibly annotated with a unit and a formula.
    Quantity(Quantity),
    /// A string literal, plain or interpolated.
    Str(ChString),
    /// A `|…|` path literal.
    Path(PathBuf),
    /// `pass` or `fail`.
    Bool(bool),
    /// The absent value `na`.
    Na,
}

/// The target of a `->` conversion: a unit, a formula, or a unit applied to
/// a formula.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionTarget {
    pub unit:    Option<Unit>,
    pub formula: Option<Formula>,
}

/// An abstract syntax tree node representing an expression.
///
/// Everything in CL is an expression at heart; statements merely wrap
/// expressions with control flow. Each variant carries its source line for
/// error reporting.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal constant.
    Literal {
        /// The constant value.
        value: LiteralValue,
        /// Line number in the source code.
        line:  usize,
    },
    /// A bare chemical formula, which evaluates to its molar mass.
    Formula {
        /// The formula.
        formula: Formula,
        /// Line number in the source code.
        line:    usize,
    },
    /// Reference to a variable by name.
    Variable {
        /// Name of the variable.
        name: String,
        /// Line number in the source code.
        line: usize,
    },
    /// A unary operation.
    Unary {
        /// The operator to apply.
        op:   UnaryOperator,
        /// The operand expression.
        expr: Box<Self>,
        /// Line number in the source code.
        line: usize,
    },
    /// A binary operation.
    Binary {
        /// Left operand.
        left:  Box<Self>,
        /// The operator.
        op:    BinaryOperator,
        /// Right operand.
        right: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// An assignment expression; yields the assigned value.
    Assign {
        /// The name being bound.
        name:  String,
        /// The value expression.
        value: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A call expression.
    Call {
        /// The callee; evaluates to a work.
        callee:    Box<Self>,
        /// Argument expressions.
        arguments: Vec<Self>,
        /// Line number in the source code.
        line:      usize,
    },
    /// A half-open integer interval `a ... b`.
    Interval {
        /// Lower bound (inclusive).
        start: Box<Self>,
        /// Upper bound (exclusive).
        end:   Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A `->` conversion, optionally mediated by reactions.
    Conversion {
        /// The quantity being converted.
        value:     Box<Self>,
        /// The conversion target.
        target:    ConversionTarget,
        /// Reactions supplied between `:…:`.
        reactions: Vec<Reaction>,
        /// Line number in the source code.
        line:      usize,
    },
    /// A file-sink write `expr -> |path|`; yields the written value.
    Write {
        /// The expression whose printed form is appended.
        expr: Box<Self>,
        /// The sink path.
        path: PathBuf,
        /// Line number in the source code.
        line: usize,
    },
}

impl Expr {
    /// Gets the line number from `self`.
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::Literal { line, .. }
            | Self::Formula { line, .. }
            | Self::Variable { line, .. }
            | Self::Unary { line, .. }
            | Self::Binary { line, .. }
            | Self::Assign { line, .. }
            | Self::Call { line, .. }
            | Self::Interval { line, .. }
            | Self::Conversion { line, .. }
            | Self::Write { line, .. } => *line,
        }
    }
}

/// A statement body: either an indented block or a one-line expression.
///
/// Block bodies open a new scope when executed; one-line bodies run in the
/// enclosing scope.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub stmts: Vec<Stmt>,
    pub block: bool,
}

/// Represents a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// A standalone expression evaluated for its result.
    Expression {
        /// The expression to evaluate.
        expr: Expr,
        /// Line number in the source code.
        line: usize,
    },
    /// An `exam`/`makeup`/`fail` conditional chain. `makeup` arms nest in
    /// `otherwise`; a trailing `fail` arm nests as an `exam` with a `pass`
    /// condition.
    Exam {
        /// The condition.
        cond:      Expr,
        /// The body taken when the condition passes.
        body:      Body,
        /// The next arm of the chain, if any.
        otherwise: Option<Box<Self>>,
        /// Line number in the source code.
        line:      usize,
    },
    /// A `during` loop.
    During {
        /// The loop condition.
        cond: Expr,
        /// The loop body.
        body: Body,
        /// Line number in the source code.
        line: usize,
    },
    /// A `redo … of …` loop over an interval.
    Redo {
        /// The loop variable name.
        var:      String,
        /// The interval expression.
        interval: Expr,
        /// The loop body.
        body:     Body,
        /// Line number in the source code.
        line:     usize,
    },
    /// A `work` definition.
    Work {
        /// The work's name.
        name:   String,
        /// Parameter names.
        params: Vec<String>,
        /// The work body.
        body:   Body,
        /// Line number in the source code.
        line:   usize,
    },
    /// A `submit` statement returning from the nearest work.
    Submit {
        /// The submitted expression, if any.
        expr: Option<Expr>,
        /// Line number in the source code.
        line: usize,
    },
}

/// Represents a binary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Modulo (`%`)
    Mod,
    /// Exponentiation (`^` or `**`)
    Pow,
    /// Less than (`<`)
    Less,
    /// Greater than (`>`)
    Greater,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Equal to (`==`)
    Equal,
    /// Not equal to (`!=`)
    NotEqual,
    /// Logical and (`&&`), short-circuiting.
    And,
    /// Logical or (`||`), short-circuiting.
    Or,
}

/// Represents a unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Arithmetic negation (`-x`).
    Negate,
    /// Arithmetic identity (`+x`).
    Identity,
    /// Logical not (`!x`).
    Not,
    /// Bitwise not on integer scalars (`~x`).
    Invert,
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let operator = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Pow => "^",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::And => "&&",
            Self::Or => "||",
        };
        write!(f, "{operator}")
    }
}
