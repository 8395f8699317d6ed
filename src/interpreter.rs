/// Lexical scope frames.
///
/// The environment is a chain of frames with interior-mutable binding
/// cells; closures capture the chain, which is what makes counters and
/// recursive works behave.
pub mod env;
/// The evaluator executes AST nodes and computes results.
///
/// The evaluator traverses the AST, evaluates expressions and statements,
/// performs quantity arithmetic, runs conversions, and manages scopes. It
/// is the core execution engine of the interpreter.
///
/// # Responsibilities
/// - Evaluates AST nodes, performing all supported operations.
/// - Handles variables, works, loops and conditionals.
/// - Reports runtime errors such as incompatible units or division by
///   zero.
pub mod evaluator;
/// The raw lexer tokenizes source text.
///
/// The first scanning stage: a `logos`-generated lexer producing
/// context-free tokens with line tracking. Words are not yet classified
/// and layout is not yet resolved; that is the scanner's job.
pub mod lexer;
/// The parser builds the abstract syntax tree from tokens.
///
/// The parser processes the classified token stream and constructs an AST
/// representing statements and expressions, reporting grammar errors with
/// source locations and synchronizing at statement boundaries.
pub mod parser;
/// The scanner turns raw tokens into the parser's token stream.
///
/// The second scanning stage: synthesizes statement separators and
/// indentation tokens, and resolves word runs by lexical priority,
/// chemical formula first, then unit, then identifier.
pub mod scanner;
/// The value module defines the runtime data types.
///
/// Quantities and their numeric engine, units, formulas, reactions,
/// strings, works, and the `Value` sum type tying them together.
pub mod value;
