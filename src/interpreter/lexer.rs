use logos::Logos;

use crate::interpreter::value::{number::ChNumber, string::ChString};

/// Represents a raw lexical token.
///
/// This is the first of two scanning stages: `logos` produces these
/// context-free tokens, and the scanner layer then synthesizes layout
/// tokens (separators, indents) and classifies word runs into formulas,
/// units and identifiers.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
#[logos(skip r"[ \t\f\r]+")]
pub enum RawToken {
    /// A newline together with the following line's leading whitespace.
    /// The payload is the indentation depth (space = 1, tab = 4).
    #[regex(r"\n[ \t]*", newline)]
    Newline(usize),

    /// `ps` comments run to the end of the line.
    #[regex(r"ps[^\n]*", logos::skip, priority = 10)]
    Comment,

    /// Numeric literals: `42`, `1_000`, `2.5`, `6.022e23` (exponents only
    /// after a fractional part). Integer literals are exact.
    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?", number)]
    #[regex(r"[0-9][0-9_]*", number)]
    Num(ChNumber),

    /// String literals: `"…"` plain, `s"…"` interpolated.
    #[regex(r#""([^"\\\n]|\\.)*""#, plain_string)]
    #[regex(r#"s"([^"\\\n]|\\.)*""#, interpolated_string)]
    Str(ChString),

    /// `doc … done` docstrings; always interpolated.
    #[token("doc", docstring)]
    Doc(ChString),

    /// A backtick-escaped identifier, exempt from element/unit
    /// classification.
    #[regex(r"`[^`\n]*`", |lex| lex.slice().trim_matches('`').to_string())]
    EscapedId(String),

    /// A `|…|` path literal.
    #[regex(r"\|[^|\n]+\|", |lex| lex.slice().trim_matches('|').to_string())]
    PathLit(String),

    /// `na`
    #[token("na")]
    Na,
    /// `exam`
    #[token("exam")]
    Exam,
    /// `makeup`
    #[token("makeup")]
    Makeup,
    /// `fail`
    #[token("fail")]
    Fail,
    /// `pass`
    #[token("pass")]
    Pass,
    /// `redo`
    #[token("redo")]
    Redo,
    /// `during`
    #[token("during")]
    During,
    /// `of`
    #[token("of")]
    Of,
    /// `work`
    #[token("work")]
    Work,
    /// `submit`
    #[token("submit")]
    Submit,

    /// An alphanumeric word, classified later into element formula, unit,
    /// or identifier.
    #[regex(r"[A-Za-zµ_][A-Za-z0-9µ_]*", |lex| lex.slice().to_string())]
    Word(String),

    /// `->`
    #[token("->")]
    Arrow,
    /// `...`
    #[token("...")]
    Ellipsis,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `,`
    #[token(",")]
    Comma,
    /// `:`
    #[token(":")]
    Colon,
    /// `~`
    #[token("~")]
    Tilde,
    /// `!`
    #[token("!")]
    Bang,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `**`
    #[token("**")]
    StarStar,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `^`
    #[token("^")]
    Caret,
    /// `=`
    #[token("=")]
    Equals,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `&&`
    #[token("&&")]
    AndAnd,
    /// `||`
    #[token("||")]
    OrOr,
    /// `+=`
    #[token("+=")]
    PlusAssign,
    /// `-=`
    #[token("-=")]
    MinusAssign,
    /// `*=`
    #[token("*=")]
    StarAssign,
    /// `/=`
    #[token("/=")]
    SlashAssign,
    /// `%=`
    #[token("%=")]
    PercentAssign,
    /// `^=`
    #[token("^=")]
    CaretAssign,
    /// `**=`
    #[token("**=")]
    StarStarAssign,
}

/// Additional information carried by the lexer during tokenization.
#[derive(Default)]
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line: usize,
}

/// Measures the indentation carried by a newline token and advances the
/// line counter. Spaces count 1, tabs count 4.
fn newline(lex: &mut logos::Lexer<RawToken>) -> usize {
    lex.extras.line += 1;
    lex.slice()
       .chars()
       .skip(1)
       .map(|c| if c == '\t' { 4 } else { 1 })
       .sum()
}

/// Parses a numeric literal, recording its written significance.
fn number(lex: &logos::Lexer<RawToken>) -> Option<ChNumber> {
    ChNumber::from_literal(lex.slice()).ok()
}

fn plain_string(lex: &logos::Lexer<RawToken>) -> ChString {
    let slice = lex.slice();
    ChString::new(unescape(&slice[1..slice.len() - 1]), false)
}

fn interpolated_string(lex: &logos::Lexer<RawToken>) -> ChString {
    let slice = lex.slice();
    ChString::new(slice[2..slice.len() - 1].to_string(), true)
}

/// Resolves backslash escapes in plain strings. Interpolated strings keep
/// theirs for the segmenter, which must still see `\{`.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Consumes a `doc … done` block, stripping the common leading whitespace
/// of its lines.
fn docstring(lex: &mut logos::Lexer<RawToken>) -> Option<ChString> {
    let remainder = lex.remainder();
    let end = remainder.find("done")?;
    let body = &remainder[..end];
    lex.bump(end + "done".len());
    lex.extras.line += body.matches('\n').count();

    Some(ChString::new(dedent(body), true))
}

fn dedent(body: &str) -> String {
    let body = body.strip_prefix('\n').unwrap_or(body);
    let body = body.trim_end();

    let min_indent = body.lines()
                         .filter(|line| !line.trim().is_empty())
                         .map(|line| line.len() - line.trim_start().len())
                         .min()
                         .unwrap_or(0);

    body.lines()
        .map(|line| if line.len() >= min_indent { &line[min_indent..] } else { line })
        .collect::<Vec<_>>()
        .join("\n")
}
