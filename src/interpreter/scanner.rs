use std::path::PathBuf;

use logos::Logos;

use crate::{
    error::ParseError,
    interpreter::{
        lexer::{LexerExtras, RawToken},
        value::{
            formula::{Formula, scan_formula},
            number::ChNumber,
            string::ChString,
            unit::{self, Unit},
        },
    },
};

/// Represents a fully classified token, ready for the parser.
///
/// Word runs have been resolved by lexical priority (chemical element
/// formula first, then unit identifier, then plain identifier) and the
/// layout pass has synthesized statement separators and indentation
/// tokens.
#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    /// A numeric literal.
    Num(ChNumber),
    /// A string literal.
    Str(ChString),
    /// A path literal.
    Path(PathBuf),
    /// A chemical formula.
    Formula(Formula),
    /// A unit of measure.
    Unit(Unit),
    /// An identifier.
    Id(String),

    /// `na`
    Na,
    /// `exam`
    Exam,
    /// `makeup`
    Makeup,
    /// `fail`
    Fail,
    /// `pass`
    Pass,
    /// `redo`
    Redo,
    /// `during`
    During,
    /// `of`
    Of,
    /// `work`
    Work,
    /// `submit`
    Submit,

    /// `->`
    Arrow,
    /// `...`
    Ellipsis,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `~`
    Tilde,
    /// `!`
    Bang,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `**`
    StarStar,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `^`
    Caret,
    /// `=`
    Equals,
    /// `==`
    EqualEqual,
    /// `!=`
    BangEqual,
    /// `<=`
    LessEqual,
    /// `>=`
    GreaterEqual,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `&&`
    AndAnd,
    /// `||`
    OrOr,
    /// `+=`
    PlusAssign,
    /// `-=`
    MinusAssign,
    /// `*=`
    StarAssign,
    /// `/=`
    SlashAssign,
    /// `%=`
    PercentAssign,
    /// `^=`
    CaretAssign,
    /// `**=`
    StarStarAssign,

    /// Statement separator (newline).
    Sep,
    /// Opens an indented block.
    Indent,
    /// Closes an indented block.
    Dedent,
    /// End of input.
    Eof,
}

/// Scans source text into the final `(Token, line)` stream.
///
/// The first stage is the raw `logos` lexer; this pass then
/// - resolves word runs into formulas, units or identifiers (a formula may
///   absorb several raw tokens, e.g. `Cu(OH)2`),
/// - converts newline tokens into separators and tracks the indent stack,
/// - terminates the stream with a separator, closing dedents and `Eof`.
pub fn scan(source: &str) -> Result<Vec<(Token, usize)>, ParseError> {
    let raw = lex_raw(source)?;

    let mut out: Vec<(Token, usize)> = Vec::with_capacity(raw.len() + 4);
    let mut indent_stack: Vec<usize> = Vec::new();
    let mut pending_depth: Option<usize> = None;
    let mut consumed_until = 0usize;

    for (token, line, span) in raw {
        if span.start < consumed_until {
            continue;
        }

        if let RawToken::Newline(depth) = token {
            out.push((Token::Sep, line));
            pending_depth = Some(depth);
            continue;
        }

        if let Some(depth) = pending_depth.take() {
            apply_indentation(&mut out, &mut indent_stack, depth, line);
        }

        let resolved = match token {
            RawToken::Word(word) => {
                resolve_word(&word, source, span.start, line, &mut consumed_until)?
            },
            other => translate(other),
        };
        out.push((resolved, line));
    }

    let final_line = out.last().map_or(1, |(_, line)| *line);
    if !matches!(out.last(), Some((Token::Sep, _))) {
        out.push((Token::Sep, final_line));
    }
    while indent_stack.pop().is_some() {
        out.push((Token::Dedent, final_line));
    }
    out.push((Token::Eof, final_line));
    Ok(out)
}

type RawSpanned = (RawToken, usize, std::ops::Range<usize>);

fn lex_raw(source: &str) -> Result<Vec<RawSpanned>, ParseError> {
    let mut lexer = RawToken::lexer_with_extras(source, LexerExtras { line: 1 });
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let line = lexer.extras.line;
        match result {
            Ok(token) => tokens.push((token, line, lexer.span())),
            Err(()) => {
                let slice = lexer.slice();
                return Err(classify_scan_error(slice, line));
            },
        }
    }
    Ok(tokens)
}

fn classify_scan_error(slice: &str, line: usize) -> ParseError {
    if slice.starts_with('"') || slice.starts_with("s\"") || slice.starts_with('`') {
        ParseError::UnterminatedString { line }
    } else if slice.starts_with("doc") {
        ParseError::UnterminatedDocstring { line }
    } else {
        ParseError::UnknownCharacter { text: slice.to_string(),
                                       line }
    }
}

/// Emits indent/dedent tokens for a new line's depth, following the usual
/// offside rule: deeper opens a block, shallower closes blocks back to a
/// matching level.
fn apply_indentation(out: &mut Vec<(Token, usize)>,
                     stack: &mut Vec<usize>,
                     depth: usize,
                     line: usize) {
    while let Some(&top) = stack.last() {
        if top > depth {
            stack.pop();
            out.push((Token::Dedent, line));
        } else {
            break;
        }
    }
    if depth != 0 && stack.last().is_none_or(|&top| depth > top) {
        stack.push(depth);
        out.push((Token::Indent, line));
    }
}

/// Classifies a word by lexical priority: element-symbol formula, unit
/// identifier, plain identifier.
///
/// A formula is scanned character-wise from the word's start in the
/// original source, so it can absorb following raw tokens
/// (`Fe(NO3)_{2}` spans seven of them). Words that merely start like an
/// element fall back cleanly: `Care` is an identifier.
fn resolve_word(word: &str,
                source: &str,
                start: usize,
                line: usize,
                consumed_until: &mut usize)
                -> Result<Token, ParseError> {
    if word.starts_with(|c: char| c.is_ascii_uppercase()) {
        match scan_formula(&source[start..]) {
            Ok(Some((formula, consumed))) => {
                *consumed_until = start + consumed;
                return Ok(Token::Formula(formula));
            },
            Ok(None) => {},
            Err(e) => {
                return Err(ParseError::FormulaParse { details: e.to_string(),
                                                      line });
            },
        }
    }

    if let Some(unit) = unit::lookup(word) {
        return Ok(Token::Unit(unit));
    }
    Ok(Token::Id(word.to_string()))
}

fn translate(token: RawToken) -> Token {
    match token {
        RawToken::Num(n) => Token::Num(n),
        RawToken::Str(s) | RawToken::Doc(s) => Token::Str(s),
        RawToken::EscapedId(id) => Token::Id(id),
        RawToken::PathLit(path) => Token::Path(PathBuf::from(path)),
        RawToken::Na => Token::Na,
        RawToken::Exam => Token::Exam,
        RawToken::Makeup => Token::Makeup,
        RawToken::Fail => Token::Fail,
        RawToken::Pass => Token::Pass,
        RawToken::Redo => Token::Redo,
        RawToken::During => Token::During,
        RawToken::Of => Token::Of,
        RawToken::Work => Token::Work,
        RawToken::Submit => Token::Submit,
        RawToken::Arrow => Token::Arrow,
        RawToken::Ellipsis => Token::Ellipsis,
        RawToken::LParen => Token::LParen,
        RawToken::RParen => Token::RParen,
        RawToken::LBrace => Token::LBrace,
        RawToken::RBrace => Token::RBrace,
        RawToken::Comma => Token::Comma,
        RawToken::Colon => Token::Colon,
        RawToken::Tilde => Token::Tilde,
        RawToken::Bang => Token::Bang,
        RawToken::Plus => Token::Plus,
        RawToken::Minus => Token::Minus,
        RawToken::Star => Token::Star,
        RawToken::StarStar => Token::StarStar,
        RawToken::Slash => Token::Slash,
        RawToken::Percent => Token::Percent,
        RawToken::Caret => Token::Caret,
        RawToken::Equals => Token::Equals,
        RawToken::EqualEqual => Token::EqualEqual,
        RawToken::BangEqual => Token::BangEqual,
        RawToken::LessEqual => Token::LessEqual,
        RawToken::GreaterEqual => Token::GreaterEqual,
        RawToken::Less => Token::Less,
        RawToken::Greater => Token::Greater,
        RawToken::AndAnd => Token::AndAnd,
        RawToken::OrOr => Token::OrOr,
        RawToken::PlusAssign => Token::PlusAssign,
        RawToken::MinusAssign => Token::MinusAssign,
        RawToken::StarAssign => Token::StarAssign,
        RawToken::SlashAssign => Token::SlashAssign,
        RawToken::PercentAssign => Token::PercentAssign,
        RawToken::CaretAssign => Token::CaretAssign,
        RawToken::StarStarAssign => Token::StarStarAssign,
        RawToken::Word(_) | RawToken::Newline(_) | RawToken::Comment => {
            unreachable!("handled before translation")
        },
    }
}

impl Token {
    /// A short description used in parser error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Num(n) => format!("number '{n}'"),
            Self::Str(_) => "string".to_string(),
            Self::Path(p) => format!("path '{}'", p.display()),
            Self::Formula(f) => format!("formula '{f}'"),
            Self::Unit(u) => format!("unit '{u}'"),
            Self::Id(name) => format!("'{name}'"),
            Self::Sep => "newline".to_string(),
            Self::Indent => "indent".to_string(),
            Self::Dedent => "dedent".to_string(),
            Self::Eof => "end of input".to_string(),
            other => format!("'{other:?}'"),
        }
    }
}
