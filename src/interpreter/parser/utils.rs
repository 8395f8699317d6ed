use std::iter::Peekable;

use crate::{error::ParseError, interpreter::scanner::Token};

/// The token stream consumed by the parser: peekable and cloneable for
/// bounded lookahead.
pub type TokenIter<'a> = Peekable<std::slice::Iter<'a, (Token, usize)>>;

pub type ParseResult<T> = Result<T, ParseError>;

/// The line of the next token, for error reporting.
pub fn line_of(tokens: &mut TokenIter) -> usize {
    tokens.peek().map_or(0, |(_, line)| *line)
}

/// Whether the next token satisfies the predicate, without consuming it.
pub fn check(tokens: &mut TokenIter, predicate: impl Fn(&Token) -> bool) -> bool {
    tokens.peek().is_some_and(|(token, _)| predicate(token))
}

/// Consumes and returns the next token when it satisfies the predicate.
pub fn eat<'a>(tokens: &mut TokenIter<'a>,
               predicate: impl Fn(&Token) -> bool)
               -> Option<&'a (Token, usize)> {
    if check(tokens, predicate) { tokens.next() } else { None }
}

/// Consumes the next token, requiring it to satisfy the predicate.
///
/// # Errors
/// `UnexpectedToken` naming `what`, or `UnexpectedEndOfInput` at the end
/// of the stream.
pub fn expect<'a>(tokens: &mut TokenIter<'a>,
                  predicate: impl Fn(&Token) -> bool,
                  what: &str)
                  -> ParseResult<&'a (Token, usize)> {
    match tokens.peek() {
        Some((token, _)) if predicate(token) => Ok(tokens.next().expect("peeked")),
        Some((token, line)) => {
            Err(ParseError::UnexpectedToken { token: format!("expected {what}, found {}",
                                                             token.describe()),
                                              line:  *line, })
        },
        None => Err(ParseError::UnexpectedEndOfInput { line: 0 }),
    }
}

/// Consumes an identifier token and returns its name.
pub fn expect_identifier(tokens: &mut TokenIter) -> ParseResult<String> {
    match tokens.peek() {
        Some((Token::Id(name), _)) => {
            let name = name.clone();
            tokens.next();
            Ok(name)
        },
        Some((_, line)) => Err(ParseError::ExpectedIdentifier { line: *line }),
        None => Err(ParseError::UnexpectedEndOfInput { line: 0 }),
    }
}

/// Consumes a statement separator.
pub fn expect_sep(tokens: &mut TokenIter) -> ParseResult<()> {
    expect(tokens, |t| matches!(t, Token::Sep | Token::Eof), "newline")?;
    Ok(())
}

/// Consumes one optional separator.
pub fn opt_sep(tokens: &mut TokenIter) {
    eat(tokens, |t| matches!(t, Token::Sep));
}
