use crate::{
    ast::{Body, Expr, LiteralValue, Stmt},
    error::ParseError,
    interpreter::{
        parser::{
            core::parse_expression,
            utils::{
                ParseResult, TokenIter, check, eat, expect, expect_identifier, expect_sep,
                line_of, opt_sep,
            },
        },
        scanner::Token,
    },
};

/// Parses a whole program.
///
/// Each statement parses independently; on an error the parser records it
/// and synchronizes to the next statement separator, so one mistake does
/// not cascade. All collected errors are returned together.
pub fn parse_program(tokens: &[(Token, usize)]) -> Result<Vec<Stmt>, Vec<ParseError>> {
    let mut iter: TokenIter = tokens.iter().peekable();
    let mut stmts = Vec::new();
    let mut errors = Vec::new();

    loop {
        while eat(&mut iter, |t| matches!(t, Token::Sep)).is_some() {}
        if iter.peek().is_none() || check(&mut iter, |t| matches!(t, Token::Eof)) {
            break;
        }
        match parse_statement(&mut iter) {
            Ok(stmt) => stmts.push(stmt),
            Err(error) => {
                errors.push(error);
                synchronize(&mut iter);
            },
        }
    }

    if errors.is_empty() { Ok(stmts) } else { Err(errors) }
}

/// Skips tokens until the next statement boundary after a parse error.
fn synchronize(tokens: &mut TokenIter) {
    while let Some((token, _)) = tokens.peek() {
        match token {
            Token::Eof => break,
            Token::Sep => {
                tokens.next();
                break;
            },
            Token::Exam | Token::Redo | Token::During | Token::Work | Token::Submit => break,
            _ => {
                tokens.next();
            },
        }
    }
}

/// Parses a single statement.
pub fn parse_statement(tokens: &mut TokenIter) -> ParseResult<Stmt> {
    match tokens.peek() {
        Some((Token::Exam, _)) => parse_exam(tokens),
        Some((Token::Redo, _)) => parse_redo(tokens),
        Some((Token::During, _)) => parse_during(tokens),
        Some((Token::Work, _)) => parse_work(tokens),
        Some((Token::Submit, _)) => parse_submit(tokens),
        _ => parse_expression_statement(tokens),
    }
}

fn parse_expression_statement(tokens: &mut TokenIter) -> ParseResult<Stmt> {
    let line = line_of(tokens);
    let expr = parse_expression(tokens)?;
    expect_sep(tokens)?;
    Ok(Stmt::Expression { expr, line })
}

/// Parses an `exam cond body (makeup cond body)* (fail body)?` chain into
/// nested `Exam` statements, innermost arm first.
fn parse_exam(tokens: &mut TokenIter) -> ParseResult<Stmt> {
    let line = line_of(tokens);
    expect(tokens, |t| matches!(t, Token::Exam), "'exam'")?;

    let mut arms = vec![(line, parse_expression(tokens)?, parse_body(tokens)?)];
    while let Some((_, makeup_line)) = eat(tokens, |t| matches!(t, Token::Makeup)) {
        let cond = parse_expression(tokens)?;
        let body = parse_body(tokens)?;
        arms.push((*makeup_line, cond, body));
    }
    if let Some((_, fail_line)) = eat(tokens, |t| matches!(t, Token::Fail)) {
        let body = parse_body(tokens)?;
        let always = Expr::Literal { value: LiteralValue::Bool(true),
                                     line:  *fail_line, };
        arms.push((*fail_line, always, body));
    }

    let mut chain: Option<Box<Stmt>> = None;
    for (arm_line, cond, body) in arms.into_iter().rev() {
        chain = Some(Box::new(Stmt::Exam { cond,
                                           body,
                                           otherwise: chain,
                                           line: arm_line }));
    }
    opt_sep(tokens);
    Ok(*chain.expect("at least the exam arm exists"))
}

fn parse_during(tokens: &mut TokenIter) -> ParseResult<Stmt> {
    let line = line_of(tokens);
    expect(tokens, |t| matches!(t, Token::During), "'during'")?;
    let cond = parse_expression(tokens)?;
    let body = parse_body(tokens)?;
    opt_sep(tokens);
    Ok(Stmt::During { cond, body, line })
}

fn parse_redo(tokens: &mut TokenIter) -> ParseResult<Stmt> {
    let line = line_of(tokens);
    expect(tokens, |t| matches!(t, Token::Redo), "'redo'")?;
    let var = expect_identifier(tokens)?;
    expect(tokens, |t| matches!(t, Token::Of), "'of'")?;
    let interval = parse_expression(tokens)?;
    let body = parse_body(tokens)?;
    opt_sep(tokens);
    Ok(Stmt::Redo { var,
                    interval,
                    body,
                    line })
}

fn parse_work(tokens: &mut TokenIter) -> ParseResult<Stmt> {
    let line = line_of(tokens);
    expect(tokens, |t| matches!(t, Token::Work), "'work'")?;
    let name = expect_identifier(tokens)?;

    expect(tokens, |t| matches!(t, Token::LParen), "'(' after work name")?;
    let mut params = Vec::new();
    if check(tokens, |t| matches!(t, Token::Id(_))) {
        params.push(expect_identifier(tokens)?);
        while eat(tokens, |t| matches!(t, Token::Comma)).is_some() {
            opt_sep(tokens);
            params.push(expect_identifier(tokens)?);
        }
    }
    expect(tokens, |t| matches!(t, Token::RParen), "')' after parameters")?;

    let body = parse_body(tokens)?;
    opt_sep(tokens);
    Ok(Stmt::Work { name,
                    params,
                    body,
                    line })
}

fn parse_submit(tokens: &mut TokenIter) -> ParseResult<Stmt> {
    let line = line_of(tokens);
    expect(tokens, |t| matches!(t, Token::Submit), "'submit'")?;

    let expr = if check(tokens, |t| matches!(t, Token::Sep | Token::Eof)) {
        None
    } else {
        Some(parse_expression(tokens)?)
    };
    expect_sep(tokens)?;
    Ok(Stmt::Submit { expr, line })
}

/// Parses a statement body: an indented block after a newline, or a
/// one-line expression.
fn parse_body(tokens: &mut TokenIter) -> ParseResult<Body> {
    if eat(tokens, |t| matches!(t, Token::Sep)).is_some() {
        let line = line_of(tokens);
        if eat(tokens, |t| matches!(t, Token::Indent)).is_none() {
            return Err(ParseError::ExpectedIndent { line });
        }

        let mut stmts = Vec::new();
        loop {
            if eat(tokens, |t| matches!(t, Token::Dedent)).is_some() {
                break;
            }
            if check(tokens, |t| matches!(t, Token::Eof)) || tokens.peek().is_none() {
                return Err(ParseError::UnexpectedEndOfInput { line: line_of(tokens) });
            }
            if eat(tokens, |t| matches!(t, Token::Sep)).is_some() {
                continue;
            }
            stmts.push(parse_statement(tokens)?);
        }
        return Ok(Body { stmts, block: true });
    }

    let line = line_of(tokens);
    let expr = parse_expression(tokens)?;
    Ok(Body { stmts: vec![Stmt::Expression { expr, line }],
              block: false })
}
