use crate::{
    ast::{BinaryOperator, ConversionTarget, Expr, LiteralValue, UnaryOperator},
    error::ParseError,
    interpreter::{
        parser::{
            reaction::parse_reactions,
            utils::{ParseResult, TokenIter, check, eat, expect, line_of},
        },
        scanner::Token,
        value::{quantity::Quantity, unit},
    },
};

/// Parses a full expression.
///
/// This is the entry point for expression parsing. The ladder runs, lowest
/// precedence first: file-sink write, interval, assignment, `||`, `&&`,
/// equality, comparison, additive, multiplicative/conversion, unary,
/// power, call, atom.
pub fn parse_expression(tokens: &mut TokenIter) -> ParseResult<Expr> {
    parse_write(tokens)
}

/// Parses `expr -> |path|`. A trailing `->` followed by anything other
/// than a path belongs to the conversion chain below and is not consumed
/// here.
fn parse_write(tokens: &mut TokenIter) -> ParseResult<Expr> {
    let expr = parse_interval(tokens)?;

    if check(tokens, |t| matches!(t, Token::Arrow)) && next_is_path(tokens) {
        let line = line_of(tokens);
        tokens.next();
        let Some((Token::Path(path), _)) = tokens.next() else {
            unreachable!("lookahead saw a path");
        };
        return Ok(Expr::Write { expr: Box::new(expr),
                                path: path.clone(),
                                line });
    }
    Ok(expr)
}

/// Parses `a ... b`.
fn parse_interval(tokens: &mut TokenIter) -> ParseResult<Expr> {
    let start = parse_assign(tokens)?;

    if let Some((_, line)) = eat(tokens, |t| matches!(t, Token::Ellipsis)) {
        let end = parse_assign(tokens)?;
        return Ok(Expr::Interval { start: Box::new(start),
                                   end:   Box::new(end),
                                   line:  *line, });
    }
    Ok(start)
}

/// Parses assignment and its compound-assignment sugar. Right-associative;
/// `a = b = 1` binds both names, and `x += 1` desugars to `x = x + 1`.
fn parse_assign(tokens: &mut TokenIter) -> ParseResult<Expr> {
    let left = parse_or(tokens)?;

    let sugar = |token: &Token| match token {
        Token::PlusAssign => Some(BinaryOperator::Add),
        Token::MinusAssign => Some(BinaryOperator::Sub),
        Token::StarAssign => Some(BinaryOperator::Mul),
        Token::SlashAssign => Some(BinaryOperator::Div),
        Token::PercentAssign => Some(BinaryOperator::Mod),
        Token::CaretAssign | Token::StarStarAssign => Some(BinaryOperator::Pow),
        _ => None,
    };

    if let Some((op_token, line)) =
        eat(tokens, |t| matches!(t, Token::Equals) || sugar(t).is_some())
    {
        let Expr::Variable { name, .. } = left else {
            return Err(ParseError::InvalidAssignmentTarget { line: *line });
        };
        let mut rvalue = parse_expression(tokens)?;
        if let Some(op) = sugar(op_token) {
            rvalue = Expr::Binary { left:  Box::new(Expr::Variable { name: name.clone(),
                                                                     line: *line, }),
                                    op,
                                    right: Box::new(rvalue),
                                    line:  *line, };
        }
        return Ok(Expr::Assign { name,
                                 value: Box::new(rvalue),
                                 line: *line });
    }
    Ok(left)
}

/// Parses a left-associative run of binary operators at one precedence
/// level.
fn parse_binary_level(tokens: &mut TokenIter,
                      operand: fn(&mut TokenIter) -> ParseResult<Expr>,
                      operator: fn(&Token) -> Option<BinaryOperator>)
                      -> ParseResult<Expr> {
    let mut left = operand(tokens)?;

    while let Some((token, line)) = eat(tokens, |t| operator(t).is_some()) {
        let op = operator(token).expect("matched");
        let right = operand(tokens)?;
        left = Expr::Binary { left: Box::new(left),
                              op,
                              right: Box::new(right),
                              line: *line };
    }
    Ok(left)
}

fn parse_or(tokens: &mut TokenIter) -> ParseResult<Expr> {
    parse_binary_level(tokens, parse_and, |t| {
        matches!(t, Token::OrOr).then_some(BinaryOperator::Or)
    })
}

fn parse_and(tokens: &mut TokenIter) -> ParseResult<Expr> {
    parse_binary_level(tokens, parse_equality, |t| {
        matches!(t, Token::AndAnd).then_some(BinaryOperator::And)
    })
}

fn parse_equality(tokens: &mut TokenIter) -> ParseResult<Expr> {
    parse_binary_level(tokens, parse_comparison, |t| match t {
        Token::EqualEqual => Some(BinaryOperator::Equal),
        Token::BangEqual => Some(BinaryOperator::NotEqual),
        _ => None,
    })
}

fn parse_comparison(tokens: &mut TokenIter) -> ParseResult<Expr> {
    parse_binary_level(tokens, parse_conversion, |t| match t {
        Token::LessEqual => Some(BinaryOperator::LessEqual),
        Token::GreaterEqual => Some(BinaryOperator::GreaterEqual),
        Token::Less => Some(BinaryOperator::Less),
        Token::Greater => Some(BinaryOperator::Greater),
        _ => None,
    })
}

/// Parses the `->` conversion level: plain chained conversions, and
/// reaction-mediated ones introduced by `:reactions:`.
///
/// Conversion binds looser than arithmetic (`10.000 km + 20.000 m -> mm`
/// converts the whole sum) but tighter than comparisons, so both sides of
/// `a -> mm == b -> mm` convert independently. A `->` followed by a path
/// is the file sink and belongs to the level above.
fn parse_conversion(tokens: &mut TokenIter) -> ParseResult<Expr> {
    let mut left = parse_term(tokens)?;

    loop {
        if let Some((_, line)) = eat(tokens, |t| matches!(t, Token::Colon)) {
            let reactions = parse_reactions(tokens)?;
            expect(tokens, |t| matches!(t, Token::Arrow), "'->' after reactions")?;
            let target = parse_target(tokens)?;
            left = Expr::Conversion { value: Box::new(left),
                                      target,
                                      reactions,
                                      line: *line };
        } else if check(tokens, |t| matches!(t, Token::Arrow)) && !next_is_path(tokens) {
            while let Some((_, line)) = eat(tokens, |t| matches!(t, Token::Arrow)) {
                let target = parse_target(tokens)?;
                left = Expr::Conversion { value: Box::new(left),
                                          target,
                                          reactions: Vec::new(),
                                          line: *line };
            }
        } else {
            break;
        }
    }
    Ok(left)
}

fn parse_term(tokens: &mut TokenIter) -> ParseResult<Expr> {
    parse_binary_level(tokens, parse_factor, |t| match t {
        Token::Plus => Some(BinaryOperator::Add),
        Token::Minus => Some(BinaryOperator::Sub),
        _ => None,
    })
}

fn parse_factor(tokens: &mut TokenIter) -> ParseResult<Expr> {
    parse_binary_level(tokens, parse_unary, |t| match t {
        Token::Star => Some(BinaryOperator::Mul),
        Token::Slash => Some(BinaryOperator::Div),
        Token::Percent => Some(BinaryOperator::Mod),
        _ => None,
    })
}

/// Parses a conversion target: a unit, a formula, or a unit followed by a
/// formula.
fn parse_target(tokens: &mut TokenIter) -> ParseResult<ConversionTarget> {
    match tokens.next() {
        Some((Token::Unit(unit), _)) => {
            let formula = match eat(tokens, |t| matches!(t, Token::Formula(_))) {
                Some((Token::Formula(f), _)) => Some(f.clone()),
                _ => None,
            };
            Ok(ConversionTarget { unit: Some(unit.clone()),
                                  formula })
        },
        Some((Token::Formula(formula), _)) => Ok(ConversionTarget { unit:    None,
                                                                    formula:
                                                                        Some(formula.clone()), }),
        Some((Token::Id(word), line)) => Err(ParseError::UnknownUnit { word: word.clone(),
                                                                       line: *line, }),
        Some((token, line)) => {
            Err(ParseError::UnexpectedToken { token: format!("expected unit or formula after \
                                                              '->', found {}",
                                                             token.describe()),
                                              line:  *line, })
        },
        None => Err(ParseError::UnexpectedEndOfInput { line: 0 }),
    }
}

fn parse_unary(tokens: &mut TokenIter) -> ParseResult<Expr> {
    let operator = |t: &Token| match t {
        Token::Plus => Some(UnaryOperator::Identity),
        Token::Minus => Some(UnaryOperator::Negate),
        Token::Tilde => Some(UnaryOperator::Invert),
        Token::Bang => Some(UnaryOperator::Not),
        _ => None,
    };

    if let Some((token, line)) = eat(tokens, |t| operator(t).is_some()) {
        let op = operator(token).expect("matched");
        let expr = parse_unary(tokens)?;
        return Ok(Expr::Unary { op,
                                expr: Box::new(expr),
                                line: *line });
    }
    parse_exp(tokens)
}

/// Parses exponentiation. Right-associative; `^{expr}` braces a full
/// expression as the exponent.
fn parse_exp(tokens: &mut TokenIter) -> ParseResult<Expr> {
    let left = parse_call(tokens)?;

    if let Some((_, line)) = eat(tokens, |t| matches!(t, Token::Caret | Token::StarStar)) {
        let right = if eat(tokens, |t| matches!(t, Token::LBrace)).is_some() {
            let inner = parse_expression(tokens)?;
            expect(tokens, |t| matches!(t, Token::RBrace), "'}' after exponent")?;
            inner
        } else {
            parse_exp(tokens)?
        };
        return Ok(Expr::Binary { left:  Box::new(left),
                                 op:    BinaryOperator::Pow,
                                 right: Box::new(right),
                                 line:  *line, });
    }
    Ok(left)
}

fn parse_call(tokens: &mut TokenIter) -> ParseResult<Expr> {
    let mut callee = parse_atom(tokens)?;

    while let Some((_, line)) = eat(tokens, |t| matches!(t, Token::LParen)) {
        let mut arguments = Vec::new();
        if !check(tokens, |t| matches!(t, Token::RParen)) {
            arguments.push(parse_expression(tokens)?);
            while eat(tokens, |t| matches!(t, Token::Comma)).is_some() {
                arguments.push(parse_expression(tokens)?);
            }
        }
        expect(tokens, |t| matches!(t, Token::RParen), "')' after arguments")?;
        callee = Expr::Call { callee: Box::new(callee),
                              arguments,
                              line: *line };
    }
    Ok(callee)
}

fn parse_atom(tokens: &mut TokenIter) -> ParseResult<Expr> {
    match tokens.next() {
        Some((Token::Num(number), line)) => {
            // A number may be annotated with a unit and a formula; a bare
            // formula annotation reads as grams-per-mole of that species.
            let mut unit_part = None;
            if let Some((Token::Unit(u), _)) = eat(tokens, |t| matches!(t, Token::Unit(_))) {
                unit_part = Some(u.clone());
            }
            let mut formula = None;
            if let Some((Token::Formula(f), _)) = eat(tokens, |t| matches!(t, Token::Formula(_))) {
                formula = Some(f.clone());
            }
            let unit_part = match (unit_part, &formula) {
                (Some(u), _) => u,
                (None, Some(_)) => unit::gram_per_mole(),
                (None, None) => unit::Unit::dimensionless(),
            };
            Ok(Expr::Literal { value: LiteralValue::Quantity(Quantity::new(number.clone(),
                                                                           unit_part,
                                                                           formula)),
                               line:  *line, })
        },
        Some((Token::Str(s), line)) => Ok(Expr::Literal { value: LiteralValue::Str(s.clone()),
                                                          line:  *line, }),
        Some((Token::Path(p), line)) => Ok(Expr::Literal { value: LiteralValue::Path(p.clone()),
                                                           line:  *line, }),
        Some((Token::Na, line)) => Ok(Expr::Literal { value: LiteralValue::Na,
                                                      line:  *line, }),
        Some((Token::Pass, line)) => Ok(Expr::Literal { value: LiteralValue::Bool(true),
                                                        line:  *line, }),
        Some((Token::Fail, line)) => Ok(Expr::Literal { value: LiteralValue::Bool(false),
                                                        line:  *line, }),
        Some((Token::Id(name), line)) => Ok(Expr::Variable { name: name.clone(),
                                                             line: *line, }),
        Some((Token::Formula(formula), line)) => Ok(Expr::Formula { formula: formula.clone(),
                                                                    line:    *line, }),
        Some((Token::LParen, _)) => {
            let expr = parse_expression(tokens)?;
            expect(tokens, |t| matches!(t, Token::RParen), "')'")?;
            Ok(expr)
        },
        Some((token, line)) => {
            Err(ParseError::UnexpectedToken { token: format!("expected expression, found {}",
                                                             token.describe()),
                                              line:  *line, })
        },
        None => Err(ParseError::UnexpectedEndOfInput { line: 0 }),
    }
}

/// Whether the token after the next one is a path literal; distinguishes
/// the file sink `-> |path|` from a conversion `-> unit`.
fn next_is_path(tokens: &TokenIter) -> bool {
    let mut lookahead = tokens.clone();
    lookahead.next();
    matches!(lookahead.peek(), Some((Token::Path(_), _)))
}
