use crate::{
    interpreter::{
        parser::utils::{ParseResult, TokenIter, eat, expect},
        scanner::Token,
        value::{formula::Formula, reaction::Reaction},
    },
};

/// Parses the comma-separated reaction list between `:…:`, consuming the
/// closing colon.
///
/// Inside a reaction, `->` separates reactants from products and never
/// chains conversions; the surrounding colons keep the two grammars apart.
pub fn parse_reactions(tokens: &mut TokenIter) -> ParseResult<Vec<Reaction>> {
    let mut reactions = vec![parse_reaction(tokens)?];
    while eat(tokens, |t| matches!(t, Token::Comma)).is_some() {
        reactions.push(parse_reaction(tokens)?);
    }
    expect(tokens, |t| matches!(t, Token::Colon), "':' after reactions")?;
    Ok(reactions)
}

/// Parses one reaction skeleton: `F (+ F)* -> F (+ F)*`.
fn parse_reaction(tokens: &mut TokenIter) -> ParseResult<Reaction> {
    let reactants = parse_side(tokens, "reactant")?;
    expect(tokens, |t| matches!(t, Token::Arrow), "'->' after reactants")?;
    let products = parse_side(tokens, "product")?;
    Ok(Reaction { reactants, products })
}

fn parse_side(tokens: &mut TokenIter, role: &str) -> ParseResult<Vec<Formula>> {
    let mut side = vec![expect_formula(tokens, role)?];
    while eat(tokens, |t| matches!(t, Token::Plus)).is_some() {
        side.push(expect_formula(tokens, role)?);
    }
    Ok(side)
}

fn expect_formula(tokens: &mut TokenIter, role: &str) -> ParseResult<Formula> {
    let (token, _) = expect(tokens, |t| matches!(t, Token::Formula(_)), role)?;
    match token {
        Token::Formula(formula) => Ok(formula.clone()),
        _ => unreachable!("expect checked the variant"),
    }
}
