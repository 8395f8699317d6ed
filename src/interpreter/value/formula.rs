use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::{
    interpreter::value::periodic::{atomic_weight, is_element},
    util::digits::{subscript, superscript},
};

/// Failures of the chemical-formula scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormulaError {
    /// A symbol that is not in the periodic table.
    UnknownElement(String),
    /// A parenthesized group was opened but never closed.
    UnmatchedParenthesis,
    /// A parenthesized group without a following count.
    MissingGroupCount,
    /// A `_{…}` or `^{…}` script that is not a valid number or charge.
    InvalidScript(String),
    /// Text remained after a full-string parse.
    Trailing(String),
}

impl std::fmt::Display for FormulaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownElement(symbol) => write!(f, "unknown element '{symbol}'"),
            Self::UnmatchedParenthesis => write!(f, "unmatched '(' in formula"),
            Self::MissingGroupCount => write!(f, "expected a count after ')'"),
            Self::InvalidScript(text) => write!(f, "invalid subscript or superscript '{text}'"),
            Self::Trailing(text) => write!(f, "unexpected '{text}' after formula"),
        }
    }
}

/// One printed component of a formula: an element with a count, or a
/// parenthesized group with a count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormulaTerm {
    Element { symbol: String, count: u64 },
    Group { terms: Vec<FormulaTerm>, count: u64 },
}

/// A chemical formula: the written terms plus a net charge.
///
/// Two formulas are equal when their flattened element multisets and
/// charges agree, so `H2O` and `OH2` compare equal while printing
/// differently.
#[derive(Debug, Clone, Eq)]
pub struct Formula {
    pub terms:  Vec<FormulaTerm>,
    pub charge: i64,
}

impl Formula {
    /// The flattened element → count map, with group counts multiplied
    /// through.
    ///
    /// # Examples
    /// ```
    /// use chemlang::interpreter::value::formula::parse_formula;
    ///
    /// let nitrate = parse_formula("Fe(NO3)_{2}").unwrap();
    /// let counts = nitrate.composition();
    /// assert_eq!(counts.get("Fe"), Some(&1));
    /// assert_eq!(counts.get("N"), Some(&2));
    /// assert_eq!(counts.get("O"), Some(&6));
    /// ```
    #[must_use]
    pub fn composition(&self) -> BTreeMap<String, u64> {
        let mut counts = BTreeMap::new();
        accumulate(&self.terms, 1, &mut counts);
        counts
    }

    /// The molar mass in g/mol: Σ count × standard atomic weight.
    pub fn molar_mass(&self) -> Result<Decimal, FormulaError> {
        let mut total = Decimal::ZERO;
        for (symbol, count) in self.composition() {
            let weight =
                atomic_weight(&symbol).ok_or_else(|| FormulaError::UnknownElement(symbol))?;
            total += weight * Decimal::from(count);
        }
        Ok(total)
    }

    /// The count of one element across the whole formula.
    #[must_use]
    pub fn count_of(&self, symbol: &str) -> u64 {
        self.composition().get(symbol).copied().unwrap_or(0)
    }
}

fn accumulate(terms: &[FormulaTerm], multiplier: u64, counts: &mut BTreeMap<String, u64>) {
    for term in terms {
        match term {
            FormulaTerm::Element { symbol, count } => {
                *counts.entry(symbol.clone()).or_insert(0) += count * multiplier;
            },
            FormulaTerm::Group { terms, count } => {
                accumulate(terms, count * multiplier, counts);
            },
        }
    }
}

impl PartialEq for Formula {
    fn eq(&self, other: &Self) -> bool {
        self.charge == other.charge && self.composition() == other.composition()
    }
}

impl std::fmt::Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for term in &self.terms {
            write!(f, "{term}")?;
        }
        if self.charge != 0 {
            let magnitude = self.charge.unsigned_abs();
            if magnitude != 1 {
                write!(f, "{}", superscript(magnitude as i64))?;
            }
            write!(f, "{}", if self.charge > 0 { '⁺' } else { '⁻' })?;
        }
        Ok(())
    }
}

impl std::fmt::Display for FormulaTerm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Element { symbol, count } => {
                write!(f, "{symbol}")?;
                if *count != 1 {
                    write!(f, "{}", subscript(*count))?;
                }
                Ok(())
            },
            Self::Group { terms, count } => {
                write!(f, "(")?;
                for term in terms {
                    write!(f, "{term}")?;
                }
                write!(f, "){}", subscript(*count))
            },
        }
    }
}

/// Parses a complete formula string, rejecting trailing input.
///
/// # Examples
/// ```
/// use chemlang::interpreter::value::formula::parse_formula;
///
/// assert_eq!(parse_formula("H2O").unwrap(), parse_formula("OH2").unwrap());
/// assert_eq!(parse_formula("H2O^{2+}").unwrap().charge, 2);
/// assert!(parse_formula("Xq2").is_err());
/// ```
pub fn parse_formula(src: &str) -> Result<Formula, FormulaError> {
    match scan_formula(src)? {
        Some((formula, consumed)) if consumed == src.len() => Ok(formula),
        Some((_, consumed)) => Err(FormulaError::Trailing(src[consumed..].to_string())),
        None => Err(FormulaError::UnknownElement(src.to_string())),
    }
}

/// Scans a formula prefix of `src`.
///
/// Returns `Ok(None)` when the text is not a formula at all (the caller
/// falls back to treating it as an identifier): no leading element matches,
/// or the scanned formula runs into further identifier characters
/// (`Care` is an identifier, not calcium + residue).
///
/// Returns an error only for text that is unambiguously a malformed formula,
/// such as an unclosed parenthesized group.
pub fn scan_formula(src: &str) -> Result<Option<(Formula, usize)>, FormulaError> {
    let bytes = src.as_bytes();
    let mut pos = 0;
    let mut charge = 0i64;

    let Some(terms) = scan_terms(bytes, src, &mut pos, &mut charge, true)? else {
        return Ok(None);
    };

    // A formula followed by more word characters was an identifier all
    // along.
    if pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_') {
        return Ok(None);
    }

    Ok(Some((Formula { terms, charge }, pos)))
}

fn scan_terms(bytes: &[u8],
              src: &str,
              pos: &mut usize,
              charge: &mut i64,
              top_level: bool)
              -> Result<Option<Vec<FormulaTerm>>, FormulaError> {
    let mut terms = Vec::new();

    loop {
        match bytes.get(*pos) {
            Some(b'(') => {
                *pos += 1;
                let inner = scan_terms(bytes, src, pos, charge, false)?
                    .ok_or(FormulaError::UnmatchedParenthesis)?;
                if bytes.get(*pos) != Some(&b')') {
                    return Err(FormulaError::UnmatchedParenthesis);
                }
                *pos += 1;

                let count = scan_subscript(bytes, src, pos)?.ok_or(FormulaError::MissingGroupCount)?;
                if let Some(delta) = scan_superscript(bytes, src, pos)? {
                    *charge += delta;
                }
                terms.push(FormulaTerm::Group { terms: inner, count });
            },
            Some(b')') if !top_level => break,
            Some(c) if c.is_ascii_uppercase() => {
                let Some(symbol) = scan_element_symbol(bytes, src, pos) else {
                    break;
                };
                let count = scan_subscript(bytes, src, pos)?.unwrap_or(1);
                if let Some(delta) = scan_superscript(bytes, src, pos)? {
                    *charge += delta;
                }
                terms.push(FormulaTerm::Element { symbol, count });
            },
            _ => break,
        }
    }

    if terms.is_empty() { Ok(None) } else { Ok(Some(terms)) }
}

/// Matches an element symbol greedily: a two-letter symbol wins over a
/// one-letter one (`Hg` over `H`), and both are validated against the
/// periodic table.
fn scan_element_symbol(bytes: &[u8], src: &str, pos: &mut usize) -> Option<String> {
    let first = *bytes.get(*pos)? as char;

    if let Some(&second) = bytes.get(*pos + 1)
       && second.is_ascii_lowercase()
    {
        let candidate = &src[*pos..*pos + 2];
        if is_element(candidate) {
            *pos += 2;
            return Some(candidate.to_string());
        }
    }

    if is_element(&first.to_string()) {
        *pos += 1;
        return Some(first.to_string());
    }
    None
}

/// Scans a subscript in any of its three spellings: `_{n}`, `_n`, or a bare
/// trailing integer. Returns `None` when no subscript is present.
fn scan_subscript(bytes: &[u8],
                  src: &str,
                  pos: &mut usize)
                  -> Result<Option<u64>, FormulaError> {
    if bytes.get(*pos) == Some(&b'_') {
        *pos += 1;
        let text = scan_script_body(bytes, src, pos)?;
        let count = text.parse().map_err(|_| FormulaError::InvalidScript(text))?;
        return Ok(Some(count));
    }

    let digits = scan_digits(bytes, src, pos);
    if digits.is_empty() {
        return Ok(None);
    }
    digits.parse()
          .map(Some)
          .map_err(|_| FormulaError::InvalidScript(digits))
}

/// Scans a superscript charge: `^{2+}`, `^{3-}`, `^2`, `^+`. The sign may
/// precede or follow the digits; a bare sign means ±1, bare digits a
/// positive charge.
fn scan_superscript(bytes: &[u8],
                    src: &str,
                    pos: &mut usize)
                    -> Result<Option<i64>, FormulaError> {
    if bytes.get(*pos) != Some(&b'^') {
        return Ok(None);
    }
    *pos += 1;
    let text = scan_script_body(bytes, src, pos)?;
    match parse_charge(&text) {
        Some(charge) => Ok(Some(charge)),
        None => Err(FormulaError::InvalidScript(text)),
    }
}

fn scan_script_body(bytes: &[u8], src: &str, pos: &mut usize) -> Result<String, FormulaError> {
    if bytes.get(*pos) == Some(&b'{') {
        *pos += 1;
        let start = *pos;
        while let Some(&c) = bytes.get(*pos) {
            if c == b'}' {
                let body = src[start..*pos].to_string();
                *pos += 1;
                return Ok(body);
            }
            *pos += 1;
        }
        return Err(FormulaError::UnmatchedParenthesis);
    }

    let mut body = String::new();
    if matches!(bytes.get(*pos), Some(b'+' | b'-')) {
        body.push(bytes[*pos] as char);
        *pos += 1;
    }
    body.push_str(&scan_digits(bytes, src, pos));
    if body.is_empty() {
        return Err(FormulaError::InvalidScript(String::new()));
    }
    Ok(body)
}

fn scan_digits(bytes: &[u8], src: &str, pos: &mut usize) -> String {
    let start = *pos;
    while matches!(bytes.get(*pos), Some(c) if c.is_ascii_digit()) {
        *pos += 1;
    }
    src[start..*pos].to_string()
}

fn parse_charge(text: &str) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let (sign, digits) = if let Some(rest) = text.strip_suffix('+') {
        (1, rest)
    } else if let Some(rest) = text.strip_suffix('-') {
        (-1, rest)
    } else if let Some(rest) = text.strip_prefix('+') {
        (1, rest)
    } else if let Some(rest) = text.strip_prefix('-') {
        (-1, rest)
    } else {
        (1, text)
    };

    if digits.is_empty() {
        return Some(sign);
    }
    digits.parse::<i64>().ok().map(|n| sign * n)
}
