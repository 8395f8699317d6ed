use rust_decimal::{Decimal, RoundingStrategy};

/// Rounding strategy applied whenever a magnitude is rounded for display.
///
/// Exact midpoint ties round toward zero; every other value rounds to
/// nearest. `28.015` rendered with two decimal places therefore prints
/// `28.01`.
pub const DISPLAY_ROUNDING: RoundingStrategy = RoundingStrategy::MidpointTowardZero;

/// Counts the significant figures of a numeric literal as written.
///
/// The rules follow the usual chemistry conventions:
/// - `1.2345` has five significant figures, `2.0` has two.
/// - Without a decimal point, trailing zeros do not count: `100` has one.
/// - Leading zeros never count: `0.0025` has two.
/// - In scientific notation only the mantissa counts: `1.20e5` has three.
///
/// # Examples
/// ```
/// use chemlang::util::digits::count_sig_figs;
///
/// assert_eq!(count_sig_figs("1.2345"), 5);
/// assert_eq!(count_sig_figs("2.0"), 2);
/// assert_eq!(count_sig_figs("0.0025"), 2);
/// assert_eq!(count_sig_figs("100"), 1);
/// ```
#[must_use]
pub fn count_sig_figs(literal: &str) -> u32 {
    let s = literal.replace('_', "");
    let s = s.trim_start_matches('-');

    if let Some(idx) = s.find(['e', 'E']) {
        let mantissa = &s[..idx];
        return count(mantissa.replace('.', "").trim_start_matches('0'));
    }

    match s.split_once('.') {
        None => count(s.trim_start_matches('0').trim_end_matches('0')),
        Some((int_part, dec_part)) => {
            let int_part = int_part.trim_start_matches('0');
            if int_part.is_empty() {
                count(dec_part.trim_start_matches('0'))
            } else {
                count(int_part) + dec_part.len() as u32
            }
        },
    }
}

fn count(digits: &str) -> u32 {
    // "0" and "0.000" still carry one significant digit.
    (digits.len() as u32).max(1)
}

/// Counts the significant figures a value has after rounding it to `places`
/// decimal places.
///
/// This is the rule additive operations use: the sum is kept at full
/// precision, but its significance is read off the form rounded to the
/// coarser operand's decimal places.
#[must_use]
pub fn sig_figs_after_rounding(value: &Decimal, places: u32) -> u32 {
    let mut rounded = value.round_dp_with_strategy(places, DISPLAY_ROUNDING);
    rounded.rescale(places);
    count_sig_figs(&rounded.to_string())
}

/// Formats a magnitude to a fixed number of decimal places, padding with
/// zeros. This is how additive results display: `1.2345 - 1.2` keeps one
/// decimal place and prints `0.0`.
#[must_use]
pub fn format_places(value: &Decimal, places: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(places, DISPLAY_ROUNDING);
    rounded.rescale(places.min(28));
    rounded.to_string()
}

/// Formats a magnitude to the given number of significant figures.
///
/// Ordinary values print in positional notation padded to exactly `sig`
/// significant digits. When the magnitude reaches `10^sig`, or is nonzero
/// but below `10⁻⁴`, the scientific form `d.ddd×10ⁿ` is used instead, with
/// a Unicode superscript exponent.
#[must_use]
pub fn format_sig(value: &Decimal, sig: u32) -> String {
    let sig = sig.max(1);
    if value.is_zero() {
        let mut zero = Decimal::ZERO;
        zero.rescale(sig.saturating_sub(1));
        return zero.to_string();
    }

    let exponent = decimal_exponent(value);

    if exponent >= i64::from(sig) || exponent <= -5 {
        format_scientific(value, sig, exponent)
    } else {
        format_positional(value, sig, exponent)
    }
}

fn format_positional(value: &Decimal, sig: u32, exponent: i64) -> String {
    let places = (i64::from(sig) - 1 - exponent).max(0) as u32;
    let mut rounded = value.round_dp_with_strategy(places, DISPLAY_ROUNDING);

    // Rounding can gain a digit (99.96 -> 100.0); re-derive the exponent.
    let new_exponent = decimal_exponent(&rounded);
    if new_exponent >= i64::from(sig) {
        return format_scientific(value, sig, new_exponent);
    }
    let places = (i64::from(sig) - 1 - new_exponent).max(0) as u32;

    rounded.rescale(places.min(28));
    rounded.to_string()
}

fn format_scientific(value: &Decimal, sig: u32, exponent: i64) -> String {
    let mut mantissa = value / pow10(exponent);
    let mut exponent = exponent;

    mantissa = mantissa.round_dp_with_strategy(sig - 1, DISPLAY_ROUNDING);
    if mantissa.abs() >= Decimal::TEN {
        mantissa /= Decimal::TEN;
        mantissa = mantissa.round_dp_with_strategy(sig - 1, DISPLAY_ROUNDING);
        exponent += 1;
    }
    mantissa.rescale(sig - 1);

    format!("{mantissa}\u{d7}10{}", superscript(exponent))
}

/// Returns the power-of-ten exponent of the leading digit, i.e.
/// `floor(log10(|value|))` for nonzero values.
fn decimal_exponent(value: &Decimal) -> i64 {
    let abs = value.abs().normalize();
    let digits = abs.mantissa().abs().to_string().len() as i64;
    digits - 1 - i64::from(abs.scale())
}

fn pow10(exponent: i64) -> Decimal {
    if exponent >= 0 {
        Decimal::from_i128_with_scale(10i128.pow(exponent as u32), 0)
    } else {
        Decimal::new(1, (-exponent) as u32)
    }
}

/// Renders an integer with Unicode superscript digits, e.g. `-12` becomes
/// `⁻¹²`.
#[must_use]
pub fn superscript(n: i64) -> String {
    const DIGITS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];

    let mut out = String::new();
    if n < 0 {
        out.push('⁻');
    }
    for c in n.unsigned_abs().to_string().chars() {
        out.push(DIGITS[c.to_digit(10).unwrap() as usize]);
    }
    out
}

/// Renders a positive integer with Unicode subscript digits, e.g. `12`
/// becomes `₁₂`.
#[must_use]
pub fn subscript(n: u64) -> String {
    const DIGITS: [char; 10] = ['₀', '₁', '₂', '₃', '₄', '₅', '₆', '₇', '₈', '₉'];

    n.to_string()
     .chars()
     .map(|c| DIGITS[c.to_digit(10).unwrap() as usize])
     .collect()
}
