use std::str::FromStr;

use rust_decimal::Decimal;

use crate::util::digits::{count_sig_figs, format_places, format_sig, sig_figs_after_rounding};

/// Failures the raw numeric engine can produce.
///
/// The engine knows nothing about source locations or units; callers attach
/// those when they translate a `NumberError` into a runtime error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberError {
    /// Division or modulo by zero.
    DivisionByZero,
    /// The result does not fit the 96-bit decimal representation.
    Overflow,
    /// The operation left the real domain (e.g. `ln` of a negative number).
    NotRepresentable,
}

/// A decimal magnitude with significant-figure tracking.
///
/// The stored value always carries the full working precision of the
/// underlying 96-bit decimal; `sig_figs` only records how many digits of it
/// are trustworthy. `None` marks an exact value (integer literals, counts,
/// stoichiometric coefficients) that never limits a result's precision.
///
/// Additive results additionally record `decimals`, the decimal-place count
/// of the coarser operand. Such results display rounded to that many
/// places: `1.2345 - 1.2` prints `0.0`.
///
/// Rounding happens at display time only.
#[derive(Debug, Clone)]
pub struct ChNumber {
    pub value:    Decimal,
    pub sig_figs: Option<u32>,
    pub decimals: Option<u32>,
}

impl ChNumber {
    #[must_use]
    pub const fn new(value: Decimal, sig_figs: Option<u32>) -> Self {
        Self { value,
               sig_figs,
               decimals: None }
    }

    /// An exact value with unlimited significance.
    #[must_use]
    pub const fn exact(value: Decimal) -> Self {
        Self { value,
               sig_figs: None,
               decimals: None }
    }

    /// Builds a number from literal text, reading its significance off the
    /// spelling. Integer literals are exact.
    ///
    /// # Examples
    /// ```
    /// use chemlang::interpreter::value::number::ChNumber;
    ///
    /// assert_eq!(ChNumber::from_literal("1.2345").unwrap().sig_figs, Some(5));
    /// assert_eq!(ChNumber::from_literal("42").unwrap().sig_figs, None);
    /// ```
    pub fn from_literal(text: &str) -> Result<Self, NumberError> {
        let cleaned = text.replace('_', "");
        let value = if cleaned.contains(['e', 'E']) {
            Decimal::from_scientific(&cleaned).map_err(|_| NumberError::Overflow)?
        } else {
            Decimal::from_str(&cleaned).map_err(|_| NumberError::Overflow)?
        };

        let sig_figs = if cleaned.contains(['.', 'e', 'E']) {
            Some(count_sig_figs(text))
        } else {
            None
        };
        Ok(Self::new(value, sig_figs))
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    #[must_use]
    pub fn is_integer(&self) -> bool {
        self.value.fract().is_zero()
    }

    /// The value as an `i64`, when it is integral and in range.
    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        if self.is_integer() { self.value.trunc().try_into().ok() } else { None }
    }

    /// Addition. The full-precision sum is kept; its significance is read
    /// off the sum rounded to the coarser operand's decimal places.
    pub fn add(&self, other: &Self) -> Result<Self, NumberError> {
        let sum = self.value.checked_add(other.value).ok_or(NumberError::Overflow)?;
        Ok(self.additive_result(other, sum))
    }

    /// Subtraction, with the same decimal-place rule as addition.
    pub fn sub(&self, other: &Self) -> Result<Self, NumberError> {
        let diff = self.value.checked_sub(other.value).ok_or(NumberError::Overflow)?;
        Ok(self.additive_result(other, diff))
    }

    /// The result keeps the full-precision value; `decimals` records the
    /// coarser operand's decimal places for display, and `sig_figs` is read
    /// off the value rounded to those places so multiplicative propagation
    /// still works.
    fn additive_result(&self, other: &Self, value: Decimal) -> Self {
        if self.sig_figs.is_none() && other.sig_figs.is_none() {
            return Self::exact(value);
        }
        let places = self.value.scale().min(other.value.scale());
        Self { value,
               sig_figs: Some(sig_figs_after_rounding(&value, places)),
               decimals: Some(places) }
    }

    /// Multiplication; the result keeps the lesser significance.
    pub fn mul(&self, other: &Self) -> Result<Self, NumberError> {
        let product = self.value.checked_mul(other.value).ok_or(NumberError::Overflow)?;
        Ok(Self::new(product, merge_sig(self.sig_figs, other.sig_figs)))
    }

    /// Division; the result keeps the lesser significance.
    pub fn div(&self, other: &Self) -> Result<Self, NumberError> {
        if other.value.is_zero() {
            return Err(NumberError::DivisionByZero);
        }
        let quotient = self.value.checked_div(other.value).ok_or(NumberError::Overflow)?;
        Ok(Self::new(quotient, merge_sig(self.sig_figs, other.sig_figs)))
    }

    /// Remainder, carrying the sign of the dividend.
    pub fn rem(&self, other: &Self) -> Result<Self, NumberError> {
        if other.value.is_zero() {
            return Err(NumberError::DivisionByZero);
        }
        let rest = self.value.checked_rem(other.value).ok_or(NumberError::Overflow)?;
        Ok(Self::new(rest, merge_sig(self.sig_figs, other.sig_figs)))
    }

    /// Integer exponentiation by repeated multiplication. Negative exponents
    /// invert the result.
    pub fn powi(&self, exponent: i64, exponent_sig: Option<u32>) -> Result<Self, NumberError> {
        let mut result = Decimal::ONE;
        for _ in 0..exponent.unsigned_abs() {
            result = result.checked_mul(self.value).ok_or(NumberError::Overflow)?;
        }
        if exponent < 0 {
            if result.is_zero() {
                return Err(NumberError::DivisionByZero);
            }
            result = Decimal::ONE.checked_div(result).ok_or(NumberError::Overflow)?;
        }
        Ok(Self::new(result, merge_sig(self.sig_figs, exponent_sig)))
    }

    /// Applies an `f64` function to the value, preserving significance.
    ///
    /// The round-trip goes through the decimal's string form, so the f64
    /// value itself converts without extra loss. Non-finite results are
    /// rejected.
    pub fn map_f64(&self, f: impl Fn(f64) -> f64) -> Result<Self, NumberError> {
        let x: f64 = self.value
                         .to_string()
                         .parse()
                         .map_err(|_| NumberError::NotRepresentable)?;
        let y = f(x);
        if !y.is_finite() {
            return Err(NumberError::NotRepresentable);
        }
        let value = Decimal::from_str(&y.to_string()).or_else(|_| {
                                                         Decimal::from_scientific(&y.to_string())
                                                     })
                                                     .map_err(|_| NumberError::Overflow)?;
        Ok(Self::new(value, self.sig_figs))
    }

    #[must_use]
    pub fn neg(&self) -> Self {
        Self { value:    -self.value,
               sig_figs: self.sig_figs,
               decimals: self.decimals, }
    }

    #[must_use]
    pub fn abs(&self) -> Self {
        Self { value:    self.value.abs(),
               sig_figs: self.sig_figs,
               decimals: self.decimals, }
    }
}

/// The lesser of two significances, treating `None` as unlimited.
fn merge_sig(a: Option<u32>, b: Option<u32>) -> Option<u32> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (Some(x), None) | (None, Some(x)) => Some(x),
        (None, None) => None,
    }
}

impl PartialEq for ChNumber {
    /// Numbers compare by magnitude alone; significance is display metadata.
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialOrd for ChNumber {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl From<i64> for ChNumber {
    fn from(value: i64) -> Self {
        Self::exact(Decimal::from(value))
    }
}

impl std::fmt::Display for ChNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(places) = self.decimals {
            return write!(f, "{}", format_places(&self.value, places));
        }
        match self.sig_figs {
            Some(sig) => write!(f, "{}", format_sig(&self.value, sig)),
            None => write!(f, "{}", self.value.normalize()),
        }
    }
}
