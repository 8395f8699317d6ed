use once_cell::sync::Lazy;
use rust_decimal::Decimal;

use crate::{
    error::RuntimeError,
    interpreter::value::{
        formula::Formula,
        number::{ChNumber, NumberError},
        unit::{AMOUNT, ATOM, MASS, TEMPERATURE, Unit},
    },
};

/// Avogadro's number, the exact 2019 SI definition.
static AVOGADRO: Lazy<Decimal> =
    Lazy::new(|| Decimal::from_scientific("6.02214076e23").expect("constant parses"));

/// Translates a raw numeric failure into a located runtime error.
pub fn number_error(error: NumberError, line: usize) -> RuntimeError {
    match error {
        NumberError::DivisionByZero => RuntimeError::DivisionByZero { line },
        NumberError::Overflow => RuntimeError::TypeError { details: "numeric overflow".to_string(),
                                                           line },
        NumberError::NotRepresentable => {
            RuntimeError::TypeError { details: "result is not a real number".to_string(),
                                      line }
        },
    }
}

/// The universal numeric value: a magnitude, a unit and an optional
/// chemical formula.
///
/// A plain scalar is a `Quantity` with a dimensionless unit and no formula.
/// All operator semantics (unit reconciliation, significant-figure
/// propagation, formula compatibility) live here.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    pub number:  ChNumber,
    pub unit:    Unit,
    pub formula: Option<Formula>,
}

/// The conversion classes a formula-mediated hop can move between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HopClass {
    Mass,
    Amount,
    AtomCount,
}

impl Quantity {
    #[must_use]
    pub const fn new(number: ChNumber, unit: Unit, formula: Option<Formula>) -> Self {
        Self { number, unit, formula }
    }

    /// A dimensionless, formula-less scalar.
    #[must_use]
    pub fn scalar(number: ChNumber) -> Self {
        Self { number,
               unit: Unit::dimensionless(),
               formula: None }
    }

    /// Whether this is a bare number: dimensionless and formula-less.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        self.unit.is_dimensionless() && self.formula.is_none()
    }

    #[must_use]
    pub fn is_truthy(&self) -> bool {
        !self.number.is_zero()
    }

    /// Reconciles two operands for additive and comparison operators.
    ///
    /// The left operand dominates: the right is converted into its unit
    /// (with a formula-mediated hop when the dimensions differ), after the
    /// formulas are checked for compatibility. A bare scalar on either side
    /// escalates to the other side's unit and formula instead.
    fn align(left: &Self, right: &Self, line: usize) -> Result<(Self, Self), RuntimeError> {
        if left.is_scalar() && !right.is_scalar() {
            let (dominant, escalated) = Self::align(right, left, line)?;
            return Ok((escalated, dominant));
        }

        if let (Some(lf), Some(rf)) = (&left.formula, &right.formula)
           && lf != rf
        {
            return Err(RuntimeError::IncompatibleFormulas { left: lf.to_string(),
                                                            right: rf.to_string(),
                                                            line });
        }

        if right.unit == left.unit {
            return Ok((left.clone(), right.clone()));
        }

        if right.is_scalar() {
            let escalated = Self { number:  right.number.clone(),
                                   unit:    left.unit.clone(),
                                   formula: left.formula.clone(), };
            return Ok((left.clone(), escalated));
        }

        let hop = right.formula.as_ref().or(left.formula.as_ref());
        let converted = right.convert(&left.unit, hop, line)?;
        Ok((left.clone(), converted))
    }

    /// Addition. The output takes the left operand's unit and formula; the
    /// result's decimal places are the minimum of the operands' after
    /// conversion.
    pub fn add(&self, other: &Self, line: usize) -> Result<Self, RuntimeError> {
        let (l, r) = Self::align(self, other, line)?;
        let number = l.number.add(&r.number).map_err(|e| number_error(e, line))?;
        Ok(Self { number,
                  unit: l.unit,
                  formula: l.formula.or(r.formula) })
    }

    /// Subtraction, with the same reconciliation as addition.
    pub fn sub(&self, other: &Self, line: usize) -> Result<Self, RuntimeError> {
        let (l, r) = Self::align(self, other, line)?;
        let number = l.number.sub(&r.number).map_err(|e| number_error(e, line))?;
        Ok(Self { number,
                  unit: l.unit,
                  formula: l.formula.or(r.formula) })
    }

    /// Multiplication: magnitudes and units multiply. A formula survives
    /// only against a dimensionless partner.
    pub fn mul(&self, other: &Self, line: usize) -> Result<Self, RuntimeError> {
        let number = self.number.mul(&other.number).map_err(|e| number_error(e, line))?;
        let unit = self.unit.mul(&other.unit);
        let formula = match (&self.formula, &other.formula) {
            (Some(f), None) if other.unit.is_dimensionless() => Some(f.clone()),
            (None, Some(f)) if self.unit.is_dimensionless() => Some(f.clone()),
            _ => None,
        };
        Ok(Self { number, unit, formula })
    }

    /// Division: magnitudes and units divide. Equal formulas cancel;
    /// unequal formulas are an error.
    pub fn div(&self, other: &Self, line: usize) -> Result<Self, RuntimeError> {
        let number = self.number.div(&other.number).map_err(|e| number_error(e, line))?;
        let unit = self.unit.div(&other.unit);
        let formula = match (&self.formula, &other.formula) {
            (Some(a), Some(b)) => {
                if a == b {
                    None
                } else {
                    return Err(RuntimeError::IncompatibleFormulas { left: a.to_string(),
                                                                    right: b.to_string(),
                                                                    line });
                }
            },
            (Some(f), None) if other.unit.is_dimensionless() => Some(f.clone()),
            _ => None,
        };
        Ok(Self { number, unit, formula })
    }

    /// Remainder. Units and formulas must match exactly; the result keeps
    /// the sign of the dividend.
    pub fn rem(&self, other: &Self, line: usize) -> Result<Self, RuntimeError> {
        if self.unit != other.unit {
            return Err(RuntimeError::IncompatibleUnits { from: other.unit.to_string(),
                                                         to: self.unit.to_string(),
                                                         line });
        }
        if self.formula != other.formula {
            return Err(RuntimeError::IncompatibleFormulas { left:  format_formula(&self.formula),
                                                            right: format_formula(&other.formula),
                                                            line, });
        }
        let number = self.number.rem(&other.number).map_err(|e| number_error(e, line))?;
        Ok(Self { number,
                  unit: self.unit.clone(),
                  formula: self.formula.clone() })
    }

    /// Exponentiation. The exponent must be a bare scalar; integer
    /// exponents scale the unit's dimension vector, anything else requires
    /// a dimensionless base.
    pub fn pow(&self, exponent: &Self, line: usize) -> Result<Self, RuntimeError> {
        if !exponent.is_scalar() {
            return Err(RuntimeError::TypeError { details:
                                                     "exponent must be a dimensionless scalar"
                                                         .to_string(),
                                                 line });
        }

        if exponent.number.is_integer() {
            let n = exponent.number.to_i64().filter(|n| i8::try_from(*n).is_ok()).ok_or_else(
                || RuntimeError::TypeError { details: "exponent is too large".to_string(), line },
            )?;
            let number = self.number
                             .powi(n, exponent.number.sig_figs)
                             .map_err(|e| number_error(e, line))?;
            let formula = if n == 1 { self.formula.clone() } else { None };
            return Ok(Self { number,
                             unit: self.unit.powi(n as i8),
                             formula });
        }

        if !self.is_scalar() {
            return Err(RuntimeError::TypeError { details:
                                                     "only dimensionless scalars can take \
                                                      non-integer powers"
                                                         .to_string(),
                                                 line });
        }
        let exp: f64 = exponent.number
                               .value
                               .to_string()
                               .parse()
                               .map_err(|_| number_error(NumberError::NotRepresentable, line))?;
        let number = self.number
                         .map_f64(|x| x.powf(exp))
                         .map_err(|e| number_error(e, line))?;
        Ok(Self::scalar(number))
    }

    /// Ordering comparison after reconciliation.
    pub fn compare(&self, other: &Self, line: usize) -> Result<std::cmp::Ordering, RuntimeError> {
        let (l, r) = Self::align(self, other, line)?;
        l.number
         .partial_cmp(&r.number)
         .ok_or_else(|| RuntimeError::TypeError { details: "values cannot be ordered".to_string(),
                                                  line })
    }

    #[must_use]
    pub fn neg(&self) -> Self {
        Self { number:  self.number.neg(),
               unit:    self.unit.clone(),
               formula: self.formula.clone(), }
    }

    /// Converts into `target`, either by scale ratio (same dimension) or by
    /// a formula-mediated hop across the mass/moles/atoms boundary.
    ///
    /// The hop keeps the source's significance: molar masses and Avogadro's
    /// number never limit a result's precision.
    pub fn convert(&self,
                   target: &Unit,
                   hop_formula: Option<&Formula>,
                   line: usize)
                   -> Result<Self, RuntimeError> {
        if self.unit == *target {
            return Ok(Self { number:  self.number.clone(),
                             unit:    target.clone(),
                             formula: self.formula.clone(), });
        }

        if self.unit.convertible_to(target) {
            let value = if self.unit.dims.is_pure(TEMPERATURE)
                           && (self.unit.offset.is_some() || target.offset.is_some())
            {
                let kelvin = self.number.value * self.unit.scale
                             + self.unit.offset.unwrap_or_default();
                (kelvin - target.offset.unwrap_or_default()) / target.scale
            } else {
                // Multiplying by the precomputed ratio keeps the scale of
                // the operand: 20.000 m is 0.020000 km, not 0.02 km, and
                // additive sig-fig tracking depends on that.
                let factor = self.unit
                                 .scale
                                 .checked_div(target.scale)
                                 .ok_or_else(|| number_error(NumberError::Overflow, line))?;
                self.number
                    .value
                    .checked_mul(factor)
                    .ok_or_else(|| number_error(NumberError::Overflow, line))?
            };
            return Ok(Self { number:  ChNumber::new(value, self.number.sig_figs),
                             unit:    target.clone(),
                             formula: self.formula.clone(), });
        }

        self.convert_across(target, hop_formula, line)
    }

    /// The mass ↔ moles ↔ atoms chain of a formula-mediated conversion.
    fn convert_across(&self,
                      target: &Unit,
                      hop_formula: Option<&Formula>,
                      line: usize)
                      -> Result<Self, RuntimeError> {
        let incompatible = || RuntimeError::IncompatibleUnits { from: self.unit.to_string(),
                                                                to: target.to_string(),
                                                                line };

        let (Some(from), Some(to)) = (hop_class(&self.unit), hop_class(target)) else {
            return Err(incompatible());
        };
        let formula = hop_formula.ok_or_else(incompatible)?;
        let molar = formula.molar_mass().map_err(|e| {
                                            RuntimeError::UnknownElement { symbol: e.to_string(),
                                                                           line }
                                        })?;

        let base = self.number
                       .value
                       .checked_mul(self.unit.scale)
                       .ok_or_else(|| number_error(NumberError::Overflow, line))?;
        let hopped = apply_hop(base, from, to, molar, line)?;
        let value = Decimal::ONE
            .checked_div(target.scale)
            .and_then(|inverse| hopped.checked_mul(inverse))
            .ok_or_else(|| number_error(NumberError::Overflow, line))?;

        Ok(Self { number:  ChNumber::new(value, self.number.sig_figs),
                  unit:    target.clone(),
                  formula: self.formula.clone(), })
    }
}

fn hop_class(unit: &Unit) -> Option<HopClass> {
    if unit.dims.is_pure(MASS) {
        Some(HopClass::Mass)
    } else if unit.dims.is_pure(AMOUNT) {
        Some(HopClass::Amount)
    } else if unit.dims.is_pure(ATOM) {
        Some(HopClass::AtomCount)
    } else {
        None
    }
}

fn apply_hop(base: Decimal,
             from: HopClass,
             to: HopClass,
             molar: Decimal,
             line: usize)
             -> Result<Decimal, RuntimeError> {
    use HopClass::{Amount, AtomCount, Mass};

    let overflow = || number_error(NumberError::Overflow, line);
    let div = |a: Decimal, b: Decimal| a.checked_div(b).ok_or_else(overflow);
    let mul = |a: Decimal, b: Decimal| a.checked_mul(b).ok_or_else(overflow);

    match (from, to) {
        (Mass, Amount) => div(base, molar),
        (Amount, Mass) => mul(base, molar),
        (Amount, AtomCount) => mul(base, *AVOGADRO),
        (AtomCount, Amount) => div(base, *AVOGADRO),
        (Mass, AtomCount) => mul(div(base, molar)?, *AVOGADRO),
        (AtomCount, Mass) => mul(div(base, *AVOGADRO)?, molar),
        (Mass, Mass) | (Amount, Amount) | (AtomCount, AtomCount) => Ok(base),
    }
}

fn format_formula(formula: &Option<Formula>) -> String {
    formula.as_ref().map_or_else(|| "no formula".to_string(), ToString::to_string)
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number)?;
        if !self.unit.is_dimensionless() {
            write!(f, " {}", self.unit)?;
        }
        if let Some(formula) = &self.formula {
            write!(f, " {formula}")?;
        }
        Ok(())
    }
}
