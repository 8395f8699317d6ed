use std::collections::BTreeSet;

use num_integer::Integer;
use num_rational::Rational64;
use rust_decimal::Decimal;

use crate::interpreter::value::formula::Formula;

/// A reaction skeleton: reactants and products without coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct Reaction {
    pub reactants: Vec<Formula>,
    pub products:  Vec<Formula>,
}

/// A reaction with the smallest positive integer coefficients satisfying
/// element and charge conservation.
#[derive(Debug, Clone, PartialEq)]
pub struct BalancedReaction {
    pub reactants: Vec<(i64, Formula)>,
    pub products:  Vec<(i64, Formula)>,
}

/// The skeleton admits no unique positive balancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceError;

impl Reaction {
    /// Balances the skeleton by a rational null-space search.
    ///
    /// Builds the conservation matrix (one row per element plus a charge
    /// row; reactant columns positive, product columns negative) and
    /// reduces it. The null space must be one-dimensional; its basis
    /// vector, cleared of denominators and reduced by the gcd, must be
    /// strictly positive. A species that ends up with a zero or negative
    /// coefficient (a typo'd bystander, or an over-determined skeleton)
    /// makes the reaction unbalanceable.
    pub fn balance(&self) -> Result<BalancedReaction, BalanceError> {
        let species: Vec<&Formula> = self.reactants.iter().chain(&self.products).collect();
        if species.len() < 2 {
            return Err(BalanceError);
        }

        let elements: BTreeSet<String> = species.iter()
                                                .flat_map(|f| f.composition().into_keys())
                                                .collect();

        let mut matrix: Vec<Vec<Rational64>> = Vec::with_capacity(elements.len() + 1);
        for element in &elements {
            matrix.push(conservation_row(&species, self.reactants.len(), |f| {
                            f.count_of(element) as i64
                        }));
        }
        matrix.push(conservation_row(&species, self.reactants.len(), |f| f.charge));

        let coefficients = null_space_vector(matrix, species.len()).ok_or(BalanceError)?;
        if coefficients.iter().any(|&c| c <= 0) {
            return Err(BalanceError);
        }

        let (reactant_coeffs, product_coeffs) = coefficients.split_at(self.reactants.len());
        Ok(BalancedReaction { reactants: zip_coefficients(reactant_coeffs, &self.reactants),
                              products:  zip_coefficients(product_coeffs, &self.products), })
    }
}

fn conservation_row(species: &[&Formula],
                    reactant_count: usize,
                    count: impl Fn(&Formula) -> i64)
                    -> Vec<Rational64> {
    species.iter()
           .enumerate()
           .map(|(i, &f)| {
               let sign = if i < reactant_count { 1 } else { -1 };
               Rational64::from_integer(sign * count(f))
           })
           .collect()
}

fn zip_coefficients(coefficients: &[i64], formulas: &[Formula]) -> Vec<(i64, Formula)> {
    coefficients.iter().copied().zip(formulas.iter().cloned()).collect()
}

/// Gauss-Jordan elimination; returns the integer null-space basis when the
/// nullity is exactly one.
fn null_space_vector(mut matrix: Vec<Vec<Rational64>>, columns: usize) -> Option<Vec<i64>> {
    let zero = Rational64::from_integer(0);
    let rows = matrix.len();
    let mut pivot_of_column: Vec<Option<usize>> = vec![None; columns];
    let mut pivot_row = 0;

    for col in 0..columns {
        let Some(row) = (pivot_row..rows).find(|&r| matrix[r][col] != zero) else {
            continue;
        };
        matrix.swap(pivot_row, row);

        let pivot = matrix[pivot_row][col];
        for entry in &mut matrix[pivot_row] {
            *entry /= pivot;
        }
        for r in 0..rows {
            if r != pivot_row && matrix[r][col] != zero {
                let factor = matrix[r][col];
                for c in 0..columns {
                    let subtracted = matrix[pivot_row][c] * factor;
                    matrix[r][c] -= subtracted;
                }
            }
        }

        pivot_of_column[col] = Some(pivot_row);
        pivot_row += 1;
        if pivot_row == rows {
            break;
        }
    }

    let free_columns: Vec<usize> =
        (0..columns).filter(|&c| pivot_of_column[c].is_none()).collect();
    let &[free] = free_columns.as_slice() else {
        return None;
    };

    // Set the free variable to 1 and read the pivots off the reduced rows.
    let mut solution = vec![zero; columns];
    solution[free] = Rational64::from_integer(1);
    for col in 0..columns {
        if let Some(row) = pivot_of_column[col] {
            solution[col] = -matrix[row][free];
        }
    }

    let denominator_lcm = solution.iter().fold(1i64, |acc, r| acc.lcm(r.denom()));
    let mut integers: Vec<i64> =
        solution.iter().map(|r| *r.numer() * (denominator_lcm / *r.denom())).collect();

    let common = integers.iter().fold(0i64, |acc, &n| acc.gcd(&n));
    if common > 1 {
        for n in &mut integers {
            *n /= common;
        }
    }
    if integers.iter().all(|&n| n < 0) {
        for n in &mut integers {
            *n = -*n;
        }
    }
    Some(integers)
}

impl BalancedReaction {
    /// Whether a species occurs anywhere in the reaction.
    #[must_use]
    pub fn contains(&self, formula: &Formula) -> bool {
        self.coefficient_of(formula).is_some()
    }

    fn coefficient_of(&self, formula: &Formula) -> Option<i64> {
        self.reactants
            .iter()
            .chain(&self.products)
            .find(|(_, f)| f == formula)
            .map(|(c, _)| *c)
    }

    /// The exact mole ratio `coeff(to) / coeff(from)` between two species.
    ///
    /// Any two distinct species qualify, including two on the same side;
    /// that is how limiting-reagent arithmetic reads a balanced equation.
    #[must_use]
    pub fn ratio(&self, from: &Formula, to: &Formula) -> Option<Decimal> {
        let from_coeff = self.coefficient_of(from)?;
        let to_coeff = self.coefficient_of(to)?;
        Some(Decimal::from(to_coeff) / Decimal::from(from_coeff))
    }
}

fn write_side(f: &mut std::fmt::Formatter<'_>, side: &[(i64, Formula)]) -> std::fmt::Result {
    for (i, (coefficient, formula)) in side.iter().enumerate() {
        if i > 0 {
            write!(f, " + ")?;
        }
        if *coefficient != 1 {
            write!(f, "{coefficient} ")?;
        }
        write!(f, "{formula}")?;
    }
    Ok(())
}

impl std::fmt::Display for Reaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let unbalanced =
            |side: &[Formula]| side.iter().map(|f| (1i64, f.clone())).collect::<Vec<_>>();
        write_side(f, &unbalanced(&self.reactants))?;
        write!(f, " -> ")?;
        write_side(f, &unbalanced(&self.products))
    }
}

impl std::fmt::Display for BalancedReaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write_side(f, &self.reactants)?;
        write!(f, " -> ")?;
        write_side(f, &self.products)
    }
}
