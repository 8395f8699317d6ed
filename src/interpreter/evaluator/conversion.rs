use crate::{
    ast::{ConversionTarget, Expr},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        value::{
            core::Value,
            formula::Formula,
            number::ChNumber,
            quantity::{Quantity, number_error},
            reaction::{BalancedReaction, Reaction},
            unit,
        },
    },
};

impl Interpreter {
    /// Evaluates a `->` conversion.
    ///
    /// The pipeline, in order:
    /// 1. balance any supplied reactions (printing them when
    ///    `show_balanced_equation` is truthy),
    /// 2. if the target names a different species, convert to moles,
    ///    apply the stoichiometric coefficient ratio, and relabel,
    /// 3. if the target names a unit, convert into it, directly when the
    ///    dimensions agree, else through the molar-mass/Avogadro hop.
    ///
    /// Chained conversions nest in the AST and evaluate left to right.
    pub(crate) fn eval_conversion(&mut self,
                                  value: &Expr,
                                  target: &ConversionTarget,
                                  reactions: &[Reaction],
                                  line: usize)
                                  -> EvalResult<Value> {
        let value = self.eval(value)?;
        let mut quantity = value.as_quantity(line)?;

        let mut balanced = Vec::with_capacity(reactions.len());
        for reaction in reactions {
            let result = reaction.balance().map_err(|_| {
                             RuntimeError::UnbalanceableReaction { reaction:
                                                                       reaction.to_string(),
                                                                   line }
                         })?;
            balanced.push(result);
        }
        if !balanced.is_empty() && self.show_balanced_equations() {
            for reaction in &balanced {
                println!("{reaction}");
            }
        }

        if let Some(target_formula) = &target.formula {
            quantity = convert_species(quantity, target_formula, &balanced, reactions, line)?;
        }

        if let Some(target_unit) = &target.unit {
            let hop = quantity.formula.clone();
            quantity = quantity.convert(target_unit, hop.as_ref(), line)?;
        }

        Ok(Value::Quantity(quantity))
    }

    /// The `show_balanced_equation` switch, re-read at every conversion.
    fn show_balanced_equations(&self) -> bool {
        self.env
            .lookup("show_balanced_equation")
            .is_some_and(|value| value.is_truthy())
    }
}

/// Applies the species change of a reaction-mediated conversion.
///
/// Same species: the formula is relabelled and nothing else happens.
/// Otherwise the quantity converts to moles (formula-mediated when the
/// unit is mass or atoms), multiplies by the exact coefficient ratio
/// `coeff(target) / coeff(source)`, and takes on the target formula. Both
/// species must appear in one balanced reaction, on either side.
fn convert_species(quantity: Quantity,
                   target: &Formula,
                   balanced: &[BalancedReaction],
                   reactions: &[Reaction],
                   line: usize)
                   -> Result<Quantity, RuntimeError> {
    if quantity.formula.as_ref() == Some(target) {
        return Ok(Quantity { formula: Some(target.clone()),
                             ..quantity });
    }

    let source = quantity.formula.clone().ok_or_else(|| {
        RuntimeError::IncompatibleFormulas { left:  "no formula".to_string(),
                                             right: target.to_string(),
                                             line, }
    })?;

    if balanced.is_empty() {
        return Err(RuntimeError::IncompatibleFormulas { left: source.to_string(),
                                                        right: target.to_string(),
                                                        line });
    }

    let Some(ratio) = balanced.iter().find_map(|b| b.ratio(&source, target)) else {
        let missing = if balanced.iter().any(|b| b.contains(&source)) { target } else { &source };
        return Err(RuntimeError::SpeciesNotInReaction { species:  missing.to_string(),
                                                        reaction: reactions[0].to_string(),
                                                        line, });
    };

    let mole = unit::lookup("mol").ok_or_else(|| RuntimeError::TypeError {
        details: "unit registry is missing 'mol'".to_string(),
        line,
    })?;
    let mut in_moles = quantity.convert(&mole, Some(&source), line)?;

    in_moles.number = in_moles.number
                              .mul(&ChNumber::exact(ratio))
                              .map_err(|e| number_error(e, line))?;
    in_moles.formula = Some(target.clone());
    Ok(in_moles)
}
