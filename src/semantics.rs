//! Truth-table semantics of formulas and inference rules.

use crate::formula::Formula;
use crate::proofs::InferenceRule;
use crate::util::{IndexMap, Symbol};

/// An assignment of truth values to variables.
pub type Model = IndexMap<Symbol, bool>;

pub fn is_model(model: &Model) -> bool {
    model.keys().all(|v| crate::formula::is_variable(v.as_str()))
}

/// Evaluates `formula` in `model`, or `None` if a variable is unassigned.
pub fn try_evaluate(formula: &Formula, model: &Model) -> Option<bool> {
    Some(match formula {
        Formula::Var(name) => *model.get(name)?,
        Formula::Const(value) => *value,
        Formula::Not(operand) => !try_evaluate(operand, model)?,
        Formula::Binary(op, lhs, rhs) => {
            op.apply(try_evaluate(lhs, model)?, try_evaluate(rhs, model)?)
        }
    })
}

/// Evaluates `formula` in `model`.
///
/// # Panics
/// If `model` does not assign every variable of `formula`.
pub fn evaluate(formula: &Formula, model: &Model) -> bool {
    try_evaluate(formula, model)
        .unwrap_or_else(|| panic!("model does not assign every variable of {formula}"))
}

/// Every model over `variables`, counting in binary with the first variable
/// as the most significant bit (all false first).
pub fn all_models(variables: &[Symbol]) -> impl Iterator<Item = Model> + '_ {
    assert!(
        variables.len() < usize::BITS as usize,
        "too many variables to enumerate"
    );
    let n = variables.len();
    (0..1usize << n).map(move |bits| {
        variables
            .iter()
            .enumerate()
            .map(|(i, v)| (*v, (bits >> (n - 1 - i)) & 1 == 1))
            .collect()
    })
}

pub fn truth_values<'a>(
    formula: &'a Formula,
    models: impl IntoIterator<Item = &'a Model> + 'a,
) -> impl Iterator<Item = bool> + 'a {
    models.into_iter().map(move |model| evaluate(formula, model))
}

fn models_of(formula: &Formula) -> Vec<Model> {
    let vars: Vec<Symbol> = formula.variables().into_iter().collect();
    all_models(&vars).collect()
}

pub fn is_tautology(formula: &Formula) -> bool {
    models_of(formula).iter().all(|m| evaluate(formula, m))
}

pub fn is_contradiction(formula: &Formula) -> bool {
    !is_satisfiable(formula)
}

pub fn is_satisfiable(formula: &Formula) -> bool {
    models_of(formula).iter().any(|m| evaluate(formula, m))
}

/// Whether `rule` holds in `model`: a false assumption or a true conclusion.
pub fn evaluate_inference(rule: &InferenceRule, model: &Model) -> bool {
    !rule.assumptions.iter().all(|a| evaluate(a, model)) || evaluate(&rule.conclusion, model)
}

pub fn is_sound_inference(rule: &InferenceRule) -> bool {
    let vars: Vec<Symbol> = rule.variables().into_iter().collect();
    let sound = all_models(&vars).all(|model| evaluate_inference(rule, &model));
    sound
}
