//! Inference rules and Hilbert-style proofs.
//!
//! An [`InferenceRule`] is a list of assumption formulas and a conclusion; its
//! variables act as schema placeholders. A [`Proof`] derives the conclusion of
//! its statement line by line, each [`Line`] being either one of the
//! statement's assumptions or a specialization of a permitted rule applied to
//! earlier lines.

pub mod axioms;
pub mod deduction;

use std::fmt::{self, Display};

use smallvec::SmallVec;
use thiserror::Error;

use crate::formula::Formula;
use crate::util::{HashMap, IndexSet, ListDisplay, Symbol};

pub use axioms::*;
pub use deduction::*;

/// A substitution of schema variables by concrete formulas.
pub type SpecializationMap = HashMap<Symbol, Formula>;

/// References from a rule line to the earlier lines filling the rule's
/// assumption slots.
pub type LineRefs = SmallVec<[usize; 2]>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InferenceRule {
    pub assumptions: Vec<Formula>,
    pub conclusion: Formula,
}

impl InferenceRule {
    pub fn new(assumptions: Vec<Formula>, conclusion: Formula) -> Self {
        Self {
            assumptions,
            conclusion,
        }
    }

    /// A rule without assumptions.
    pub fn fact(conclusion: Formula) -> Self {
        Self::new(vec![], conclusion)
    }

    pub fn is_assumptionless(&self) -> bool {
        self.assumptions.is_empty()
    }

    pub fn variables(&self) -> IndexSet<Symbol> {
        let mut vars = IndexSet::default();
        for formula in self.assumptions.iter().chain([&self.conclusion]) {
            vars.extend(formula.variables());
        }
        vars
    }

    pub fn specialize(&self, map: &SpecializationMap) -> InferenceRule {
        InferenceRule::new(
            self.assumptions
                .iter()
                .map(|a| a.substitute_variables(map))
                .collect(),
            self.conclusion.substitute_variables(map),
        )
    }

    /// Computes the map under which `self` specializes to `specialization`,
    /// if there is one.
    pub fn specialization_map(&self, specialization: &InferenceRule) -> Option<SpecializationMap> {
        if self.assumptions.len() != specialization.assumptions.len() {
            return None;
        }
        let mut map = SpecializationMap::default();
        let pairs = self
            .assumptions
            .iter()
            .zip(&specialization.assumptions)
            .chain([(&self.conclusion, &specialization.conclusion)]);
        for (general, specific) in pairs {
            extend_specialization_map(&mut map, general, specific)?;
        }
        Some(map)
    }

    pub fn is_specialization_of(&self, general: &InferenceRule) -> bool {
        general.specialization_map(self).is_some()
    }
}

/// Computes the map under which `general` specializes to `specific`.
pub fn formula_specialization_map(general: &Formula, specific: &Formula) -> Option<SpecializationMap> {
    let mut map = SpecializationMap::default();
    extend_specialization_map(&mut map, general, specific)?;
    Some(map)
}

fn extend_specialization_map(
    map: &mut SpecializationMap,
    general: &Formula,
    specific: &Formula,
) -> Option<()> {
    match (general, specific) {
        (Formula::Var(name), _) => match map.get(name) {
            Some(bound) if bound != specific => None,
            Some(_) => Some(()),
            None => {
                map.insert(*name, specific.clone());
                Some(())
            }
        },
        (Formula::Const(a), Formula::Const(b)) if a == b => Some(()),
        (Formula::Not(a), Formula::Not(b)) => extend_specialization_map(map, a, b),
        (Formula::Binary(op_a, lhs_a, rhs_a), Formula::Binary(op_b, lhs_b, rhs_b))
            if op_a == op_b =>
        {
            extend_specialization_map(map, lhs_a, lhs_b)?;
            extend_specialization_map(map, rhs_a, rhs_b)
        }
        _ => None,
    }
}

impl Display for InferenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.assumptions.is_empty() {
            write!(f, "==> {}", self.conclusion)
        } else {
            write!(
                f,
                "{} ==> {}",
                ListDisplay(&self.assumptions, ", "),
                self.conclusion
            )
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Justification {
    /// The formula is one of the statement's assumptions.
    Assumption,
    /// The formula follows by a specialization of `rule` whose assumptions are
    /// the formulas of the referenced earlier lines.
    Rule {
        rule: InferenceRule,
        assumptions: LineRefs,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Line {
    pub formula: Formula,
    pub justification: Justification,
}

impl Line {
    pub fn assumption(formula: Formula) -> Self {
        Self {
            formula,
            justification: Justification::Assumption,
        }
    }

    pub fn by_rule(
        formula: Formula,
        rule: InferenceRule,
        assumptions: impl IntoIterator<Item = usize>,
    ) -> Self {
        Self {
            formula,
            justification: Justification::Rule {
                rule,
                assumptions: assumptions.into_iter().collect(),
            },
        }
    }

    pub fn is_assumption(&self) -> bool {
        matches!(self.justification, Justification::Assumption)
    }

    pub fn rule(&self) -> Option<&InferenceRule> {
        match &self.justification {
            Justification::Assumption => None,
            Justification::Rule { rule, .. } => Some(rule),
        }
    }

    pub fn assumptions(&self) -> &[usize] {
        match &self.justification {
            Justification::Assumption => &[],
            Justification::Rule { assumptions, .. } => assumptions,
        }
    }

    /// This line with every reference moved `offset` lines down.
    pub fn shifted(&self, offset: usize) -> Line {
        match &self.justification {
            Justification::Assumption => self.clone(),
            Justification::Rule { rule, assumptions } => Line::by_rule(
                self.formula.clone(),
                rule.clone(),
                assumptions.iter().map(|a| a + offset),
            ),
        }
    }
}

impl Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.justification {
            Justification::Assumption => write!(f, "{}    (Assumption)", self.formula),
            Justification::Rule { rule, assumptions } if assumptions.is_empty() => {
                write!(f, "{}    (Inference Rule {rule})", self.formula)
            }
            Justification::Rule { rule, assumptions } => write!(
                f,
                "{}    (Inference Rule {rule} on lines {})",
                self.formula,
                ListDisplay(assumptions, ",")
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proof {
    pub statement: InferenceRule,
    pub rules: IndexSet<InferenceRule>,
    pub lines: Vec<Line>,
}

impl Proof {
    pub fn new(statement: InferenceRule, rules: IndexSet<InferenceRule>, lines: Vec<Line>) -> Self {
        Self {
            statement,
            rules,
            lines,
        }
    }

    pub fn assumptions(&self) -> &[Formula] {
        &self.statement.assumptions
    }

    pub fn conclusion(&self) -> &Formula {
        &self.statement.conclusion
    }

    /// The concrete rule applied by a line: the formulas of its referenced
    /// lines as assumptions and its own formula as conclusion.
    ///
    /// Returns `None` for assumption lines. References must point to existing
    /// lines.
    pub fn rule_for_line(&self, line_number: usize) -> Option<InferenceRule> {
        let line = &self.lines[line_number];
        let references = match &line.justification {
            Justification::Assumption => return None,
            Justification::Rule { assumptions, .. } => assumptions,
        };
        Some(InferenceRule::new(
            references
                .iter()
                .map(|&i| self.lines[i].formula.clone())
                .collect(),
            line.formula.clone(),
        ))
    }

    pub fn is_line_valid(&self, line_number: usize) -> bool {
        let Some(line) = self.lines.get(line_number) else {
            return false;
        };
        match &line.justification {
            Justification::Assumption => self.statement.assumptions.contains(&line.formula),
            Justification::Rule { rule, assumptions } => {
                self.rules.contains(rule)
                    && assumptions.iter().all(|&i| i < line_number)
                    && self
                        .rule_for_line(line_number)
                        .is_some_and(|concrete| concrete.is_specialization_of(rule))
            }
        }
    }

    pub fn first_invalid_line(&self) -> Option<usize> {
        (0..self.lines.len()).find(|&i| !self.is_line_valid(i))
    }

    /// A proof is valid when every line is justified and the last line is the
    /// statement's conclusion.
    pub fn is_valid(&self) -> bool {
        match self.lines.last() {
            Some(last) => {
                last.formula == self.statement.conclusion && self.first_invalid_line().is_none()
            }
            None => false,
        }
    }
}

impl Display for Proof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Proof of {} via inference rules:", self.statement)?;
        for rule in &self.rules {
            writeln!(f, "  {rule}")?;
        }
        writeln!(f, "Lines:")?;
        for (i, line) in self.lines.iter().enumerate() {
            writeln!(f, "{i:>3}) {line}")?;
        }
        write!(f, "QED")
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProofError {
    #[error("{what} is not a valid proof of {statement}")]
    InvalidProof {
        what: &'static str,
        statement: InferenceRule,
    },
    #[error("proof of {0} has no assumption to remove")]
    NoAssumptions(InferenceRule),
    #[error("rule {0} has assumptions but is not Modus Ponens")]
    RuleWithAssumptions(InferenceRule),
    #[error("rule {rule} is not a specialization of required pattern {pattern}")]
    NotSpecialization {
        rule: InferenceRule,
        pattern: InferenceRule,
    },
    #[error("proofs have different assumptions: [{}] and [{}]", ListDisplay(.0, ", "), ListDisplay(.1, ", "))]
    MismatchedAssumptions(Vec<Formula>, Vec<Formula>),
    #[error("proofs may use different inference rules")]
    MismatchedRules,
    #[error("expected the negation {expected}, found {found}")]
    NotNegation { expected: String, found: Formula },
    #[error("expected a proof of {expected}, found a proof of {found}")]
    UnexpectedConclusion { expected: Formula, found: Formula },
}
