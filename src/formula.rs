//! Propositional formulas.
//!
//! A [`Formula`] is an immutable tree over variables, the constants `T` and
//! `F`, negation and the binary connectives of [`BinaryOp`]. Subtrees are
//! shared through [`Arc`], so cloning a formula never copies the tree.

use std::fmt::{self, Display};
use std::str::FromStr;
use std::sync::Arc;

use crate::ast::parse::{parse_formula, ParseError};
use crate::util::{HashMap, IndexSet, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BinaryOp {
    And,
    Or,
    Implies,
    Xor,
    Iff,
    Nand,
    Nor,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 7] = [
        BinaryOp::And,
        BinaryOp::Or,
        BinaryOp::Implies,
        BinaryOp::Xor,
        BinaryOp::Iff,
        BinaryOp::Nand,
        BinaryOp::Nor,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
            BinaryOp::Implies => "->",
            BinaryOp::Xor => "+",
            BinaryOp::Iff => "<->",
            BinaryOp::Nand => "-&",
            BinaryOp::Nor => "-|",
        }
    }

    pub fn apply(self, lhs: bool, rhs: bool) -> bool {
        match self {
            BinaryOp::And => lhs && rhs,
            BinaryOp::Or => lhs || rhs,
            BinaryOp::Implies => !lhs || rhs,
            BinaryOp::Xor => lhs != rhs,
            BinaryOp::Iff => lhs == rhs,
            BinaryOp::Nand => !(lhs && rhs),
            BinaryOp::Nor => !(lhs || rhs),
        }
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for BinaryOp {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BinaryOp::ALL
            .into_iter()
            .find(|op| op.symbol() == s)
            .ok_or(())
    }
}

/// Checks whether `s` is a variable name: a letter between `p` and `z`
/// followed by decimal digits or underscores.
pub fn is_variable(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some('p'..='z') => chars.all(|c| c.is_ascii_digit() || c == '_'),
        _ => false,
    }
}

pub fn is_constant(s: &str) -> bool {
    s == "T" || s == "F"
}

pub fn is_unary(s: &str) -> bool {
    s == "~"
}

pub fn is_binary(s: &str) -> bool {
    s.parse::<BinaryOp>().is_ok()
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Formula {
    Var(Symbol),
    Const(bool),
    Not(Arc<Formula>),
    Binary(BinaryOp, Arc<Formula>, Arc<Formula>),
}

impl Formula {
    pub fn var(name: impl Into<Symbol>) -> Self {
        Formula::Var(name.into())
    }

    pub fn constant(value: bool) -> Self {
        Formula::Const(value)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(operand: Formula) -> Self {
        Formula::Not(Arc::new(operand))
    }

    pub fn binary(op: BinaryOp, lhs: Formula, rhs: Formula) -> Self {
        Formula::Binary(op, Arc::new(lhs), Arc::new(rhs))
    }

    pub fn implies(antecedent: Formula, consequent: Formula) -> Self {
        Formula::binary(BinaryOp::Implies, antecedent, consequent)
    }

    pub fn and(lhs: Formula, rhs: Formula) -> Self {
        Formula::binary(BinaryOp::And, lhs, rhs)
    }

    pub fn or(lhs: Formula, rhs: Formula) -> Self {
        Formula::binary(BinaryOp::Or, lhs, rhs)
    }

    pub fn parse(input: &str) -> Result<Formula, ParseError> {
        parse_formula(None, input)
    }

    /// The string at the root of this formula: a variable name, `T`, `F`,
    /// `~` or a binary operator.
    pub fn root(&self) -> String {
        match self {
            Formula::Var(name) => name.to_string(),
            Formula::Const(true) => "T".to_string(),
            Formula::Const(false) => "F".to_string(),
            Formula::Not(_) => "~".to_string(),
            Formula::Binary(op, _, _) => op.symbol().to_string(),
        }
    }

    /// The operand of a negation.
    pub fn negated(&self) -> Option<&Formula> {
        match self {
            Formula::Not(operand) => Some(operand),
            _ => None,
        }
    }

    pub fn walk(&self, f: &mut impl FnMut(&Formula)) {
        f(self);
        match self {
            Formula::Var(_) | Formula::Const(_) => {}
            Formula::Not(operand) => operand.walk(f),
            Formula::Binary(_, lhs, rhs) => {
                lhs.walk(f);
                rhs.walk(f);
            }
        }
    }

    /// Variables in order of first occurrence.
    pub fn variables(&self) -> IndexSet<Symbol> {
        let mut vars = IndexSet::default();
        self.walk(&mut |f| {
            if let Formula::Var(name) = f {
                vars.insert(*name);
            }
        });
        vars
    }

    /// Constants and operators, as printed.
    pub fn operators(&self) -> IndexSet<String> {
        let mut ops = IndexSet::default();
        self.walk(&mut |f| {
            if !matches!(f, Formula::Var(_)) {
                ops.insert(f.root());
            }
        });
        ops
    }

    /// Simultaneously replaces every variable that has an image in `map`.
    pub fn substitute_variables(&self, map: &HashMap<Symbol, Formula>) -> Formula {
        match self {
            Formula::Var(name) => map.get(name).cloned().unwrap_or_else(|| self.clone()),
            Formula::Const(_) => self.clone(),
            Formula::Not(operand) => Formula::not(operand.substitute_variables(map)),
            Formula::Binary(op, lhs, rhs) => Formula::binary(
                *op,
                lhs.substitute_variables(map),
                rhs.substitute_variables(map),
            ),
        }
    }
}

impl Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Var(name) => write!(f, "{name}"),
            Formula::Const(true) => f.write_str("T"),
            Formula::Const(false) => f.write_str("F"),
            Formula::Not(operand) => write!(f, "~{operand}"),
            Formula::Binary(op, lhs, rhs) => write!(f, "({lhs}{op}{rhs})"),
        }
    }
}

impl FromStr for Formula {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formula::parse(s)
    }
}
