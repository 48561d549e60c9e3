//! The proof-script language.
//!
//! A script is a sequence of [`Command`]s that declare rules and proofs by
//! name and derive new proofs from old ones with the maneuvers of
//! [`crate::proofs::deduction`]. Formulas are written inline in their usual
//! syntax, and lists may use either `[...]` or `(...)`.

pub mod parse;

use std::fmt::{self, Display};

pub use parse::{parse_formula, parse_program, ParseError, Span};

use crate::formula::Formula;
use crate::proofs::InferenceRule;
use crate::util::{ListDisplay, Symbol};

/// One line of a `proof` command.
#[derive(Debug, Clone)]
pub enum LineDecl {
    /// `(assume FORMULA)`
    Assume(Span, Formula),
    /// `(apply FORMULA RULE INDEX...)`
    Apply(Span, Formula, Symbol, Vec<usize>),
}

impl LineDecl {
    pub fn span(&self) -> &Span {
        match self {
            LineDecl::Assume(span, _) | LineDecl::Apply(span, ..) => span,
        }
    }
}

impl Display for LineDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineDecl::Assume(_, formula) => write!(f, "(assume {formula})"),
            LineDecl::Apply(_, formula, rule, references) if references.is_empty() => {
                write!(f, "(apply {formula} {rule})")
            }
            LineDecl::Apply(_, formula, rule, references) => {
                write!(f, "(apply {formula} {rule} {})", ListDisplay(references, " "))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum Command {
    /// Declare a named inference rule.
    /// ```text
    /// (rule Swap [(p&q)] (q&p))
    /// ```
    Rule {
        span: Span,
        name: Symbol,
        rule: InferenceRule,
    },
    /// Declare a named proof: its assumptions, conclusion, the names of the
    /// rules it may use, and its lines.
    /// ```text
    /// (proof self-implication [] (p->p) [I0] (apply (p->p) I0))
    /// ```
    Proof {
        span: Span,
        name: Symbol,
        statement: InferenceRule,
        rules: Vec<Symbol>,
        lines: Vec<LineDecl>,
    },
    /// Fail unless the named proof is valid.
    Check(Span, Symbol),
    /// Print the named proof.
    Print(Span, Symbol),
    Corollary {
        span: Span,
        name: Symbol,
        from: Symbol,
        consequent: Formula,
        conditional: Symbol,
    },
    Combine {
        span: Span,
        name: Symbol,
        first: Symbol,
        second: Symbol,
        consequent: Formula,
        double_conditional: Symbol,
    },
    /// Apply the Deduction Theorem to the last assumption of `from`.
    RemoveAssumption {
        span: Span,
        name: Symbol,
        from: Symbol,
    },
    FromOpposites {
        span: Span,
        name: Symbol,
        affirmation: Symbol,
        negation: Symbol,
        conclusion: Formula,
    },
    ByContradiction {
        span: Span,
        name: Symbol,
        from: Symbol,
    },
    /// Succeeds only if the inner command fails.
    Fail(Span, Box<Command>),
}

impl Command {
    pub fn span(&self) -> &Span {
        match self {
            Command::Rule { span, .. }
            | Command::Proof { span, .. }
            | Command::Check(span, _)
            | Command::Print(span, _)
            | Command::Corollary { span, .. }
            | Command::Combine { span, .. }
            | Command::RemoveAssumption { span, .. }
            | Command::FromOpposites { span, .. }
            | Command::ByContradiction { span, .. }
            | Command::Fail(span, _) => span,
        }
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Rule { name, rule, .. } => write!(
                f,
                "(rule {name} [{}] {})",
                ListDisplay(&rule.assumptions, " "),
                rule.conclusion
            ),
            Command::Proof {
                name,
                statement,
                rules,
                lines,
                ..
            } => {
                write!(
                    f,
                    "(proof {name} [{}] {} [{}]",
                    ListDisplay(&statement.assumptions, " "),
                    statement.conclusion,
                    ListDisplay(rules, " ")
                )?;
                for line in lines {
                    write!(f, " {line}")?;
                }
                write!(f, ")")
            }
            Command::Check(_, name) => write!(f, "(check {name})"),
            Command::Print(_, name) => write!(f, "(print {name})"),
            Command::Corollary {
                name,
                from,
                consequent,
                conditional,
                ..
            } => write!(f, "(corollary {name} {from} {consequent} {conditional})"),
            Command::Combine {
                name,
                first,
                second,
                consequent,
                double_conditional,
                ..
            } => write!(
                f,
                "(combine {name} {first} {second} {consequent} {double_conditional})"
            ),
            Command::RemoveAssumption { name, from, .. } => {
                write!(f, "(remove-assumption {name} {from})")
            }
            Command::FromOpposites {
                name,
                affirmation,
                negation,
                conclusion,
                ..
            } => write!(
                f,
                "(from-opposites {name} {affirmation} {negation} {conclusion})"
            ),
            Command::ByContradiction { name, from, .. } => {
                write!(f, "(by-contradiction {name} {from})")
            }
            Command::Fail(_, cmd) => write!(f, "(fail {cmd})"),
        }
    }
}
