//! # propositions
//! propositions builds new Hilbert-style proofs out of existing ones.
//!
//! Proofs are sequences of [`Line`]s, each justified either as an assumption
//! or as a specialization of a permitted [`InferenceRule`] applied to earlier
//! lines. The maneuvers of [`proofs::deduction`] take valid proofs and
//! construct valid proofs of related formulas without any search:
//! corollaries, combinations of two proofs, the Deduction Theorem, ex falso
//! quodlibet and proof by way of contradiction.
//!
//! # Scripts
//! A [`Session`] runs proof scripts (see [`Command`]) that declare rules and
//! proofs by name and derive new proofs with the maneuvers:
//!
//! ```text
//! (proof p-from-p [q p] p [MP I0 I1 D] (assume p))
//! (remove-assumption p-implies-p p-from-p)
//! (check p-implies-p)
//! ```
//!
//! Alongside the proof machinery the crate carries the truth-table
//! [`semantics`] of formulas, conversions to restricted operator bases in
//! [`operators`], and a 3-coloring reduction in [`reductions`].
pub mod ast;
#[cfg(feature = "bin")]
pub mod cli;
pub mod formula;
pub mod operators;
pub mod proofs;
pub mod reductions;
mod repl;
pub mod semantics;
pub mod util;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use ast::{parse_formula, parse_program, Command, LineDecl, ParseError, Span};
pub use formula::{BinaryOp, Formula};
pub use proofs::{InferenceRule, Justification, Line, Proof, ProofError};
use util::{IndexMap, Symbol};

/// Named rules and proofs, and the interpreter for proof scripts.
#[derive(Debug, Clone)]
pub struct Session {
    rules: IndexMap<Symbol, InferenceRule>,
    proofs: IndexMap<Symbol, Proof>,
    messages_enabled: bool,
}

impl Default for Session {
    fn default() -> Self {
        let rules = proofs::named_rules()
            .into_iter()
            .map(|(name, rule)| (Symbol::from(name), rule.clone()))
            .collect();
        Self {
            rules,
            proofs: IndexMap::default(),
            messages_enabled: true,
        }
    }
}

impl Session {
    /// Only `(print)` produces output after this.
    pub fn disable_messages(&mut self) {
        self.messages_enabled = false;
    }

    pub fn rule(&self, name: &str) -> Option<&InferenceRule> {
        self.rules.get(&Symbol::from(name))
    }

    pub fn proof(&self, name: &str) -> Option<&Proof> {
        self.proofs.get(&Symbol::from(name))
    }

    pub fn proofs(&self) -> impl Iterator<Item = (Symbol, &Proof)> {
        self.proofs.iter().map(|(name, proof)| (*name, proof))
    }

    /// Registers a proof built outside of a script.
    pub fn insert_proof(&mut self, name: impl Into<Symbol>, proof: Proof) -> Option<Proof> {
        self.proofs.insert(name.into(), proof)
    }

    pub fn parse_and_run_program(
        &mut self,
        filename: Option<String>,
        input: &str,
    ) -> Result<Vec<String>, Error> {
        let program = parse_program(filename, input)?;
        self.run_program(program)
    }

    pub fn parse_and_run_file(&mut self, path: &Path) -> Result<Vec<String>, Error> {
        let input = std::fs::read_to_string(path)
            .map_err(|err| Error::IoError(path.to_path_buf(), err))?;
        self.parse_and_run_program(Some(path.to_string_lossy().into_owned()), &input)
    }

    pub fn run_program(&mut self, program: Vec<Command>) -> Result<Vec<String>, Error> {
        let mut msgs = vec![];
        for command in program {
            if let Some(msg) = self.run_command(command)? {
                msgs.push(msg);
            }
        }
        Ok(msgs)
    }

    fn message(&self, msg: String) -> Option<String> {
        self.messages_enabled.then_some(msg)
    }

    fn lookup_rule(&self, name: Symbol, span: &Span) -> Result<&InferenceRule, Error> {
        self.rules
            .get(&name)
            .ok_or_else(|| Error::NoSuchRule(name, span.clone()))
    }

    fn lookup_proof(&self, name: Symbol, span: &Span) -> Result<&Proof, Error> {
        self.proofs
            .get(&name)
            .ok_or_else(|| Error::NoSuchProof(name, span.clone()))
    }

    fn ensure_fresh(&self, name: Symbol, span: &Span) -> Result<(), Error> {
        if self.rules.contains_key(&name) || self.proofs.contains_key(&name) {
            Err(Error::DuplicateName(name, span.clone()))
        } else {
            Ok(())
        }
    }

    fn define_proof(
        &mut self,
        name: Symbol,
        derived: Result<Proof, ProofError>,
        span: &Span,
    ) -> Result<Option<String>, Error> {
        let proof = derived.map_err(|err| Error::ProofError(err, span.clone()))?;
        log::info!(
            "Derived {name}: {} ({} lines)",
            proof.statement,
            proof.lines.len()
        );
        let msg = format!("{name}: {} ({} lines)", proof.statement, proof.lines.len());
        self.proofs.insert(name, proof);
        Ok(self.message(msg))
    }

    fn declare_proof(
        &self,
        statement: InferenceRule,
        rule_names: &[Symbol],
        lines: &[LineDecl],
        span: &Span,
    ) -> Result<Proof, Error> {
        let rules = rule_names
            .iter()
            .map(|name| self.lookup_rule(*name, span).cloned())
            .collect::<Result<_, _>>()?;
        let lines = lines
            .iter()
            .map(|line| match line {
                LineDecl::Assume(_, formula) => Ok(Line::assumption(formula.clone())),
                LineDecl::Apply(_, formula, rule, references) => Ok(Line::by_rule(
                    formula.clone(),
                    self.lookup_rule(*rule, line.span())?.clone(),
                    references.iter().copied(),
                )),
            })
            .collect::<Result<_, Error>>()?;
        Ok(Proof::new(statement, rules, lines))
    }

    pub fn run_command(&mut self, command: Command) -> Result<Option<String>, Error> {
        log::debug!("Running {command}");
        match command {
            Command::Rule { span, name, rule } => {
                self.ensure_fresh(name, &span)?;
                let msg = format!("Declared rule {name}: {rule}");
                self.rules.insert(name, rule);
                Ok(self.message(msg))
            }
            Command::Proof {
                span,
                name,
                statement,
                rules,
                lines,
            } => {
                self.ensure_fresh(name, &span)?;
                let proof = self.declare_proof(statement, &rules, &lines, &span)?;
                let msg = format!("Declared proof {name} ({} lines)", proof.lines.len());
                self.proofs.insert(name, proof);
                Ok(self.message(msg))
            }
            Command::Check(span, name) => {
                let proof = self.lookup_proof(name, &span)?;
                if proof.is_valid() {
                    Ok(self.message(format!("{name} is a valid proof of {}", proof.statement)))
                } else {
                    let reason = match proof.first_invalid_line() {
                        Some(line) => format!("line {line} is not justified"),
                        None if proof.lines.is_empty() => "it has no lines".to_string(),
                        None => format!("its last line does not prove {}", proof.conclusion()),
                    };
                    Err(Error::CheckError(name, reason, span))
                }
            }
            Command::Print(span, name) => Ok(Some(self.lookup_proof(name, &span)?.to_string())),
            Command::Corollary {
                span,
                name,
                from,
                consequent,
                conditional,
            } => {
                self.ensure_fresh(name, &span)?;
                let derived = proofs::prove_corollary(
                    self.lookup_proof(from, &span)?,
                    &consequent,
                    self.lookup_rule(conditional, &span)?,
                );
                self.define_proof(name, derived, &span)
            }
            Command::Combine {
                span,
                name,
                first,
                second,
                consequent,
                double_conditional,
            } => {
                self.ensure_fresh(name, &span)?;
                let derived = proofs::combine_proofs(
                    self.lookup_proof(first, &span)?,
                    self.lookup_proof(second, &span)?,
                    &consequent,
                    self.lookup_rule(double_conditional, &span)?,
                );
                self.define_proof(name, derived, &span)
            }
            Command::RemoveAssumption { span, name, from } => {
                self.ensure_fresh(name, &span)?;
                let derived = proofs::remove_assumption(self.lookup_proof(from, &span)?);
                self.define_proof(name, derived, &span)
            }
            Command::FromOpposites {
                span,
                name,
                affirmation,
                negation,
                conclusion,
            } => {
                self.ensure_fresh(name, &span)?;
                let derived = proofs::prove_from_opposites(
                    self.lookup_proof(affirmation, &span)?,
                    self.lookup_proof(negation, &span)?,
                    &conclusion,
                );
                self.define_proof(name, derived, &span)
            }
            Command::ByContradiction { span, name, from } => {
                self.ensure_fresh(name, &span)?;
                let derived = proofs::prove_by_way_of_contradiction(self.lookup_proof(from, &span)?);
                self.define_proof(name, derived, &span)
            }
            Command::Fail(span, command) => match self.run_command(*command) {
                Ok(_) => Err(Error::ExpectFail(span)),
                Err(err) => {
                    log::info!("Command failed as expected: {err}");
                    Ok(None)
                }
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    ParseError(#[from] ParseError),
    #[error("{1}\n{0}")]
    ProofError(ProofError, Span),
    #[error("{1}\nNo such proof: {0}")]
    NoSuchProof(Symbol, Span),
    #[error("{1}\nNo such rule: {0}")]
    NoSuchRule(Symbol, Span),
    #[error("{1}\n{0} is already defined")]
    DuplicateName(Symbol, Span),
    #[error("{2}\nCheck failed: {0} is not a valid proof, {1}")]
    CheckError(Symbol, String, Span),
    #[error("{0}\nCommand should have failed.")]
    ExpectFail(Span),
    #[error("IO error: {}: {}", .0.display(), .1)]
    IoError(PathBuf, std::io::Error),
}
