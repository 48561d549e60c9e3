//! Proof manipulation maneuvers.
//!
//! Each maneuver consumes one or two valid proofs and builds a fresh valid
//! proof of a related formula. Input proofs are never modified: their lines
//! are copied into the result, re-based where needed, and followed by bridging
//! lines that use Modus Ponens and a specialized axiom schema.

use crate::formula::Formula;
use crate::proofs::axioms::{D, I0, I1, I2, MP, N};
use crate::proofs::{InferenceRule, Justification, Line, Proof, ProofError};
use crate::util::IndexSet;

/// Lays out `second`'s lines after `first`'s, moving every reference in
/// `second` down by `first.len()`.
pub fn splice(first: &[Line], second: &[Line]) -> Vec<Line> {
    let offset = first.len();
    let mut lines = Vec::with_capacity(first.len() + second.len() + 3);
    lines.extend_from_slice(first);
    lines.extend(second.iter().map(|line| line.shifted(offset)));
    lines
}

/// A line proving `formula` by the assumptionless `schema`, which must
/// specialize to it.
fn schema_line(schema: &InferenceRule, formula: Formula) -> Result<Line, ProofError> {
    let pattern = InferenceRule::fact(formula);
    let map = schema
        .specialization_map(&pattern)
        .ok_or_else(|| ProofError::NotSpecialization {
            rule: schema.clone(),
            pattern: pattern.clone(),
        })?;
    let specialized = schema.specialize(&map);
    debug_assert_eq!(specialized, pattern);
    Ok(Line::by_rule(specialized.conclusion, schema.clone(), []))
}

fn with_rules<'a>(
    rules: &IndexSet<InferenceRule>,
    extra: impl IntoIterator<Item = &'a InferenceRule>,
) -> IndexSet<InferenceRule> {
    let mut rules = rules.clone();
    rules.extend(extra.into_iter().cloned());
    rules
}

fn ensure_valid(proof: &Proof, what: &'static str) -> Result<(), ProofError> {
    if proof.is_valid() {
        Ok(())
    } else {
        Err(ProofError::InvalidProof {
            what,
            statement: proof.statement.clone(),
        })
    }
}

fn ensure_compatible(first: &Proof, second: &Proof) -> Result<(), ProofError> {
    if first.assumptions() != second.assumptions() {
        return Err(ProofError::MismatchedAssumptions(
            first.assumptions().to_vec(),
            second.assumptions().to_vec(),
        ));
    }
    if first.rules != second.rules {
        return Err(ProofError::MismatchedRules);
    }
    Ok(())
}

fn ensure_deduction_rules(proof: &Proof) -> Result<(), ProofError> {
    match proof
        .rules
        .iter()
        .find(|rule| **rule != *MP && !rule.is_assumptionless())
    {
        Some(rule) => Err(ProofError::RuleWithAssumptions(rule.clone())),
        None => Ok(()),
    }
}

/// Converts a proof of `A` into a proof of `consequent` using the
/// assumptionless rule `conditional`, of which `(A->consequent)` must be a
/// specialization.
///
/// The result has the same assumptions as `antecedent_proof` and may use its
/// rules, [`MP`] and `conditional`.
pub fn prove_corollary(
    antecedent_proof: &Proof,
    consequent: &Formula,
    conditional: &InferenceRule,
) -> Result<Proof, ProofError> {
    ensure_valid(antecedent_proof, "antecedent proof")?;
    let antecedent = antecedent_proof.conclusion();
    log::debug!("proving corollary {consequent} of {antecedent} by {conditional}");

    let implication = schema_line(
        conditional,
        Formula::implies(antecedent.clone(), consequent.clone()),
    )?;
    let antecedent_line = antecedent_proof.lines.len() - 1;

    let mut lines = antecedent_proof.lines.clone();
    lines.push(implication);
    lines.push(Line::by_rule(
        consequent.clone(),
        MP.clone(),
        [antecedent_line, antecedent_line + 1],
    ));

    Ok(Proof::new(
        InferenceRule::new(antecedent_proof.assumptions().to_vec(), consequent.clone()),
        with_rules(&antecedent_proof.rules, [&*MP, conditional]),
        lines,
    ))
}

/// Combines proofs of `A` and `B` into a proof of `consequent` using the
/// assumptionless rule `double_conditional`, of which
/// `(A->(B->consequent))` must be a specialization.
///
/// Both proofs must share assumptions and rules. The lines of
/// `antecedent1_proof` come first, then the re-based lines of
/// `antecedent2_proof`, then three bridging lines.
pub fn combine_proofs(
    antecedent1_proof: &Proof,
    antecedent2_proof: &Proof,
    consequent: &Formula,
    double_conditional: &InferenceRule,
) -> Result<Proof, ProofError> {
    ensure_valid(antecedent1_proof, "first antecedent proof")?;
    ensure_valid(antecedent2_proof, "second antecedent proof")?;
    ensure_compatible(antecedent1_proof, antecedent2_proof)?;
    let antecedent1 = antecedent1_proof.conclusion();
    let antecedent2 = antecedent2_proof.conclusion();
    log::debug!(
        "combining proofs of {antecedent1} and {antecedent2} into {consequent} by {double_conditional}"
    );

    let second_implication = Formula::implies(antecedent2.clone(), consequent.clone());
    let double_implication = schema_line(
        double_conditional,
        Formula::implies(antecedent1.clone(), second_implication.clone()),
    )?;

    let mut lines = splice(&antecedent1_proof.lines, &antecedent2_proof.lines);
    let antecedent1_line = antecedent1_proof.lines.len() - 1;
    let antecedent2_line = lines.len() - 1;
    lines.push(double_implication);
    lines.push(Line::by_rule(
        second_implication,
        MP.clone(),
        [antecedent1_line, antecedent2_line + 1],
    ));
    lines.push(Line::by_rule(
        consequent.clone(),
        MP.clone(),
        [antecedent2_line, antecedent2_line + 2],
    ));

    Ok(Proof::new(
        InferenceRule::new(antecedent1_proof.assumptions().to_vec(), consequent.clone()),
        with_rules(&antecedent1_proof.rules, [&*MP, double_conditional]),
        lines,
    ))
}

/// The Deduction Theorem: converts a proof of `ψ` whose last assumption is `φ`
/// into a proof of `(φ->ψ)` from the remaining assumptions.
///
/// Every rule of `proof` must be [`MP`] or assumptionless. The result may use
/// the same rules and in addition [`MP`], [`I0`], [`I1`] and [`D`].
pub fn remove_assumption(proof: &Proof) -> Result<Proof, ProofError> {
    ensure_valid(proof, "proof")?;
    let Some((phi, remaining)) = proof.assumptions().split_last() else {
        return Err(ProofError::NoAssumptions(proof.statement.clone()));
    };
    ensure_deduction_rules(proof)?;
    log::debug!(
        "removing assumption {phi} from a proof of {} ({} lines)",
        proof.conclusion(),
        proof.lines.len()
    );

    let assume_phi = |formula: &Formula| Formula::implies(phi.clone(), formula.clone());
    let mut lines: Vec<Line> = Vec::with_capacity(3 * proof.lines.len());
    // implication_line[i] is the new line proving (phi->psi_i).
    let mut implication_line: Vec<usize> = Vec::with_capacity(proof.lines.len());

    for line in &proof.lines {
        let psi = &line.formula;
        match &line.justification {
            Justification::Assumption if psi == phi => {
                lines.push(schema_line(&I0, assume_phi(phi))?);
            }
            Justification::Rule { rule, assumptions } if *rule == *MP => {
                let (chi_line, conditional_line) = (assumptions[0], assumptions[1]);
                debug_assert!(chi_line < implication_line.len());
                debug_assert!(conditional_line < implication_line.len());
                let chi = &proof.lines[chi_line].formula;
                let conditional = &proof.lines[conditional_line].formula;

                let phi_chi = assume_phi(chi);
                let phi_psi = assume_phi(psi);
                let distributed = Formula::implies(phi_chi.clone(), phi_psi.clone());
                lines.push(schema_line(
                    &D,
                    Formula::implies(assume_phi(conditional), distributed.clone()),
                )?);
                let distribution = lines.len() - 1;
                lines.push(Line::by_rule(
                    distributed,
                    MP.clone(),
                    [implication_line[conditional_line], distribution],
                ));
                lines.push(Line::by_rule(
                    phi_psi,
                    MP.clone(),
                    [implication_line[chi_line], distribution + 1],
                ));
            }
            _ => {
                // psi holds without phi: re-derive it, then weaken.
                debug_assert!(line.assumptions().is_empty());
                lines.push(line.clone());
                let restated = lines.len() - 1;
                lines.push(schema_line(
                    &I1,
                    Formula::implies(psi.clone(), assume_phi(psi)),
                )?);
                lines.push(Line::by_rule(
                    assume_phi(psi),
                    MP.clone(),
                    [restated, restated + 1],
                ));
            }
        }
        implication_line.push(lines.len() - 1);
    }

    let conclusion = assume_phi(proof.conclusion());
    debug_assert_eq!(lines.last().map(|l| &l.formula), Some(&conclusion));
    Ok(Proof::new(
        InferenceRule::new(remaining.to_vec(), conclusion),
        with_rules(&proof.rules, [&*MP, &*I0, &*I1, &*D]),
        lines,
    ))
}

/// Combines proofs of a formula `A` and of `~A` into a proof of `conclusion`,
/// whatever it is.
///
/// Both proofs must share assumptions and rules. The result may also use
/// [`MP`] and [`I2`].
pub fn prove_from_opposites(
    proof_of_affirmation: &Proof,
    proof_of_negation: &Proof,
    conclusion: &Formula,
) -> Result<Proof, ProofError> {
    ensure_valid(proof_of_affirmation, "proof of affirmation")?;
    ensure_valid(proof_of_negation, "proof of negation")?;
    ensure_compatible(proof_of_affirmation, proof_of_negation)?;
    let affirmation = proof_of_affirmation.conclusion();
    let negation = Formula::not(affirmation.clone());
    if *proof_of_negation.conclusion() != negation {
        return Err(ProofError::NotNegation {
            expected: negation.to_string(),
            found: proof_of_negation.conclusion().clone(),
        });
    }
    log::debug!("proving {conclusion} from {affirmation} and {negation}");

    let implication = Formula::implies(affirmation.clone(), conclusion.clone());
    let ex_falso = schema_line(&I2, Formula::implies(negation, implication.clone()))?;

    let mut lines = splice(&proof_of_affirmation.lines, &proof_of_negation.lines);
    let affirmation_line = proof_of_affirmation.lines.len() - 1;
    let negation_line = lines.len() - 1;
    lines.push(ex_falso);
    lines.push(Line::by_rule(
        implication,
        MP.clone(),
        [negation_line, negation_line + 1],
    ));
    lines.push(Line::by_rule(
        conclusion.clone(),
        MP.clone(),
        [affirmation_line, negation_line + 2],
    ));

    Ok(Proof::new(
        InferenceRule::new(proof_of_affirmation.assumptions().to_vec(), conclusion.clone()),
        with_rules(&proof_of_affirmation.rules, [&*MP, &*I2]),
        lines,
    ))
}

/// The contradiction every refutation must reach: `~(p->p)`.
pub fn contradiction() -> Formula {
    Formula::not(Formula::implies(Formula::var("p"), Formula::var("p")))
}

/// Converts a proof of `~(p->p)` whose last assumption is `~φ` into a proof
/// of `φ` from the remaining assumptions.
///
/// Every rule of `proof` must be [`MP`] or assumptionless. The assumption is
/// discharged with [`remove_assumption`], [`N`] turns the implication into
/// `((p->p)->φ)` through [`prove_corollary`], and [`I0`] with a final Modus
/// Ponens lands on `φ`.
pub fn prove_by_way_of_contradiction(proof: &Proof) -> Result<Proof, ProofError> {
    ensure_valid(proof, "proof")?;
    let contradiction = contradiction();
    if *proof.conclusion() != contradiction {
        return Err(ProofError::UnexpectedConclusion {
            expected: contradiction,
            found: proof.conclusion().clone(),
        });
    }
    let Some(last) = proof.assumptions().last() else {
        return Err(ProofError::NoAssumptions(proof.statement.clone()));
    };
    let Some(formula) = last.negated() else {
        return Err(ProofError::NotNegation {
            expected: "~φ".to_string(),
            found: last.clone(),
        });
    };
    ensure_deduction_rules(proof)?;
    log::debug!("proving {formula} by way of contradiction");

    let refutation = remove_assumption(proof)?;
    let tautology = Formula::implies(Formula::var("p"), Formula::var("p"));
    let corollary = prove_corollary(
        &refutation,
        &Formula::implies(tautology.clone(), formula.clone()),
        &N,
    )?;

    let mut lines = corollary.lines;
    lines.push(schema_line(&I0, tautology)?);
    let tautology_line = lines.len() - 1;
    lines.push(Line::by_rule(
        formula.clone(),
        MP.clone(),
        [tautology_line, tautology_line - 1],
    ));

    Ok(Proof::new(
        InferenceRule::new(corollary.statement.assumptions, formula.clone()),
        with_rules(&corollary.rules, [&*I0]),
        lines,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proofs::axioms::{A, HILBERT_SYSTEM, NI};

    fn f(s: &str) -> Formula {
        Formula::parse(s).unwrap()
    }

    fn rules(rules: &[&InferenceRule]) -> IndexSet<InferenceRule> {
        rules.iter().map(|r| (*r).clone()).collect()
    }

    /// `[p] ⊢ (q->p)` via I1 and MP.
    fn weakening_proof() -> Proof {
        Proof::new(
            InferenceRule::new(vec![f("p")], f("(q->p)")),
            rules(&[&MP, &I1]),
            vec![
                Line::assumption(f("p")),
                Line::by_rule(f("(p->(q->p))"), I1.clone(), []),
                Line::by_rule(f("(q->p)"), MP.clone(), [0, 1]),
            ],
        )
    }

    #[test]
    fn splice_rebases_second_proof() {
        let proof = weakening_proof();
        let lines = splice(&proof.lines, &proof.lines);
        assert_eq!(lines.len(), 6);
        assert_eq!(&lines[..3], &proof.lines[..]);
        assert!(lines[3].is_assumption());
        assert_eq!(lines[5].assumptions(), &[3, 4]);
    }

    #[test]
    fn corollary_appends_two_lines() {
        let proof = weakening_proof();
        let result = prove_corollary(&proof, &f("(r->(q->p))"), &I1).unwrap();
        assert!(result.is_valid());
        assert_eq!(result.statement, InferenceRule::new(vec![f("p")], f("(r->(q->p))")));
        assert_eq!(result.lines.len(), proof.lines.len() + 2);
        assert_eq!(result.lines[3].formula, f("((q->p)->(r->(q->p)))"));
        assert_eq!(result.lines[3].rule(), Some(&*I1));
        assert_eq!(result.lines[4].assumptions(), &[2, 3]);
        assert_eq!(result.rules, rules(&[&MP, &I1]));
    }

    #[test]
    fn corollary_rejects_mismatched_conditional() {
        let proof = weakening_proof();
        let err = prove_corollary(&proof, &f("r"), &I0).unwrap_err();
        assert!(matches!(err, ProofError::NotSpecialization { .. }), "{err}");
        let err = prove_corollary(&proof, &f("r"), &MP).unwrap_err();
        assert!(matches!(err, ProofError::NotSpecialization { .. }), "{err}");
    }

    #[test]
    fn combine_lays_out_first_proof_first() {
        let first = weakening_proof();
        let second = Proof::new(
            InferenceRule::new(vec![f("p")], f("p")),
            rules(&[&MP, &I1]),
            vec![Line::assumption(f("p"))],
        );
        let result = combine_proofs(&first, &second, &f("((q->p)&p)"), &A).unwrap();
        assert!(result.is_valid(), "{result}");
        assert_eq!(result.lines.len(), first.lines.len() + second.lines.len() + 3);
        assert_eq!(&result.lines[..3], &first.lines[..]);
        assert_eq!(result.lines[4].formula, f("((q->p)->(p->((q->p)&p)))"));
        assert_eq!(result.lines[5].formula, f("(p->((q->p)&p))"));
        assert_eq!(result.lines[5].assumptions(), &[2, 4]);
        assert_eq!(result.lines[6].assumptions(), &[3, 5]);
        assert_eq!(result.rules, rules(&[&MP, &I1, &A]));
    }

    #[test]
    fn combine_needs_matching_proofs() {
        let first = weakening_proof();
        let mut second = weakening_proof();
        second.statement.assumptions.push(f("r"));
        assert!(matches!(
            combine_proofs(&first, &second, &f("q"), &NI),
            Err(ProofError::MismatchedAssumptions(..))
        ));

        let mut second = weakening_proof();
        second.rules.insert(I0.clone());
        assert_eq!(
            combine_proofs(&first, &second, &f("q"), &NI),
            Err(ProofError::MismatchedRules)
        );
    }

    #[test]
    fn remove_assumption_handles_every_line_kind() {
        // [r, p] ⊢ (q->p): one assumption of each kind, an axiom and MP.
        let mut proof = weakening_proof();
        proof.statement.assumptions.insert(0, f("r"));
        proof.lines.insert(0, Line::assumption(f("r")));
        proof.lines[3] = Line::by_rule(f("(q->p)"), MP.clone(), [1, 2]);
        assert!(proof.is_valid());

        let result = remove_assumption(&proof).unwrap();
        assert!(result.is_valid(), "{result}");
        assert_eq!(result.statement, InferenceRule::new(vec![f("r")], f("(p->(q->p))")));
        // r: 3 lines, p: 1 line, I1: 3 lines, MP: 3 lines.
        assert_eq!(result.lines.len(), 10);
        assert_eq!(result.lines[3].formula, f("(p->p)"));
        assert_eq!(result.lines[3].rule(), Some(&*I0));
        assert_eq!(result.lines[7].rule(), Some(&*D));
        assert_eq!(result.lines[8].assumptions(), &[6, 7]);
        assert_eq!(result.lines[9].assumptions(), &[3, 8]);
        assert_eq!(result.rules, rules(&[&MP, &I1, &I0, &D]));
    }

    #[test]
    fn remove_assumption_rejects_bad_inputs() {
        let mut no_assumptions = weakening_proof();
        no_assumptions.statement.assumptions.clear();
        no_assumptions.lines[0] = Line::by_rule(f("p"), I0.clone(), []);
        no_assumptions.rules.insert(I0.clone());
        assert!(matches!(
            remove_assumption(&no_assumptions),
            Err(ProofError::InvalidProof { .. })
        ));

        let assumptionless = Proof::new(
            InferenceRule::fact(f("(p->p)")),
            rules(&[&I0]),
            vec![Line::by_rule(f("(p->p)"), I0.clone(), [])],
        );
        assert_eq!(
            remove_assumption(&assumptionless),
            Err(ProofError::NoAssumptions(assumptionless.statement.clone()))
        );

        let mut with_custom_rule = weakening_proof();
        let swap = InferenceRule::new(vec![f("(p&q)")], f("(q&p)"));
        with_custom_rule.rules.insert(swap.clone());
        assert_eq!(
            remove_assumption(&with_custom_rule),
            Err(ProofError::RuleWithAssumptions(swap))
        );
    }

    #[test]
    fn opposites_prove_anything() {
        let affirmation = Proof::new(
            InferenceRule::new(vec![f("p"), f("~p")], f("p")),
            HILBERT_SYSTEM.clone(),
            vec![Line::assumption(f("p"))],
        );
        let negation = Proof::new(
            InferenceRule::new(vec![f("p"), f("~p")], f("~p")),
            HILBERT_SYSTEM.clone(),
            vec![Line::assumption(f("~p"))],
        );
        let result = prove_from_opposites(&affirmation, &negation, &f("q")).unwrap();
        assert!(result.is_valid(), "{result}");
        assert_eq!(result.lines.len(), 5);
        assert_eq!(result.lines[2].formula, f("(~p->(p->q))"));
        assert_eq!(result.lines[3].assumptions(), &[1, 2]);
        assert_eq!(result.lines[4].assumptions(), &[0, 3]);

        assert!(matches!(
            prove_from_opposites(&affirmation, &affirmation, &f("q")),
            Err(ProofError::NotNegation { .. })
        ));
    }

    #[test]
    fn maneuvers_reject_invalid_inputs() {
        let valid = weakening_proof();
        let mut invalid = weakening_proof();
        // MP over the wrong lines
        invalid.lines[2] = Line::by_rule(f("(q->p)"), MP.clone(), [1, 0]);
        assert!(!invalid.is_valid());
        let is_invalid_proof =
            |res: Result<Proof, ProofError>| matches!(res, Err(ProofError::InvalidProof { .. }));

        assert!(is_invalid_proof(prove_corollary(&invalid, &f("(r->(q->p))"), &I1)));
        assert!(is_invalid_proof(combine_proofs(
            &invalid,
            &valid,
            &f("((q->p)&(q->p))"),
            &A
        )));
        assert!(is_invalid_proof(combine_proofs(
            &valid,
            &invalid,
            &f("((q->p)&(q->p))"),
            &A
        )));

        let negation = Proof::new(
            InferenceRule::new(vec![f("p")], f("~(q->p)")),
            valid.rules.clone(),
            vec![Line::assumption(f("p"))],
        );
        assert!(!negation.is_valid());
        assert!(is_invalid_proof(prove_from_opposites(&valid, &negation, &f("r"))));
        assert!(is_invalid_proof(prove_from_opposites(&invalid, &negation, &f("r"))));
    }

    #[test]
    fn contradiction_needs_negated_last_assumption() {
        let proof = Proof::new(
            InferenceRule::new(vec![f("p")], contradiction()),
            rules(&[&MP]),
            vec![Line::assumption(f("p"))],
        );
        assert!(matches!(
            prove_by_way_of_contradiction(&proof),
            Err(ProofError::InvalidProof { .. })
        ));

        let proof = Proof::new(
            InferenceRule::new(vec![contradiction(), f("p")], contradiction()),
            rules(&[&MP]),
            vec![Line::assumption(contradiction())],
        );
        assert!(matches!(
            prove_by_way_of_contradiction(&proof),
            Err(ProofError::NotNegation { .. })
        ));

        let proof = Proof::new(
            InferenceRule::new(vec![f("p")], f("p")),
            rules(&[&MP]),
            vec![Line::assumption(f("p"))],
        );
        assert!(matches!(
            prove_by_way_of_contradiction(&proof),
            Err(ProofError::UnexpectedConclusion { .. })
        ));
    }

    #[test]
    fn contradiction_composes_deduction_and_corollary() {
        // [~(p->p), ~q] ⊢ ~(p->p)
        let proof = Proof::new(
            InferenceRule::new(vec![contradiction(), f("~q")], contradiction()),
            rules(&[&MP]),
            vec![Line::assumption(contradiction())],
        );
        let result = prove_by_way_of_contradiction(&proof).unwrap();
        assert!(result.is_valid(), "{result}");
        assert_eq!(result.statement, InferenceRule::new(vec![contradiction()], f("q")));

        let refutation = remove_assumption(&proof).unwrap();
        let corollary = prove_corollary(&refutation, &f("((p->p)->q)"), &N).unwrap();
        assert_eq!(&result.lines[..corollary.lines.len()], &corollary.lines[..]);
        assert_eq!(result.lines.len(), corollary.lines.len() + 2);
        assert_eq!(result.rules, rules(&[&MP, &I0, &I1, &D, &N]));
    }
}
