use propositions::proofs::*;
use propositions::semantics::{is_sound_inference, is_tautology};
use propositions::util::IndexSet;
use propositions::*;

fn f(s: &str) -> Formula {
    Formula::parse(s).unwrap()
}

fn assumption_proof(assumptions: &[&str], conclusion: &str) -> Proof {
    Proof::new(
        InferenceRule::new(assumptions.iter().map(|a| f(a)).collect(), f(conclusion)),
        HILBERT_SYSTEM.clone(),
        vec![Line::assumption(f(conclusion))],
    )
}

/// `[p, q, r] ⊢ (p&(q&r))` built from three one-line proofs.
fn conjunction_proof() -> Proof {
    let assumptions = ["p", "q", "r"];
    let with_a = |proof: Proof| {
        let mut rules = proof.rules.clone();
        rules.insert(A.clone());
        Proof::new(proof.statement, rules, proof.lines)
    };
    let p = with_a(assumption_proof(&assumptions, "p"));
    let q = with_a(assumption_proof(&assumptions, "q"));
    let r = with_a(assumption_proof(&assumptions, "r"));
    let qr = combine_proofs(&q, &r, &f("(q&r)"), &A).unwrap();
    // combining adds no rules once A is present, so the rule sets still agree
    combine_proofs(&p, &qr, &f("(p&(q&r))"), &A).unwrap()
}

#[test]
fn corollary_keeps_assumptions() {
    let _ = env_logger::builder().is_test(true).try_init();

    let proof = assumption_proof(&["p", "s"], "p");
    let corollary = prove_corollary(&proof, &f("(q->p)"), &I1).unwrap();
    assert!(corollary.is_valid());
    assert_eq!(corollary.statement, InferenceRule::new(vec![f("p"), f("s")], f("(q->p)")));
    assert!(corollary.rules.contains(&*MP));
    assert!(corollary.rules.contains(&*I1));
}

#[test]
fn combined_proof_length() {
    let _ = env_logger::builder().is_test(true).try_init();

    let proof = conjunction_proof();
    assert!(proof.is_valid(), "{proof}");
    // (1 + 1 + 3) lines for (q&r), then 1 + 5 + 3
    assert_eq!(proof.lines.len(), 9);
    assert_eq!(proof.conclusion(), &f("(p&(q&r))"));
}

#[test]
fn remove_assumption_until_a_theorem_remains() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut proof = conjunction_proof();
    let mut conclusion = proof.conclusion().clone();
    for discharged in ["r", "q", "p"] {
        proof = remove_assumption(&proof).unwrap();
        conclusion = Formula::implies(f(discharged), conclusion);
        assert!(proof.is_valid(), "{proof}");
        assert_eq!(proof.conclusion(), &conclusion);
    }
    assert!(proof.assumptions().is_empty());
    assert_eq!(conclusion, f("(p->(q->(r->(p&(q&r)))))"));
    assert!(is_tautology(&conclusion));
    assert_eq!(
        remove_assumption(&proof),
        Err(ProofError::NoAssumptions(proof.statement.clone()))
    );
}

#[test]
fn remove_assumption_from_two_identical_lines() {
    let _ = env_logger::builder().is_test(true).try_init();

    let proof = Proof::new(
        InferenceRule::new(vec![f("q"), f("p")], f("p")),
        HILBERT_SYSTEM.clone(),
        vec![Line::assumption(f("p")), Line::assumption(f("p"))],
    );
    assert!(proof.is_valid());
    let result = remove_assumption(&proof).unwrap();
    assert_eq!(result.statement, InferenceRule::new(vec![f("q")], f("(p->p)")));
    assert!(result.is_valid(), "{result}");
    assert!(result.lines.iter().all(|line| line.rule() == Some(&*I0)));
}

#[test]
fn opposites_prove_any_conclusion() {
    let _ = env_logger::builder().is_test(true).try_init();

    let assumptions = ["p", "~p"];
    let affirmation = assumption_proof(&assumptions, "p");
    let negation = assumption_proof(&assumptions, "~p");
    for conclusion in ["q", "(r|~r)", "~(p->p)", "F"] {
        let proof = prove_from_opposites(&affirmation, &negation, &f(conclusion)).unwrap();
        assert!(proof.is_valid(), "{proof}");
        assert_eq!(proof.statement.assumptions, vec![f("p"), f("~p")]);
        assert_eq!(proof.conclusion(), &f(conclusion));
        assert_eq!(proof.lines.len(), 5);
        assert!(proof.rules.contains(&*I2));
    }
}

#[test]
fn contradiction_matches_its_composition() {
    let _ = env_logger::builder().is_test(true).try_init();

    // the last assumption must be a negation
    let proof = Proof::new(
        InferenceRule::new(vec![f("(q->~(p->p))"), f("q")], contradiction()),
        HILBERT_SYSTEM.clone(),
        vec![
            Line::assumption(f("q")),
            Line::assumption(f("(q->~(p->p))")),
            Line::by_rule(contradiction(), MP.clone(), [0, 1]),
        ],
    );
    assert!(proof.is_valid());
    assert!(matches!(
        prove_by_way_of_contradiction(&proof),
        Err(ProofError::NotNegation { .. })
    ));

    // [(~q->~(p->p)), ~q] ⊢ ~(p->p)
    let proof = Proof::new(
        InferenceRule::new(vec![f("(~q->~(p->p))"), f("~q")], contradiction()),
        HILBERT_SYSTEM.clone(),
        vec![
            Line::assumption(f("~q")),
            Line::assumption(f("(~q->~(p->p))")),
            Line::by_rule(contradiction(), MP.clone(), [0, 1]),
        ],
    );
    let result = prove_by_way_of_contradiction(&proof).unwrap();
    assert!(result.is_valid(), "{result}");
    assert_eq!(
        result.statement,
        InferenceRule::new(vec![f("(~q->~(p->p))")], f("q"))
    );

    let refutation = remove_assumption(&proof).unwrap();
    let corollary = prove_corollary(&refutation, &f("((p->p)->q)"), &N).unwrap();
    assert_eq!(result.lines[..corollary.lines.len()], corollary.lines[..]);
    let tail = &result.lines[corollary.lines.len()..];
    assert_eq!(tail.len(), 2);
    assert_eq!(tail[0].formula, f("(p->p)"));
    assert_eq!(tail[1].formula, f("q"));
    assert_eq!(tail[1].rule(), Some(&*MP));
}

#[test]
fn derived_statements_are_sound() {
    let _ = env_logger::builder().is_test(true).try_init();

    let conjunction = conjunction_proof();
    let discharged = remove_assumption(&conjunction).unwrap();
    let weakened = prove_corollary(&discharged, &f("(s->(r->(p&(q&r))))"), &I1).unwrap();
    for proof in [&conjunction, &discharged, &weakened] {
        assert!(proof.is_valid());
        assert!(is_sound_inference(&proof.statement), "{}", proof.statement);
        for rule in &proof.rules {
            assert!(is_sound_inference(rule), "{rule}");
        }
    }
}

#[test]
fn inputs_are_left_untouched() {
    let _ = env_logger::builder().is_test(true).try_init();

    let proof = conjunction_proof();
    let before = proof.clone();
    let _ = remove_assumption(&proof).unwrap();
    let _ = prove_corollary(&proof, &f("((p&(q&r))|s)"), &O2).unwrap();
    let _ = combine_proofs(&proof, &proof, &f("((p&(q&r))&(p&(q&r)))"), &A).unwrap();
    assert_eq!(proof, before);
}

#[test]
fn maneuvers_run_on_many_threads() {
    let _ = env_logger::builder().is_test(true).try_init();

    let proof = conjunction_proof();
    let results: Vec<Proof> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| remove_assumption(&proof).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(results.windows(2).all(|pair| pair[0] == pair[1]));
}

#[test]
fn scripts_drive_the_maneuvers() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut session = Session::default();
    session
        .parse_and_run_program(
            None,
            r#"
            (proof have-p [p q] p [MP] (assume p))
            (proof have-q [p q] q [MP] (assume q))
            (combine both have-p have-q (p&q) A)
            (remove-assumption q-to-both both)
            (remove-assumption theorem q-to-both)
            (check theorem)
            "#,
        )
        .unwrap();
    let theorem = session.proof("theorem").unwrap();
    assert_eq!(theorem.statement, InferenceRule::fact(f("(p->(q->(p&q)))")));
    let expected: IndexSet<InferenceRule> =
        [&*MP, &*A, &*I0, &*I1, &*D].into_iter().cloned().collect();
    assert_eq!(theorem.rules, expected);
}
