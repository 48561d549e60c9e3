//! The fixed catalogue of axiom schemas and Modus Ponens.
//!
//! Every schema is stated over the placeholder variables `p`, `q` and `r`.

use lazy_static::lazy_static;

use crate::formula::Formula;
use crate::proofs::InferenceRule;
use crate::util::IndexSet;

fn schema(assumptions: &[&str], conclusion: &str) -> InferenceRule {
    let parse = |s: &str| {
        Formula::parse(s).unwrap_or_else(|err| panic!("malformed axiom schema {s}: {err}"))
    };
    InferenceRule::new(assumptions.iter().map(|a| parse(a)).collect(), parse(conclusion))
}

lazy_static! {
    /// Modus Ponens: from `p` and `(p->q)` derive `q`.
    pub static ref MP: InferenceRule = schema(&["p", "(p->q)"], "q");

    /// Self implication.
    pub static ref I0: InferenceRule = schema(&[], "(p->p)");
    /// Implication introduction (weakening).
    pub static ref I1: InferenceRule = schema(&[], "(q->(p->q))");
    /// Self-distribution of implication.
    pub static ref D: InferenceRule = schema(&[], "((p->(q->r))->((p->q)->(p->r)))");
    /// Ex falso quodlibet.
    pub static ref I2: InferenceRule = schema(&[], "(~p->(p->q))");
    /// Reversed contraposition.
    pub static ref N: InferenceRule = schema(&[], "((~q->~p)->(p->q))");
    pub static ref NI: InferenceRule = schema(&[], "(p->(~q->~(p->q)))");
    /// Double negation introduction.
    pub static ref NN: InferenceRule = schema(&[], "(p->~~p)");
    /// Resolution.
    pub static ref R: InferenceRule = schema(&[], "((q->p)->((~q->p)->p))");

    pub static ref A: InferenceRule = schema(&[], "(p->(q->(p&q)))");
    pub static ref NA1: InferenceRule = schema(&[], "(~q->~(p&q))");
    pub static ref NA2: InferenceRule = schema(&[], "(~p->~(p&q))");
    pub static ref O1: InferenceRule = schema(&[], "(q->(p|q))");
    pub static ref O2: InferenceRule = schema(&[], "(p->(p|q))");
    pub static ref NO: InferenceRule = schema(&[], "(~p->(~q->~(p|q)))");
    pub static ref T: InferenceRule = schema(&[], "T");
    pub static ref NF: InferenceRule = schema(&[], "~F");

    /// The Hilbert system for implication and negation.
    pub static ref HILBERT_SYSTEM: IndexSet<InferenceRule> =
        [&*MP, &*I1, &*D, &*N].into_iter().cloned().collect();

    /// Every schema of the catalogue.
    pub static ref FULL_SYSTEM: IndexSet<InferenceRule> =
        named_rules().into_iter().map(|(_, rule)| rule.clone()).collect();
}

/// The catalogue by name, in declaration order.
pub fn named_rules() -> Vec<(&'static str, &'static InferenceRule)> {
    vec![
        ("MP", &*MP),
        ("I0", &*I0),
        ("I1", &*I1),
        ("D", &*D),
        ("I2", &*I2),
        ("N", &*N),
        ("NI", &*NI),
        ("NN", &*NN),
        ("R", &*R),
        ("A", &*A),
        ("NA1", &*NA1),
        ("NA2", &*NA2),
        ("O1", &*O1),
        ("O2", &*O2),
        ("NO", &*NO),
        ("T", &*T),
        ("NF", &*NF),
    ]
}
