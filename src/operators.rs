//! Syntactic conversion of formulas to restricted sets of operators.
//!
//! Every conversion preserves the truth table of its input. Constants are
//! expressed through the variable `p`.

use crate::formula::{BinaryOp, Formula};

fn p() -> Formula {
    Formula::var("p")
}

/// Rebuilds `formula` bottom-up, letting `rewrite` replace each node whose
/// children have already been converted.
fn rewrite_bottom_up(formula: &Formula, rewrite: &impl Fn(Formula) -> Formula) -> Formula {
    let rebuilt = match formula {
        Formula::Var(_) | Formula::Const(_) => formula.clone(),
        Formula::Not(operand) => Formula::not(rewrite_bottom_up(operand, rewrite)),
        Formula::Binary(op, lhs, rhs) => Formula::binary(
            *op,
            rewrite_bottom_up(lhs, rewrite),
            rewrite_bottom_up(rhs, rewrite),
        ),
    };
    rewrite(rebuilt)
}

fn implies_as_or(lhs: Formula, rhs: Formula) -> Formula {
    Formula::or(Formula::not(lhs), rhs)
}

/// Converts to an equivalent formula over `~`, `&` and `|` only.
pub fn to_not_and_or(formula: &Formula) -> Formula {
    rewrite_bottom_up(formula, &|f| match f {
        Formula::Const(true) => Formula::not(Formula::and(p(), Formula::not(p()))),
        Formula::Const(false) => Formula::and(p(), Formula::not(p())),
        Formula::Binary(op, lhs, rhs) => {
            let (lhs, rhs) = ((*lhs).clone(), (*rhs).clone());
            match op {
                BinaryOp::And | BinaryOp::Or => Formula::binary(op, lhs, rhs),
                BinaryOp::Implies => implies_as_or(lhs, rhs),
                BinaryOp::Xor => Formula::or(
                    Formula::and(lhs.clone(), Formula::not(rhs.clone())),
                    Formula::and(Formula::not(lhs), rhs),
                ),
                BinaryOp::Iff => Formula::and(
                    implies_as_or(lhs.clone(), rhs.clone()),
                    implies_as_or(rhs, lhs),
                ),
                BinaryOp::Nand => Formula::not(Formula::and(lhs, rhs)),
                BinaryOp::Nor => Formula::not(Formula::or(lhs, rhs)),
            }
        }
        other => other,
    })
}

/// Converts to an equivalent formula over `~` and `&` only.
pub fn to_not_and(formula: &Formula) -> Formula {
    rewrite_bottom_up(&to_not_and_or(formula), &|f| match f {
        Formula::Binary(BinaryOp::Or, lhs, rhs) => Formula::not(Formula::and(
            Formula::not((*lhs).clone()),
            Formula::not((*rhs).clone()),
        )),
        other => other,
    })
}

/// Converts to an equivalent formula over `-&` only.
pub fn to_nand(formula: &Formula) -> Formula {
    let nand = |lhs: Formula, rhs: Formula| Formula::binary(BinaryOp::Nand, lhs, rhs);
    rewrite_bottom_up(&to_not_and(formula), &|f| match f {
        Formula::Not(operand) => nand((*operand).clone(), (*operand).clone()),
        Formula::Binary(BinaryOp::And, lhs, rhs) => {
            let both = nand((*lhs).clone(), (*rhs).clone());
            nand(both.clone(), both)
        }
        other => other,
    })
}

/// Converts to an equivalent formula over `->` and `~` only.
pub fn to_implies_not(formula: &Formula) -> Formula {
    rewrite_bottom_up(&to_not_and_or(formula), &|f| match f {
        Formula::Binary(BinaryOp::And, lhs, rhs) => Formula::not(Formula::implies(
            (*lhs).clone(),
            Formula::not((*rhs).clone()),
        )),
        Formula::Binary(BinaryOp::Or, lhs, rhs) => {
            Formula::implies(Formula::not((*lhs).clone()), (*rhs).clone())
        }
        other => other,
    })
}

/// Converts to an equivalent formula over `->` and `F` only.
pub fn to_implies_false(formula: &Formula) -> Formula {
    rewrite_bottom_up(&to_implies_not(formula), &|f| match f {
        Formula::Not(operand) => Formula::implies((*operand).clone(), Formula::constant(false)),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantics::{all_models, evaluate};
    use crate::util::Symbol;

    const SAMPLES: &[&str] = &[
        "T",
        "F",
        "~p",
        "(p->q)",
        "(p+q)",
        "(p<->~q)",
        "((p-&q)-|r)",
        "((p|T)&~(q->F))",
        "~((p<->q)+(r-&~p))",
    ];

    fn assert_equivalent(original: &Formula, converted: &Formula) {
        let mut vars = original.variables();
        vars.extend(converted.variables());
        let vars: Vec<Symbol> = vars.into_iter().collect();
        for model in all_models(&vars) {
            assert_eq!(
                evaluate(original, &model),
                evaluate(converted, &model),
                "{original} and {converted} differ"
            );
        }
    }

    fn check(convert: fn(&Formula) -> Formula, allowed: &[&str]) {
        for sample in SAMPLES {
            let original = Formula::parse(sample).unwrap();
            let converted = convert(&original);
            for op in converted.operators() {
                assert!(allowed.contains(&op.as_str()), "{converted} uses {op}");
            }
            assert_equivalent(&original, &converted);
        }
    }

    #[test]
    fn not_and_or() {
        check(to_not_and_or, &["~", "&", "|"]);
    }

    #[test]
    fn not_and() {
        check(to_not_and, &["~", "&"]);
    }

    #[test]
    fn nand() {
        check(to_nand, &["-&"]);
    }

    #[test]
    fn implies_not() {
        check(to_implies_not, &["->", "~"]);
    }

    #[test]
    fn implies_false() {
        check(to_implies_false, &["->", "F"]);
    }
}
