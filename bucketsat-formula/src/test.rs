//! Formula generators for tests.
use proptest::{prelude::*, *};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::cnf::CnfFormula;
use crate::lit::Lit;

/// All 3-literal clauses over a group of literals.
fn triples(group: &[Lit], invert: bool, clauses: &mut Vec<Vec<Lit>>) {
    for (a, &lit_a) in group.iter().enumerate() {
        for (b, &lit_b) in group[..a].iter().enumerate() {
            for &lit_c in group[..b].iter() {
                clauses.push(vec![lit_a ^ invert, lit_b ^ invert, lit_c ^ invert]);
            }
        }
    }
}

/// Generate small hard unsat instances.
///
/// Follows the construction of http://www.cs.qub.ac.uk/~i.spence/sgen/ using random partitions
/// of the variables into groups of four.
pub fn sgen_unsat_formula(
    blocks: impl Strategy<Value = usize>,
) -> impl Strategy<Value = CnfFormula> {
    blocks.prop_flat_map(|blocks| {
        collection::vec(bool::ANY, blocks * 4 + 1).prop_perturb(|polarity, mut rng| {
            let mut clauses: Vec<Vec<Lit>> = vec![];
            let mut lits: Vec<Lit> = polarity
                .into_iter()
                .enumerate()
                .map(|(index, polarity)| Lit::from_index(index, polarity))
                .collect();

            for &invert in [false, true].iter() {
                lits.shuffle(&mut rng);
                for block in lits.chunks_exact(4) {
                    triples(block, invert, &mut clauses);
                }
                // The leftover literal joins the first group with every pair of it.
                let extra = lits[lits.len() - 1];
                for b in 0..4 {
                    for c in 0..b {
                        clauses.push(vec![extra ^ invert, lits[b] ^ invert, lits[c] ^ invert]);
                    }
                }
            }

            for clause in clauses.iter_mut() {
                clause.shuffle(&mut rng);
            }
            clauses.shuffle(&mut rng);
            CnfFormula::from(clauses)
        })
    })
}

/// Generate a sat instance.
///
/// This generates a random full assignment and then only generates clauses that contain at least
/// one literal satisfied by that assignment.
pub fn sat_formula(
    vars: impl Strategy<Value = usize>,
    clause_count: impl Strategy<Value = usize>,
    density: impl Strategy<Value = f64>,
    polarity_dist: impl Strategy<Value = f64>,
) -> impl Strategy<Value = CnfFormula> {
    (vars, clause_count, density, polarity_dist).prop_flat_map(
        |(vars, clause_count, density, polarity_dist)| {
            collection::vec(bool::ANY, vars).prop_perturb(move |polarity, mut rng| {
                let lits: Vec<Lit> = polarity
                    .into_iter()
                    .enumerate()
                    .map(|(index, polarity)| Lit::from_index(index, polarity))
                    .collect();

                let mut clauses: Vec<Vec<Lit>> = vec![];

                for _ in 0..clause_count {
                    let fixed_lit = lits[rng.gen_range(0, lits.len())];
                    let mut clause = vec![fixed_lit];
                    for &lit in lits.iter() {
                        if lit != fixed_lit && rng.gen_bool(density) {
                            clause.push(lit ^ rng.gen_bool(polarity_dist));
                        }
                    }
                    clause.shuffle(&mut rng);
                    clauses.push(clause);
                }

                let mut formula = CnfFormula::from(clauses);
                formula.set_var_count(vars);
                formula
            })
        },
    )
}

/// Decide satisfiability by enumerating all assignments.
///
/// Only usable for formulas with few variables.
pub fn brute_force_sat(formula: &CnfFormula) -> bool {
    let var_count = formula.var_count();
    assert!(var_count <= 20, "too many variables for brute force");

    (0u32..(1 << var_count)).any(|assignment| {
        formula.iter().all(|clause| {
            clause
                .iter()
                .any(|lit| ((assignment >> lit.index()) & 1 == 1) == lit.is_positive())
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn sgen_is_unsat(formula in sgen_unsat_formula(1..3usize)) {
            prop_assert!(!brute_force_sat(&formula));
        }

        #[test]
        fn sat_is_sat(formula in sat_formula(2..12usize, 1..40usize, 0.05..0.3, 0.5..1.0)) {
            prop_assert!(brute_force_sat(&formula));
        }
    }

    #[test]
    fn brute_force_small() {
        assert!(brute_force_sat(&cnf_formula![
            1, 2;
            -1;
        ]));
        assert!(!brute_force_sat(&cnf_formula![
            1, 2;
            1, -2;
            -1, 2;
            -1, -2;
        ]));
    }
}
