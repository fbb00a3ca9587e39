//! Loading a formula into the buckets.
use bucketsat_formula::{copy_canonical, Canonical};

use crate::bucket::Bucket;
use crate::clause::{Clause, Polarity};
use crate::lit::Lit;
use crate::order::EliminationOrder;

/// What happened to a loaded clause.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Loaded {
    /// Stored in the bucket of its pivot.
    Filed,
    /// The bucket already contained the clause.
    Duplicate,
    /// The clause contains a literal and its negation and was ignored.
    Tautology,
    /// The clause has no literals, the formula is unsatisfiable.
    Empty,
}

/// Adds a clause to the bucket of its pivot variable.
///
/// Removes duplicated literals, ignores tautological clauses and reports empty clauses. The
/// buckets must cover every variable of the clause.
pub fn load_clause(
    buckets: &mut [Bucket],
    order: EliminationOrder,
    tmp: &mut Vec<Lit>,
    lits: &[Lit],
) -> Loaded {
    if copy_canonical(tmp, lits) == Canonical::Tautology {
        return Loaded::Tautology;
    }
    if tmp.is_empty() {
        return Loaded::Empty;
    }

    let pivot = order.pivot(tmp);
    if buckets[pivot.index()].add(Clause::new(tmp), Polarity::of(pivot)) {
        Loaded::Filed
    } else {
        Loaded::Duplicate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use bucketsat_formula::{lits, var};

    use crate::lit::Var;

    fn buckets(order: EliminationOrder) -> Vec<Bucket> {
        (0..4)
            .map(|index| Bucket::new(Var::from_index(index), order, 4))
            .collect()
    }

    #[test]
    fn files_under_pivot() {
        let mut tmp = vec![];

        let mut descending = buckets(EliminationOrder::Descending);
        let order = EliminationOrder::Descending;
        assert_eq!(
            load_clause(&mut descending, order, &mut tmp, &lits![3, -1, 3]),
            Loaded::Filed
        );
        assert_eq!(descending[2].len(Polarity::Positive), 1);
        assert_eq!(descending[2].var(), var!(3));
        assert_eq!(
            load_clause(&mut descending, order, &mut tmp, &lits![-1, 3]),
            Loaded::Duplicate
        );

        let mut ascending = buckets(EliminationOrder::Ascending);
        let order = EliminationOrder::Ascending;
        assert_eq!(
            load_clause(&mut ascending, order, &mut tmp, &lits![3, -1, 4]),
            Loaded::Filed
        );
        assert_eq!(ascending[0].len(Polarity::Negative), 1);
    }

    #[test]
    fn tautologies_and_empty_clauses() {
        let order = EliminationOrder::Descending;
        let mut buckets = buckets(order);
        let mut tmp = vec![];

        assert_eq!(
            load_clause(&mut buckets, order, &mut tmp, &lits![2, 4, -2]),
            Loaded::Tautology
        );
        assert_eq!(load_clause(&mut buckets, order, &mut tmp, &[]), Loaded::Empty);
        assert!(buckets.iter().all(|bucket| bucket.is_empty()));
    }
}
