//! Resolution of two clauses on their pivot.
use std::cmp::Ordering;

use crate::lit::Lit;
use crate::order::EliminationOrder;

/// Result of [`resolve`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Resolvent {
    /// Both clauses consisted of just the pivot literal.
    Empty,
    /// The clauses clash on a variable besides the pivot.
    Tautology,
    /// The resolvent was written to the output buffer.
    Clause,
}

/// Resolve a positive and a negative clause on their shared pivot variable.
///
/// Both clauses must be canonical and have complementary pivot literals as selected by `order`. A
/// non-empty, non-tautological resolvent is written to `resolvent` in canonical order.
pub fn resolve(
    positive: &[Lit],
    negative: &[Lit],
    order: EliminationOrder,
    resolvent: &mut Vec<Lit>,
) -> Resolvent {
    debug_assert_eq!(order.pivot(positive), !order.pivot(negative));

    resolvent.clear();

    let mut pos_rest = order.rest(positive);
    let mut neg_rest = order.rest(negative);

    match (pos_rest.is_empty(), neg_rest.is_empty()) {
        (true, true) => return Resolvent::Empty,
        (true, false) => {
            resolvent.extend_from_slice(neg_rest);
            return Resolvent::Clause;
        }
        (false, true) => {
            resolvent.extend_from_slice(pos_rest);
            return Resolvent::Clause;
        }
        (false, false) => (),
    }

    while let (Some((&pos_lit, pos_tail)), Some((&neg_lit, neg_tail))) =
        (pos_rest.split_first(), neg_rest.split_first())
    {
        match pos_lit.var().cmp(&neg_lit.var()) {
            Ordering::Less => {
                resolvent.push(pos_lit);
                pos_rest = pos_tail;
            }
            Ordering::Greater => {
                resolvent.push(neg_lit);
                neg_rest = neg_tail;
            }
            Ordering::Equal => {
                if pos_lit != neg_lit {
                    return Resolvent::Tautology;
                }
                resolvent.push(pos_lit);
                pos_rest = pos_tail;
                neg_rest = neg_tail;
            }
        }
    }

    resolvent.extend_from_slice(pos_rest);
    resolvent.extend_from_slice(neg_rest);

    Resolvent::Clause
}
