//! Elimination order and pivot selection.
use std::fmt;

use serde::Deserialize;

use crate::lit::{Lit, Var};

/// Order in which variables are eliminated.
///
/// Every clause is filed under its pivot, the variable of the clause that is eliminated first.
/// Resolving on the pivot leaves only variables that are eliminated later, so each resolvent lands
/// in a bucket that is still ahead. The order fixes both the sequence of buckets and the pivot rule,
/// so the two can never disagree.
///
/// For a canonical clause the pivot literal is the last literal when eliminating in descending
/// order and the first literal when eliminating in ascending order.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EliminationOrder {
    /// Eliminate variable N first and variable 1 last, the pivot is the largest variable.
    Descending,
    /// Eliminate variable 1 first and variable N last, the pivot is the smallest variable.
    Ascending,
}

impl Default for EliminationOrder {
    fn default() -> EliminationOrder {
        EliminationOrder::Descending
    }
}

impl fmt::Display for EliminationOrder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EliminationOrder::Descending => write!(f, "descending"),
            EliminationOrder::Ascending => write!(f, "ascending"),
        }
    }
}

impl EliminationOrder {
    /// The pivot literal of a canonical clause.
    ///
    /// Panics when the clause is empty.
    #[inline]
    pub fn pivot(self, lits: &[Lit]) -> Lit {
        match self {
            EliminationOrder::Descending => lits[lits.len() - 1],
            EliminationOrder::Ascending => lits[0],
        }
    }

    /// The literals of a canonical clause without the pivot literal.
    #[inline]
    pub fn rest(self, lits: &[Lit]) -> &[Lit] {
        match self {
            EliminationOrder::Descending => &lits[..lits.len().saturating_sub(1)],
            EliminationOrder::Ascending => lits.get(1..).unwrap_or(&[]),
        }
    }

    /// The variable eliminated in the given step, counting from 0.
    #[inline]
    pub fn var_at(self, step: usize, var_count: usize) -> Var {
        debug_assert!(step < var_count);
        match self {
            EliminationOrder::Descending => Var::from_index(var_count - 1 - step),
            EliminationOrder::Ascending => Var::from_index(step),
        }
    }

    /// Whether `a` is eliminated before `b`.
    #[inline]
    pub fn precedes(self, a: Var, b: Var) -> bool {
        match self {
            EliminationOrder::Descending => a > b,
            EliminationOrder::Ascending => a < b,
        }
    }
}
