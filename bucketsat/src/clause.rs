//! Clause storage.
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use bucketsat_formula::is_canonical;

use crate::lit::Lit;

mod chunk;
mod index;

pub use chunk::{ClauseChunk, DEFAULT_CHUNK_CAPACITY};
pub use index::{signature_of, ClauseSignature, DuplicateIndex};

/// An immutable clause in canonical order.
///
/// Cloning a clause only bumps a reference count, so a chunk and a duplicate index can refer to the
/// same literals and clauses can be handed between threads.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Clause {
    lits: Arc<[Lit]>,
}

impl Clause {
    /// Create a clause from canonical literals.
    pub fn new(lits: &[Lit]) -> Clause {
        debug_assert!(is_canonical(lits), "clause {:?} is not canonical", lits);
        Clause { lits: lits.into() }
    }

    pub fn lits(&self) -> &[Lit] {
        &self.lits
    }
}

impl Deref for Clause {
    type Target = [Lit];

    fn deref(&self) -> &[Lit] {
        &self.lits
    }
}

impl From<&[Lit]> for Clause {
    fn from(lits: &[Lit]) -> Clause {
        Clause::new(lits)
    }
}

impl From<Vec<Lit>> for Clause {
    fn from(lits: Vec<Lit>) -> Clause {
        debug_assert!(is_canonical(&lits), "clause {:?} is not canonical", lits);
        Clause { lits: lits.into() }
    }
}

impl fmt::Debug for Clause {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(&self.lits[..], f)
    }
}

/// The side of a bucket a clause is filed under.
///
/// This is the sign of the clause's pivot literal.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    pub const ALL: [Polarity; 2] = [Polarity::Positive, Polarity::Negative];

    /// The polarity of a pivot literal.
    pub fn of(lit: Lit) -> Polarity {
        if lit.is_positive() {
            Polarity::Positive
        } else {
            Polarity::Negative
        }
    }

    pub fn index(self) -> usize {
        match self {
            Polarity::Positive => 0,
            Polarity::Negative => 1,
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Polarity::Positive => write!(f, "positive"),
            Polarity::Negative => write!(f, "negative"),
        }
    }
}
