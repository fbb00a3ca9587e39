//! Duplicate detection for clauses.
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::lit::Lit;

use super::Clause;

/// Hash value used to find duplicate candidates.
pub type ClauseSignature = i64;

/// Order sensitive signature of a canonical clause.
///
/// Sum of `3L + 5(L - 1) + 1` over the DIMACS values `L` of all literals. This is cheap and weak,
/// different clauses often share a signature.
pub fn signature_of(lits: &[Lit]) -> ClauseSignature {
    lits.iter().fold(0, |sum: ClauseSignature, lit| {
        let value = lit.to_dimacs() as ClauseSignature;
        sum.wrapping_add(3 * value + 5 * (value - 1) + 1)
    })
}

/// Set of clauses used to reject duplicates.
///
/// Clauses are grouped by signature, a lookup compares the literals of all clauses with the same
/// signature.
#[derive(Default)]
pub struct DuplicateIndex {
    clauses: FxHashMap<ClauseSignature, SmallVec<[Clause; 1]>>,
    len: usize,
}

impl DuplicateIndex {
    pub fn new() -> DuplicateIndex {
        DuplicateIndex::default()
    }

    /// Whether a clause is already known, registering it otherwise if `insert_if_absent` is set.
    pub fn check_and_insert(&mut self, clause: &Clause, insert_if_absent: bool) -> bool {
        if !insert_if_absent {
            return self.contains(clause);
        }
        let candidates = self.clauses.entry(signature_of(clause)).or_default();
        if candidates
            .iter()
            .any(|candidate| candidate.lits() == clause.lits())
        {
            return true;
        }
        candidates.push(clause.clone());
        self.len += 1;
        false
    }

    /// Register a clause, returns false if it was already present.
    pub fn insert(&mut self, clause: &Clause) -> bool {
        !self.check_and_insert(clause, true)
    }

    /// Unregister a clause, returns false if it was not present.
    pub fn remove(&mut self, lits: &[Lit]) -> bool {
        let signature = signature_of(lits);
        let candidates = match self.clauses.get_mut(&signature) {
            Some(candidates) => candidates,
            None => return false,
        };
        let position = match candidates
            .iter()
            .position(|candidate| candidate.lits() == lits)
        {
            Some(position) => position,
            None => return false,
        };
        candidates.swap_remove(position);
        if candidates.is_empty() {
            self.clauses.remove(&signature);
        }
        self.len -= 1;
        true
    }

    pub fn contains(&self, lits: &[Lit]) -> bool {
        self.clauses
            .get(&signature_of(lits))
            .map_or(false, |candidates| {
                candidates.iter().any(|candidate| candidate.lits() == lits)
            })
    }

    /// Number of distinct clauses registered.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
