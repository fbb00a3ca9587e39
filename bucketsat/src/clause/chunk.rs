//! Fixed capacity clause chunks.
use std::slice;

use super::Clause;

/// Number of clauses per chunk unless configured otherwise.
pub const DEFAULT_CHUNK_CAPACITY: usize = 100;

/// A sequence of at most `capacity` clauses.
///
/// Buckets store each polarity as a list of chunks. Growing a bucket never copies stored clauses
/// and whole chunks can be moved from one bucket to another.
#[derive(Clone, Debug)]
pub struct ClauseChunk {
    clauses: Vec<Clause>,
    capacity: usize,
}

impl ClauseChunk {
    /// Create an empty chunk.
    ///
    /// Panics when `capacity` is 0.
    pub fn new(capacity: usize) -> ClauseChunk {
        assert!(capacity > 0, "chunk capacity must be positive");
        ClauseChunk {
            clauses: vec![],
            capacity,
        }
    }

    /// Append a clause, handing it back if the chunk is full.
    pub fn append(&mut self, clause: Clause) -> Result<(), Clause> {
        if self.is_full() {
            return Err(clause);
        }
        if self.clauses.capacity() == 0 {
            self.clauses.reserve_exact(self.capacity);
        }
        self.clauses.push(clause);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&Clause> {
        self.clauses.get(index)
    }

    /// Remove the most recently appended clause.
    pub fn pop_last(&mut self) -> Option<Clause> {
        self.clauses.pop()
    }

    /// Keep only the clauses matching a predicate, preserving their order.
    pub fn retain(&mut self, keep: impl FnMut(&Clause) -> bool) {
        self.clauses.retain(keep)
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.clauses.len() == self.capacity
    }

    pub fn iter(&self) -> slice::Iter<Clause> {
        self.clauses.iter()
    }
}
