//! Buckets of clauses sharing a pivot variable.
use std::cmp::max;
use std::fmt;
use std::mem::replace;

use thiserror::Error;

use crate::clause::{Clause, ClauseChunk, DuplicateIndex, Polarity};
use crate::lit::{Lit, Var};
use crate::order::EliminationOrder;

mod array;
mod iter;

pub use array::BucketArray;
pub use iter::BucketIter;

/// Errors of bucket operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BucketError {
    #[error(
        "Requested {requested} {polarity} clauses of bucket {var}, but only {available} are stored"
    )]
    IterationBound {
        var: Var,
        polarity: Polarity,
        requested: usize,
        available: usize,
    },
}

/// The clauses of one polarity.
struct Side {
    /// Chunks before the current chunk, none of them is empty.
    chunks: Vec<ClauseChunk>,
    /// The chunk receiving new clauses. Only empty if `chunks` is empty.
    current: ClauseChunk,
    len: usize,
    max_len: usize,
}

impl Side {
    fn new(chunk_capacity: usize) -> Side {
        Side {
            chunks: vec![],
            current: ClauseChunk::new(chunk_capacity),
            len: 0,
            max_len: 0,
        }
    }

    fn push(&mut self, clause: Clause) {
        self.len += 1;
        self.max_len = max(self.max_len, clause.len());
        if let Err(clause) = self.current.append(clause) {
            let fresh = ClauseChunk::new(self.current.capacity());
            self.chunks.push(replace(&mut self.current, fresh));
            let appended = self.current.append(clause);
            debug_assert!(appended.is_ok());
        }
    }

    fn pop(&mut self) -> Option<Clause> {
        let clause = self.current.pop_last()?;
        self.len -= 1;
        if self.current.is_empty() {
            if let Some(previous) = self.chunks.pop() {
                self.current = previous;
            }
        }
        Some(clause)
    }

    /// Append a non-empty chunk after the current chunk, making it current.
    fn splice(&mut self, chunk: ClauseChunk) {
        debug_assert!(!chunk.is_empty());
        self.len += chunk.len();
        self.max_len = max(
            self.max_len,
            chunk.iter().map(|clause| clause.len()).max().unwrap_or(0),
        );
        let previous = replace(&mut self.current, chunk);
        if !previous.is_empty() {
            self.chunks.push(previous);
        }
    }

    fn chunk_count(&self) -> usize {
        self.chunks.len() + 1
    }

    fn iter(&self, count: usize) -> BucketIter {
        BucketIter::new(&self.chunks, &self.current, count)
    }
}

/// All clauses whose pivot is a given variable.
///
/// Clauses are split by the polarity of the pivot literal. Each polarity is stored as a sequence of
/// fixed capacity chunks, the last of which receives new clauses. A bucket never stores the same
/// clause twice.
pub struct Bucket {
    var: Var,
    order: EliminationOrder,
    key: Option<Lit>,
    sides: [Side; 2],
    index: DuplicateIndex,
}

impl Bucket {
    /// Create an empty bucket for clauses with pivot `var`.
    pub fn new(var: Var, order: EliminationOrder, chunk_capacity: usize) -> Bucket {
        Bucket {
            var,
            order,
            key: None,
            sides: [Side::new(chunk_capacity), Side::new(chunk_capacity)],
            index: DuplicateIndex::new(),
        }
    }

    /// An empty bucket with the same variable and settings.
    pub fn emptied(&self) -> Bucket {
        Bucket::new(self.var, self.order, self.chunk_capacity())
    }

    /// The pivot variable of all clauses in this bucket.
    pub fn var(&self) -> Var {
        self.var
    }

    /// The pivot literal of the most recently added clause.
    pub fn key(&self) -> Option<Lit> {
        self.key
    }

    pub fn order(&self) -> EliminationOrder {
        self.order
    }

    pub fn chunk_capacity(&self) -> usize {
        self.sides[0].current.capacity()
    }

    /// Add a clause unless it is already present.
    ///
    /// Returns false for a duplicate. Panics if the clause's pivot literal is not `polarity` of this
    /// bucket's variable.
    pub fn add(&mut self, clause: Clause, polarity: Polarity) -> bool {
        let pivot = self.order.pivot(&clause);
        assert!(
            pivot.var() == self.var && Polarity::of(pivot) == polarity,
            "clause {:?} does not belong to the {} side of bucket {}",
            clause,
            polarity,
            self.var
        );
        if !self.index.insert(&clause) {
            return false;
        }
        self.key = Some(pivot);
        self.sides[polarity.index()].push(clause);
        true
    }

    /// Remove the most recently added clause of a polarity.
    ///
    /// Panics if there is no such clause.
    pub fn pop(&mut self, polarity: Polarity) -> Clause {
        match self.sides[polarity.index()].pop() {
            Some(clause) => {
                self.index.remove(&clause);
                clause
            }
            None => panic!("pop from empty {} side of bucket {}", polarity, self.var),
        }
    }

    /// Move all clauses of `other` into this bucket.
    ///
    /// Clauses are moved one by one until the current chunk is full, the remaining chunks of `other`
    /// are moved as a whole. Returns the number of dropped duplicates.
    pub fn union(&mut self, other: Bucket) -> usize {
        assert_eq!(
            self.var, other.var,
            "union of buckets for different variables"
        );
        if other.key.is_some() {
            self.key = other.key;
        }
        let [positive, negative] = other.sides;
        self.absorb(Polarity::Positive, positive) + self.absorb(Polarity::Negative, negative)
    }

    fn absorb(&mut self, polarity: Polarity, mut source: Side) -> usize {
        let index = &mut self.index;
        let side = &mut self.sides[polarity.index()];
        let mut dropped = 0;

        while !side.current.is_full() {
            match source.pop() {
                Some(clause) => {
                    if index.insert(&clause) {
                        side.push(clause);
                    } else {
                        dropped += 1;
                    }
                }
                None => return dropped,
            }
        }

        source.chunks.push(source.current);
        for mut chunk in source.chunks {
            let before = chunk.len();
            chunk.retain(|clause| index.insert(clause));
            dropped += before - chunk.len();
            if !chunk.is_empty() {
                side.splice(chunk);
            }
        }
        dropped
    }

    /// Iterate over the first `count` clauses of a polarity in storage order.
    pub fn iter(&self, count: usize, polarity: Polarity) -> Result<BucketIter, BucketError> {
        let side = &self.sides[polarity.index()];
        if count > side.len {
            return Err(BucketError::IterationBound {
                var: self.var,
                polarity,
                requested: count,
                available: side.len,
            });
        }
        Ok(side.iter(count))
    }

    /// Iterate over all clauses of a polarity in storage order.
    pub fn iter_all(&self, polarity: Polarity) -> BucketIter {
        let side = &self.sides[polarity.index()];
        side.iter(side.len)
    }

    /// Number of clauses of a polarity.
    pub fn len(&self, polarity: Polarity) -> usize {
        self.sides[polarity.index()].len
    }

    /// Length of the longest clause of a polarity that was stored.
    pub fn max_len(&self, polarity: Polarity) -> usize {
        self.sides[polarity.index()].max_len
    }

    pub fn chunk_count(&self, polarity: Polarity) -> usize {
        self.sides[polarity.index()].chunk_count()
    }

    pub fn is_empty(&self) -> bool {
        self.sides.iter().all(|side| side.len == 0)
    }

    /// Number of clauses of `other` that are also present in this bucket.
    pub fn duplicate_count(&self, other: &Bucket) -> usize {
        Polarity::ALL
            .iter()
            .flat_map(|&polarity| other.iter_all(polarity))
            .filter(|clause| self.index.contains(clause))
            .count()
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "bucket {}:", self.var)?;
        for &polarity in Polarity::ALL.iter() {
            let side = &self.sides[polarity.index()];
            writeln!(
                f,
                "  {} clauses: {} in {} chunks, max length {}",
                polarity,
                side.len,
                side.chunk_count(),
                side.max_len
            )?;
            for (number, chunk) in side.chunks.iter().chain(Some(&side.current)).enumerate() {
                write!(f, "    chunk {}:", number)?;
                for clause in chunk.iter() {
                    write!(f, " (")?;
                    for (i, lit) in clause.iter().enumerate() {
                        if i > 0 {
                            write!(f, " ")?;
                        }
                        write!(f, "{}", lit)?;
                    }
                    write!(f, ")")?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
