//! Iteration over the chunks of a bucket.
use crate::clause::{Clause, ClauseChunk};

/// Iterator over a prefix of the clauses of one bucket side.
///
/// Walks the chunks in storage order without copying them.
pub struct BucketIter<'a> {
    chunks: &'a [ClauseChunk],
    current: &'a ClauseChunk,
    chunk: usize,
    offset: usize,
    remaining: usize,
}

impl<'a> BucketIter<'a> {
    pub(super) fn new(
        chunks: &'a [ClauseChunk],
        current: &'a ClauseChunk,
        count: usize,
    ) -> BucketIter<'a> {
        BucketIter {
            chunks,
            current,
            chunk: 0,
            offset: 0,
            remaining: count,
        }
    }
}

impl<'a> Iterator for BucketIter<'a> {
    type Item = &'a Clause;

    fn next(&mut self) -> Option<&'a Clause> {
        if self.remaining == 0 {
            return None;
        }
        loop {
            let chunk = self.chunks.get(self.chunk).unwrap_or(self.current);
            if let Some(clause) = chunk.get(self.offset) {
                self.offset += 1;
                self.remaining -= 1;
                return Some(clause);
            }
            if self.chunk >= self.chunks.len() {
                return None;
            }
            self.chunk += 1;
            self.offset = 0;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a> ExactSizeIterator for BucketIter<'a> {}

#[cfg(test)]
mod tests {
    use super::*;

    use bucketsat_formula::lits;

    use crate::lit::Lit;

    fn chunk(capacity: usize, clauses: &[&[isize]]) -> ClauseChunk {
        let mut chunk = ClauseChunk::new(capacity);
        for &dimacs in clauses {
            let lits: Vec<Lit> = dimacs.iter().map(|&number| Lit::from_dimacs(number)).collect();
            chunk.append(Clause::from(lits)).unwrap();
        }
        chunk
    }

    #[test]
    fn crosses_partial_chunks() {
        let chunks = vec![chunk(3, &[&[1], &[2]]), chunk(3, &[&[3], &[4], &[5]])];
        let current = chunk(3, &[&[6]]);

        let all: Vec<&Clause> = BucketIter::new(&chunks, &current, 6).collect();
        assert_eq!(all.len(), 6);
        assert_eq!(all[2].lits(), &lits![3]);
        assert_eq!(all[5].lits(), &lits![6]);

        let mut prefix = BucketIter::new(&chunks, &current, 3);
        assert_eq!(prefix.len(), 3);
        prefix.next();
        assert_eq!(prefix.len(), 2);
        assert_eq!(prefix.last().map(|clause| clause.lits()), Some(&lits![3][..]));
    }

    #[test]
    fn empty_side() {
        let current = ClauseChunk::new(3);
        assert_eq!(BucketIter::new(&[], &current, 0).count(), 0);
    }
}
