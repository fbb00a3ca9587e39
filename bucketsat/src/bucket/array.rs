//! Buckets shared between the scheduler and the workers.
use std::mem::replace;

use parking_lot::{Mutex, MutexGuard};

use crate::lit::Var;

use super::Bucket;

/// One bucket per variable, each behind its own lock.
pub struct BucketArray {
    buckets: Vec<Mutex<Bucket>>,
}

impl BucketArray {
    /// Takes a bucket for every variable, ordered by variable index.
    pub fn new(buckets: Vec<Bucket>) -> BucketArray {
        debug_assert!(buckets
            .iter()
            .enumerate()
            .all(|(index, bucket)| bucket.var().index() == index));
        BucketArray {
            buckets: buckets.into_iter().map(Mutex::new).collect(),
        }
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn lock(&self, var: Var) -> MutexGuard<Bucket> {
        self.buckets[var.index()].lock()
    }

    /// Remove the clauses of a variable, leaving an empty bucket behind.
    pub fn take(&self, var: Var) -> Bucket {
        let mut bucket = self.lock(var);
        let empty = bucket.emptied();
        replace(&mut *bucket, empty)
    }

    /// Merge a bucket into the shared bucket of the same variable.
    ///
    /// Duplicate detection and insertion happen under the same lock. Returns the number of dropped
    /// duplicates.
    pub fn union_into(&self, bucket: Bucket) -> usize {
        self.lock(bucket.var()).union(bucket)
    }

    pub fn into_buckets(self) -> Vec<Bucket> {
        self.buckets.into_iter().map(Mutex::into_inner).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::thread;

    use bucketsat_formula::{lits, var};

    use crate::clause::{Clause, Polarity};
    use crate::order::EliminationOrder;

    fn empty_array(var_count: usize) -> BucketArray {
        BucketArray::new(
            (0..var_count)
                .map(|index| Bucket::new(Var::from_index(index), EliminationOrder::Descending, 4))
                .collect(),
        )
    }

    #[test]
    fn take_leaves_empty_bucket() {
        let array = empty_array(3);
        array
            .lock(var!(2))
            .add(Clause::new(&lits![1, 2]), Polarity::Positive);

        let taken = array.take(var!(2));
        assert_eq!(taken.len(Polarity::Positive), 1);
        assert!(array.lock(var!(2)).is_empty());
        assert_eq!(array.lock(var!(2)).var(), var!(2));
    }

    #[test]
    fn concurrent_unions() {
        let array = Arc::new(empty_array(8));

        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let array = array.clone();
                thread::spawn(move || {
                    let mut dropped = 0;
                    for other in 1..8isize {
                        let mut bucket =
                            Bucket::new(var!(8), EliminationOrder::Descending, 4);
                        bucket.add(Clause::new(&lits![other, 8]), Polarity::Positive);
                        bucket.add(
                            Clause::new(&lits![-(((other + worker) % 7) + 1), -8]),
                            Polarity::Negative,
                        );
                        dropped += array.union_into(bucket);
                    }
                    dropped
                })
            })
            .collect();

        let dropped: usize = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .sum();

        let bucket = array.lock(var!(8));
        assert_eq!(bucket.len(Polarity::Positive), 7);
        assert_eq!(bucket.len(Polarity::Negative), 7);
        assert_eq!(dropped, 4 * 14 - 14);
    }
}
