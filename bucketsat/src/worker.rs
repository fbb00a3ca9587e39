//! Resolution tasks executed by worker threads.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{log_enabled, trace, Level};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use rustc_hash::FxHashMap;

use crate::bucket::{Bucket, BucketArray};
use crate::clause::{Clause, Polarity};
use crate::lit::{Lit, Var};
use crate::resolve::{resolve, Resolvent};
use crate::stats::WorkerStats;

/// Result of a [`WorkerTask`].
#[derive(Clone, Debug, Default)]
pub struct WorkerOutcome {
    /// The empty clause was derived.
    pub unsat: bool,
    /// The task stopped early because of cancellation.
    pub cancelled: bool,
    pub stats: WorkerStats,
}

/// Resolves a share of the negative clauses of a bucket against all its positive clauses.
pub struct WorkerTask {
    /// The bucket being eliminated.
    pub bucket: Arc<Bucket>,
    /// The negative clauses assigned to this task.
    pub negatives: Vec<Clause>,
    /// Buckets receiving the resolvents.
    pub buckets: Arc<BucketArray>,
    pub cancel: Arc<AtomicBool>,
    /// Seed for shuffling the redistribution order, `None` merges by ascending variable.
    pub shuffle_seed: Option<u64>,
}

impl WorkerTask {
    pub fn run(self) -> WorkerOutcome {
        let mut outcome = WorkerOutcome::default();
        let order = self.bucket.order();
        let var = self.bucket.var();

        let mut local: FxHashMap<Var, Bucket> = FxHashMap::default();
        let mut resolvent: Vec<Lit> = Vec::with_capacity(
            (self.bucket.max_len(Polarity::Positive) + self.bucket.max_len(Polarity::Negative))
                .saturating_sub(2),
        );

        for positive in self.bucket.iter_all(Polarity::Positive) {
            if self.cancel.load(Ordering::Relaxed) {
                outcome.cancelled = true;
                return outcome;
            }
            for negative in self.negatives.iter() {
                match resolve(positive, negative, order, &mut resolvent) {
                    Resolvent::Empty => {
                        outcome.unsat = true;
                        return outcome;
                    }
                    Resolvent::Tautology => outcome.stats.tautologies += 1,
                    Resolvent::Clause => {
                        outcome.stats.resolvents += 1;
                        let pivot = order.pivot(&resolvent);
                        debug_assert!(order.precedes(var, pivot.var()));
                        let bucket = local.entry(pivot.var()).or_insert_with(|| {
                            Bucket::new(pivot.var(), order, self.bucket.chunk_capacity())
                        });
                        if !bucket.add(Clause::new(&resolvent), Polarity::of(pivot)) {
                            outcome.stats.duplicates += 1;
                        }
                    }
                }
            }
        }

        outcome.stats.duplicates += self.redistribute(local) as u64;
        outcome
    }

    /// Merge the local buckets into the shared buckets, returns the number of dropped duplicates.
    fn redistribute(&self, local: FxHashMap<Var, Bucket>) -> usize {
        let mut buckets: Vec<Bucket> = local.into_iter().map(|(_, bucket)| bucket).collect();
        match self.shuffle_seed {
            Some(seed) => buckets.shuffle(&mut StdRng::seed_from_u64(seed)),
            None => buckets.sort_unstable_by_key(|bucket| bucket.var()),
        }

        let mut dropped = 0;
        for bucket in buckets {
            let mut target = self.buckets.lock(bucket.var());
            if log_enabled!(Level::Trace) {
                trace!(
                    "Merging {} clauses into bucket {}, {} already present",
                    bucket.len(Polarity::Positive) + bucket.len(Polarity::Negative),
                    bucket.var(),
                    target.duplicate_count(&bucket)
                );
            }
            dropped += target.union(bucket);
        }
        dropped
    }
}
