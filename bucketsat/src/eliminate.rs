//! Bucket elimination.
use std::sync::Arc;

use log::{debug, info, log_enabled, trace, Level};

use crate::bucket::{Bucket, BucketArray};
use crate::clause::{Clause, Polarity};
use crate::config::SolverConfig;
use crate::lit::Var;
use crate::pool::WorkerPool;
use crate::state::SatState;
use crate::stats::SolveStats;
use crate::worker::{WorkerOutcome, WorkerTask};

/// Split the negative clauses of a bucket into at most `parts` round-robin slices.
///
/// Clause `i` goes to slice `i % parts`. No slice is empty.
pub fn partition_negatives(bucket: &Bucket, parts: usize) -> Vec<Vec<Clause>> {
    let count = bucket.len(Polarity::Negative);
    let parts = parts.min(count);
    let mut slices: Vec<Vec<Clause>> = (0..parts)
        .map(|part| Vec::with_capacity(count / parts + (part < count % parts) as usize))
        .collect();
    for (i, clause) in bucket.iter_all(Polarity::Negative).enumerate() {
        slices[i % parts].push(clause.clone());
    }
    slices
}

/// Eliminate all variables in the configured order.
///
/// Stops at the first bucket that produces the empty clause.
pub fn eliminate_all(
    pool: &WorkerPool<WorkerOutcome>,
    buckets: &Arc<BucketArray>,
    config: &SolverConfig,
    stats: &mut SolveStats,
) -> SatState {
    let var_count = buckets.len();
    for step in 0..var_count {
        let var = config.elimination_order.var_at(step, var_count);
        if eliminate_var(pool, buckets, var, step, config, stats) == SatState::Unsat {
            return SatState::Unsat;
        }
    }
    SatState::Sat
}

/// Resolve all clauses in the bucket of `var`, filing the resolvents into later buckets.
fn eliminate_var(
    pool: &WorkerPool<WorkerOutcome>,
    buckets: &Arc<BucketArray>,
    var: Var,
    step: usize,
    config: &SolverConfig,
    stats: &mut SolveStats,
) -> SatState {
    let bucket = buckets.take(var);

    let positive = bucket.len(Polarity::Positive);
    let negative = bucket.len(Polarity::Negative);

    if log_enabled!(Level::Trace) {
        trace!("{}", bucket);
    }

    if positive == 0 || negative == 0 {
        stats.buckets_skipped += 1;
        debug!(
            "Bucket {}: {} positive, {} negative clauses, nothing to resolve",
            var, positive, negative
        );
        return SatState::Unknown;
    }

    let slices = partition_negatives(&bucket, pool.size());
    let task_count = slices.len();

    debug!(
        "Bucket {}: resolving {} positive against {} negative clauses using {} tasks",
        var, positive, negative, task_count
    );

    assert!(
        !pool.is_cancelled(),
        "bucket {} dispatched after cancellation",
        var
    );

    let bucket = Arc::new(bucket);
    for (number, negatives) in slices.into_iter().enumerate() {
        let task = WorkerTask {
            bucket: bucket.clone(),
            negatives,
            buckets: buckets.clone(),
            cancel: pool.cancel_flag(),
            shuffle_seed: if config.shuffle_redistribution {
                Some(task_seed(config.seed, step, number))
            } else {
                None
            },
        };
        pool.submit(move || task.run());
    }

    for finished in 1..=task_count {
        let outcome = pool.next_result();
        stats.absorb(&outcome.stats);
        if outcome.unsat {
            pool.cancel();
            info!("Derived the empty clause in bucket {}", var);
            return SatState::Unsat;
        }
        // A cancelled task filed only part of its resolvents.
        assert!(
            !outcome.cancelled,
            "task of bucket {} stopped before finishing",
            var
        );
        trace!("Bucket {}: {} of {} tasks finished", var, finished, task_count);
    }

    stats.buckets_eliminated += 1;
    SatState::Unknown
}

/// Seed of a task's redistribution order.
fn task_seed(seed: u64, step: usize, task: usize) -> u64 {
    seed ^ ((step as u64) << 20) ^ (task as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    use bucketsat_formula::{lits, var};

    use crate::lit::Lit;
    use crate::order::EliminationOrder;

    fn negative_bucket(count: usize) -> Bucket {
        let mut bucket = Bucket::new(var!(10), EliminationOrder::Descending, 3);
        for number in 0..count {
            let mut lits = vec![];
            for bit in 0..9 {
                if number & (1 << bit) != 0 {
                    lits.push(Lit::from_index(bit, false));
                }
            }
            lits.push(Lit::from_dimacs(-10));
            bucket.add(Clause::from(lits), Polarity::Negative);
        }
        bucket
    }

    #[test]
    fn round_robin_slices() {
        let bucket = negative_bucket(7);
        let slices = partition_negatives(&bucket, 3);
        let sizes: Vec<usize> = slices.iter().map(|slice| slice.len()).collect();
        assert_eq!(sizes, vec![3, 2, 2]);

        let all: Vec<&Clause> = bucket.iter_all(Polarity::Negative).collect();
        assert_eq!(&slices[1][0], all[1]);
        assert_eq!(&slices[1][1], all[4]);
        assert_eq!(&slices[0][2], all[6]);
    }

    #[test]
    fn fewer_clauses_than_workers() {
        let bucket = negative_bucket(2);
        assert_eq!(partition_negatives(&bucket, 8).len(), 2);
    }

    fn array(clauses: &[&[isize]], order: EliminationOrder, var_count: usize) -> Arc<BucketArray> {
        let mut buckets: Vec<Bucket> = (0..var_count)
            .map(|index| Bucket::new(Var::from_index(index), order, 2))
            .collect();
        for dimacs in clauses {
            let lits: Vec<Lit> = dimacs
                .iter()
                .map(|&number| Lit::from_dimacs(number))
                .collect();
            let pivot = order.pivot(&lits);
            buckets[pivot.index()].add(Clause::from(lits), Polarity::of(pivot));
        }
        Arc::new(BucketArray::new(buckets))
    }

    #[test]
    fn resolvent_goes_to_later_bucket() {
        let order = EliminationOrder::Ascending;
        let buckets = array(&[&[1, 2], &[-1]], order, 2);
        let pool = WorkerPool::new(2).unwrap();
        let config = SolverConfig {
            elimination_order: order,
            ..SolverConfig::default()
        };
        let mut stats = SolveStats::default();

        assert_eq!(
            eliminate_var(&pool, &buckets, var!(1), 0, &config, &mut stats),
            SatState::Unknown
        );
        let bucket_2 = buckets.lock(var!(2));
        assert_eq!(bucket_2.len(Polarity::Positive), 1);
        assert_eq!(
            bucket_2.iter_all(Polarity::Positive).next().map(|c| c.to_vec()),
            Some(lits![2].to_vec())
        );
        assert_eq!(stats.buckets_eliminated, 1);
        assert_eq!(stats.resolvents, 1);
    }

    #[test]
    fn unsat_stops_early() {
        let order = EliminationOrder::Descending;
        let buckets = array(&[&[1, 2], &[1, -2], &[-1, 2], &[-1, -2]], order, 2);
        let pool = WorkerPool::new(3).unwrap();
        let config = SolverConfig::default();
        let mut stats = SolveStats::default();

        assert_eq!(
            eliminate_all(&pool, &buckets, &config, &mut stats),
            SatState::Unsat
        );
        assert!(pool.is_cancelled());
        assert_eq!(stats.buckets_eliminated, 1);
    }

    #[test]
    #[should_panic(expected = "dispatched after cancellation")]
    fn no_dispatch_after_cancellation() {
        let order = EliminationOrder::Descending;
        let buckets = array(&[&[1, 2], &[-1, -2], &[1, -2]], order, 2);
        let pool = WorkerPool::new(2).unwrap();
        let config = SolverConfig::default();
        let mut stats = SolveStats::default();

        pool.cancel();
        eliminate_var(&pool, &buckets, var!(2), 0, &config, &mut stats);
    }

    #[test]
    fn pure_buckets_are_skipped() {
        let order = EliminationOrder::Descending;
        let buckets = array(&[&[1, 2], &[-1, 2], &[1, 3]], order, 3);
        let pool = WorkerPool::new(1).unwrap();
        let config = SolverConfig {
            shuffle_redistribution: false,
            ..SolverConfig::default()
        };
        let mut stats = SolveStats::default();

        assert_eq!(
            eliminate_all(&pool, &buckets, &config, &mut stats),
            SatState::Sat
        );
        assert_eq!(stats.buckets_skipped, 3);
        assert_eq!(stats.buckets_eliminated, 0);
    }
}
