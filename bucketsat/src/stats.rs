//! Solver statistics.
use std::time::Duration;

/// Counters of a single worker task.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct WorkerStats {
    /// Resolvents that were neither empty nor tautological.
    pub resolvents: u64,
    pub tautologies: u64,
    /// Resolvents dropped as duplicates, locally or when merging into the shared buckets.
    pub duplicates: u64,
}

/// Statistics of loading and solving a formula.
#[derive(Clone, Default, Debug)]
pub struct SolveStats {
    /// Input clauses filed into a bucket.
    pub input_clauses: u64,
    pub tautological_inputs: u64,
    pub duplicate_inputs: u64,
    /// Buckets whose clauses were resolved.
    pub buckets_eliminated: u64,
    /// Buckets without clauses of one polarity.
    pub buckets_skipped: u64,
    pub resolvents: u64,
    pub tautologies: u64,
    pub duplicate_resolvents: u64,
    pub load_time: Duration,
    pub solve_time: Duration,
}

impl SolveStats {
    /// Add the counters of a finished worker task.
    pub fn absorb(&mut self, worker: &WorkerStats) {
        self.resolvents += worker.resolvents;
        self.tautologies += worker.tautologies;
        self.duplicate_resolvents += worker.duplicates;
    }
}
