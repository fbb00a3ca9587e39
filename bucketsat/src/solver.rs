//! Boolean satisfiability solver.
use std::io;
use std::mem::take;
use std::sync::Arc;
use std::time::Instant;

use log::{info, log_enabled, trace, Level};
use thiserror::Error;

use crate::bucket::{Bucket, BucketArray};
use crate::cnf::CnfFormula;
use crate::config::{SolverConfig, SolverConfigUpdate};
use crate::dimacs::DimacsParser;
use crate::eliminate::eliminate_all;
use crate::lit::{Lit, Var};
use crate::load::{load_clause, Loaded};
use crate::pool::WorkerPool;
use crate::state::SatState;
use crate::stats::SolveStats;

/// Possible errors while configuring or running the solver.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("Invalid configuration: {msg}")]
    InvalidConfig { msg: String },
    #[error("The configuration cannot be changed after clauses were added")]
    ConfigAfterLoad,
    #[error("The formula was already solved, bucket elimination cannot add clauses afterwards")]
    AlreadySolved,
    #[error("A previous load failed, the formula is incomplete")]
    IncompleteFormula,
    #[error("Could not start the worker threads: {cause}")]
    WorkerSpawn {
        #[source]
        cause: io::Error,
    },
}

/// A boolean satisfiability solver using bucket elimination.
///
/// Clauses are filed into one bucket per variable while loading. Solving eliminates the variables
/// one at a time, resolving the clauses of each bucket in parallel. A solver can only be solved
/// once.
#[derive(Default)]
pub struct Solver {
    config: SolverConfig,
    buckets: Vec<Bucket>,
    var_count: usize,
    state: SatState,
    clauses_added: bool,
    load_failed: bool,
    solved: bool,
    tmp: Vec<Lit>,
    stats: SolveStats,
}

impl Solver {
    /// Create a new solver.
    pub fn new() -> Solver {
        Solver::default()
    }

    /// Change the solver configuration.
    ///
    /// Must be called before any clauses are added.
    pub fn config(&mut self, update: &SolverConfigUpdate) -> Result<(), SolverError> {
        if self.clauses_added {
            return Err(SolverError::ConfigAfterLoad);
        }
        update.apply(&mut self.config)
    }

    /// The active configuration.
    pub fn current_config(&self) -> &SolverConfig {
        &self.config
    }

    /// Make sure there is a bucket for every variable up to `count`.
    fn ensure_var_count(&mut self, count: usize) {
        assert!(
            count <= Var::max_count(),
            "too many variables ({} > {})",
            count,
            Var::max_count()
        );
        while self.buckets.len() < count {
            let var = Var::from_index(self.buckets.len());
            self.buckets.push(Bucket::new(
                var,
                self.config.elimination_order,
                self.config.chunk_capacity,
            ));
        }
        self.var_count = self.buckets.len();
    }

    /// Add a formula to the solver.
    pub fn add_formula(&mut self, formula: &CnfFormula) -> Result<(), SolverError> {
        if self.solved {
            return Err(SolverError::AlreadySolved);
        }
        let start = Instant::now();
        self.clauses_added = true;
        self.ensure_var_count(formula.var_count());
        for clause in formula.iter() {
            self.load(clause);
        }
        self.stats.load_time += start.elapsed();
        Ok(())
    }

    /// Add a single clause to the solver.
    pub fn add_clause(&mut self, clause: &[Lit]) -> Result<(), SolverError> {
        if self.solved {
            return Err(SolverError::AlreadySolved);
        }
        self.clauses_added = true;
        if let Some(count) = clause.iter().map(|lit| lit.index() + 1).max() {
            self.ensure_var_count(count);
        }
        self.load(clause);
        Ok(())
    }

    fn load(&mut self, clause: &[Lit]) {
        if self.state == SatState::Unsat {
            return;
        }
        match load_clause(
            &mut self.buckets,
            self.config.elimination_order,
            &mut self.tmp,
            clause,
        ) {
            Loaded::Filed => self.stats.input_clauses += 1,
            Loaded::Duplicate => self.stats.duplicate_inputs += 1,
            Loaded::Tautology => self.stats.tautological_inputs += 1,
            Loaded::Empty => {
                info!("Input contains the empty clause");
                self.state = SatState::Unsat;
            }
        }
    }

    /// Reads and adds a formula in DIMACS CNF format.
    ///
    /// The formula is filed into the buckets chunk by chunk while parsing. When reading or parsing
    /// fails, the clauses filed so far stay in the buckets and [`solve`](Solver::solve) returns
    /// [`SolverError::IncompleteFormula`].
    pub fn add_dimacs_cnf(&mut self, input: impl io::Read) -> Result<(), anyhow::Error> {
        let result = self.load_dimacs_cnf(input);
        if result.is_err() {
            self.load_failed = true;
        }
        result
    }

    fn load_dimacs_cnf(&mut self, input: impl io::Read) -> Result<(), anyhow::Error> {
        use io::BufRead;

        let mut buffer = io::BufReader::new(input);
        let mut parser = DimacsParser::new();

        loop {
            let data = buffer.fill_buf()?;
            if data.is_empty() {
                break;
            }
            parser.parse_chunk(data)?;
            let len = data.len();
            buffer.consume(len);

            self.add_formula(&parser.take_formula())?;
        }
        parser.eof()?;
        self.add_formula(&parser.take_formula())?;
        parser.check_header()?;

        info!(
            "Parsed formula with {} variables and {} clauses",
            parser.var_count(),
            parser.clause_count()
        );

        Ok(())
    }

    /// Check the satisfiability of the formula.
    ///
    /// Returns `true` for a satisfiable formula. Solving consumes the buckets, later calls return
    /// the same answer.
    pub fn solve(&mut self) -> Result<bool, SolverError> {
        if self.load_failed {
            return Err(SolverError::IncompleteFormula);
        }
        if self.state == SatState::Unknown {
            self.eliminate()?;
        }
        self.solved = true;
        Ok(self.state == SatState::Sat)
    }

    fn eliminate(&mut self) -> Result<(), SolverError> {
        let start = Instant::now();
        let worker_count = self.config.effective_worker_count();

        info!(
            "Eliminating {} variables with {} input clauses using {} workers",
            self.buckets.len(),
            self.stats.input_clauses,
            worker_count
        );

        if log_enabled!(Level::Trace) {
            trace!("Initial buckets:\n{}", self.bucket_dump());
        }

        let pool =
            WorkerPool::new(worker_count).map_err(|cause| SolverError::WorkerSpawn { cause })?;
        let buckets = Arc::new(BucketArray::new(take(&mut self.buckets)));

        self.state = eliminate_all(&pool, &buckets, &self.config, &mut self.stats);

        drop(pool);

        self.stats.solve_time = start.elapsed();

        info!(
            "Eliminated {} buckets ({} skipped), {} resolvents, {} tautologies, {} duplicates in {:.3}s",
            self.stats.buckets_eliminated,
            self.stats.buckets_skipped,
            self.stats.resolvents,
            self.stats.tautologies,
            self.stats.duplicate_resolvents,
            self.stats.solve_time.as_secs_f64()
        );

        Ok(())
    }

    /// Statistics collected while loading and solving.
    pub fn stats(&self) -> &SolveStats {
        &self.stats
    }

    /// Number of variables known to the solver.
    pub fn var_count(&self) -> usize {
        self.var_count
    }

    /// Textual dump of all buckets that were not eliminated yet.
    pub fn bucket_dump(&self) -> String {
        self.buckets
            .iter()
            .filter(|bucket| !bucket.is_empty())
            .map(|bucket| bucket.to_string())
            .collect()
    }
}
