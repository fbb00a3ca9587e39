//! Bucketsat is a SAT solver based on [bucket elimination][de], also known as directional
//! resolution. Given a boolean formula in [conjunctive normal form][cnf], it decides whether some
//! variable assignment makes the formula true.
//!
//! Every clause is filed into the bucket of its pivot variable. The buckets are eliminated one at a
//! time: all positive clauses of a bucket are resolved against all negative clauses, in parallel on
//! a fixed pool of worker threads, and the resolvents are filed into the buckets of variables that
//! are eliminated later. Deriving the empty clause proves the formula unsatisfiable, eliminating
//! the last bucket without doing so proves it satisfiable.
//!
//! [de]: https://en.wikipedia.org/wiki/Davis%E2%80%93Putnam_algorithm
//! [cnf]: https://en.wikipedia.org/wiki/Conjunctive_normal_form

pub mod bucket;
pub mod clause;
pub mod config;
pub mod order;
pub mod resolve;
pub mod solver;
pub mod stats;

mod eliminate;
mod load;
mod pool;
mod state;
mod worker;

pub use config::{SolverConfig, SolverConfigUpdate};
pub use order::EliminationOrder;
pub use solver::{Solver, SolverError};

pub use bucketsat_formula::{cnf, lit, CnfFormula, Lit, Var};

pub mod dimacs {
    //! DIMACS CNF parser and writer.
    pub use bucketsat_dimacs::*;
}
