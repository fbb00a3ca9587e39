//! Solver configuration.
use std::fmt::Write;
use std::thread;

use serde::Deserialize;

use crate::clause::DEFAULT_CHUNK_CAPACITY;
use crate::order::EliminationOrder;
use crate::solver::SolverError;

/// Defines [`SolverConfig`] together with its `Default` implementation and [`SolverConfig::help`].
macro_rules! solver_config {
    ($(
        $(#[doc = $doc:literal])*
        $field:ident: $type:ty = $default:expr;
    )*) => {
        /// Configurable parameters used during solving.
        #[derive(Clone, Debug, PartialEq, Eq)]
        pub struct SolverConfig {
            $(
                $(#[doc = $doc])*
                #[doc = concat!("\n\nDefault: `", stringify!($default), "`")]
                pub $field: $type,
            )*
        }

        impl Default for SolverConfig {
            fn default() -> SolverConfig {
                SolverConfig {
                    $($field: $default,)*
                }
            }
        }

        impl SolverConfig {
            /// Description of all configuration options.
            pub fn help() -> String {
                let defaults = SolverConfig::default();
                let mut help = String::new();
                $(
                    // Writing into a String cannot fail.
                    let _ = writeln!(help, "{}:", stringify!($field));
                    $(let _ = writeln!(help, "   {}", $doc);)*
                    let _ = writeln!(help, "    (Default: {})", defaults.$field);
                )*
                help
            }
        }
    };
}

solver_config! {
    /// Number of worker threads, 0 uses the available parallelism.
    worker_count: usize = 0;

    /// Number of clauses stored in one chunk of a bucket.
    chunk_capacity: usize = DEFAULT_CHUNK_CAPACITY;

    /// Order in which variables are eliminated, "descending" or "ascending".
    elimination_order: EliminationOrder = EliminationOrder::Descending;

    /// Merge the resolvents of a worker into the shared buckets in random order.
    shuffle_redistribution: bool = true;

    /// Seed for the redistribution order.
    seed: u64 = 0;
}

impl SolverConfig {
    /// Number of worker threads to start.
    pub fn effective_worker_count(&self) -> usize {
        if self.worker_count > 0 {
            self.worker_count
        } else {
            thread::available_parallelism()
                .map(|count| count.get())
                .unwrap_or(1)
        }
    }
}

/// A partial update of a [`SolverConfig`].
///
/// Every field that is `Some` overrides the corresponding field of the configuration it is applied
/// to. Can be deserialized, e.g. from a TOML configuration file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolverConfigUpdate {
    pub worker_count: Option<usize>,
    pub chunk_capacity: Option<usize>,
    pub elimination_order: Option<EliminationOrder>,
    pub shuffle_redistribution: Option<bool>,
    pub seed: Option<u64>,
}

impl SolverConfigUpdate {
    /// An update that changes nothing.
    pub fn new() -> SolverConfigUpdate {
        SolverConfigUpdate::default()
    }

    /// Combine two updates, values set in `other` take precedence.
    pub fn merge(&mut self, other: SolverConfigUpdate) {
        self.worker_count = other.worker_count.or(self.worker_count);
        self.chunk_capacity = other.chunk_capacity.or(self.chunk_capacity);
        self.elimination_order = other.elimination_order.or(self.elimination_order);
        self.shuffle_redistribution = other
            .shuffle_redistribution
            .or(self.shuffle_redistribution);
        self.seed = other.seed.or(self.seed);
    }

    /// Apply the update to a configuration.
    ///
    /// The configuration is left unchanged if the update contains an invalid value.
    pub fn apply(&self, config: &mut SolverConfig) -> Result<(), SolverError> {
        if self.chunk_capacity == Some(0) {
            return Err(SolverError::InvalidConfig {
                msg: "chunk_capacity must be at least 1".to_string(),
            });
        }

        if let Some(worker_count) = self.worker_count {
            config.worker_count = worker_count;
        }
        if let Some(chunk_capacity) = self.chunk_capacity {
            config.chunk_capacity = chunk_capacity;
        }
        if let Some(elimination_order) = self.elimination_order {
            config.elimination_order = elimination_order;
        }
        if let Some(shuffle_redistribution) = self.shuffle_redistribution {
            config.shuffle_redistribution = shuffle_redistribution;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_prefers_later_values() {
        let mut update: SolverConfigUpdate = toml::from_str("worker_count = 3\nseed = 7").unwrap();
        update.merge(toml::from_str("seed = 9\nelimination_order = \"ascending\"").unwrap());

        let mut config = SolverConfig::default();
        update.apply(&mut config).unwrap();

        assert_eq!(config.worker_count, 3);
        assert_eq!(config.seed, 9);
        assert_eq!(config.elimination_order, EliminationOrder::Ascending);
        assert_eq!(config.chunk_capacity, DEFAULT_CHUNK_CAPACITY);
        assert!(config.shuffle_redistribution);
    }

    #[test]
    fn rejects_unknown_options() {
        assert!(toml::from_str::<SolverConfigUpdate>("vsids_decay = 0.9").is_err());
        assert!(toml::from_str::<SolverConfigUpdate>("elimination_order = \"random\"").is_err());
    }

    #[test]
    fn rejects_empty_chunks() {
        let mut config = SolverConfig::default();
        let update = SolverConfigUpdate {
            chunk_capacity: Some(0),
            seed: Some(3),
            ..SolverConfigUpdate::new()
        };
        assert!(update.apply(&mut config).is_err());
        assert_eq!(config, SolverConfig::default());
    }

    #[test]
    fn help_lists_every_option() {
        let help = SolverConfig::help();
        for name in &[
            "worker_count",
            "chunk_capacity",
            "elimination_order",
            "shuffle_redistribution",
            "seed",
        ] {
            assert!(help.contains(&format!("{}:\n", name)));
        }
    }

    #[test]
    fn help_shows_defaults() {
        let help = SolverConfig::help();
        let lines: Vec<&str> = help.lines().collect();

        let chunk = lines
            .iter()
            .position(|&line| line == "chunk_capacity:")
            .unwrap();
        assert_eq!(lines[chunk + 1], "    Number of clauses stored in one chunk of a bucket.");
        assert_eq!(
            lines[chunk + 2],
            format!("    (Default: {})", DEFAULT_CHUNK_CAPACITY)
        );

        assert!(help.contains("    (Default: descending)"));
        assert!(help.contains("    (Default: true)"));
    }

    #[test]
    fn workers_available() {
        assert!(SolverConfig::default().effective_worker_count() >= 1);
        let config = SolverConfig {
            worker_count: 5,
            ..SolverConfig::default()
        };
        assert_eq!(config.effective_worker_count(), 5);
    }
}
