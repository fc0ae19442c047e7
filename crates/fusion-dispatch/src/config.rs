//! Configuration for parallel prediction.

use fusion_common::{FusionError, FusionResult};
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};

/// Configuration for the [`Parallelizer`](crate::Parallelizer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelConfig {
    /// Number of worker threads. 0 uses rayon's default (one per core).
    pub num_threads: usize,

    /// Smallest stripe height handed to a worker, in rows.
    pub min_rows_per_stripe: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            num_threads: 0,
            min_rows_per_stripe: 1,
        }
    }
}

impl ParallelConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("FUSION_NUM_THREADS") {
            if let Ok(threads) = val.parse() {
                config.num_threads = threads;
            }
        }

        if let Ok(val) = std::env::var("FUSION_MIN_STRIPE_ROWS") {
            if let Ok(rows) = val.parse() {
                config.min_rows_per_stripe = rows;
            }
        }

        config
    }

    /// Use exactly `num_threads` workers.
    pub fn with_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.min_rows_per_stripe == 0 {
            return Err("min_rows_per_stripe must be > 0".to_string());
        }

        Ok(())
    }

    /// Build the worker pool.
    pub fn build_pool(&self) -> FusionResult<ThreadPool> {
        ThreadPoolBuilder::new()
            .num_threads(self.num_threads)
            .thread_name(|i| format!("fusion-worker-{}", i))
            .build()
            .map_err(|e| FusionError::config(e.to_string()))
    }

    /// Number of stripes to split `rows` rows into for `workers` workers.
    pub fn stripe_count(&self, workers: usize, rows: usize) -> usize {
        let by_rows = rows / self.min_rows_per_stripe.max(1);
        by_rows.min(workers).max(1)
    }
}
