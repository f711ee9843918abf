//! MCTS configuration parameters.

use std::num::NonZeroUsize;

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone, PartialEq)]
pub struct MctsConfig {
    /// Number of select/expand/simulate/backup iterations per decision.
    pub iterations: u32,

    /// Exploration constant in the UCB1 bound
    /// `avg + 2 * cp * sqrt(2 * ln(N_parent) / N)`.
    /// 1/sqrt(2) is the textbook choice for rewards in [0, 1].
    pub cp: f64,

    /// Replicate each rollout across the worker pool.
    pub parallel: bool,

    /// Rollout workers when `parallel` is set. 0 = hardware parallelism.
    pub workers: usize,

    /// Maximum further turns a rollout may play before it is scored as a tie.
    pub max_rollout_depth: u32,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            iterations: 50,
            cp: std::f64::consts::FRAC_1_SQRT_2,
            parallel: true,
            workers: 0,
            max_rollout_depth: 200,
        }
    }
}

impl MctsConfig {
    /// Create a fast, single-threaded config for testing.
    pub fn for_testing() -> Self {
        Self {
            iterations: 20,
            parallel: false,
            max_rollout_depth: 100,
            ..Self::default()
        }
    }

    /// Builder pattern: set number of iterations.
    pub fn with_iterations(mut self, n: u32) -> Self {
        self.iterations = n;
        self
    }

    /// Builder pattern: set the exploration constant.
    pub fn with_cp(mut self, cp: f64) -> Self {
        self.cp = cp;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_max_rollout_depth(mut self, depth: u32) -> Self {
        self.max_rollout_depth = depth;
        self
    }

    /// Worker count after resolving 0 to the available parallelism.
    pub fn resolved_workers(&self) -> usize {
        if !self.parallel {
            return 1;
        }
        if self.workers > 0 {
            return self.workers;
        }
        std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MctsConfig::default();
        assert_eq!(config.iterations, 50);
        assert!((config.cp - 1.0 / 2f64.sqrt()).abs() < 1e-12);
        assert!(config.parallel);
        assert!(config.resolved_workers() >= 1);
    }

    #[test]
    fn test_builder_pattern() {
        let config = MctsConfig::default()
            .with_iterations(100)
            .with_cp(0.5)
            .with_workers(3);

        assert_eq!(config.iterations, 100);
        assert!((config.cp - 0.5).abs() < 1e-12);
        assert_eq!(config.resolved_workers(), 3);
    }

    #[test]
    fn test_sequential_config_uses_one_worker() {
        let config = MctsConfig::for_testing().with_workers(8);
        assert!(!config.parallel);
        assert_eq!(config.resolved_workers(), 1);
    }
}
