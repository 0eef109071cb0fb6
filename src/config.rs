//! Configuration of a batch of random solving trials.

use crate::engine::MAX_SIZE;
use crate::error::{Error, Result};
use crate::heuristics::HeuristicKind;
use std::path::PathBuf;

/// Settings for the experiment driver.
///
/// Every source of randomness is derived from `seed`, so two runs with the same
/// configuration draw the same boards.
///
/// # Examples
///
/// ```
/// use npuzzle_solver::config::ExperimentConfig;
/// use npuzzle_solver::heuristics::HeuristicKind;
///
/// let config = ExperimentConfig::new(3)
///     .with_trials(10)
///     .with_seed(42)
///     .with_heuristics(vec![HeuristicKind::Manhattan]);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ExperimentConfig {
    /// Board width
    pub size: usize,
    /// Number of solvable boards to draw
    pub trials: usize,
    /// Seed of the board generator
    pub seed: u64,
    /// Heuristics run on every board, in this order
    pub heuristics: Vec<HeuristicKind>,
    /// Optional cap on expansions per search
    pub max_expansions: Option<usize>,
    /// Where to write the per-trial CSV, if anywhere
    pub csv_path: Option<PathBuf>,
}

impl ExperimentConfig {
    /// Create a configuration for boards of width `size`.
    ///
    /// Uses default values for other parameters:
    /// - Trials: 100
    /// - Seed: 0
    /// - Heuristics: Hamming and Manhattan
    /// - No expansion cap, no CSV export
    pub fn new(size: usize) -> Self {
        Self {
            size,
            trials: 100,
            seed: 0,
            heuristics: HeuristicKind::INFORMED.to_vec(),
            max_expansions: None,
            csv_path: None,
        }
    }

    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_heuristics(mut self, heuristics: Vec<HeuristicKind>) -> Self {
        self.heuristics = heuristics;
        self
    }

    pub fn with_max_expansions(mut self, max_expansions: Option<usize>) -> Self {
        self.max_expansions = max_expansions;
        self
    }

    pub fn with_csv_path(mut self, csv_path: Option<PathBuf>) -> Self {
        self.csv_path = csv_path;
        self
    }

    /// Rejects configurations the driver cannot run.
    pub fn validate(&self) -> Result<()> {
        if !(2..=MAX_SIZE).contains(&self.size) {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "board size must be between 2 and {}, got {}",
                    MAX_SIZE, self.size
                ),
            });
        }
        if self.trials == 0 {
            return Err(Error::InvalidConfiguration {
                message: "at least one trial is required".to_string(),
            });
        }
        if self.heuristics.is_empty() {
            return Err(Error::InvalidConfiguration {
                message: "at least one heuristic is required".to_string(),
            });
        }
        if self.max_expansions == Some(0) {
            return Err(Error::InvalidConfiguration {
                message: "the expansion cap must be positive".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self::new(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExperimentConfig::default();
        assert_eq!(config.size, 3);
        assert_eq!(config.trials, 100);
        assert_eq!(config.heuristics, vec![HeuristicKind::Hamming, HeuristicKind::Manhattan]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_configs_are_rejected() {
        let cases = [
            ExperimentConfig::new(1),
            ExperimentConfig::new(MAX_SIZE + 1),
            ExperimentConfig::new(3).with_trials(0),
            ExperimentConfig::new(3).with_heuristics(Vec::new()),
            ExperimentConfig::new(3).with_max_expansions(Some(0)),
        ];
        assert!(ExperimentConfig::new(MAX_SIZE).validate().is_ok());
        for config in cases {
            assert!(matches!(
                config.validate(),
                Err(Error::InvalidConfiguration { .. })
            ));
        }
    }
}
