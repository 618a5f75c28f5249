//! Independent replicate runs executed in parallel, one world per seed.

use crate::config::SimConfig;
use crate::world::{ExperimentError, RunSummary, World, WorldInitError};
use rayon::prelude::*;
use tracing::info;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EnsembleError {
    #[error("replicate with seed {seed} failed to initialize")]
    Init {
        seed: u64,
        #[source]
        source: WorldInitError,
    },
    #[error("replicate with seed {seed} failed")]
    Experiment {
        seed: u64,
        #[source]
        source: ExperimentError,
    },
}

/// Run `config` once per seed. Results come back in seed order and each one
/// equals a serial run of the same seed.
pub fn run_replicates(
    config: &SimConfig,
    seeds: &[u64],
    steps: usize,
    sample_every: usize,
) -> Result<Vec<RunSummary>, EnsembleError> {
    info!(replicates = seeds.len(), steps, "ensemble started");
    seeds
        .par_iter()
        .map(|&seed| {
            let replicate = SimConfig {
                seed,
                ..config.clone()
            };
            let mut world =
                World::new(replicate).map_err(|source| EnsembleError::Init { seed, source })?;
            world
                .try_run_experiment(steps, sample_every)
                .map_err(|source| EnsembleError::Experiment { seed, source })
        })
        .collect()
}

/// `count` consecutive seeds starting at `base`.
pub fn seed_range(base: u64, count: usize) -> Vec<u64> {
    (0..count as u64).map(|i| base.wrapping_add(i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StartPosition;

    #[test]
    fn replicates_match_serial_runs_in_seed_order() {
        let config = SimConfig {
            population_size: 4,
            start: StartPosition::Random,
            ..SimConfig::sharks()
        };
        let seeds = seed_range(100, 4);
        let parallel = run_replicates(&config, &seeds, 30, 5).unwrap();
        assert_eq!(parallel.len(), 4);
        for (summary, &seed) in parallel.iter().zip(&seeds) {
            let mut world = World::new(SimConfig {
                seed,
                ..config.clone()
            })
            .unwrap();
            let serial = world.try_run_experiment(30, 5).unwrap();
            assert_eq!(summary.seed, seed);
            assert_eq!(summary, &serial);
        }
    }

    #[test]
    fn invalid_config_reports_failing_seed() {
        let config = SimConfig {
            grid_size: 0,
            ..SimConfig::sharks()
        };
        let err = run_replicates(&config, &[7], 10, 1).unwrap_err();
        assert!(matches!(err, EnsembleError::Init { seed: 7, .. }));
    }

    #[test]
    fn seed_range_wraps_instead_of_overflowing() {
        assert_eq!(seed_range(u64::MAX, 2), vec![u64::MAX, 0]);
    }
}
