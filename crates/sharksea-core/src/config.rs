use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Distribution of the per-step heading change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TurnRule {
    /// Normal(0, sigma) draw truncated toward zero; sigma depends on behavior.
    #[default]
    Gaussian,
    /// Uniform draw from {-1, 0, 1}.
    UnitStep,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum StartPosition {
    /// Independent uniform cell per agent.
    #[default]
    Random,
    /// Every agent starts on the same cell.
    Fixed { row: usize, col: usize },
}

/// Rectangular patch of food set at construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeedRegion {
    pub rows: Range<usize>,
    pub cols: Range<usize>,
    pub quantity: f64,
}

impl SeedRegion {
    pub fn new(rows: Range<usize>, cols: Range<usize>, quantity: f64) -> Self {
        Self {
            rows,
            cols,
            quantity,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Deterministic seed for reproducible simulation runs.
    pub seed: u64,
    /// Width/height of the square toroidal grid in cells.
    pub grid_size: usize,
    /// Number of agents. Fixed for the whole run.
    pub population_size: usize,
    /// Food patches, applied in order (later regions overwrite earlier ones).
    pub seed_regions: Vec<SeedRegion>,
    pub start: StartPosition,
    /// Starting heading for every agent; `None` draws one per agent.
    pub initial_heading: Option<u8>,
    /// Food removed from a cell each time an agent forages on it.
    pub depletion_amount: f64,
    /// Energy gained per foraging step.
    pub energy_gain: f64,
    /// Energy lost per searching step.
    pub energy_loss: f64,
    /// Turn noise while searching.
    pub noise_std_dev_base: f64,
    /// Turn noise while foraging.
    pub noise_std_dev_foraging: f64,
    pub turn_rule: TurnRule,
    /// Steps executed by `World::run_configured`.
    pub step_count: usize,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimConfigError {
    #[error("grid_size must be in 1..={max} (got {actual})")]
    InvalidGridSize { max: usize, actual: usize },
    #[error("population_size must be in 1..={max} (got {actual})")]
    InvalidPopulationSize { max: usize, actual: usize },
    #[error("seed region {index} must be non-empty and lie inside the {size}x{size} grid")]
    SeedRegionOutOfBounds { index: usize, size: usize },
    #[error("seed region {index} quantity must be finite and non-negative")]
    InvalidSeedQuantity { index: usize },
    #[error("fixed start ({row}, {col}) is outside the {size}x{size} grid")]
    StartOutOfBounds { row: usize, col: usize, size: usize },
    #[error("initial_heading must be in 1..=8 (got {0})")]
    InvalidInitialHeading(u8),
    #[error("{0} must be finite and non-negative")]
    InvalidNoiseStdDev(&'static str),
    #[error("{0} must be finite and non-negative")]
    InvalidRate(&'static str),
    #[error("step_count ({actual}) exceeds supported maximum ({max})")]
    TooManySteps { max: usize, actual: usize },
}

fn non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

impl SimConfig {
    pub const MAX_GRID_SIZE: usize = 4096;
    pub const MAX_POPULATION: usize = 100_000;
    pub const MAX_STEPS: usize = 1_000_000;

    /// Five sharks released mid-sea over three square food patches.
    pub fn sharks() -> Self {
        Self {
            seed: 42,
            grid_size: 250,
            population_size: 5,
            seed_regions: vec![
                SeedRegion::new(175..220, 175..220, 20.0),
                SeedRegion::new(125..150, 125..150, 20.0),
                SeedRegion::new(50..75, 50..75, 20.0),
            ],
            start: StartPosition::Fixed { row: 125, col: 125 },
            initial_heading: None,
            depletion_amount: 2.0,
            energy_gain: 1.0,
            energy_loss: 1.0,
            noise_std_dev_base: 1.0,
            noise_std_dev_foraging: 3.0,
            turn_rule: TurnRule::Gaussian,
            step_count: 800,
        }
    }

    /// Thirty ants on an empty grid, each turning at most one notch per step.
    pub fn ant_walk() -> Self {
        Self {
            seed: 42,
            grid_size: 99,
            population_size: 30,
            seed_regions: Vec::new(),
            start: StartPosition::Random,
            initial_heading: None,
            depletion_amount: 0.0,
            energy_gain: 0.0,
            energy_loss: 0.0,
            noise_std_dev_base: 1.0,
            noise_std_dev_foraging: 1.0,
            turn_rule: TurnRule::UnitStep,
            step_count: 100,
        }
    }

    pub fn validate(&self) -> Result<(), SimConfigError> {
        if self.grid_size == 0 || self.grid_size > Self::MAX_GRID_SIZE {
            return Err(SimConfigError::InvalidGridSize {
                max: Self::MAX_GRID_SIZE,
                actual: self.grid_size,
            });
        }
        if self.population_size == 0 || self.population_size > Self::MAX_POPULATION {
            return Err(SimConfigError::InvalidPopulationSize {
                max: Self::MAX_POPULATION,
                actual: self.population_size,
            });
        }
        for (index, region) in self.seed_regions.iter().enumerate() {
            if !crate::field::SpatialField::region_fits(&region.rows, &region.cols, self.grid_size)
            {
                return Err(SimConfigError::SeedRegionOutOfBounds {
                    index,
                    size: self.grid_size,
                });
            }
            if !non_negative(region.quantity) {
                return Err(SimConfigError::InvalidSeedQuantity { index });
            }
        }
        if let StartPosition::Fixed { row, col } = self.start {
            if row >= self.grid_size || col >= self.grid_size {
                return Err(SimConfigError::StartOutOfBounds {
                    row,
                    col,
                    size: self.grid_size,
                });
            }
        }
        if let Some(h) = self.initial_heading {
            if !(1..=crate::heading::HEADING_COUNT).contains(&h) {
                return Err(SimConfigError::InvalidInitialHeading(h));
            }
        }
        if !non_negative(self.noise_std_dev_base) {
            return Err(SimConfigError::InvalidNoiseStdDev("noise_std_dev_base"));
        }
        if !non_negative(self.noise_std_dev_foraging) {
            return Err(SimConfigError::InvalidNoiseStdDev("noise_std_dev_foraging"));
        }
        for (name, value) in [
            ("depletion_amount", self.depletion_amount),
            ("energy_gain", self.energy_gain),
            ("energy_loss", self.energy_loss),
        ] {
            if !non_negative(value) {
                return Err(SimConfigError::InvalidRate(name));
            }
        }
        if self.step_count > Self::MAX_STEPS {
            return Err(SimConfigError::TooManySteps {
                max: Self::MAX_STEPS,
                actual: self.step_count,
            });
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::sharks()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        assert_eq!(SimConfig::sharks().validate(), Ok(()));
        assert_eq!(SimConfig::ant_walk().validate(), Ok(()));
    }

    #[test]
    fn rejects_zero_grid_and_population() {
        let cfg = SimConfig {
            grid_size: 0,
            ..SimConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(SimConfigError::InvalidGridSize { actual: 0, .. })
        ));
        let cfg = SimConfig {
            population_size: 0,
            ..SimConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(SimConfigError::InvalidPopulationSize { actual: 0, .. })
        ));
    }

    #[test]
    fn rejects_seed_region_outside_grid() {
        let cfg = SimConfig {
            grid_size: 10,
            start: StartPosition::Random,
            seed_regions: vec![
                SeedRegion::new(0..2, 0..2, 5.0),
                SeedRegion::new(8..12, 0..2, 5.0),
            ],
            ..SimConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(SimConfigError::SeedRegionOutOfBounds { index: 1, size: 10 })
        );
    }

    #[test]
    fn rejects_negative_noise_and_rates() {
        let cfg = SimConfig {
            noise_std_dev_foraging: -0.5,
            ..SimConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(SimConfigError::InvalidNoiseStdDev("noise_std_dev_foraging"))
        );
        let cfg = SimConfig {
            energy_gain: f64::NAN,
            ..SimConfig::default()
        };
        assert_eq!(cfg.validate(), Err(SimConfigError::InvalidRate("energy_gain")));
    }

    #[test]
    fn rejects_bad_start_and_heading() {
        let cfg = SimConfig {
            grid_size: 10,
            seed_regions: Vec::new(),
            start: StartPosition::Fixed { row: 3, col: 10 },
            ..SimConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(SimConfigError::StartOutOfBounds { col: 10, .. })
        ));
        let cfg = SimConfig {
            initial_heading: Some(0),
            ..SimConfig::default()
        };
        assert_eq!(cfg.validate(), Err(SimConfigError::InvalidInitialHeading(0)));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: SimConfig = serde_json::from_str(
            r#"{
                "grid_size": 12,
                "start": { "kind": "fixed", "row": 1, "col": 2 },
                "seed_regions": [ { "rows": { "start": 0, "end": 3 }, "cols": { "start": 4, "end": 6 }, "quantity": 9.5 } ],
                "turn_rule": "unit_step"
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.grid_size, 12);
        assert_eq!(cfg.start, StartPosition::Fixed { row: 1, col: 2 });
        assert_eq!(cfg.seed_regions[0].rows, 0..3);
        assert_eq!(cfg.turn_rule, TurnRule::UnitStep);
        assert_eq!(cfg.population_size, SimConfig::sharks().population_size);
        assert_eq!(cfg.validate(), Ok(()));
    }
}
