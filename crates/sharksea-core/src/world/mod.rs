pub mod metrics;

pub use metrics::*;

use crate::agent::{Agent, Behavior};
use crate::boundary;
use crate::config::{SimConfig, SimConfigError, StartPosition};
use crate::field::{FieldError, SpatialField};
use crate::heading::{Heading, HeadingModel};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use tracing::{debug, error, info};

/// Owns the food field, the agent population and the random stream, and
/// advances them one synchronous sweep at a time.
pub struct World {
    pub(crate) agents: Vec<Agent>,
    pub(crate) field: SpatialField,
    pub(crate) config: SimConfig,
    pub(crate) heading_model: HeadingModel,
    pub(crate) rng: ChaCha12Rng,
    pub(crate) time_step: u64,
    pub(crate) foraging_last_step: usize,
    pub(crate) consumed_total: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorldInitError {
    #[error(transparent)]
    Config(#[from] SimConfigError),
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error("failed to seed food region {index}")]
    Seed {
        index: usize,
        #[source]
        source: FieldError,
    },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StepError {
    /// A cell lookup failed after wrapping. This is a defect, never a user error.
    #[error("invariant violated at step {step} by agent {agent_id}")]
    InvariantViolation {
        step: u64,
        agent_id: u32,
        #[source]
        source: FieldError,
    },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExperimentError {
    #[error("sample_every must be positive")]
    InvalidSampleEvery,
    #[error("steps ({actual}) exceed supported maximum ({max})")]
    TooManySteps { max: usize, actual: usize },
    #[error("sample count ({actual}) exceeds supported maximum ({max})")]
    TooManySamples { max: usize, actual: usize },
    #[error("snapshot count ({actual}) exceeds supported maximum ({max})")]
    TooManySnapshots { max: usize, actual: usize },
    #[error(transparent)]
    Step(#[from] StepError),
}

impl World {
    pub const MAX_EXPERIMENT_STEPS: usize = SimConfig::MAX_STEPS;
    pub const MAX_EXPERIMENT_SAMPLES: usize = 50_000;
    pub const MAX_SNAPSHOT_FRAMES: usize = 2_000;

    pub fn new(config: SimConfig) -> Result<Self, WorldInitError> {
        config.validate()?;

        let size = config.grid_size;
        let mut field = SpatialField::new(size)?;
        for (index, region) in config.seed_regions.iter().enumerate() {
            field
                .seed(region.rows.clone(), region.cols.clone(), region.quantity)
                .map_err(|source| WorldInitError::Seed { index, source })?;
        }

        let fixed_heading = config
            .initial_heading
            .map(|h| Heading::new(h).map_err(|_| SimConfigError::InvalidInitialHeading(h)))
            .transpose()?;

        // Placement draws happen before any stepping so the stream order is
        // fixed: per agent row, col, then heading.
        let mut rng = ChaCha12Rng::seed_from_u64(config.seed);
        let agents: Vec<Agent> = (0..config.population_size)
            .map(|i| {
                let position = match config.start {
                    StartPosition::Random => [rng.random_range(0..size), rng.random_range(0..size)],
                    StartPosition::Fixed { row, col } => [row, col],
                };
                let heading = fixed_heading.unwrap_or_else(|| Heading::random(&mut rng));
                Agent::new(i as u32, position, heading)
            })
            .collect();

        debug!(
            seed = config.seed,
            grid_size = size,
            population = agents.len(),
            seed_regions = config.seed_regions.len(),
            "world initialized"
        );

        Ok(Self {
            agents,
            field,
            heading_model: HeadingModel::new(config.turn_rule),
            config,
            rng,
            time_step: 0,
            foraging_last_step: 0,
            consumed_total: 0.0,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn field(&self) -> &SpatialField {
        &self.field
    }

    /// Number of completed steps.
    pub fn time_step(&self) -> u64 {
        self.time_step
    }

    pub fn foraging_last_step(&self) -> usize {
        self.foraging_last_step
    }

    /// Total food removed from the field since construction.
    pub fn consumed_total(&self) -> f64 {
        self.consumed_total
    }

    /// Advance one step and return the resulting snapshot.
    pub fn step(&mut self) -> Result<Snapshot, StepError> {
        self.advance()?;
        Ok(self.snapshot())
    }

    /// Run `steps` steps, handing every snapshot to `on_snapshot` as it is produced.
    pub fn run<F>(&mut self, steps: usize, mut on_snapshot: F) -> Result<(), StepError>
    where
        F: FnMut(Snapshot),
    {
        info!(steps, start_step = self.time_step, "run started");
        for _ in 0..steps {
            on_snapshot(self.step()?);
        }
        info!(
            end_step = self.time_step,
            consumed = self.consumed_total,
            "run finished"
        );
        Ok(())
    }

    /// Run for the configured `step_count`.
    pub fn run_configured<F>(&mut self, on_snapshot: F) -> Result<(), StepError>
    where
        F: FnMut(Snapshot),
    {
        self.run(self.config.step_count, on_snapshot)
    }

    /// One sweep over all agents in id order. Each agent sees the field as
    /// left by the agents before it in the same sweep.
    fn advance(&mut self) -> Result<(), StepError> {
        let step = self.time_step + 1;
        let size = self.config.grid_size;
        let mut foraging = 0usize;

        for agent in &mut self.agents {
            let [row, col] = agent.position;
            let quantity = self
                .field
                .quantity_at(row, col)
                .map_err(|source| invariant_violation(step, agent.id, source))?;

            let (behavior, energy, std_dev) = if quantity > 0.0 {
                let removed = self
                    .field
                    .deplete(row, col, self.config.depletion_amount)
                    .map_err(|source| invariant_violation(step, agent.id, source))?;
                self.consumed_total += removed;
                foraging += 1;
                (
                    Behavior::Foraging,
                    agent.energy + self.config.energy_gain,
                    self.config.noise_std_dev_foraging,
                )
            } else {
                (
                    Behavior::Searching,
                    agent.energy - self.config.energy_loss,
                    self.config.noise_std_dev_base,
                )
            };

            let heading = self
                .heading_model
                .perturb(&mut self.rng, agent.heading, std_dev);
            let [next_row, next_col] =
                boundary::offset_wrapped(agent.position, heading.direction(), size);
            let position = boundary::check_index(next_row as i64, next_col as i64, size)
                .map_err(|source| invariant_violation(step, agent.id, source))?;

            agent.heading = heading;
            agent.energy = energy;
            agent.position = position;
            agent.last_behavior = Some(behavior);
        }

        self.time_step = step;
        self.foraging_last_step = foraging;
        debug!(
            step,
            foraging,
            searching = self.agents.len() - foraging,
            "step complete"
        );
        Ok(())
    }

    /// Number of sampled steps in a run of `steps` taking every `sample_every`-th
    /// step plus the final one.
    fn sample_count(steps: usize, sample_every: usize) -> Result<usize, ExperimentError> {
        if sample_every == 0 {
            return Err(ExperimentError::InvalidSampleEvery);
        }
        if steps > Self::MAX_EXPERIMENT_STEPS {
            return Err(ExperimentError::TooManySteps {
                max: Self::MAX_EXPERIMENT_STEPS,
                actual: steps,
            });
        }
        Ok(if steps == 0 {
            0
        } else {
            ((steps - 1) / sample_every) + 1
        })
    }

    /// Run `steps` steps and keep a snapshot of every `every`-th step and the
    /// last one. Only the kept frames are copied.
    pub fn try_collect_snapshots(
        &mut self,
        steps: usize,
        every: usize,
    ) -> Result<Vec<Snapshot>, ExperimentError> {
        let frame_count = Self::sample_count(steps, every)?;
        if frame_count > Self::MAX_SNAPSHOT_FRAMES {
            return Err(ExperimentError::TooManySnapshots {
                max: Self::MAX_SNAPSHOT_FRAMES,
                actual: frame_count,
            });
        }
        let mut frames = Vec::with_capacity(frame_count);
        for step in 1..=steps {
            self.advance()?;
            if step % every == 0 || step == steps {
                frames.push(self.snapshot());
            }
        }
        Ok(frames)
    }

    pub fn try_run_experiment(
        &mut self,
        steps: usize,
        sample_every: usize,
    ) -> Result<RunSummary, ExperimentError> {
        let estimated_samples = Self::sample_count(steps, sample_every)?;
        if estimated_samples > Self::MAX_EXPERIMENT_SAMPLES {
            return Err(ExperimentError::TooManySamples {
                max: Self::MAX_EXPERIMENT_SAMPLES,
                actual: estimated_samples,
            });
        }

        info!(steps, sample_every, seed = self.config.seed, "experiment started");
        let consumed_before = self.consumed_total;
        let mut samples = Vec::with_capacity(estimated_samples);
        for step in 1..=steps {
            self.advance()?;
            if step % sample_every == 0 || step == steps {
                samples.push(self.collect_step_metrics());
            }
        }
        Ok(RunSummary {
            schema_version: 1,
            seed: self.config.seed,
            steps,
            sample_every,
            samples,
            final_energies: self.agents.iter().map(|a| a.energy).collect(),
            resource_consumed: self.consumed_total - consumed_before,
            final_resource_total: self.field.total(),
        })
    }
}

fn invariant_violation(step: u64, agent_id: u32, source: FieldError) -> StepError {
    error!(step, agent_id, %source, "agent left the grid after wrapping");
    StepError::InvariantViolation {
        step,
        agent_id,
        source,
    }
}
