use super::World;
use crate::agent::{Agent, Behavior};
use crate::heading::Heading;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub id: u32,
    pub position: [usize; 2],
    pub heading: Heading,
    pub energy: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behavior: Option<Behavior>,
}

impl From<&Agent> for AgentSnapshot {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id,
            position: agent.position,
            heading: agent.heading,
            energy: agent.energy,
            behavior: agent.last_behavior,
        }
    }
}

/// Row-major copy of the food grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldSnapshot {
    pub size: usize,
    pub cells: Vec<f64>,
}

impl FieldSnapshot {
    pub fn quantity_at(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.size || col >= self.size {
            return None;
        }
        self.cells.get(row * self.size + col).copied()
    }
}

/// Point-in-time export handed to renderers and recorders after each step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub step: u64,
    pub agents: Vec<AgentSnapshot>,
    pub field: FieldSnapshot,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct StepMetrics {
    pub step: u64,
    pub energy_mean: f64,
    pub energy_std: f64,
    pub energy_min: f64,
    pub energy_max: f64,
    pub resource_total: f64,
    pub foraging_count: usize,
    pub searching_count: usize,
}

fn default_schema_version() -> u32 {
    1
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub seed: u64,
    pub steps: usize,
    pub sample_every: usize,
    pub samples: Vec<StepMetrics>,
    #[serde(default)]
    pub final_energies: Vec<f64>,
    #[serde(default)]
    pub resource_consumed: f64,
    #[serde(default)]
    pub final_resource_total: f64,
}

impl World {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            step: self.time_step,
            agents: self.agents.iter().map(AgentSnapshot::from).collect(),
            field: FieldSnapshot {
                size: self.field.size(),
                cells: self.field.cells().to_vec(),
            },
        }
    }

    pub(crate) fn collect_step_metrics(&self) -> StepMetrics {
        let n = self.agents.len();
        let denom = n.max(1) as f64;
        let energy_mean = self.agents.iter().map(|a| a.energy).sum::<f64>() / denom;
        let energy_var = self
            .agents
            .iter()
            .map(|a| (a.energy - energy_mean).powi(2))
            .sum::<f64>()
            / denom;
        let (energy_min, energy_max) = if n == 0 {
            (0.0, 0.0)
        } else {
            self.agents
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), a| {
                    (lo.min(a.energy), hi.max(a.energy))
                })
        };

        StepMetrics {
            step: self.time_step,
            energy_mean,
            energy_std: energy_var.sqrt(),
            energy_min,
            energy_max,
            resource_total: self.field.total(),
            foraging_count: self.foraging_last_step,
            searching_count: n - self.foraging_last_step,
        }
    }
}
