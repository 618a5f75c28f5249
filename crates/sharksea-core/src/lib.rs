pub mod agent;
pub mod boundary;
pub mod config;
pub mod development;
pub mod ensemble;
pub mod field;
pub mod heading;
pub mod world;

pub use agent::Agent;
pub use config::{SeedRegion, SimConfig, SimConfigError, StartPosition, TurnRule};
pub use field::{FieldError, SpatialField};
pub use heading::{Heading, HeadingModel};
pub use world::{
    AgentSnapshot, ExperimentError, RunSummary, Snapshot, StepError, StepMetrics, World,
    WorldInitError,
};
