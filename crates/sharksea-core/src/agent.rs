use crate::heading::Heading;
use serde::{Deserialize, Serialize};

/// Which rule an agent followed during its last update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Behavior {
    /// Standing on food: gains energy, depletes the cell, turns erratically.
    Foraging,
    /// No food underfoot: loses energy and turns with base noise.
    Searching,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Agent {
    pub id: u32,
    /// (row, col), always inside the grid.
    pub position: [usize; 2],
    pub heading: Heading,
    pub energy: f64,
    pub last_behavior: Option<Behavior>,
}

impl Agent {
    pub fn new(id: u32, position: [usize; 2], heading: Heading) -> Self {
        Self {
            id,
            position,
            heading,
            energy: 0.0,
            last_behavior: None,
        }
    }
}
