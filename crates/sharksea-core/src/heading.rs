//! Discrete compass headings and the stochastic turning rule.
//!
//! Headings are encoded 1..=8, clockwise from north. Rows grow downward, so
//! north is a step of `-1` on the row axis.

use crate::config::TurnRule;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

pub const HEADING_COUNT: u8 = 8;

/// (d_row, d_col) offsets for headings 1..=8: N, NE, E, SE, S, SW, W, NW.
const DIRECTIONS: [[i64; 2]; HEADING_COUNT as usize] = [
    [-1, 0],
    [-1, 1],
    [0, 1],
    [1, 1],
    [1, 0],
    [1, -1],
    [0, -1],
    [-1, -1],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("heading {0} is outside 1..=8")]
pub struct InvalidHeading(pub u8);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Heading(u8);

impl Heading {
    pub const NORTH: Heading = Heading(1);

    pub fn new(value: u8) -> Result<Self, InvalidHeading> {
        if (1..=HEADING_COUNT).contains(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidHeading(value))
        }
    }

    /// Fold any integer onto 1..=8, keeping it congruent modulo 8 (0 maps to 8).
    pub fn normalized(raw: i64) -> Self {
        Self(normalize_heading(raw))
    }

    /// Draw a uniformly random heading.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.random_range(1..=HEADING_COUNT))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn direction(self) -> [i64; 2] {
        direction_vector(self)
    }
}

impl TryFrom<u8> for Heading {
    type Error = InvalidHeading;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Heading> for u8 {
    fn from(heading: Heading) -> Self {
        heading.0
    }
}

pub fn normalize_heading(raw: i64) -> u8 {
    match raw.rem_euclid(i64::from(HEADING_COUNT)) {
        0 => HEADING_COUNT,
        r => r as u8,
    }
}

/// Unit step for a heading. Both axis components are in {-1, 0, 1}.
pub fn direction_vector(heading: Heading) -> [i64; 2] {
    DIRECTIONS[usize::from(heading.0 - 1)]
}

/// Applies random turns to headings according to a [`TurnRule`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeadingModel {
    turn_rule: TurnRule,
}

impl HeadingModel {
    pub fn new(turn_rule: TurnRule) -> Self {
        Self { turn_rule }
    }

    pub fn turn_rule(&self) -> TurnRule {
        self.turn_rule
    }

    /// Integer turn offset. `std_dev` is ignored by [`TurnRule::UnitStep`].
    pub fn turn_offset<R: Rng + ?Sized>(&self, rng: &mut R, std_dev: f64) -> i64 {
        match self.turn_rule {
            TurnRule::Gaussian => {
                // A zero std dev disables noise and draws nothing from the stream.
                let noise: Option<Normal<f64>> = if std_dev > 0.0 {
                    Normal::new(0.0, std_dev).ok()
                } else {
                    None
                };
                noise.map_or(0, |n| n.sample(rng).trunc() as i64)
            }
            TurnRule::UnitStep => rng.random_range(-1i64..=1),
        }
    }

    pub fn perturb<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        current: Heading,
        std_dev: f64,
    ) -> Heading {
        let offset = self.turn_offset(rng, std_dev);
        Heading::normalized(i64::from(current.get()).saturating_add(offset))
    }
}
