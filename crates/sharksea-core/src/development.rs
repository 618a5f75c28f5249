//! Temperature-dependent development time from an Arrhenius rate law.
//!
//! Independent of the grid simulation: a pure function from daily temperature
//! (Kelvin) to the number of days needed to complete development.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrheniusParams {
    /// Temperature at which development takes `development_time` days (K).
    pub reference_temperature: f64,
    /// Development time at the reference temperature (days).
    pub development_time: f64,
    /// Boltzmann constant (eV/K).
    pub boltzmann: f64,
    /// Activation energy (eV). Negative values speed development up with temperature.
    pub activation_energy: f64,
}

impl Default for ArrheniusParams {
    fn default() -> Self {
        Self {
            reference_temperature: 294.0,
            development_time: 5.0,
            boltzmann: 8.62e-5,
            activation_energy: -0.62,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DevelopmentError {
    #[error("temperature must be finite and positive (got {0})")]
    InvalidTemperature(f64),
    #[error("development rate at {temperature} K is not a positive finite number ({rate})")]
    DegenerateRate { temperature: f64, rate: f64 },
}

impl ArrheniusParams {
    /// Fraction of development completed per day at `temperature`.
    pub fn development_rate(&self, temperature: f64) -> Result<f64, DevelopmentError> {
        if !temperature.is_finite() || temperature <= 0.0 {
            return Err(DevelopmentError::InvalidTemperature(temperature));
        }
        let exponent = (1.0 / self.reference_temperature - 1.0 / temperature)
            * (self.activation_energy / self.boltzmann);
        let rate = 1.0 / (exponent.exp() * self.development_time);
        if !rate.is_finite() || rate <= 0.0 {
            return Err(DevelopmentError::DegenerateRate { temperature, rate });
        }
        Ok(rate)
    }

    /// Days until accumulated development exceeds 1, counting from day 1 and
    /// doubling progress each further day.
    pub fn development_days(&self, temperature: f64) -> Result<u32, DevelopmentError> {
        let mut progress = self.development_rate(temperature)?;
        let mut days = 1u32;
        while progress <= 1.0 {
            progress += progress;
            days += 1;
        }
        Ok(days)
    }

    pub fn development_table(
        &self,
        temperatures: &[f64],
    ) -> Result<Vec<(f64, u32)>, DevelopmentError> {
        temperatures
            .iter()
            .map(|&t| self.development_days(t).map(|days| (t, days)))
            .collect()
    }
}

/// [`ArrheniusParams::development_days`] with default parameters.
pub fn development_days(temperature: f64) -> Result<u32, DevelopmentError> {
    ArrheniusParams::default().development_days(temperature)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_temperature_gives_reciprocal_development_time() {
        let params = ArrheniusParams::default();
        let rate = params.development_rate(294.0).unwrap();
        assert!((rate - 0.2).abs() < 1e-12);
        assert_eq!(params.development_days(294.0), Ok(4));
    }

    #[test]
    fn warmer_days_develop_faster() {
        let table = ArrheniusParams::default()
            .development_table(&[290.0, 295.0, 300.0, 305.0, 310.0])
            .unwrap();
        let days: Vec<u32> = table.iter().map(|(_, d)| *d).collect();
        assert_eq!(days[0], 4);
        assert_eq!(days[2], 3);
        assert_eq!(days[4], 2);
        assert!(days.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn rate_of_exactly_one_needs_a_second_day() {
        let params = ArrheniusParams {
            development_time: 1.0,
            ..ArrheniusParams::default()
        };
        assert_eq!(params.development_days(294.0), Ok(2));
    }

    #[test]
    fn rejects_non_physical_temperatures() {
        assert_eq!(
            development_days(0.0),
            Err(DevelopmentError::InvalidTemperature(0.0))
        );
        assert!(development_days(f64::NAN).is_err());
        assert!(development_days(-5.0).is_err());
    }

    #[test]
    fn rejects_rates_that_never_accumulate() {
        let params = ArrheniusParams {
            development_time: f64::INFINITY,
            ..ArrheniusParams::default()
        };
        assert!(matches!(
            params.development_rate(300.0),
            Err(DevelopmentError::DegenerateRate { .. })
        ));
    }
}
