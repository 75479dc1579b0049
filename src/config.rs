//! Frozen parameter bundle passed into the simulator.

use crate::error::{Error, Result};

/// Parameters for a single simulation run. Validated once, at
/// [`Config::validated`], then treated as immutable for the run's lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// PRNG seed; identical configs produce identical event sequences.
    pub seed: u64,
    /// Redraw events scheduled per simulated time unit. `0` disables redraws.
    pub hz: u32,
    /// Number of individuals to populate the arena with.
    pub population_sz: usize,
    /// Standard deviation of the per-axis initial velocity `Normal(0, sigma)`.
    pub velocity_sigma: f64,
    /// Horizon past which events are dropped; also the run's stopping point.
    pub time_limit: f64,
    /// Probability an infectious collision actually transmits.
    pub prob_infection: f64,
    /// Probability an infected individual dies rather than recovers.
    pub prob_dying: f64,
    /// Mean of the `Normal(mu, 1)` infectious-duration distribution.
    pub time_infectious: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: 0,
            hz: 48,
            population_sz: 500,
            velocity_sigma: 15.0,
            time_limit: 2000.0,
            prob_infection: 1.0 / 3.0,
            prob_dying: 0.15,
            time_infectious: 12.0,
        }
    }
}

impl Config {
    /// Validates every field against its documented range, returning
    /// [`Error::Config`] naming the first offending field.
    pub fn validated(self) -> Result<Self> {
        if self.hz > 60 {
            return Err(Error::Config(format!("hz must be in [0, 60], got {}", self.hz)));
        }
        if self.population_sz > 1500 {
            return Err(Error::Config(format!(
                "population_sz must be in [0, 1500], got {}",
                self.population_sz
            )));
        }
        if !(0.0..=100.0).contains(&self.velocity_sigma) {
            return Err(Error::Config(format!(
                "velocity_sigma must be in [0, 100], got {}",
                self.velocity_sigma
            )));
        }
        if self.time_limit < 0.0 || !self.time_limit.is_finite() {
            return Err(Error::Config(format!(
                "time_limit must be finite and >= 0, got {}",
                self.time_limit
            )));
        }
        if !(0.0..=1.0).contains(&self.prob_infection) {
            return Err(Error::Config(format!(
                "prob_infection must be in [0, 1], got {}",
                self.prob_infection
            )));
        }
        if !(0.0..=1.0).contains(&self.prob_dying) {
            return Err(Error::Config(format!(
                "prob_dying must be in [0, 1], got {}",
                self.prob_dying
            )));
        }
        if !(0.0..=100.0).contains(&self.time_infectious) {
            return Err(Error::Config(format!(
                "time_infectious must be in [0, 100], got {}",
                self.time_infectious
            )));
        }
        Ok(self)
    }

    /// `1 / hz`, or `+inf` when `hz == 0` (no redraws are ever scheduled).
    pub fn redraw_period(&self) -> f64 {
        if self.hz == 0 {
            f64::INFINITY
        } else {
            1.0 / self.hz as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(Config::default().validated().is_ok());
    }

    #[test]
    fn hz_out_of_range_is_rejected() {
        let cfg = Config { hz: 61, ..Config::default() };
        assert!(matches!(cfg.validated(), Err(Error::Config(_))));
    }

    #[test]
    fn population_out_of_range_is_rejected() {
        let cfg = Config { population_sz: 1501, ..Config::default() };
        assert!(cfg.validated().is_err());
    }

    #[test]
    fn zero_hz_has_infinite_period() {
        let cfg = Config { hz: 0, ..Config::default() };
        assert_eq!(cfg.redraw_period(), f64::INFINITY);
    }
}
