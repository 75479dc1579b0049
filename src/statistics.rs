//! Population composition, sampled into a time series at each `Redraw`.

use crate::individual::{Health, Individual};

/// Instantaneous tallies of the population by health state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Statistics {
    pub susceptible: usize,
    pub infected: usize,
    pub recovered: usize,
    pub dead: usize,
}

impl Statistics {
    /// Tallies `population` by health state in a single pass.
    pub fn tally(population: &[Individual]) -> Self {
        let mut stats = Statistics::default();
        for individual in population {
            match individual.health {
                Health::Susceptible => stats.susceptible += 1,
                Health::Infected => stats.infected += 1,
                Health::Recovered => stats.recovered += 1,
                Health::Dead => stats.dead += 1,
            }
        }
        stats
    }

    pub fn alive(&self) -> usize {
        self.susceptible + self.infected + self.recovered
    }

    pub fn total(&self) -> usize {
        self.alive() + self.dead
    }

    /// Percentage of the living population that is currently infected.
    pub fn percent_infected(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            100.0 * self.infected as f64 / self.total() as f64
        }
    }

    /// Percentage of the population that can still get infected. The
    /// user-visible label for this field is "Non-infected".
    pub fn percent_non_infected(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            100.0 * self.susceptible as f64 / self.total() as f64
        }
    }

    /// Derived third series: `100 - infected - susceptible`.
    pub fn percent_recovered(&self) -> f64 {
        100.0 - self.percent_infected() - self.percent_non_infected()
    }
}

/// Resolution of the history buffer: samples per simulated time unit.
pub const RESOLUTION: f64 = 3.0;

/// Parallel time-series of population composition, sampled once per
/// `Redraw` event.
#[derive(Debug, Clone, Default)]
pub struct History {
    pub percent_infected: Vec<f64>,
    pub percent_non_infected: Vec<f64>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a sample for `time`, writing into slot `floor(RESOLUTION *
    /// time)`, extending the series with the previous value if samples
    /// were skipped (e.g. a coarse `Hz`).
    pub fn record(&mut self, time: f64, stats: &Statistics) {
        let index = (RESOLUTION * time).floor() as usize;
        if index >= self.percent_infected.len() {
            let fill_infected = self.percent_infected.last().copied().unwrap_or(0.0);
            let fill_non_infected = self.percent_non_infected.last().copied().unwrap_or(0.0);
            self.percent_infected.resize(index + 1, fill_infected);
            self.percent_non_infected.resize(index + 1, fill_non_infected);
        }
        self.percent_infected[index] = stats.percent_infected();
        self.percent_non_infected[index] = stats.percent_non_infected();
    }

    pub fn len(&self) -> usize {
        self.percent_infected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.percent_infected.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::{MASS, RADIUS};

    fn individual(health: Health) -> Individual {
        Individual { x: 0.0, y: 0.0, vx: 0.0, vy: 0.0, radius: RADIUS, mass: MASS, health, collisions: 0 }
    }

    #[test]
    fn tally_counts_every_state() {
        let pop = vec![
            individual(Health::Susceptible),
            individual(Health::Infected),
            individual(Health::Infected),
            individual(Health::Recovered),
            individual(Health::Dead),
        ];
        let stats = Statistics::tally(&pop);
        assert_eq!(stats, Statistics { susceptible: 1, infected: 2, recovered: 1, dead: 1 });
    }

    #[test]
    fn percentages_sum_to_one_hundred() {
        let stats = Statistics { susceptible: 3, infected: 2, recovered: 4, dead: 1 };
        let sum = stats.percent_infected() + stats.percent_non_infected() + stats.percent_recovered();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn history_records_at_the_right_index() {
        let mut history = History::new();
        history.record(1.0, &Statistics { susceptible: 0, infected: 10, recovered: 0, dead: 0 });
        assert_eq!(history.len(), 4); // floor(3.0 * 1.0) + 1
        assert_eq!(history.percent_infected[3], 100.0);
    }
}
