//! Initialization, collision prediction, and the main dispatch loop.
//! The hot core of the crate.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use tracing::{debug, info, warn};
use web_time::Instant;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::event::{Event, IndividualId};
use crate::event_queue::EventQueue;
use crate::individual::{Health, Individual};
use crate::renderer::{self, Renderer, Snapshot};
use crate::rng::Rng;
use crate::statistics::{History, Statistics};

/// Practical cap on rejection-sampling attempts per individual before
/// giving up and surfacing [`Error::Init`].
const MAX_PLACEMENT_ATTEMPTS: u32 = 10_000;

/// A handle a caller can flip to ask a running [`Simulator::simulate`] to
/// stop cooperatively at the top of its next loop iteration.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, AtomicOrdering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(AtomicOrdering::Relaxed)
    }
}

/// How a run of [`Simulator::simulate`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimOutcome {
    /// The queue emptied naturally (every future event exceeded the horizon).
    Completed,
    /// The cancellation token was set before the queue emptied.
    Cancelled,
}

/// Owns the population, the event queue, the RNG, and the simulation
/// clock for a single run. No other code reads or mutates these while
/// [`Simulator::simulate`] is in progress.
pub struct Simulator {
    config: Config,
    population: Vec<Individual>,
    queue: EventQueue,
    rng: Rng,
    time: f64,
    history: History,
}

impl Simulator {
    /// Validates `config` and builds an (unpopulated) simulator. Does not
    /// place any individuals or draw from the RNG yet; call
    /// [`Simulator::simulate`] to run the simulation.
    pub fn new(config: Config) -> Result<Self> {
        let config = config.validated()?;
        Ok(Self {
            config,
            population: Vec::with_capacity(config.population_sz),
            queue: EventQueue::new(config.time_limit),
            rng: Rng::seeded(config.seed),
            time: 0.0,
            history: History::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn population(&self) -> &[Individual] {
        &self.population
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Runs initialization followed by the main dispatch loop to
    /// completion (or cancellation), driving `renderer` on every
    /// `Redraw` event.
    pub fn simulate(&mut self, renderer: &mut dyn Renderer, cancel: &CancellationToken) -> Result<SimOutcome> {
        self.init()?;
        info!(
            population_sz = self.config.population_sz,
            seed = self.config.seed,
            time_limit = self.config.time_limit,
            "starting simulation run"
        );
        let outcome = self.run(renderer, cancel);
        info!(?outcome, final_time = self.time, "simulation run finished");
        Ok(outcome)
    }

    /// Clears state, places the population without overlap, infects one
    /// individual, schedules its recovery, predicts every individual's
    /// first collisions, and enqueues the initial redraw.
    fn init(&mut self) -> Result<()> {
        self.time = 0.0;
        self.queue.clear();
        self.population.clear();
        self.history = History::new();

        for _ in 0..self.config.population_sz {
            let placed = self.place_one()?;
            self.population.push(placed);
        }

        if let Some(index) = self.pick_initial_infected() {
            self.population[index].infect();
            let recovery_time = self.time + self.rng.normal(self.config.time_infectious, 1.0);
            self.queue.enqueue(Event::EndInfection { time: recovery_time, i: index });
        }

        for i in 0..self.population.len() {
            self.predict_collisions(i);
        }

        self.queue.enqueue(Event::Redraw(self.time));
        Ok(())
    }

    /// Rejection-samples a new individual until it overlaps nobody already
    /// placed, up to [`MAX_PLACEMENT_ATTEMPTS`].
    fn place_one(&mut self) -> Result<Individual> {
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let candidate = Individual::random(&mut self.rng, &self.config);
            if !self.population.iter().any(|existing| existing.collides_with(&candidate)) {
                return Ok(candidate);
            }
        }
        Err(Error::Init { population_sz: self.config.population_sz, attempts: MAX_PLACEMENT_ATTEMPTS })
    }

    fn pick_initial_infected(&mut self) -> Option<IndividualId> {
        if self.population.is_empty() {
            None
        } else {
            Some(self.rng.uniform_usize(0, self.population.len()))
        }
    }

    /// Enqueues every future collision (pairwise and against both walls)
    /// for a single live individual, skipping `i == j` explicitly rather
    /// than relying on the `time_to_hit` self-pair guard.
    fn predict_collisions(&mut self, i: IndividualId) {
        let ia = self.population[i];
        if ia.health.is_dead() {
            return;
        }

        for j in 0..self.population.len() {
            if i == j {
                continue;
            }
            let ib = self.population[j];
            let dt = ia.time_to_hit(&ib);
            if dt.is_finite() {
                self.queue.enqueue(Event::Collision {
                    time: self.time + dt,
                    a: i,
                    b: j,
                    epoch_a: ia.collisions,
                    epoch_b: ib.collisions,
                });
            }
        }

        let dt_vertical = ia.time_to_hit_vertical_wall();
        if dt_vertical.is_finite() {
            self.queue.enqueue(Event::VerticalWallCollision {
                time: self.time + dt_vertical,
                i,
                epoch: ia.collisions,
            });
        }

        let dt_horizontal = ia.time_to_hit_horizontal_wall();
        if dt_horizontal.is_finite() {
            self.queue.enqueue(Event::HorizontalWallCollision {
                time: self.time + dt_horizontal,
                i,
                epoch: ia.collisions,
            });
        }
    }

    /// Pops events until the queue empties or `cancel` is set.
    fn run(&mut self, renderer: &mut dyn Renderer, cancel: &CancellationToken) -> SimOutcome {
        let mut redraw_wall_clock = Instant::now();

        while self.queue.non_empty() {
            if cancel.is_cancelled() {
                return SimOutcome::Cancelled;
            }

            let event = self.queue.dequeue();
            if !event.is_valid(&self.population) {
                continue;
            }

            let dt = event.time() - self.time;
            for individual in &mut self.population {
                individual.move_by(dt);
            }
            self.time = event.time();

            debug!(time = self.time, event = ?event, "dispatching event");

            match event {
                Event::Redraw(_) => {
                    self.dispatch_redraw(renderer, &mut redraw_wall_clock);
                }
                Event::Collision { a, b, .. } => self.dispatch_collision(a, b),
                Event::HorizontalWallCollision { i, .. } => {
                    self.population[i].bounce_off_horizontal_wall();
                    self.predict_collisions(i);
                }
                Event::VerticalWallCollision { i, .. } => {
                    self.population[i].bounce_off_vertical_wall();
                    self.predict_collisions(i);
                }
                Event::EndInfection { i, .. } => {
                    let die = self.rng.bernoulli(self.config.prob_dying);
                    self.population[i].end_infection(die);
                }
            }
        }

        SimOutcome::Completed
    }

    /// Handles a collision: one-direction transmission check in each
    /// direction, then the elastic bounce, then re-prediction for both
    /// participants.
    fn dispatch_collision(&mut self, a: IndividualId, b: IndividualId) {
        if self.population[a].health.is_infected() && self.population[b].health.can_get_infected() {
            self.maybe_transmit(a, b);
        } else if self.population[b].health.is_infected() && self.population[a].health.can_get_infected() {
            self.maybe_transmit(b, a);
        }

        let (left, right) = self.population.split_at_mut(b.max(a));
        let (ia, ib) = if a < b {
            (&mut left[a], &mut right[0])
        } else {
            (&mut right[0], &mut left[b])
        };
        ia.bounce_off(ib);

        self.predict_collisions(a);
        self.predict_collisions(b);
    }

    /// With probability `prob_infection`, infects `susceptible` and
    /// schedules its `EndInfection`.
    fn maybe_transmit(&mut self, _infected: IndividualId, susceptible: IndividualId) {
        if self.rng.bernoulli(self.config.prob_infection) {
            self.population[susceptible].infect();
            let recovery_time = self.time + self.rng.normal(self.config.time_infectious, 1.0);
            self.queue.enqueue(Event::EndInfection { time: recovery_time, i: susceptible });
        }
    }

    /// Publishes a snapshot, records history, sleeps to cap the refresh
    /// rate, and reschedules the next redraw.
    fn dispatch_redraw(&mut self, renderer: &mut dyn Renderer, redraw_wall_clock: &mut Instant) {
        let statistics = Statistics::tally(&self.population);
        self.history.record(self.time, &statistics);

        let snapshot = Snapshot {
            time: self.time,
            individuals: self.population.iter().map(|p| (p.x as f32, p.y as f32, p.health)).collect(),
            statistics,
            history: self.history.clone(),
        };

        if let Err(err) = renderer.draw_with(&snapshot, &mut |s, gc| renderer::paint_frame(s, gc)) {
            warn!(%err, "renderer callback failed; dropping this frame");
        }

        let elapsed_ms = redraw_wall_clock.elapsed().as_millis() as u64;
        let sleep_ms = (10u64).saturating_sub(elapsed_ms).max(1);
        std::thread::sleep(std::time::Duration::from_millis(sleep_ms));
        *redraw_wall_clock = Instant::now();

        let period = self.config.redraw_period();
        if period.is_finite() {
            self.queue.enqueue(Event::Redraw(self.time + period));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::NullRenderer;

    fn scenario(config: Config) -> (Simulator, SimOutcome) {
        let mut sim = Simulator::new(config).expect("valid config");
        let outcome = sim.simulate(&mut NullRenderer, &CancellationToken::new()).expect("simulate");
        (sim, outcome)
    }

    #[test]
    fn empty_population_returns_promptly() {
        let config = Config { population_sz: 0, hz: 0, ..Config::default() };
        let (sim, outcome) = scenario(config);
        assert_eq!(outcome, SimOutcome::Completed);
        let stats = Statistics::tally(sim.population());
        assert_eq!(stats, Statistics::default());
    }

    #[test]
    fn stationary_pair_never_collides_and_stays_at_one_infection() {
        let config = Config {
            seed: 0,
            population_sz: 2,
            velocity_sigma: 0.0,
            prob_infection: 1.0,
            time_infectious: 1000.0,
            time_limit: 10.0,
            hz: 0,
            ..Config::default()
        };
        let (sim, outcome) = scenario(config);
        assert_eq!(outcome, SimOutcome::Completed);
        let stats = Statistics::tally(sim.population());
        assert_eq!(stats.infected, 1);
        assert_eq!(stats.susceptible, 1);
        assert_eq!(stats.recovered, 0);
        assert_eq!(stats.dead, 0);
    }

    #[test]
    fn zero_death_probability_never_kills_anyone() {
        let config = Config {
            seed: 1,
            population_sz: 50,
            prob_dying: 0.0,
            time_limit: 200.0,
            hz: 0,
            ..Config::default()
        };
        let (sim, _) = scenario(config);
        let stats = Statistics::tally(sim.population());
        assert_eq!(stats.dead, 0);
    }

    #[test]
    fn zero_infection_probability_leaves_only_the_initial_case_ever_infected() {
        let config = Config {
            seed: 2,
            population_sz: 50,
            prob_infection: 0.0,
            time_limit: 200.0,
            hz: 0,
            ..Config::default()
        };
        let (sim, _) = scenario(config);
        let stats = Statistics::tally(sim.population());
        assert_eq!(stats.infected + stats.recovered + stats.dead, 1);
    }

    #[test]
    fn same_seed_same_final_tallies() {
        let config = Config { seed: 7, population_sz: 80, time_limit: 150.0, hz: 0, ..Config::default() };
        let (sim_a, _) = scenario(config);
        let (sim_b, _) = scenario(config);
        assert_eq!(Statistics::tally(sim_a.population()), Statistics::tally(sim_b.population()));
    }

    #[test]
    fn cancellation_stops_the_loop_before_completion() {
        let config = Config { seed: 3, population_sz: 200, time_limit: 1_000_000.0, hz: 0, ..Config::default() };
        let mut sim = Simulator::new(config).expect("valid config");
        let cancel = CancellationToken::new();
        cancel.cancel();
        let outcome = sim.simulate(&mut NullRenderer, &cancel).expect("simulate");
        assert_eq!(outcome, SimOutcome::Cancelled);
    }

    #[test]
    fn confinement_holds_throughout_a_run() {
        let config = Config { seed: 9, population_sz: 60, time_limit: 100.0, hz: 0, ..Config::default() };
        let (sim, _) = scenario(config);
        for individual in sim.population() {
            assert!(crate::arena::contains(individual.x, individual.y, 1e-6));
        }
    }
}
