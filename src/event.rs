//! Tagged future events, keyed by scheduled time, validated against a
//! per-individual epoch so stale entries can survive harmlessly in the
//! queue.

use crate::individual::Individual;

/// Stable index of an individual within the simulator's population array.
pub type IndividualId = usize;

/// A future occurrence. Holds only ids and epoch snapshots, never a
/// reference into the population array.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// Trigger a repaint and a history sample.
    Redraw(f64),
    /// Two individuals are predicted to collide elastically.
    Collision { time: f64, a: IndividualId, b: IndividualId, epoch_a: u64, epoch_b: u64 },
    /// An individual is predicted to hit the top or bottom wall.
    HorizontalWallCollision { time: f64, i: IndividualId, epoch: u64 },
    /// An individual is predicted to hit the left or right wall.
    VerticalWallCollision { time: f64, i: IndividualId, epoch: u64 },
    /// An infected individual's infectious period ends.
    EndInfection { time: f64, i: IndividualId },
}

impl Event {
    /// The scheduled time this event should fire at.
    pub fn time(&self) -> f64 {
        match *self {
            Event::Redraw(t) => t,
            Event::Collision { time, .. } => time,
            Event::HorizontalWallCollision { time, .. } => time,
            Event::VerticalWallCollision { time, .. } => time,
            Event::EndInfection { time, .. } => time,
        }
    }

    /// Whether this event is still meaningful given the current state of
    /// `population`: `Redraw` and `EndInfection` are always valid (subject
    /// to the referenced individual still being alive for `EndInfection`);
    /// particle events require every referenced individual to be alive and
    /// at the exact epoch snapshotted when the event was created.
    pub fn is_valid(&self, population: &[Individual]) -> bool {
        match *self {
            Event::Redraw(_) => true,
            Event::Collision { a, b, epoch_a, epoch_b, .. } => {
                let ia = &population[a];
                let ib = &population[b];
                !ia.health.is_dead()
                    && !ib.health.is_dead()
                    && ia.collisions == epoch_a
                    && ib.collisions == epoch_b
            }
            Event::HorizontalWallCollision { i, epoch, .. } | Event::VerticalWallCollision { i, epoch, .. } => {
                let individual = &population[i];
                !individual.health.is_dead() && individual.collisions == epoch
            }
            Event::EndInfection { i, .. } => !population[i].health.is_dead(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::{MASS, RADIUS};
    use crate::individual::Health;

    fn population(n: usize) -> Vec<Individual> {
        (0..n)
            .map(|_| Individual {
                x: 0.0,
                y: 0.0,
                vx: 0.0,
                vy: 0.0,
                radius: RADIUS,
                mass: MASS,
                health: Health::Susceptible,
                collisions: 0,
            })
            .collect()
    }

    #[test]
    fn redraw_is_always_valid() {
        assert!(Event::Redraw(5.0).is_valid(&population(0)));
    }

    #[test]
    fn collision_invalid_after_epoch_mismatch() {
        let mut pop = population(2);
        pop[0].collisions = 1;
        let ev = Event::Collision { time: 1.0, a: 0, b: 1, epoch_a: 0, epoch_b: 0 };
        assert!(!ev.is_valid(&pop));
    }

    #[test]
    fn collision_invalid_if_participant_dead() {
        let mut pop = population(2);
        pop[1].health = Health::Dead;
        let ev = Event::Collision { time: 1.0, a: 0, b: 1, epoch_a: 0, epoch_b: 0 };
        assert!(!ev.is_valid(&pop));
    }

    #[test]
    fn end_infection_invalid_once_dead() {
        let mut pop = population(1);
        let ev = Event::EndInfection { time: 1.0, i: 0 };
        assert!(ev.is_valid(&pop));
        pop[0].health = Health::Dead;
        assert!(!ev.is_valid(&pop));
    }
}
