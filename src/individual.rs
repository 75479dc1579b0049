//! A single disk bouncing around the arena, and its epidemic state.

use crate::arena::{self, MASS, RADIUS};
use crate::config::Config;
use crate::rng::Rng;

/// Health state a particle can be in. Transitions are
/// `Susceptible -> Infected -> {Recovered, Dead}`; `Dead` and `Recovered`
/// are both terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Health {
    Susceptible,
    Infected,
    Recovered,
    Dead,
}

impl Health {
    pub fn can_get_infected(self) -> bool {
        matches!(self, Health::Susceptible)
    }

    pub fn is_infected(self) -> bool {
        matches!(self, Health::Infected)
    }

    pub fn is_dead(self) -> bool {
        matches!(self, Health::Dead)
    }
}

/// A particle: position, velocity, and epidemic state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Individual {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub radius: f64,
    pub mass: f64,
    pub health: Health,
    /// Monotonically increasing per-individual collision epoch, used to
    /// detect stale events.
    pub collisions: u64,
}

impl Individual {
    /// A susceptible individual placed uniformly inside the arena walls,
    /// with an independent `Normal(0, velocity_sigma)` velocity per axis.
    pub fn random(rng: &mut Rng, config: &Config) -> Self {
        let x = rng.uniform_f64_range(arena::LEFT + RADIUS, arena::RIGHT - RADIUS);
        let y = rng.uniform_f64_range(arena::TOP + RADIUS, arena::BOTTOM - RADIUS);
        let vx = rng.normal(0.0, config.velocity_sigma);
        let vy = rng.normal(0.0, config.velocity_sigma);
        Self {
            x,
            y,
            vx,
            vy,
            radius: RADIUS,
            mass: MASS,
            health: Health::Susceptible,
            collisions: 0,
        }
    }

    /// Geometric overlap: the distance between centers is less than the
    /// sum of radii.
    pub fn collides_with(&self, other: &Individual) -> bool {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let sigma = self.radius + other.radius;
        dx * dx + dy * dy < sigma * sigma
    }

    /// Advances position by `(vx * dt, vy * dt)`. Dead particles never move.
    pub fn move_by(&mut self, dt: f64) {
        if self.health.is_dead() {
            return;
        }
        self.x += self.vx * dt;
        self.y += self.vy * dt;
    }

    /// Analytic time to elastic disk-disk contact (Sedgewick–Wayne).
    /// Returns `+inf` when no future collision with `other` is predicted.
    pub fn time_to_hit(&self, other: &Individual) -> f64 {
        if self.health.is_dead() || other.health.is_dead() {
            return f64::INFINITY;
        }
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dr_dr = dx * dx + dy * dy;
        let sigma = self.radius + other.radius;
        if dr_dr < sigma * sigma {
            return f64::INFINITY;
        }
        let dvx = other.vx - self.vx;
        let dvy = other.vy - self.vy;
        let dv_dr = dx * dvx + dy * dvy;
        if dv_dr >= 0.0 {
            return f64::INFINITY;
        }
        let dv_dv = dvx * dvx + dvy * dvy;
        if dv_dv == 0.0 {
            return f64::INFINITY;
        }
        let discriminant = dv_dr * dv_dr - dv_dv * (dr_dr - sigma * sigma);
        if discriminant < 0.0 {
            return f64::INFINITY;
        }
        -(dv_dr + discriminant.sqrt()) / dv_dv
    }

    /// Time until this particle's center would cross the left/right wall,
    /// accounting for its radius. `+inf` if stationary on this axis or dead.
    pub fn time_to_hit_vertical_wall(&self) -> f64 {
        if self.health.is_dead() || self.vx == 0.0 {
            return f64::INFINITY;
        }
        if self.vx > 0.0 {
            (arena::RIGHT - self.radius - self.x) / self.vx
        } else {
            (arena::LEFT + self.radius - self.x) / self.vx
        }
    }

    /// Time until this particle's center would cross the top/bottom wall.
    pub fn time_to_hit_horizontal_wall(&self) -> f64 {
        if self.health.is_dead() || self.vy == 0.0 {
            return f64::INFINITY;
        }
        if self.vy > 0.0 {
            (arena::BOTTOM - self.radius - self.y) / self.vy
        } else {
            (arena::TOP + self.radius - self.y) / self.vy
        }
    }

    /// Reflects both velocities about the line of centers, preserving
    /// momentum and kinetic energy. Both particles must be alive; bumps
    /// both `collisions` epochs.
    pub fn bounce_off(&mut self, other: &mut Individual) {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dvx = other.vx - self.vx;
        let dvy = other.vy - self.vy;
        let dv_dr = dx * dvx + dy * dvy;
        let sigma = self.radius + other.radius;

        let j = 2.0 * self.mass * other.mass * dv_dr / ((self.mass + other.mass) * sigma);
        let jx = j * dx / sigma;
        let jy = j * dy / sigma;

        self.vx += jx / self.mass;
        self.vy += jy / self.mass;
        other.vx -= jx / other.mass;
        other.vy -= jy / other.mass;

        self.collisions += 1;
        other.collisions += 1;
    }

    /// Flips the horizontal velocity component and bumps the epoch.
    pub fn bounce_off_vertical_wall(&mut self) {
        self.vx = -self.vx;
        self.collisions += 1;
    }

    /// Flips the vertical velocity component and bumps the epoch.
    pub fn bounce_off_horizontal_wall(&mut self) {
        self.vy = -self.vy;
        self.collisions += 1;
    }

    /// `Susceptible -> Infected`. No-op otherwise.
    pub fn infect(&mut self) {
        if self.health == Health::Susceptible {
            self.health = Health::Infected;
        }
    }

    /// `Infected -> Dead` (if `die`) or `Infected -> Recovered`. Zeroes
    /// velocity on death. No-op if not currently infected.
    pub fn end_infection(&mut self, die: bool) {
        if self.health != Health::Infected {
            return;
        }
        if die {
            self.health = Health::Dead;
            self.vx = 0.0;
            self.vy = 0.0;
        } else {
            self.health = Health::Recovered;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alive(x: f64, y: f64, vx: f64, vy: f64) -> Individual {
        Individual { x, y, vx, vy, radius: RADIUS, mass: MASS, health: Health::Susceptible, collisions: 0 }
    }

    #[test]
    fn head_on_collision_reverses_velocities_and_conserves_energy() {
        let mut a = alive(-10.0, 0.0, 1.0, 0.0);
        let mut b = alive(10.0, 0.0, -1.0, 0.0);
        let ke_before = 0.5 * a.mass * (a.vx * a.vx + a.vy * a.vy)
            + 0.5 * b.mass * (b.vx * b.vx + b.vy * b.vy);
        let p_before = (a.mass * a.vx + b.mass * b.vx, a.mass * a.vy + b.mass * b.vy);

        a.bounce_off(&mut b);

        let ke_after = 0.5 * a.mass * (a.vx * a.vx + a.vy * a.vy)
            + 0.5 * b.mass * (b.vx * b.vx + b.vy * b.vy);
        let p_after = (a.mass * a.vx + b.mass * b.vx, a.mass * a.vy + b.mass * b.vy);

        assert!((ke_before - ke_after).abs() < 1e-9);
        assert!((p_before.0 - p_after.0).abs() < 1e-9);
        assert!((p_before.1 - p_after.1).abs() < 1e-9);
        assert!((a.vx - 1.0).abs() < 1e-9 && (a.vx + 1.0).abs() > 1e-9);
    }

    #[test]
    fn self_pair_never_predicted_to_collide() {
        let a = alive(0.0, 0.0, 1.0, 1.0);
        assert_eq!(a.time_to_hit(&a), f64::INFINITY);
    }

    #[test]
    fn stationary_pair_never_collides() {
        let a = alive(-10.0, 0.0, 0.0, 0.0);
        let b = alive(10.0, 0.0, 0.0, 0.0);
        assert_eq!(a.time_to_hit(&b), f64::INFINITY);
    }

    #[test]
    fn already_touching_pair_never_predicted_to_collide_again() {
        let mut a = alive(-5.0, 0.0, 1.0, 0.0);
        let mut b = alive(5.0, 0.0, -1.0, 0.0);
        a.bounce_off(&mut b);
        assert_eq!(a.time_to_hit(&b), f64::INFINITY);
    }

    #[test]
    fn dead_particle_does_not_move() {
        let mut d = alive(0.0, 0.0, 5.0, 5.0);
        d.health = Health::Dead;
        d.move_by(10.0);
        assert_eq!((d.x, d.y), (0.0, 0.0));
    }

    #[test]
    fn infect_then_die_zeroes_velocity() {
        let mut p = alive(0.0, 0.0, 3.0, -2.0);
        p.infect();
        assert!(p.health.is_infected());
        p.end_infection(true);
        assert!(p.health.is_dead());
        assert_eq!((p.vx, p.vy), (0.0, 0.0));
    }

    #[test]
    fn infect_then_recover_keeps_velocity() {
        let mut p = alive(0.0, 0.0, 3.0, -2.0);
        p.infect();
        p.end_infection(false);
        assert_eq!(p.health, Health::Recovered);
        assert_eq!((p.vx, p.vy), (3.0, -2.0));
    }

    #[test]
    fn time_to_hit_vertical_wall_accounts_for_radius() {
        let p = alive(arena::RIGHT - RADIUS - 10.0, 0.0, 1.0, 0.0);
        let t = p.time_to_hit_vertical_wall();
        assert!((t - 10.0).abs() < 1e-9);
    }
}
