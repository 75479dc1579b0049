//! The boundary between the simulation core and a GUI front-end. The
//! core never depends on a concrete windowing toolkit; it only knows
//! how to hand a draw procedure to something implementing [`Renderer`].

use crate::arena;
use crate::error::Result;
use crate::individual::Health;
use crate::statistics::{History, Statistics};

/// RGBA fill colors per health state.
pub mod colors {
    pub const SUSCEPTIBLE: [u8; 4] = [0, 0, 220, 255];
    pub const INFECTED: [u8; 4] = [255, 0, 0, 255];
    pub const RECOVERED: [u8; 4] = [0, 200, 0, 255];
    pub const DEAD: [u8; 4] = [50, 50, 50, 255];
    pub const BORDER: [u8; 4] = [200, 200, 200, 255];
    pub const TEXT: [u8; 4] = [230, 230, 230, 255];
}

fn color_for(health: Health) -> [u8; 4] {
    match health {
        Health::Susceptible => colors::SUSCEPTIBLE,
        Health::Infected => colors::INFECTED,
        Health::Recovered => colors::RECOVERED,
        Health::Dead => colors::DEAD,
    }
}

/// An immutable snapshot of everything a redraw needs to paint, published
/// once per `Redraw` event. The UI thread never reads live `Individual`
/// state directly, only the most recently published snapshot.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub time: f64,
    /// `(x, y, health)` for every individual, positions already cast to
    /// `f32` for painting.
    pub individuals: Vec<(f32, f32, Health)>,
    pub statistics: Statistics,
    pub history: History,
}

/// 2D drawing surface a [`Renderer`] hands to the simulator's draw
/// procedure. Mirrors the primitives an `egui::Painter` exposes,
/// generalized to an abstract boundary.
pub trait GraphicsContext {
    fn set_color(&mut self, rgba: [u8; 4]);
    fn set_stroke(&mut self, width: f32);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn draw_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn draw_string(&mut self, text: &str, x: f32, y: f32);
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32);
}

/// External collaborator the simulator paints through. Implementations
/// (e.g. an `eframe`/`egui` app) translate the coordinate system so
/// `(0, 0)` is the arena center and scale by a user-chosen factor.
pub trait Renderer {
    /// Registers `procedure` as the current draw callback and triggers a
    /// repaint. The procedure runs against a [`GraphicsContext`] whose
    /// origin is the arena center. An `Err` surfaces as [`crate::Error::Render`];
    /// the simulator treats it as non-fatal and dispatches on.
    fn draw_with(
        &mut self,
        snapshot: &Snapshot,
        procedure: &mut dyn FnMut(&Snapshot, &mut dyn GraphicsContext),
    ) -> Result<()>;
}

/// A [`Renderer`] that does nothing; useful for headless runs (tests,
/// `Hz = 0`, `population_sz = 0`) where no front-end is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn draw_with(
        &mut self,
        _snapshot: &Snapshot,
        _procedure: &mut dyn FnMut(&Snapshot, &mut dyn GraphicsContext),
    ) -> Result<()> {
        Ok(())
    }
}

/// The draw procedure the simulator hands to every [`Renderer::draw_with`]
/// call: arena border, every individual colored by health, a statistics
/// readout, and the infected/non-infected history scatter.
pub fn paint_frame(snapshot: &Snapshot, gc: &mut dyn GraphicsContext) {
    gc.set_color(colors::BORDER);
    gc.set_stroke(1.0);
    gc.draw_rect(
        arena::LEFT as f32,
        arena::TOP as f32,
        arena::WIDTH as f32,
        arena::HEIGHT as f32,
    );

    for &(x, y, health) in &snapshot.individuals {
        gc.set_color(color_for(health));
        gc.fill_circle(x, y, arena::RADIUS as f32);
    }

    paint_history(snapshot, gc);

    gc.set_color(colors::TEXT);
    let stats = &snapshot.statistics;
    gc.draw_string(
        &format!(
            "t={:.1}  susceptible={} infected={} recovered={} dead={}",
            snapshot.time, stats.susceptible, stats.infected, stats.recovered, stats.dead
        ),
        arena::LEFT as f32,
        (arena::TOP - 20.0) as f32,
    );
}

/// Paints the infected/non-infected percentage series as two point
/// scatters beneath the arena, one sample per history slot.
fn paint_history(snapshot: &Snapshot, gc: &mut dyn GraphicsContext) {
    let history = &snapshot.history;
    if history.is_empty() {
        return;
    }
    let chart_top = (arena::BOTTOM + 30.0) as f32;
    let chart_width = arena::WIDTH as f32;
    let chart_height = 80.0_f32;
    let n = history.len() as f32;

    for (i, &pct) in history.percent_infected.iter().enumerate() {
        let x = arena::LEFT as f32 + (i as f32 / n) * chart_width;
        let y = chart_top + chart_height * (1.0 - pct as f32 / 100.0);
        gc.set_color(colors::INFECTED);
        gc.fill_circle(x, y, 1.5);
    }
    for (i, &pct) in history.percent_non_infected.iter().enumerate() {
        let x = arena::LEFT as f32 + (i as f32 / n) * chart_width;
        let y = chart_top + chart_height * (1.0 - pct as f32 / 100.0);
        gc.set_color(colors::SUSCEPTIBLE);
        gc.fill_circle(x, y, 1.5);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_renderer_never_invokes_the_procedure() {
        let mut renderer = NullRenderer;
        let snapshot = Snapshot {
            time: 0.0,
            individuals: vec![],
            statistics: Statistics::default(),
            history: History::new(),
        };
        let mut called = false;
        renderer.draw_with(&snapshot, &mut |_, _| called = true).unwrap();
        assert!(!called);
    }

    #[derive(Default)]
    struct RecordingContext {
        circles: usize,
        strings: usize,
    }

    impl GraphicsContext for RecordingContext {
        fn set_color(&mut self, _rgba: [u8; 4]) {}
        fn set_stroke(&mut self, _width: f32) {}
        fn fill_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32) {}
        fn draw_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32) {}
        fn draw_string(&mut self, _text: &str, _x: f32, _y: f32) {
            self.strings += 1;
        }
        fn fill_circle(&mut self, _x: f32, _y: f32, _radius: f32) {
            self.circles += 1;
        }
    }

    #[test]
    fn paint_frame_draws_one_circle_per_individual_plus_stats_text() {
        let mut history = History::new();
        history.record(0.0, &Statistics { susceptible: 1, infected: 1, recovered: 0, dead: 0 });
        let snapshot = Snapshot {
            time: 0.0,
            individuals: vec![(0.0, 0.0, Health::Susceptible), (10.0, 10.0, Health::Infected)],
            statistics: Statistics { susceptible: 1, infected: 1, recovered: 0, dead: 0 },
            history,
        };
        let mut ctx = RecordingContext::default();
        paint_frame(&snapshot, &mut ctx);
        assert!(ctx.circles >= snapshot.individuals.len());
        assert_eq!(ctx.strings, 1);
    }
}
