//! Native/web entry point for the `eframe`/`egui` front-end behind the
//! `gui` feature. The simulation core never depends on this file; it
//! only knows about `pandemic::renderer::Renderer`.

use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use eframe::App;
use egui::{Color32, FontId, Grid, Slider, Stroke, Ui, Vec2};

use pandemic::renderer::{GraphicsContext, Renderer};
use pandemic::{CancellationToken, Config, Result, Simulator, Snapshot};

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    tracing_subscriber::fmt::init();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(Vec2 { x: 1100., y: 850. })
            .with_resizable(true),
        ..Default::default()
    };
    eframe::run_native(
        "pandemic",
        native_options,
        Box::new(|_| Ok(Box::new(PandemicApp::default()))),
    )
    .unwrap();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    use eframe::wasm_bindgen::JsCast as _;

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async {
        let document = web_sys::window()
            .expect("No window")
            .document()
            .expect("No document");

        let canvas = document
            .get_element_by_id("the_canvas_id")
            .expect("Failed to find the_canvas_id")
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .expect("the_canvas_id was not a HtmlCanvasElement");

        let start_result = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|_| Ok(Box::new(PandemicApp::default()))),
            )
            .await;

        if let Some(loading_text) = document.get_element_by_id("loading_text") {
            match start_result {
                Ok(_) => {
                    loading_text.remove();
                }
                Err(e) => {
                    loading_text.set_inner_html(
                        "<p> The app has crashed. See the developer console for details. </p>",
                    );
                    panic!("Failed to start eframe: {e:?}");
                }
            }
        }
    });
}

/// A single recorded drawing primitive, with its color/stroke baked in so
/// replay doesn't need the simulator's [`GraphicsContext`] state.
#[derive(Clone)]
enum DrawCommand {
    FillRect { x: f32, y: f32, w: f32, h: f32, color: Color32 },
    DrawRect { x: f32, y: f32, w: f32, h: f32, color: Color32, stroke: f32 },
    DrawString { text: String, x: f32, y: f32, color: Color32 },
    FillCircle { x: f32, y: f32, radius: f32, color: Color32 },
}

/// Implements [`GraphicsContext`] by recording commands instead of
/// painting immediately; the simulation thread builds one of these per
/// `Redraw` and hands it to the UI thread. The simulation thread never
/// touches `egui::Painter` directly.
struct RecordingContext {
    color: [u8; 4],
    stroke: f32,
    commands: Vec<DrawCommand>,
}

impl RecordingContext {
    fn new() -> Self {
        Self { color: [255, 255, 255, 255], stroke: 1.0, commands: Vec::new() }
    }

    fn color32(&self) -> Color32 {
        let [r, g, b, a] = self.color;
        Color32::from_rgba_unmultiplied(r, g, b, a)
    }
}

impl GraphicsContext for RecordingContext {
    fn set_color(&mut self, rgba: [u8; 4]) {
        self.color = rgba;
    }

    fn set_stroke(&mut self, width: f32) {
        self.stroke = width;
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.commands.push(DrawCommand::FillRect { x, y, w, h, color: self.color32() });
    }

    fn draw_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.commands.push(DrawCommand::DrawRect {
            x,
            y,
            w,
            h,
            color: self.color32(),
            stroke: self.stroke,
        });
    }

    fn draw_string(&mut self, text: &str, x: f32, y: f32) {
        self.commands.push(DrawCommand::DrawString { text: text.to_string(), x, y, color: self.color32() });
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32) {
        self.commands.push(DrawCommand::FillCircle { x, y, radius, color: self.color32() });
    }
}

/// What the UI thread actually reads: the last `Redraw`'s snapshot plus
/// the recorded commands to replay against an `egui::Painter`.
struct PublishedFrame {
    snapshot: Snapshot,
    commands: Vec<DrawCommand>,
}

/// A [`Renderer`] that publishes a [`PublishedFrame`] into a shared slot
/// and requests a repaint, rather than painting itself. The simulation
/// thread exclusively owns `Individual` state; the UI thread only ever
/// reads the most recently published snapshot.
struct EguiRenderer {
    ctx: egui::Context,
    shared: Arc<Mutex<Option<PublishedFrame>>>,
}

impl Renderer for EguiRenderer {
    fn draw_with(
        &mut self,
        snapshot: &Snapshot,
        procedure: &mut dyn FnMut(&Snapshot, &mut dyn GraphicsContext),
    ) -> Result<()> {
        let mut recording = RecordingContext::new();
        procedure(snapshot, &mut recording);
        *self.shared.lock().unwrap() =
            Some(PublishedFrame { snapshot: snapshot.clone(), commands: recording.commands });
        self.ctx.request_repaint();
        Ok(())
    }
}

struct PandemicApp {
    seed: u64,
    hz: u32,
    population_sz: usize,
    velocity_sigma: f64,
    time_limit: f64,
    prob_infection: f64,
    prob_dying: f64,
    time_infectious: f64,

    shared: Arc<Mutex<Option<PublishedFrame>>>,
    cancel: Option<CancellationToken>,
    worker: Option<JoinHandle<()>>,
    error: Arc<Mutex<Option<String>>>,
}

impl Default for PandemicApp {
    fn default() -> Self {
        let defaults = Config::default();
        Self {
            seed: defaults.seed,
            hz: defaults.hz,
            population_sz: defaults.population_sz,
            velocity_sigma: defaults.velocity_sigma,
            time_limit: defaults.time_limit,
            prob_infection: defaults.prob_infection,
            prob_dying: defaults.prob_dying,
            time_infectious: defaults.time_infectious,
            shared: Arc::new(Mutex::new(None)),
            cancel: None,
            worker: None,
            error: Arc::new(Mutex::new(None)),
        }
    }
}

impl PandemicApp {
    fn config(&self) -> Config {
        Config {
            seed: self.seed,
            hz: self.hz,
            population_sz: self.population_sz,
            velocity_sigma: self.velocity_sigma,
            time_limit: self.time_limit,
            prob_infection: self.prob_infection,
            prob_dying: self.prob_dying,
            time_infectious: self.time_infectious,
        }
    }

    fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Joins the previous worker (if any) after flipping its cancellation
    /// token. Must complete before a fresh `simulate` call starts.
    fn stop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }

    fn reset(&mut self) {
        self.stop();
        *self.shared.lock().unwrap() = None;
        *self.error.lock().unwrap() = None;
    }

    fn start(&mut self, ctx: &egui::Context) {
        self.stop();
        *self.error.lock().unwrap() = None;
        *self.shared.lock().unwrap() = None;

        let config = self.config();
        let cancel = CancellationToken::new();
        self.cancel = Some(cancel.clone());

        let shared = Arc::clone(&self.shared);
        let error = Arc::clone(&self.error);
        let egui_ctx = ctx.clone();

        self.worker = Some(std::thread::spawn(move || match Simulator::new(config) {
            Ok(mut sim) => {
                let mut renderer = EguiRenderer { ctx: egui_ctx.clone(), shared };
                if let Err(err) = sim.simulate(&mut renderer, &cancel) {
                    *error.lock().unwrap() = Some(err.to_string());
                    egui_ctx.request_repaint();
                }
            }
            Err(err) => {
                *error.lock().unwrap() = Some(err.to_string());
                egui_ctx.request_repaint();
            }
        }));
    }

    fn controls_ui(&mut self, ui: &mut Ui) {
        ui.heading("Controls");
        let running = self.is_running();
        Grid::new("playback_keys").show(ui, |ui| {
            ui.add_enabled_ui(!running, |ui| {
                if ui.button("▶ Start").clicked() {
                    self.start(ui.ctx());
                }
            });
            if ui.add_enabled(running, egui::Button::new("■ Stop")).clicked() {
                self.stop();
            }
            if ui.button("⟳ Reset").clicked() {
                self.reset();
            }
        });
        ui.add_space(15.);

        ui.add_enabled_ui(!running, |ui| {
            ui.heading("Configuration");
            ui.add(Slider::new(&mut self.seed, 0..=1000).text("Seed"));
            ui.add(Slider::new(&mut self.hz, 0..=60).text("Redraw Hz"));
            ui.add(Slider::new(&mut self.population_sz, 0..=1500).text("Population"));
            ui.add(Slider::new(&mut self.velocity_sigma, 0.0..=100.0).text("Velocity sigma"));
            ui.add(Slider::new(&mut self.time_limit, 0.0..=10_000.0).text("Time limit"));
            ui.add(Slider::new(&mut self.prob_infection, 0.0..=1.0).text("P(infection)"));
            ui.add(Slider::new(&mut self.prob_dying, 0.0..=1.0).text("P(dying)"));
            ui.add(Slider::new(&mut self.time_infectious, 0.0..=100.0).text("Infectious duration"));
        });
        ui.add_space(15.);

        if let Some(err) = self.error.lock().unwrap().as_ref() {
            ui.colored_label(Color32::from_rgb(255, 100, 100), err);
            ui.add_space(10.);
        }

        let frame = self.shared.lock().unwrap();
        if let Some(frame) = frame.as_ref() {
            let stats = &frame.snapshot.statistics;
            ui.label(format!("Time: {:.1}", frame.snapshot.time));
            ui.label(format!("Susceptible: {}", stats.susceptible));
            ui.label(format!("Infected: {}", stats.infected));
            ui.label(format!("Recovered: {}", stats.recovered));
            ui.label(format!("Dead: {}", stats.dead));
        } else {
            ui.label("Press Start to begin a run.");
        }
    }
}

impl App for PandemicApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::SidePanel::left("params").exact_width(260.).show(ctx, |ui| {
            self.controls_ui(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let rect = ui.available_rect_before_wrap();
            let painter = ui.painter_at(rect);
            let frame = self.shared.lock().unwrap();
            if let Some(frame) = frame.as_ref() {
                paint_commands(&painter, rect, &frame.commands);
            }
        });
    }
}

/// Replays a recorded command list against `rect`, translating so the
/// arena center sits at `rect.center()` and scaling to fit the panel.
fn paint_commands(painter: &egui::Painter, rect: egui::Rect, commands: &[DrawCommand]) {
    let scale = (rect.width() / pandemic::arena::WIDTH as f32)
        .min(rect.height() / pandemic::arena::HEIGHT as f32)
        * 0.9;
    let origin = rect.center();
    let to_screen = |x: f32, y: f32| egui::Pos2::new(origin.x + x * scale, origin.y + y * scale);

    for command in commands {
        match command {
            DrawCommand::FillRect { x, y, w, h, color } => {
                let min = to_screen(*x, *y);
                let max = to_screen(*x + *w, *y + *h);
                painter.rect_filled(egui::Rect::from_two_pos(min, max), 0.0, *color);
            }
            DrawCommand::DrawRect { x, y, w, h, color, stroke } => {
                let min = to_screen(*x, *y);
                let max = to_screen(*x + *w, *y + *h);
                painter.rect_stroke(
                    egui::Rect::from_two_pos(min, max),
                    0.0,
                    Stroke::new(*stroke, *color),
                    egui::StrokeKind::Inside,
                );
            }
            DrawCommand::DrawString { text, x, y, color } => {
                painter.text(to_screen(*x, *y), egui::Align2::LEFT_TOP, text, FontId::monospace(12.0), *color);
            }
            DrawCommand::FillCircle { x, y, radius, color } => {
                painter.circle_filled(to_screen(*x, *y), (*radius * scale).max(1.0), *color);
            }
        }
    }
}
