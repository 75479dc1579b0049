//! Discrete-event simulator of an infectious disease spreading through a
//! population of particles bouncing elastically inside a rectangular
//! arena. This crate is the renderer-agnostic engine only: the GUI
//! front-end lives in `src/bin/gui.rs` behind the `gui` feature and
//! depends on this crate, never the other way around.

pub mod arena;
pub mod config;
pub mod error;
pub mod event;
pub mod event_queue;
pub mod individual;
pub mod renderer;
pub mod rng;
pub mod simulator;
pub mod statistics;

pub use config::Config;
pub use error::{Error, Result};
pub use individual::{Health, Individual};
pub use renderer::{GraphicsContext, NullRenderer, Renderer, Snapshot};
pub use simulator::{CancellationToken, SimOutcome, Simulator};
pub use statistics::{History, Statistics};
