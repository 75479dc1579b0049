//! Error types surfaced by the simulation core.

/// Everything that can go wrong building or running a [`crate::Simulator`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A [`crate::Config`] field was outside its documented range.
    #[error("configuration parameter out of range: {0}")]
    Config(String),

    /// Rejection sampling could not place the population without overlap.
    #[error("failed to place population of {population_sz} without overlap after {attempts} attempts")]
    Init { population_sz: usize, attempts: u32 },

    /// The renderer's draw callback raised. Non-fatal: the caller logs and
    /// continues (spec 4.6 / 4.7 redraw handling).
    #[error("renderer callback failed: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, Error>;
