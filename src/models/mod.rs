//! Neural codec models.
//!
//! The token codec in [`crate::codec`] never owns a model. Anything that can
//! turn a waveform into residual codes and back implements [`NeuralCodec`]
//! and is passed in by the caller.

pub mod snac;

use anyhow::Result;
use candle_core::Tensor;

pub use self::snac::{SnacModel, SnacVariant};

/// Waveform <-> residual code transform.
pub trait NeuralCodec {
    /// Native sample rate of the model in Hz.
    fn sample_rate(&self) -> u32;

    /// `[1, 1, T]` f32 audio to one `[1, n_i]` code tensor per level, coarsest first.
    fn encode(&self, audio: &Tensor) -> Result<Vec<Tensor>>;

    /// Per-level `[1, n_i]` codes back to `[1, 1, T]` audio.
    fn decode(&self, codes: &[Tensor]) -> Result<Tensor>;
}
