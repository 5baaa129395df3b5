//! Audio utilities around the SNAC codec
//!
//! - WAV file I/O
//! - Resampling to the codec's native rate

mod io;
pub mod resample;

pub use io::{load_wav, save_wav, Waveform};
pub use resample::{resample, ResampleQuality, Resampler};
