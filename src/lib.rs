//! # snac-tokens
//!
//! Speech training data tooling around the [SNAC](https://github.com/hubertsiuzdak/snac)
//! multi-scale neural audio codec.
//!
//! SNAC encodes audio into a hierarchy of residual code sequences, where
//! level `i` carries `2^i` codes per frame. Speech datasets store that
//! hierarchy as a single space-separated text field:
//!
//! ```text
//! # 10 1 3 7 8 4 9 10 2 5 11 12 6 13 14 # ...
//! ```
//!
//! Each `#` opens a frame, followed by 7 values (3 levels) or 15 values
//! (4 levels) in a fixed interleave order.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use snac_tokens::{auto_device, SnacDecoder, SnacEncoder, SnacModel};
//!
//! let device = auto_device()?;
//! let model = SnacModel::load("snac_24khz/config.json", "snac_24khz.safetensors", &device)?;
//!
//! // Audio -> token string
//! let tokens = SnacEncoder::new(&model, &device).encode_file("answer.wav")?;
//!
//! // Token string -> audio
//! let decoder = SnacDecoder::new(&model, &device);
//! decoder.decode_to_audio(&decoder.parse_snac_tokens(&tokens), "decoded.wav")?;
//! ```
//!
//! The token layer itself has no model dependency:
//!
//! ```rust
//! use snac_tokens::codec::{make_snac_tokens, reconstruct_str};
//!
//! let text = make_snac_tokens(vec![vec![0], vec![1, 2], vec![3, 4, 5, 6]]).unwrap();
//! assert_eq!(text, "# 0 1 3 4 2 5 6");
//! assert_eq!(reconstruct_str(&text).unwrap().level(2).unwrap(), &[3, 4, 5, 6]);
//! ```
//!
//! ## Layout
//!
//! - [`codec`]: interleave table, flattener, reconstructor (pure functions)
//! - [`models`]: the [`NeuralCodec`] seam and the candle SNAC implementation
//! - [`transcode`]: encoder/decoder adapters binding a model and a device
//! - [`audio`]: WAV I/O and resampling
//! - [`dataset`], [`batch`]: record access and per-record failure isolation

pub mod audio;
pub mod batch;
pub mod codec;
pub mod dataset;
pub mod error;
#[cfg(feature = "hub")]
pub mod hub;
pub mod models;
pub mod transcode;

use anyhow::Result;
use candle_core::Device;

pub use audio::Waveform;
pub use codec::{CodeHierarchy, Levels};
pub use error::{CodecError, ErrorKind, FormatError, RecordError, ShapeError};
#[cfg(feature = "hub")]
pub use hub::SnacPaths;
pub use models::{NeuralCodec, SnacModel, SnacVariant};
pub use transcode::{SnacDecoder, SnacEncoder};

/// Select the best available device for inference.
///
/// Prefers CUDA, then Metal, falling back to CPU, depending on which
/// backends were compiled in (`cuda` / `metal` features).
pub fn auto_device() -> Result<Device> {
    #[cfg(feature = "cuda")]
    {
        if let Ok(device) = Device::cuda_if_available(0) {
            if device.is_cuda() {
                tracing::info!("Using CUDA device");
                return Ok(device);
            }
        }
    }

    #[cfg(feature = "metal")]
    {
        if let Ok(device) = Device::new_metal(0) {
            tracing::info!("Using Metal device");
            return Ok(device);
        }
    }

    tracing::info!("Using CPU device");
    Ok(Device::Cpu)
}

/// Human-readable label for a [`Device`].
pub fn device_info(device: &Device) -> String {
    match device {
        Device::Cpu => "CPU".to_string(),
        Device::Cuda(_) => "CUDA".to_string(),
        Device::Metal(_) => "Metal".to_string(),
    }
}
