//! Language-model side helpers: vocabulary layout and delayed parallel streams.
//!
//! A speech LM that emits SNAC audio predicts seven token streams in parallel
//! (one per frame position of a 3-level hierarchy), each shifted into its own
//! window of the LM vocabulary and delayed by one step relative to the
//! previous stream.

use super::layout::{Levels, FRAME_DELIMITER};
use crate::error::{CodecError, ShapeError};

/// Audio vocabulary constants for the LM token space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnacVocab {
    pub audio_vocab_size: i64,
    pub padded_vocab_size: i64,
    pub end_of_audio: i64,
    /// Offset of the first audio window in the LM vocabulary
    pub shift: i64,
}

impl Default for SnacVocab {
    fn default() -> Self {
        Self {
            audio_vocab_size: 4096,
            padded_vocab_size: 4160,
            end_of_audio: 4097,
            shift: 152000,
        }
    }
}

impl SnacVocab {
    /// Map a code on `layer` into the LM vocabulary.
    pub fn layershift(&self, code: i64, layer: usize) -> i64 {
        layershift_with(code, layer, self.padded_vocab_size, self.shift)
    }

    /// Inverse of [`layershift`](Self::layershift); `None` outside the layer window.
    pub fn unshift(&self, token: i64, layer: usize) -> Option<i64> {
        let code = token - self.shift - layer as i64 * self.padded_vocab_size;
        (0..self.padded_vocab_size).contains(&code).then_some(code)
    }
}

/// `code + shift + layer * stride`
pub fn layershift_with(code: i64, layer: usize, stride: i64, shift: i64) -> i64 {
    code + shift + layer as i64 * stride
}

/// [`SnacVocab::layershift`] with the default vocabulary.
pub fn layershift(code: i64, layer: usize) -> i64 {
    SnacVocab::default().layershift(code, layer)
}

/// Turn delayed per-position streams into a flat `#`-delimited token stream.
///
/// Accepts 7 audio streams, or 8 when a trailing text stream is attached
/// (it is ignored). Stream `i` starts `i + 1` steps late; those leading
/// entries are dropped. The last audio stream determines the frame count.
pub fn frames_from_delayed_streams<S: AsRef<str>>(
    streams: &[Vec<S>],
) -> Result<Vec<String>, CodecError> {
    let width = Levels::Three.frame_width();
    let audio = match streams.len() {
        n if n == width => streams,
        n if n == width + 1 => &streams[..width],
        found => {
            return Err(ShapeError::StreamCount {
                expected: width,
                found,
            }
            .into())
        }
    };

    let trimmed: Vec<&[S]> = audio
        .iter()
        .enumerate()
        .map(|(i, stream)| stream.get(i + 1..).unwrap_or(&[]))
        .collect();
    let num_frames = trimmed[width - 1].len();

    for (stream, values) in trimmed.iter().enumerate() {
        if values.len() < num_frames {
            return Err(ShapeError::StreamTooShort {
                stream,
                expected: num_frames,
                found: values.len(),
            }
            .into());
        }
    }

    let mut out = Vec::with_capacity(num_frames * (width + 1));
    for frame in 0..num_frames {
        out.push(FRAME_DELIMITER.to_string());
        out.extend(trimmed.iter().map(|s| s[frame].as_ref().to_string()));
    }
    Ok(out)
}
