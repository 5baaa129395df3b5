//! Audio <-> token string adapters.
//!
//! [`SnacEncoder`] and [`SnacDecoder`] bind a caller-owned [`NeuralCodec`]
//! and [`Device`] to the pure functions in [`crate::codec`]. Both are borrowed
//! for the adapter's lifetime and never mutated, so one loaded model can serve
//! any number of adapters.

use anyhow::{Context, Result};
use candle_core::Device;
use std::path::Path;

use crate::audio::{load_wav, ResampleQuality, Resampler, Waveform};
use crate::codec::{self, CodeHierarchy};
use crate::models::NeuralCodec;

/// Waveform -> residual codes -> token string.
pub struct SnacEncoder<'a, C: NeuralCodec> {
    codec: &'a C,
    device: &'a Device,
    resampler: Resampler,
}

impl<'a, C: NeuralCodec> SnacEncoder<'a, C> {
    /// Bind a codec and device; input is resampled with [`ResampleQuality::Normal`].
    pub fn new(codec: &'a C, device: &'a Device) -> Self {
        Self {
            codec,
            device,
            resampler: Resampler::default(),
        }
    }

    /// Resampling quality used when input audio is not at the codec rate.
    pub fn with_resample_quality(mut self, quality: ResampleQuality) -> Self {
        self.resampler = Resampler::new(quality);
        self
    }

    /// Encode audio, resampling to the codec's native rate first.
    pub fn encode_waveform(&self, audio: &Waveform) -> Result<CodeHierarchy> {
        let audio = self.resampler.resample(audio, self.codec.sample_rate())?;
        let input = audio.to_codec_input(self.device)?;
        let codes = self.codec.encode(&input).context("Codec encode failed")?;
        let hierarchy = CodeHierarchy::from_tensors(&codes)?;

        tracing::debug!(
            levels = hierarchy.num_levels(),
            frames = hierarchy.num_frames(),
            "encoded waveform"
        );
        Ok(hierarchy)
    }

    /// Load a WAV file and encode it.
    pub fn encode_to_tokens<P: AsRef<Path>>(&self, path: P) -> Result<CodeHierarchy> {
        let path = path.as_ref();
        let audio = load_wav(path)?;
        self.encode_waveform(&audio)
            .with_context(|| format!("Failed to encode {}", path.display()))
    }

    /// Flatten encoded codes to the stored token string.
    pub fn make_snac_tokens(&self, hierarchy: &CodeHierarchy) -> String {
        codec::flatten_to_string(hierarchy)
    }

    /// WAV file straight to token string.
    pub fn encode_file<P: AsRef<Path>>(&self, path: P) -> Result<String> {
        let hierarchy = self.encode_to_tokens(path)?;
        Ok(self.make_snac_tokens(&hierarchy))
    }
}

/// Token string -> residual codes -> waveform.
pub struct SnacDecoder<'a, C: NeuralCodec> {
    codec: &'a C,
    device: &'a Device,
}

impl<'a, C: NeuralCodec> SnacDecoder<'a, C> {
    /// Bind a codec and device.
    pub fn new(codec: &'a C, device: &'a Device) -> Self {
        Self { codec, device }
    }

    /// Split a stored token string, see [`codec::parse_snac_tokens`].
    pub fn parse_snac_tokens<'s>(&self, input: &'s str) -> Vec<&'s str> {
        codec::parse_snac_tokens(input)
    }

    /// Run the codec decoder on an already validated hierarchy.
    pub fn decode_hierarchy(&self, hierarchy: &CodeHierarchy) -> Result<Waveform> {
        let codes = hierarchy.to_tensors(self.device)?;
        let audio = self.codec.decode(&codes).context("Codec decode failed")?;
        Waveform::from_tensor(&audio, self.codec.sample_rate())
    }

    /// Reconstruct the hierarchy from tokens, then decode it.
    ///
    /// Token errors surface as a [`crate::CodecError`] inside the `anyhow` chain.
    pub fn decode_tokens<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Waveform> {
        let hierarchy = codec::reconstruct(tokens)?;
        self.decode_hierarchy(&hierarchy)
    }

    pub fn decode_str(&self, input: &str) -> Result<Waveform> {
        self.decode_tokens(&self.parse_snac_tokens(input))
    }

    /// Decode and write a WAV file at the codec's sample rate.
    pub fn decode_to_audio<S: AsRef<str>, P: AsRef<Path>>(
        &self,
        tokens: &[S],
        output_path: P,
    ) -> Result<Waveform> {
        let output_path = output_path.as_ref();
        let audio = self.decode_tokens(tokens)?;
        audio.save(output_path)?;
        tracing::info!(
            path = %output_path.display(),
            seconds = audio.duration(),
            "wrote decoded audio"
        );
        Ok(audio)
    }
}
