//! Sample-rate conversion with rubato, used to bring arbitrary input audio
//! to the codec's native rate before encoding.

use anyhow::{Context, Result};
use rubato::{
    audioadapter::Adapter, Async, FixedAsync, PolynomialDegree, Resampler as RubatoResampler,
    SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

use super::Waveform;

const CHUNK_SIZE: usize = 1024;

/// Resampling quality preset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResampleQuality {
    /// Cubic polynomial interpolation
    Fast,
    /// Balanced speed and quality (sinc, 128 taps)
    #[default]
    Normal,
    /// Highest quality, slowest (sinc, 256 taps)
    High,
}

/// Mono resampler for [`Waveform`]s.
pub struct Resampler {
    quality: ResampleQuality,
}

impl Resampler {
    /// Create a new resampler
    pub fn new(quality: ResampleQuality) -> Self {
        Self { quality }
    }

    /// Convert `audio` to `target_rate`. Same-rate input is returned as a copy.
    pub fn resample(&self, audio: &Waveform, target_rate: u32) -> Result<Waveform> {
        if audio.sample_rate == target_rate {
            return Ok(audio.clone());
        }

        let ratio = target_rate as f64 / audio.sample_rate as f64;
        let samples = match self.quality {
            ResampleQuality::Fast => {
                let mut resampler = Async::<f32>::new_poly(
                    ratio,
                    1.0,
                    PolynomialDegree::Cubic,
                    CHUNK_SIZE,
                    1,
                    FixedAsync::Input,
                )
                .context("Failed to create polynomial resampler")?;
                process_chunks(&mut resampler, &audio.samples)?
            }
            ResampleQuality::Normal | ResampleQuality::High => {
                let len = if self.quality == ResampleQuality::High {
                    256
                } else {
                    128
                };
                let params = SincInterpolationParameters {
                    sinc_len: len,
                    f_cutoff: 0.95,
                    interpolation: SincInterpolationType::Linear,
                    oversampling_factor: len,
                    window: WindowFunction::BlackmanHarris2,
                };
                let mut resampler = Async::<f32>::new_sinc(
                    ratio,
                    1.0,
                    &params,
                    CHUNK_SIZE,
                    1,
                    FixedAsync::Input,
                )
                .context("Failed to create sinc resampler")?;
                process_chunks(&mut resampler, &audio.samples)?
            }
        };

        tracing::debug!(
            from = audio.sample_rate,
            to = target_rate,
            input = audio.len(),
            output = samples.len(),
            "resampled"
        );
        Ok(Waveform::new(samples, target_rate))
    }
}

impl Default for Resampler {
    fn default() -> Self {
        Self::new(ResampleQuality::Normal)
    }
}

/// Feed fixed-size mono chunks through the resampler, zero-padding the tail.
fn process_chunks<R: RubatoResampler<f32>>(resampler: &mut R, samples: &[f32]) -> Result<Vec<f32>> {
    use audioadapter_buffers::direct::SequentialSliceOfVecs;

    let mut output = Vec::with_capacity(samples.len());
    for chunk in samples.chunks(CHUNK_SIZE) {
        let mut data = chunk.to_vec();
        data.resize(CHUNK_SIZE, 0.0);

        let input_vecs = vec![data];
        let input = SequentialSliceOfVecs::new(&input_vecs, 1, CHUNK_SIZE)
            .context("Failed to create input adapter")?;
        let result = resampler
            .process(&input, 0, None)
            .context("Resampling failed")?;

        output.extend((0..result.frames()).map(|i| result.read_sample(0, i).unwrap_or(0.0)));
    }
    Ok(output)
}

/// Resample with [`ResampleQuality::Normal`].
pub fn resample(audio: &Waveform, target_rate: u32) -> Result<Waveform> {
    Resampler::default().resample(audio, target_rate)
}
