//! WAV loading/saving and the waveform type handed to the codec.

use anyhow::{Context, Result};
use candle_core::{Device, Tensor};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::Path;

/// Mono waveform, samples in \[-1.0, 1.0\].
#[derive(Debug, Clone)]
pub struct Waveform {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl Waveform {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Build from codec output of any shape (`[1, 1, T]`, `[1, T]`, `[T]`).
    pub fn from_tensor(tensor: &Tensor, sample_rate: u32) -> Result<Self> {
        let samples: Vec<f32> = tensor.flatten_all()?.to_vec1()?;
        Ok(Self::new(samples, sample_rate))
    }

    /// Codec input layout: `[batch=1, channels=1, samples]`.
    pub fn to_codec_input(&self, device: &Device) -> Result<Tensor> {
        let n = self.samples.len();
        Ok(Tensor::from_slice(self.samples.as_slice(), (1, 1, n), device)?)
    }

    /// Duration in seconds
    pub fn duration(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Write as 16-bit mono WAV.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        save_wav(path, &self.samples, self.sample_rate)
    }

    /// Read a WAV file, downmixing to mono.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        load_wav(path)
    }
}

/// Load a WAV file, averaging channels down to mono.
pub fn load_wav<P: AsRef<Path>>(path: P) -> Result<Waveform> {
    let path = path.as_ref();
    let reader = WavReader::open(path)
        .with_context(|| format!("Failed to open WAV file: {}", path.display()))?;

    let spec = reader.spec();
    let channels = spec.channels as usize;

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    let samples = if channels > 1 {
        interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    } else {
        interleaved
    };

    tracing::debug!(
        path = %path.display(),
        sample_rate = spec.sample_rate,
        channels,
        samples = samples.len(),
        "loaded WAV"
    );

    Ok(Waveform::new(samples, spec.sample_rate))
}

/// Write mono 16-bit PCM.
pub fn save_wav<P: AsRef<Path>>(path: P, samples: &[f32], sample_rate: u32) -> Result<()> {
    let path = path.as_ref();
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create WAV file: {}", path.display()))?;

    for &sample in samples {
        writer.write_sample((sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)?;
    }

    writer
        .finalize()
        .with_context(|| format!("Failed to finalize WAV file: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_waveform_duration() {
        let wave = Waveform::new(vec![0.0; 48000], 24000);
        assert!((wave.duration() - 2.0).abs() < 1e-6);
        assert_eq!(wave.len(), 48000);
        assert!(!wave.is_empty());
        assert!(Waveform::new(vec![], 24000).is_empty());
    }

    #[test]
    fn test_to_codec_input_shape() {
        let wave = Waveform::new(vec![0.1, 0.2, 0.3], 24000);
        let tensor = wave.to_codec_input(&Device::Cpu).unwrap();
        assert_eq!(tensor.dims(), &[1, 1, 3]);
    }

    #[test]
    fn test_from_tensor_flattens() {
        let device = Device::Cpu;
        let tensor = Tensor::new(&[[[0.1f32, 0.2, 0.3, 0.4]]], &device).unwrap();
        let wave = Waveform::from_tensor(&tensor, 32000).unwrap();
        assert_eq!(wave.samples.len(), 4);
        assert_eq!(wave.sample_rate, 32000);
    }

    #[test]
    fn test_save_and_load_wav() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("roundtrip.wav");

        let original = Waveform::new(vec![0.1, -0.2, 0.3, -0.4, 0.5], 24000);
        original.save(&path).unwrap();

        let loaded = Waveform::load(&path).unwrap();
        assert_eq!(loaded.sample_rate, 24000);
        assert_eq!(loaded.len(), 5);
        for (a, b) in original.samples.iter().zip(loaded.samples.iter()) {
            assert!((a - b).abs() < 1e-4, "sample mismatch: {a} vs {b}");
        }
    }

    #[test]
    fn test_load_stereo_downmix() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        let spec = WavSpec {
            channels: 2,
            sample_rate: 16000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for (l, r) in [(0.2f32, 0.4f32), (-1.0, 1.0)] {
            writer.write_sample(l).unwrap();
            writer.write_sample(r).unwrap();
        }
        writer.finalize().unwrap();

        let wave = load_wav(&path).unwrap();
        assert_eq!(wave.sample_rate, 16000);
        assert_eq!(wave.len(), 2);
        assert!((wave.samples[0] - 0.3).abs() < 1e-6);
        assert!(wave.samples[1].abs() < 1e-6);
    }

    #[test]
    fn test_save_clamps() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("clamp.wav");
        save_wav(&path, &[2.0, -2.0], 24000).unwrap();
        let wave = load_wav(&path).unwrap();
        assert!(wave.samples[0] <= 1.0 && wave.samples[0] > 0.99);
        assert!(wave.samples[1] >= -1.0 && wave.samples[1] < -0.99);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(load_wav("/nonexistent/input.wav").is_err());
    }
}
