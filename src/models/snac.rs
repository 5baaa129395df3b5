//! SNAC neural audio codec backed by `candle-transformers`.

use anyhow::{Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::snac;
use std::path::Path;

use super::NeuralCodec;

/// Published SNAC checkpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnacVariant {
    /// 24 kHz speech model, 3 levels
    Speech24k,
    /// 32 kHz general audio model, 4 levels
    Music32k,
    /// 44.1 kHz general audio model, 4 levels
    Music44k,
}

impl SnacVariant {
    /// HuggingFace repo holding the upstream `config.json`.
    pub fn config_repo(self) -> &'static str {
        match self {
            Self::Speech24k => "hubertsiuzdak/snac_24khz",
            Self::Music32k => "hubertsiuzdak/snac_32khz",
            Self::Music44k => "hubertsiuzdak/snac_44khz",
        }
    }

    /// File name of the safetensors export.
    pub fn weights_file(self) -> &'static str {
        match self {
            Self::Speech24k => "snac_24khz.safetensors",
            Self::Music32k => "snac_32khz.safetensors",
            Self::Music44k => "snac_44khz.safetensors",
        }
    }

    /// Native sample rate in Hz.
    pub fn sample_rate(self) -> u32 {
        match self {
            Self::Speech24k => 24000,
            Self::Music32k => 32000,
            Self::Music44k => 44100,
        }
    }

    /// Number of residual levels the variant produces.
    pub fn num_levels(self) -> usize {
        match self {
            Self::Speech24k => 3,
            Self::Music32k | Self::Music44k => 4,
        }
    }
}

/// A loaded SNAC model.
pub struct SnacModel {
    model: snac::Model,
    config: snac::Config,
}

impl SnacModel {
    /// Load from a local `config.json` and safetensors weights.
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(
        config_path: P,
        weights_path: Q,
        device: &Device,
    ) -> Result<Self> {
        let config_path = config_path.as_ref();
        let weights_path = weights_path.as_ref();

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
        let config: snac::Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        let weights = candle_core::safetensors::load(weights_path, device)
            .with_context(|| format!("Failed to load weights from {}", weights_path.display()))?;
        let vb = VarBuilder::from_tensors(weights, DType::F32, device);
        let model = snac::Model::new(&config, vb).context("Failed to build SNAC model")?;

        tracing::info!(
            sample_rate = config.sampling_rate,
            levels = config.vq_strides.len(),
            device = %crate::device_info(device),
            "Loaded SNAC model"
        );

        Ok(Self { model, config })
    }

    /// Download and load a published checkpoint.
    #[cfg(feature = "hub")]
    pub fn from_hub(variant: SnacVariant, device: &Device) -> Result<Self> {
        let paths = crate::hub::SnacPaths::download(variant)?;
        Self::load(&paths.config, &paths.weights, device)
    }

    /// Parsed model configuration.
    pub fn config(&self) -> &snac::Config {
        &self.config
    }

    /// Number of residual levels, one per VQ stride.
    pub fn num_levels(&self) -> usize {
        self.config.vq_strides.len()
    }
}

impl NeuralCodec for SnacModel {
    fn sample_rate(&self) -> u32 {
        self.config.sampling_rate as u32
    }

    fn encode(&self, audio: &Tensor) -> Result<Vec<Tensor>> {
        Ok(self.model.encode(audio)?)
    }

    fn decode(&self, codes: &[Tensor]) -> Result<Tensor> {
        let refs: Vec<&Tensor> = codes.iter().collect();
        Ok(self.model.decode(&refs)?)
    }
}
