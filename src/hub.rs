//! HuggingFace Hub integration for downloading SNAC checkpoints.
//!
//! Enable with the `hub` feature.
//!
//! # Example
//!
//! ```rust,ignore
//! use snac_tokens::{hub::SnacPaths, SnacVariant};
//!
//! let paths = SnacPaths::download(SnacVariant::Speech24k)?;
//! let model = SnacModel::load(&paths.config, &paths.weights, &device)?;
//! ```

use anyhow::{Context, Result};
use hf_hub::api::sync::Api;
use std::path::PathBuf;

use crate::models::SnacVariant;

/// Repo holding safetensors exports of every SNAC variant.
pub const WEIGHTS_REPO: &str = "lmz/candle-snac";

/// Paths to downloaded model files.
#[derive(Debug, Clone)]
pub struct SnacPaths {
    pub config: PathBuf,
    pub weights: PathBuf,
}

impl SnacPaths {
    /// Download config and weights into the HuggingFace cache.
    pub fn download(variant: SnacVariant) -> Result<Self> {
        let api = Api::new().context("Failed to create HuggingFace API")?;

        tracing::info!("Downloading SNAC config: {}", variant.config_repo());
        let config = api
            .model(variant.config_repo().to_string())
            .get("config.json")
            .context("Failed to download config.json")?;

        tracing::info!("Downloading SNAC weights: {}/{}", WEIGHTS_REPO, variant.weights_file());
        let weights = api
            .model(WEIGHTS_REPO.to_string())
            .get(variant.weights_file())
            .with_context(|| format!("Failed to download {}", variant.weights_file()))?;

        Ok(Self { config, weights })
    }
}
