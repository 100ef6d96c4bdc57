// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores the trained autoencoder.
//
// What gets saved after training:
//   1. Model weights (.mpk.gz file) — all learned parameters
//   2. model_config.json            — num_questions, k, seed
//   3. train_config.json            — the run's hyperparameters
//
// The model config is needed to rebuild an empty model of the
// right shape before the weights are loaded into it.
//
// File layout:
//   output/
//     model_final.mpk.gz
//     model_config.json
//     train_config.json
//
// Weights are recorded at full precision: the evaluate command
// must reproduce the accuracies reported at the end of training.
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use std::{fs, path::{Path, PathBuf}};
use burn::{
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkGzFileRecorder, Recorder},
};

use crate::application::train_use_case::TrainConfig;
use crate::ml::model::{AutoEncoder, AutoEncoderConfig};

type ModelRecorder = NamedMpkGzFileRecorder<FullPrecisionSettings>;

const MODEL_FILE:        &str = "model_final";
const MODEL_CONFIG_FILE: &str = "model_config.json";
const TRAIN_CONFIG_FILE: &str = "train_config.json";

/// Manages saving and loading of model checkpoints.
/// All files are stored in the configured directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Creates the directory if it doesn't already exist.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create checkpoint directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save model weights and the architecture needed to rebuild them.
    pub fn save_model<B: Backend>(&self, model: &AutoEncoder<B>) -> Result<()> {
        let config_path = self.dir.join(MODEL_CONFIG_FILE);
        AutoEncoderConfig::new(model.num_questions(), model.hidden_size())
            .save(&config_path)
            .with_context(|| format!("Cannot write '{}'", config_path.display()))?;

        // Recorder adds the extension
        let path = self.dir.join(MODEL_FILE);
        ModelRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save checkpoint to '{}'", path.display()))?;

        tracing::debug!("Saved checkpoint to '{}'", path.display());
        Ok(())
    }

    /// Rebuild the saved architecture and load its weights.
    pub fn load_model<B: Backend>(&self, device: &B::Device) -> Result<AutoEncoder<B>> {
        let config_path = self.dir.join(MODEL_CONFIG_FILE);
        let config = AutoEncoderConfig::load(&config_path).map_err(|e| {
            anyhow::anyhow!(
                "Cannot read '{}': {:?}. Have you trained the model first?",
                config_path.display(),
                e
            )
        })?;

        let path   = self.dir.join(MODEL_FILE);
        let record = ModelRecorder::new()
            .load(path.clone(), device)
            .with_context(|| format!("Cannot load checkpoint '{}'", path.display()))?;

        tracing::info!(
            "Loaded model ({} questions, k={}) from '{}'",
            config.num_questions,
            config.hidden_size,
            path.display()
        );
        Ok(config.init::<B>(device).load_record(record))
    }

    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join(TRAIN_CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join(TRAIN_CONFIG_FILE);

        let json = fs::read_to_string(&path)
            .with_context(|| {
                format!(
                    "Cannot read config from '{}'. \
                     Make sure you have run 'train' before 'evaluate'.",
                    path.display()
                )
            })?;

        Ok(serde_json::from_str(&json)?)
    }
}
