// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records training metrics after each epoch.
//
// Two outputs in the run's output directory:
//   metrics.csv   — one row appended per epoch while training
//   history.json  — the full TrainingHistory written at the end;
//                   the accuracy-vs-epoch and loss-vs-epoch
//                   curves are plotted from this
//
// Metrics recorded per epoch:
//   - epoch:         zero-based epoch index
//   - learning_rate: step size used for every update this epoch
//   - train_loss:    Σ over students of masked squared error
//                    plus (λ/2)·weight_norm
//   - valid_acc:     thresholded accuracy on the validation set
//   - valid_loss:    only when early stopping is enabled
//
// Example CSV output:
//   epoch,learning_rate,train_loss,valid_acc,valid_loss
//   0,0.015000,13342.118164,0.624753,
//   1,0.015000,12016.604492,0.639853,

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

pub const METRICS_FILE: &str = "metrics.csv";
pub const HISTORY_FILE: &str = "history.json";

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    pub epoch:         usize,
    pub learning_rate: f64,
    pub train_loss:    f64,
    pub valid_acc:     f64,
    pub valid_loss:    Option<f64>,
}

impl EpochMetrics {
    pub fn new(epoch: usize, learning_rate: f64, train_loss: f64, valid_acc: f64) -> Self {
        Self { epoch, learning_rate, train_loss, valid_acc, valid_loss: None }
    }

    pub fn with_valid_loss(mut self, valid_loss: Option<f64>) -> Self {
        self.valid_loss = valid_loss;
        self
    }
}

/// Every epoch of one run, in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    pub epochs: Vec<EpochMetrics>,
}

impl TrainingHistory {
    pub fn push(&mut self, m: EpochMetrics) {
        self.epochs.push(m);
    }

    pub fn len(&self) -> usize { self.epochs.len() }

    pub fn final_valid_acc(&self) -> Option<f64> {
        self.epochs.last().map(|m| m.valid_acc)
    }

    pub fn save_json(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(HISTORY_FILE);
        fs::write(&path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("Cannot write history to '{}'", path.display()))?;
        tracing::debug!("Saved training history to '{}'", path.display());
        Ok(path)
    }
}

/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Start a fresh metrics CSV in `dir`, replacing any earlier run's file.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create output directory '{}'", dir.display()))?;

        let csv_path = dir.join(METRICS_FILE);
        let mut f = fs::File::create(&csv_path)
            .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
        writeln!(f, "epoch,learning_rate,train_loss,valid_acc,valid_loss")?;
        tracing::debug!("Created metrics CSV: '{}'", csv_path.display());

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row in the CSV.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?;

        let valid_loss = m.valid_loss.map(|l| format!("{l:.6}")).unwrap_or_default();
        writeln!(
            f,
            "{},{:.6},{:.6},{:.6},{}",
            m.epoch,
            m.learning_rate,
            m.train_loss,
            m.valid_acc,
            valid_loss,
        )?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, valid_acc={:.4}",
            m.epoch,
            m.train_loss,
            m.valid_acc,
        );

        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}
