// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load train/valid/test answers   (Layer 4 - data)
//   Step 2: Pair raw + zero-filled matrices (Layer 4 - data)
//   Step 3: Save config                     (Layer 6 - infra)
//   Step 4: Run training loop               (Layer 5 - ml)
//   Step 5: Save model + history            (Layer 6 - infra)
//   Step 6: Score the valid and test sets   (Layer 5 - ml)

use anyhow::{Context, Result};
use burn::module::AutodiffModule;
use serde::{Deserialize, Serialize};

use crate::data::{dataset::TrainingData, loader::CsvResponseLoader};
use crate::domain::traits::ResponseSource;
use crate::infra::{checkpoint::CheckpointManager, metrics::MetricsLogger};
use crate::ml::{
    evaluator::evaluate,
    model::AutoEncoderConfig,
    schedule::StepDecaySchedule,
    trainer::run_training,
};

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run.
// Serialisable so it can be saved next to the checkpoint and
// reloaded to rebuild the model for evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_dir:                String,
    pub output_dir:              String,
    pub hidden_size:             usize,
    pub learning_rate:           f64,
    pub lr_decay_epoch:          usize,
    pub lr_decay_factor:         f64,
    pub num_epochs:              usize,
    pub lambda:                  f64,
    pub seed:                    u64,
    /// None disables early stopping
    pub early_stopping_patience: Option<usize>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_dir:                "data".to_string(),
            output_dir:              "output".to_string(),
            hidden_size:             50,
            learning_rate:           0.015,
            lr_decay_epoch:          40,
            lr_decay_factor:         0.5,
            num_epochs:              80,
            lambda:                  0.0,
            seed:                    0,
            early_stopping_patience: None,
        }
    }
}

impl TrainConfig {
    pub fn schedule(&self) -> StepDecaySchedule {
        StepDecaySchedule::new(self.learning_rate, self.lr_decay_epoch, self.lr_decay_factor)
    }

    pub fn model_config(&self, num_questions: usize) -> AutoEncoderConfig {
        AutoEncoderConfig::new(num_questions, self.hidden_size).with_seed(self.seed)
    }
}

/// Final numbers of a training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainReport {
    pub epochs_run: usize,
    pub valid_acc:  f64,
    pub test_acc:   f64,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<TrainReport> {
        let loader = CsvResponseLoader::new(&self.config.data_dir);
        self.execute_with(&loader)
    }

    /// Run the pipeline against any data source.
    pub fn execute_with(&self, source: &dyn ResponseSource) -> Result<TrainReport> {
        let cfg = &self.config;

        // ── Step 1: Load answers ──────────────────────────────────────────────
        tracing::info!("Loading answers from '{}'", cfg.data_dir);
        let data = source.load()?;

        // ── Step 2: Raw + zero-filled pair ────────────────────────────────────
        let zero_filled = data.train.zero_filled();
        let train = TrainingData::new(data.train, zero_filled)?;
        tracing::info!(
            "Training on {} students x {} questions",
            train.num_users(),
            train.num_questions(),
        );

        // ── Step 3: Save config ───────────────────────────────────────────────
        let ckpt_manager = CheckpointManager::new(&cfg.output_dir)?;
        ckpt_manager.save_config(cfg)?;

        // ── Step 4: Train ─────────────────────────────────────────────────────
        let logger  = MetricsLogger::new(&cfg.output_dir)?;
        tracing::info!("Per-epoch metrics go to '{}'", logger.csv_path().display());
        let outcome = run_training(cfg, &train, &data.valid, Some(&logger))
            .context("Training failed")?;

        // ── Step 5: Persist ───────────────────────────────────────────────────
        ckpt_manager.save_model(&outcome.model)?;
        outcome.history.save_json(ckpt_manager.dir())?;

        // ── Step 6: Final accuracies ──────────────────────────────────────────
        // Scored from the returned model, so a zero-epoch run still
        // reports the untrained model's real accuracy.
        let model_valid = outcome.model.valid();
        let valid_acc   = evaluate(&model_valid, train.zero_filled(), &data.valid)
            .context("Cannot score validation set")?;
        let test_acc    = evaluate(&model_valid, train.zero_filled(), &data.test)
            .context("Cannot score test set")?;
        tracing::info!("Final test accuracy: {:.4}", test_acc);

        Ok(TrainReport {
            epochs_run: outcome.history.len(),
            valid_acc,
            test_acc,
        })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use crate::domain::response_matrix::{ResponseMatrix, MISSING};
    use crate::domain::traits::ResponseData;
    use crate::domain::triple::ResponseTriple;
    use crate::infra::metrics::{HISTORY_FILE, METRICS_FILE};

    struct FixtureSource;

    impl ResponseSource for FixtureSource {
        fn load(&self) -> Result<ResponseData> {
            let train = ResponseMatrix::from_rows(vec![
                vec![1.0, 0.0, MISSING, MISSING],
                vec![MISSING, 1.0, 0.0, MISSING],
                vec![0.0, MISSING, MISSING, 1.0],
            ]);
            let valid = vec![ResponseTriple::new(0, 2, true)].into_iter().collect();
            let test  = vec![
                ResponseTriple::new(1, 3, false),
                ResponseTriple::new(2, 2, true),
            ].into_iter().collect();
            Ok(ResponseData { train, valid, test })
        }
    }

    #[test]
    fn test_defaults_match_reference_run() {
        let cfg = TrainConfig::default();
        assert_eq!(cfg.hidden_size, 50);
        assert_eq!(cfg.learning_rate, 0.015);
        assert_eq!(cfg.num_epochs, 80);
        assert_eq!(cfg.lambda, 0.0);
        assert_eq!(cfg.lr_decay_epoch, 40);
        assert_eq!(cfg.lr_decay_factor, 0.5);
        assert_eq!(cfg.early_stopping_patience, None);
    }

    #[test]
    fn test_pipeline_writes_outputs_and_reports() {
        let out = tempfile::tempdir().unwrap();
        let cfg = TrainConfig {
            output_dir:  out.path().to_string_lossy().into_owned(),
            hidden_size: 2,
            num_epochs:  3,
            ..TrainConfig::default()
        };

        let report = TrainUseCase::new(cfg).execute_with(&FixtureSource).unwrap();
        assert_eq!(report.epochs_run, 3);
        assert!((0.0..=1.0).contains(&report.valid_acc));
        assert!((0.0..=1.0).contains(&report.test_acc));

        assert!(out.path().join(METRICS_FILE).exists());
        assert!(out.path().join(HISTORY_FILE).exists());
        assert_eq!(
            std::fs::read_to_string(out.path().join(METRICS_FILE)).unwrap().lines().count(),
            4
        );
    }

    #[test]
    fn test_zero_epochs_reports_untrained_accuracy() {
        let out = tempfile::tempdir().unwrap();
        let cfg = TrainConfig {
            output_dir:  out.path().to_string_lossy().into_owned(),
            hidden_size: 2,
            num_epochs:  0,
            ..TrainConfig::default()
        };

        let data   = FixtureSource.load().unwrap();
        let fresh  = cfg.model_config(4).init::<NdArray>(&Default::default());
        let inputs = data.train.zero_filled();
        let expected_valid = evaluate(&fresh, &inputs, &data.valid).unwrap();
        let expected_test  = evaluate(&fresh, &inputs, &data.test).unwrap();

        let report = TrainUseCase::new(cfg).execute_with(&FixtureSource).unwrap();
        assert_eq!(report.epochs_run, 0);
        assert_eq!(report.valid_acc, expected_valid);
        assert_eq!(report.test_acc, expected_test);
    }
}
