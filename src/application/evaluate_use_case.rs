// ============================================================
// Layer 2 — Evaluate Use Case
// ============================================================
// Re-scores a saved checkpoint without training:
//
//   1. Rebuild the autoencoder from model_config.json + weights
//   2. Load the same train/valid/test answers, from the directory
//      recorded in train_config.json unless one is given
//   3. Zero-fill the training matrix as model input
//   4. Report validation and test accuracy

use anyhow::{bail, Context, Result};
use burn::backend::NdArray;
use serde::{Deserialize, Serialize};

use crate::data::loader::CsvResponseLoader;
use crate::domain::traits::ResponseSource;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::{evaluator::evaluate, model::AutoEncoder};

type InferBackend = NdArray;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub valid_acc: f64,
    pub test_acc:  f64,
}

pub struct EvaluateUseCase {
    data_dir:   Option<String>,
    output_dir: String,
}

impl EvaluateUseCase {
    /// `data_dir: None` reuses the directory the checkpoint was trained on.
    pub fn new(data_dir: Option<String>, output_dir: impl Into<String>) -> Self {
        Self { data_dir, output_dir: output_dir.into() }
    }

    pub fn execute(&self) -> Result<EvaluationReport> {
        let data_dir = match &self.data_dir {
            Some(dir) => dir.clone(),
            None      => CheckpointManager::new(&self.output_dir)?.load_config()?.data_dir,
        };
        tracing::info!("Scoring against answers in '{}'", data_dir);

        let loader = CsvResponseLoader::new(data_dir);
        self.execute_with(&loader)
    }

    pub fn execute_with(&self, source: &dyn ResponseSource) -> Result<EvaluationReport> {
        let device  = Default::default();
        let manager = CheckpointManager::new(&self.output_dir)?;
        let model: AutoEncoder<InferBackend> = manager.load_model(&device)?;

        let data = source.load()?;
        if data.train.num_questions() != model.num_questions() {
            bail!(
                "Checkpoint expects {} questions but the data has {}",
                model.num_questions(),
                data.train.num_questions()
            );
        }
        let inputs = data.train.zero_filled();

        let valid_acc = evaluate(&model, &inputs, &data.valid)
            .context("Cannot score validation set")?;
        let test_acc  = evaluate(&model, &inputs, &data.test)
            .context("Cannot score test set")?;

        tracing::info!("Validation accuracy: {:.4}", valid_acc);
        tracing::info!("Test accuracy:       {:.4}", test_acc);
        Ok(EvaluationReport { valid_acc, test_acc })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::{TrainConfig, TrainUseCase};
    use crate::domain::response_matrix::{ResponseMatrix, MISSING};
    use crate::domain::traits::ResponseData;
    use crate::domain::triple::ResponseTriple;
    use crate::data::loader::{TEST_FILE, TRAIN_FILE, VALID_FILE};
    use std::fs;

    struct FixtureSource {
        num_questions: usize,
    }

    impl ResponseSource for FixtureSource {
        fn load(&self) -> Result<ResponseData> {
            let mut rows = vec![
                vec![1.0, 0.0, MISSING, MISSING],
                vec![MISSING, 1.0, 0.0, MISSING],
                vec![0.0, MISSING, MISSING, 1.0],
            ];
            for row in rows.iter_mut() {
                row.resize(self.num_questions, MISSING);
            }
            let train = ResponseMatrix::from_rows(rows);
            let valid = vec![
                ResponseTriple::new(0, 2, true),
                ResponseTriple::new(1, 0, false),
            ].into_iter().collect();
            let test  = vec![
                ResponseTriple::new(1, 3, false),
                ResponseTriple::new(2, 2, true),
            ].into_iter().collect();
            Ok(ResponseData { train, valid, test })
        }
    }

    #[test]
    fn test_reproduces_accuracy_reported_by_training() {
        let out = tempfile::tempdir().unwrap();
        let output_dir = out.path().to_string_lossy().into_owned();
        let cfg = TrainConfig {
            output_dir:  output_dir.clone(),
            hidden_size: 3,
            num_epochs:  4,
            ..TrainConfig::default()
        };
        let source = FixtureSource { num_questions: 4 };

        let trained = TrainUseCase::new(cfg).execute_with(&source).unwrap();
        let report  = EvaluateUseCase::new(None, output_dir)
            .execute_with(&source)
            .unwrap();

        assert_eq!(report.valid_acc, trained.valid_acc);
        assert_eq!(report.test_acc, trained.test_acc);
    }

    #[test]
    fn test_missing_checkpoint_is_an_error() {
        let out = tempfile::tempdir().unwrap();
        let result = EvaluateUseCase::new(None, out.path().to_string_lossy())
            .execute_with(&FixtureSource { num_questions: 4 });
        assert!(result.is_err());
    }

    #[test]
    fn test_question_count_mismatch_is_rejected() {
        let out = tempfile::tempdir().unwrap();
        let output_dir = out.path().to_string_lossy().into_owned();
        let cfg = TrainConfig {
            output_dir:  output_dir.clone(),
            hidden_size: 2,
            num_epochs:  1,
            ..TrainConfig::default()
        };
        TrainUseCase::new(cfg)
            .execute_with(&FixtureSource { num_questions: 4 })
            .unwrap();

        let err = EvaluateUseCase::new(None, output_dir)
            .execute_with(&FixtureSource { num_questions: 5 })
            .unwrap_err();
        assert!(err.to_string().contains("expects 4 questions"));
    }

    #[test]
    fn test_defaults_to_training_data_dir() {
        let data = tempfile::tempdir().unwrap();
        fs::write(
            data.path().join(TRAIN_FILE),
            "user_id,question_id,is_correct\n0,0,1\n0,1,0\n1,1,1\n1,2,0\n2,0,0\n2,3,1\n",
        ).unwrap();
        fs::write(data.path().join(VALID_FILE), "user_id,question_id,is_correct\n0,2,1\n1,0,0\n").unwrap();
        fs::write(data.path().join(TEST_FILE),  "user_id,question_id,is_correct\n1,3,0\n2,2,1\n").unwrap();

        let out = tempfile::tempdir().unwrap();
        let output_dir = out.path().to_string_lossy().into_owned();
        let cfg = TrainConfig {
            data_dir:    data.path().to_string_lossy().into_owned(),
            output_dir:  output_dir.clone(),
            hidden_size: 2,
            num_epochs:  2,
            ..TrainConfig::default()
        };

        let trained = TrainUseCase::new(cfg).execute().unwrap();
        let report  = EvaluateUseCase::new(None, output_dir).execute().unwrap();
        assert_eq!(report.valid_acc, trained.valid_acc);
        assert_eq!(report.test_acc, trained.test_acc);
    }

    #[test]
    fn test_explicit_data_dir_skips_train_config() {
        // no checkpoint at all; the failure must not come from train_config.json
        let out  = tempfile::tempdir().unwrap();
        let data = tempfile::tempdir().unwrap();
        let err  = EvaluateUseCase::new(
            Some(data.path().to_string_lossy().into_owned()),
            out.path().to_string_lossy(),
        )
        .execute()
        .unwrap_err();
        assert!(!format!("{err:#}").contains("train_config.json"));
    }
}
