// ============================================================
// Layer 4 — Response Loader
// ============================================================
// Reads the three answer files from a data directory:
//
//   data/
//     train_data.csv   ← answers used to build the training matrix
//     valid_data.csv   ← labeled triples for model selection
//     test_data.csv    ← labeled triples for the final report
//
// Every file has a header row naming the columns
// `user_id`, `question_id`, `is_correct` (any order,
// is_correct encoded as 0/1). Extra columns are ignored.
//
// The training triples are scattered into a dense matrix whose
// dimensions cover the largest id seen in ANY of the three
// files, so every validation/test triple lands inside it.
// Cells that never appear in train_data.csv stay missing (NaN).
// A cell listed twice keeps the last value.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::error::ImputeResult;
use crate::domain::response_matrix::ResponseMatrix;
use crate::domain::traits::{ResponseData, ResponseSource};
use crate::domain::triple::TripleSet;

pub const TRAIN_FILE: &str = "train_data.csv";
pub const VALID_FILE: &str = "valid_data.csv";
pub const TEST_FILE:  &str = "test_data.csv";

/// One CSV row as stored on disk.
#[derive(Debug, Deserialize)]
struct AnswerRecord {
    user_id:     usize,
    question_id: usize,
    is_correct:  u8,
}

/// Loads train/valid/test CSV files from one directory.
pub struct CsvResponseLoader {
    dir: PathBuf,
}

impl CsvResponseLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ResponseSource for CsvResponseLoader {
    fn load(&self) -> Result<ResponseData> {
        let train_triples = read_triples(&self.dir.join(TRAIN_FILE))?;
        let valid         = read_triples(&self.dir.join(VALID_FILE))?;
        let test          = read_triples(&self.dir.join(TEST_FILE))?;

        let (num_users, num_questions) = [&train_triples, &valid, &test]
            .iter()
            .filter_map(|set| set.max_ids())
            .fold((0, 0), |(u, q), (mu, mq)| (u.max(mu + 1), q.max(mq + 1)));

        let train = build_matrix(&train_triples, num_users, num_questions)?;

        tracing::info!(
            "Loaded {} train answers into a {}x{} matrix ({} observed cells, {} valid, {} test triples)",
            train_triples.len(),
            num_users,
            num_questions,
            train.num_observed(),
            valid.len(),
            test.len(),
        );

        Ok(ResponseData { train, valid, test })
    }
}

/// Read one answer CSV into a triple set, column by column.
pub fn read_triples(path: &Path) -> Result<TripleSet> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Cannot open '{}'", path.display()))?;

    let mut user_ids     = Vec::new();
    let mut question_ids = Vec::new();
    let mut labels       = Vec::new();
    for record in reader.deserialize::<AnswerRecord>() {
        let record = record
            .with_context(|| format!("Malformed answer row in '{}'", path.display()))?;
        user_ids.push(record.user_id);
        question_ids.push(record.question_id);
        labels.push(record.is_correct != 0);
    }
    let triples = TripleSet::new(user_ids, question_ids, labels)?;

    tracing::debug!("Read {} triples from '{}'", triples.len(), path.display());
    Ok(triples)
}

/// Scatter labeled answers into a dense raw matrix.
pub fn build_matrix(
    triples:       &TripleSet,
    num_users:     usize,
    num_questions: usize,
) -> ImputeResult<ResponseMatrix> {
    let mut matrix = ResponseMatrix::missing(num_users, num_questions);
    for t in triples.iter() {
        matrix.set(t.user_id, t.question_id, if t.is_correct { 1.0 } else { 0.0 })?;
    }
    Ok(matrix)
}
