// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer only talks to data sources through
// this trait, so a CSV loader, an in-memory fixture, or a
// future sparse-matrix reader are interchangeable.

use anyhow::Result;

use crate::domain::response_matrix::ResponseMatrix;
use crate::domain::triple::TripleSet;

// ─── ResponseData ─────────────────────────────────────────────────────────────
/// Everything a training run consumes.
#[derive(Debug, Clone)]
pub struct ResponseData {
    /// Training answers with missing cells marked NaN
    pub train: ResponseMatrix,
    pub valid: TripleSet,
    pub test:  TripleSet,
}

// ─── ResponseSource ───────────────────────────────────────────────────────────
/// Any component that can produce the training matrix and the
/// labeled validation/test sets.
///
/// Implementations:
///   - CsvResponseLoader → reads train/valid/test CSV files
pub trait ResponseSource {
    fn load(&self) -> Result<ResponseData>;
}
