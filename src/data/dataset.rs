// ============================================================
// Layer 4 — Training Dataset
// ============================================================
// Pairs the raw matrix (NaN = missing) with its zero-filled
// copy and serves one UserRow per student through Burn's
// Dataset trait.
//
// Invariant checked at construction: both matrices have the
// same dimensions and agree on every observed cell.

use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::domain::error::{ImputeError, ImputeResult};
use crate::domain::response_matrix::ResponseMatrix;

/// One student's training sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRow {
    pub user_id: usize,
    /// Zero-filled answers, fed to the model
    pub inputs:  Vec<f32>,
    /// 1.0 on answered questions, 0.0 on missing ones
    pub mask:    Vec<f32>,
}

#[derive(Debug, Clone)]
pub struct TrainingData {
    raw:         ResponseMatrix,
    zero_filled: ResponseMatrix,
}

impl TrainingData {
    /// Pair a raw matrix with an externally produced zero-filled copy.
    pub fn new(raw: ResponseMatrix, zero_filled: ResponseMatrix) -> ImputeResult<Self> {
        if raw.dims() != zero_filled.dims() {
            let (raw_users, raw_questions)   = raw.dims();
            let (zero_users, zero_questions) = zero_filled.dims();
            return Err(ImputeError::ShapeMismatch {
                raw_users, raw_questions, zero_users, zero_questions,
            });
        }

        for user_id in 0..raw.num_users() {
            let cells = raw.row(user_id).iter().zip(zero_filled.row(user_id));
            for (question_id, (&r, &z)) in cells.enumerate() {
                if !r.is_nan() && r != z {
                    return Err(ImputeError::ObservedCellMismatch {
                        user_id, question_id, raw: r, zero_filled: z,
                    });
                }
            }
        }

        Ok(Self { raw, zero_filled })
    }

    pub fn zero_filled(&self) -> &ResponseMatrix { &self.zero_filled }

    pub fn num_users(&self) -> usize { self.raw.num_users() }

    pub fn num_questions(&self) -> usize { self.raw.num_questions() }
}

impl Dataset<UserRow> for TrainingData {
    fn get(&self, index: usize) -> Option<UserRow> {
        if index >= self.num_users() {
            return None;
        }
        Some(UserRow {
            user_id: index,
            inputs:  self.zero_filled.row(index).to_vec(),
            mask:    self.raw.observed_mask(index),
        })
    }

    fn len(&self) -> usize {
        self.num_users()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::response_matrix::MISSING;

    fn raw() -> ResponseMatrix {
        ResponseMatrix::from_rows(vec![
            vec![1.0, MISSING],
            vec![MISSING, 0.0],
        ])
    }

    #[test]
    fn test_shape_mismatch_is_rejected() {
        let zero = ResponseMatrix::from_rows(vec![vec![1.0, 0.0, 0.0]]);
        let err  = TrainingData::new(raw(), zero).unwrap_err();
        assert!(matches!(err, ImputeError::ShapeMismatch { raw_users: 2, zero_users: 1, .. }));
    }

    #[test]
    fn test_observed_disagreement_is_rejected() {
        let zero = ResponseMatrix::from_rows(vec![vec![0.0, 0.0], vec![0.0, 0.0]]);
        let err  = TrainingData::new(raw(), zero).unwrap_err();
        assert!(matches!(err, ImputeError::ObservedCellMismatch { user_id: 0, question_id: 0, .. }));
    }

    #[test]
    fn test_matching_pair_is_accepted() {
        let raw  = raw();
        let zero = raw.zero_filled();
        assert!(TrainingData::new(raw, zero).is_ok());
    }

    #[test]
    fn test_rows_carry_inputs_and_mask() {
        let raw  = raw();
        let zero = raw.zero_filled();
        let data = TrainingData::new(raw, zero).unwrap();
        assert_eq!(data.len(), 2);

        let row = data.get(1).unwrap();
        assert_eq!(row.user_id, 1);
        assert_eq!(row.inputs, vec![0.0, 0.0]);
        assert_eq!(row.mask, vec![0.0, 1.0]);
        assert!(data.get(2).is_none());
    }
}
