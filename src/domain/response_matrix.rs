// ============================================================
// Layer 3 — Response Matrix
// ============================================================
// Dense (num_users x num_questions) table of answers.
//
// Cell values:
//   1.0  — the student answered the question correctly
//   0.0  — the student answered it incorrectly
//   NaN  — the student never saw the question (missing)
//
// Two views of the same data are used by the trainer:
//   raw          — keeps NaN so the loss can mask missing cells
//   zero-filled  — NaN replaced by 0.0, fed to the model as input
//
// Storage is row-major so a user's full vector is one slice.

use serde::{Deserialize, Serialize};

use crate::domain::error::{ImputeError, ImputeResult};

/// Marker stored in raw matrices for unanswered questions.
pub const MISSING: f32 = f32::NAN;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMatrix {
    num_users:     usize,
    num_questions: usize,
    values:        Vec<f32>,
}

impl ResponseMatrix {
    /// A matrix where every cell is missing.
    pub fn missing(num_users: usize, num_questions: usize) -> Self {
        Self {
            num_users,
            num_questions,
            values: vec![MISSING; num_users * num_questions],
        }
    }

    /// Fixture constructor; every row must have the same length.
    #[cfg(test)]
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Self {
        let num_users     = rows.len();
        let num_questions = rows.first().map(Vec::len).unwrap_or(0);
        assert!(rows.iter().all(|r| r.len() == num_questions), "ragged fixture rows");

        let values = rows.into_iter().flatten().collect();
        Self { num_users, num_questions, values }
    }

    pub fn num_users(&self) -> usize { self.num_users }

    pub fn num_questions(&self) -> usize { self.num_questions }

    pub fn dims(&self) -> (usize, usize) { (self.num_users, self.num_questions) }

    /// Write one cell. Passing `MISSING` clears it.
    pub fn set(&mut self, user_id: usize, question_id: usize, value: f32) -> ImputeResult<()> {
        let idx = self.index(user_id, question_id)?;
        self.values[idx] = value;
        Ok(())
    }

    /// A user's full response vector.
    pub fn row(&self, user_id: usize) -> &[f32] {
        let start = user_id * self.num_questions;
        &self.values[start..start + self.num_questions]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f32]> + '_ {
        // chunks_exact panics on a zero chunk size
        self.values.chunks_exact(self.num_questions.max(1)).take(self.num_users)
    }

    /// 1.0 where the user answered, 0.0 where the cell is missing.
    pub fn observed_mask(&self, user_id: usize) -> Vec<f32> {
        self.row(user_id)
            .iter()
            .map(|v| if v.is_nan() { 0.0 } else { 1.0 })
            .collect()
    }

    pub fn num_observed(&self) -> usize {
        self.values.iter().filter(|v| !v.is_nan()).count()
    }

    /// Copy with every missing cell replaced by 0.0.
    pub fn zero_filled(&self) -> Self {
        Self {
            num_users:     self.num_users,
            num_questions: self.num_questions,
            values:        self.values
                .iter()
                .map(|&v| if v.is_nan() { 0.0 } else { v })
                .collect(),
        }
    }

    fn index(&self, user_id: usize, question_id: usize) -> ImputeResult<usize> {
        if user_id >= self.num_users || question_id >= self.num_questions {
            return Err(ImputeError::IndexOutOfRange {
                user_id,
                question_id,
                num_users:     self.num_users,
                num_questions: self.num_questions,
            });
        }
        Ok(user_id * self.num_questions + question_id)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResponseMatrix {
        ResponseMatrix::from_rows(vec![
            vec![1.0, 0.0, MISSING],
            vec![MISSING, 1.0, 0.0],
        ])
    }

    #[test]
    fn test_zero_filled_keeps_observed_cells() {
        let raw  = sample();
        let zero = raw.zero_filled();
        assert_eq!(zero.dims(), raw.dims());
        assert_eq!(zero.row(0), &[1.0, 0.0, 0.0]);
        assert_eq!(zero.row(1), &[0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_observed_mask_marks_answered_questions() {
        let raw = sample();
        assert_eq!(raw.observed_mask(0), vec![1.0, 1.0, 0.0]);
        assert_eq!(raw.observed_mask(1), vec![0.0, 1.0, 1.0]);
        assert_eq!(raw.num_observed(), 4);
    }

    #[test]
    fn test_set_overwrites_and_clears() {
        let mut raw = sample();
        raw.set(0, 2, 1.0).unwrap();
        raw.set(0, 0, MISSING).unwrap();
        assert_eq!(raw.row(0)[2], 1.0);
        assert!(raw.row(0)[0].is_nan());
        assert_eq!(raw.num_observed(), 4);
    }

    #[test]
    fn test_out_of_range_index_is_rejected() {
        let mut raw = sample();
        assert!(matches!(
            raw.set(2, 0, 1.0),
            Err(ImputeError::IndexOutOfRange { user_id: 2, .. })
        ));
    }

    #[test]
    fn test_rows_iterates_every_user() {
        let raw = sample().zero_filled();
        let rows: Vec<&[f32]> = raw.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], &[0.0, 1.0, 0.0]);
    }
}
