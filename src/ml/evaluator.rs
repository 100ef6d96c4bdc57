// ============================================================
// Layer 5 — Evaluator
// ============================================================
// Scores a model against labeled (user, question, is_correct)
// triples:
//
//   1. Reconstruct every student's vector in one forward pass
//   2. For each triple read reconstruction[user][question]
//   3. Predict "correct" when the value is >= 0.5
//   4. accuracy = matches / total
//
// Reconstructing all students at once gives the same numbers
// as one forward pass per triple; the model is frozen here.

use burn::prelude::*;

use crate::data::batcher::ResponseBatcher;
use crate::domain::error::{ImputeError, ImputeResult};
use crate::domain::response_matrix::ResponseMatrix;
use crate::domain::triple::TripleSet;
use crate::ml::model::AutoEncoder;

/// Reconstructed values at or above this are predicted correct.
pub const DECISION_THRESHOLD: f32 = 0.5;

pub fn predict_correct(value: f32) -> bool {
    value >= DECISION_THRESHOLD
}

/// Model output for every cell of the input matrix.
#[derive(Debug, Clone)]
pub struct Reconstruction {
    num_users:     usize,
    num_questions: usize,
    values:        Vec<f32>,
}

impl Reconstruction {
    pub fn get(&self, user_id: usize, question_id: usize) -> ImputeResult<f32> {
        if user_id >= self.num_users || question_id >= self.num_questions {
            return Err(ImputeError::IndexOutOfRange {
                user_id,
                question_id,
                num_users:     self.num_users,
                num_questions: self.num_questions,
            });
        }
        Ok(self.values[user_id * self.num_questions + question_id])
    }
}

/// Run every row of `inputs` (zero-filled) through the model.
pub fn reconstruct<B: Backend>(
    model:  &AutoEncoder<B>,
    inputs: &ResponseMatrix,
) -> ImputeResult<Reconstruction> {
    let (num_users, num_questions) = inputs.dims();
    let batcher = ResponseBatcher::<B>::new(model.encode.weight.val().device());

    let rows: Vec<&[f32]> = inputs.rows().collect();
    let values: Vec<f32> = model
        .forward(batcher.inputs(&rows))
        .into_data()
        .to_vec()
        .map_err(|e| ImputeError::TensorData(format!("{e:?}")))?;

    Ok(Reconstruction { num_users, num_questions, values })
}

/// Fraction of triples whose thresholded reconstruction matches the label.
pub fn evaluate<B: Backend>(
    model:   &AutoEncoder<B>,
    inputs:  &ResponseMatrix,
    triples: &TripleSet,
) -> ImputeResult<f64> {
    if triples.is_empty() {
        return Err(ImputeError::EmptyEvaluationSet);
    }

    let recon = reconstruct(model, inputs)?;

    let mut correct = 0usize;
    for t in triples.iter() {
        if predict_correct(recon.get(t.user_id, t.question_id)?) == t.is_correct {
            correct += 1;
        }
    }

    Ok(correct as f64 / triples.len() as f64)
}

/// (λ/2)·weight_norm + Σ (reconstruction − label)² over the triples.
/// Drives early stopping.
pub fn validation_loss<B: Backend>(
    model:   &AutoEncoder<B>,
    inputs:  &ResponseMatrix,
    triples: &TripleSet,
    lambda:  f64,
) -> ImputeResult<f64> {
    if triples.is_empty() {
        return Err(ImputeError::EmptyEvaluationSet);
    }

    let recon   = reconstruct(model, inputs)?;
    let penalty = lambda / 2.0 * model.weight_norm().into_scalar().elem::<f64>();

    let mut squared_error = 0.0f64;
    for t in triples.iter() {
        let label = if t.is_correct { 1.0 } else { 0.0 };
        let diff  = recon.get(t.user_id, t.question_id)? as f64 - label;
        squared_error += diff * diff;
    }

    Ok(penalty + squared_error)
}
