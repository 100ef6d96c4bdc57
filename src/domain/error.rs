// ============================================================
// Layer 3 — Domain Errors
// ============================================================
// Every failure the core pipeline can report. Outer layers
// (application, CLI) wrap these in anyhow with file context.
//
// All variants are fatal: nothing in the pipeline retries.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ImputeError {
    /// Raw and zero-filled matrices have different dimensions.
    #[error(
        "shape mismatch: raw matrix is {raw_users}x{raw_questions}, \
         zero-filled matrix is {zero_users}x{zero_questions}"
    )]
    ShapeMismatch {
        raw_users:      usize,
        raw_questions:  usize,
        zero_users:     usize,
        zero_questions: usize,
    },

    /// Raw and zero-filled matrices disagree on an observed cell.
    #[error("observed cell ({user_id}, {question_id}) differs: raw={raw}, zero-filled={zero_filled}")]
    ObservedCellMismatch {
        user_id:     usize,
        question_id: usize,
        raw:         f32,
        zero_filled: f32,
    },

    /// The evaluator was handed a triple set with no entries.
    #[error("evaluation set is empty")]
    EmptyEvaluationSet,

    /// Loss became NaN or infinite during training.
    #[error("non-finite loss at epoch {epoch}, user {user_id}")]
    NumericInstability { epoch: usize, user_id: usize },

    /// The parallel columns of a triple set differ in length.
    #[error(
        "triple columns differ in length: user_id={users}, \
         question_id={questions}, is_correct={labels}"
    )]
    TripleLengthMismatch {
        users:     usize,
        questions: usize,
        labels:    usize,
    },

    /// A triple or row index points outside the response matrix.
    #[error("index ({user_id}, {question_id}) outside {num_users}x{num_questions} matrix")]
    IndexOutOfRange {
        user_id:       usize,
        question_id:   usize,
        num_users:     usize,
        num_questions: usize,
    },

    /// A tensor could not be copied back to host memory.
    #[error("cannot read tensor data: {0}")]
    TensorData(String),
}

pub type ImputeResult<T> = Result<T, ImputeError>;
