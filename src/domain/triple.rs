// ============================================================
// Layer 3 — Labeled Triples
// ============================================================
// A validation or test set: parallel columns of
// (user_id, question_id, is_correct), one entry per answer.
//
// The columns are kept parallel (rather than a Vec of structs)
// because that is the shape the CSV files arrive in and the
// evaluator walks them by position.

use serde::{Deserialize, Serialize};

use crate::domain::error::{ImputeError, ImputeResult};

/// One labeled answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseTriple {
    pub user_id:     usize,
    pub question_id: usize,
    pub is_correct:  bool,
}

impl ResponseTriple {
    pub fn new(user_id: usize, question_id: usize, is_correct: bool) -> Self {
        Self { user_id, question_id, is_correct }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripleSet {
    user_id:     Vec<usize>,
    question_id: Vec<usize>,
    is_correct:  Vec<bool>,
}

impl TripleSet {
    /// Build from parallel columns. All three must have equal length.
    pub fn new(
        user_id:     Vec<usize>,
        question_id: Vec<usize>,
        is_correct:  Vec<bool>,
    ) -> ImputeResult<Self> {
        if user_id.len() != question_id.len() || user_id.len() != is_correct.len() {
            return Err(ImputeError::TripleLengthMismatch {
                users:     user_id.len(),
                questions: question_id.len(),
                labels:    is_correct.len(),
            });
        }
        Ok(Self { user_id, question_id, is_correct })
    }

    pub fn push(&mut self, triple: ResponseTriple) {
        self.user_id.push(triple.user_id);
        self.question_id.push(triple.question_id);
        self.is_correct.push(triple.is_correct);
    }

    pub fn len(&self) -> usize { self.user_id.len() }

    pub fn is_empty(&self) -> bool { self.user_id.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = ResponseTriple> + '_ {
        self.user_id
            .iter()
            .zip(&self.question_id)
            .zip(&self.is_correct)
            .map(|((&u, &q), &c)| ResponseTriple::new(u, q, c))
    }

    /// Largest (user_id, question_id) referenced, if any.
    pub fn max_ids(&self) -> Option<(usize, usize)> {
        let max_user     = self.user_id.iter().copied().max()?;
        let max_question = self.question_id.iter().copied().max()?;
        Some((max_user, max_question))
    }
}

impl FromIterator<ResponseTriple> for TripleSet {
    fn from_iter<I: IntoIterator<Item = ResponseTriple>>(iter: I) -> Self {
        let mut set = TripleSet::default();
        for triple in iter {
            set.push(triple);
        }
        set
    }
}
