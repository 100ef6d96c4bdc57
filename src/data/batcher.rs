// ============================================================
// Layer 4 — User Row Batcher
// ============================================================
// Implements Burn's Batcher trait to stack UserRows into
// tensors on the target device.
//
//   Input:  Vec of N UserRows, each of length Q
//   Output: ResponseBatch with inputs and mask of shape [N, Q]
//
// Training uses N = 1 (one SGD step per student); evaluation
// stacks every student into a single forward pass.

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
    tensor::TensorData,
};

use crate::data::dataset::UserRow;

#[derive(Debug, Clone)]
pub struct ResponseBatch<B: Backend> {
    /// Zero-filled answers — shape: [batch_size, num_questions]
    pub inputs:   Tensor<B, 2>,

    /// Observed-cell mask — shape: [batch_size, num_questions]
    /// Treated as a constant: it never carries gradient.
    pub mask:     Tensor<B, 2>,
}

#[derive(Clone, Debug)]
pub struct ResponseBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> ResponseBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }

    /// Stack plain row slices without a mask (all ones).
    pub fn inputs(&self, rows: &[&[f32]]) -> Tensor<B, 2> {
        let num_questions = rows.first().map(|r| r.len()).unwrap_or(0);
        let flat: Vec<f32> = rows.iter().flat_map(|r| r.iter().copied()).collect();
        Tensor::from_data(TensorData::new(flat, [rows.len(), num_questions]), &self.device)
    }
}

impl<B: Backend> Batcher<UserRow, ResponseBatch<B>> for ResponseBatcher<B> {
    fn batch(&self, items: Vec<UserRow>) -> ResponseBatch<B> {
        let batch_size    = items.len();
        let num_questions = items.first().map(|r| r.inputs.len()).unwrap_or(0);

        let inputs_flat: Vec<f32> = items.iter().flat_map(|r| r.inputs.iter().copied()).collect();
        let mask_flat:   Vec<f32> = items.iter().flat_map(|r| r.mask.iter().copied()).collect();

        let inputs = Tensor::from_data(
            TensorData::new(inputs_flat, [batch_size, num_questions]),
            &self.device,
        );
        let mask = Tensor::from_data(
            TensorData::new(mask_flat, [batch_size, num_questions]),
            &self.device,
        );

        ResponseBatch { inputs, mask }
    }
}
