// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn model and optimisation code lives here.
//
//   model.rs     — the autoencoder: three linear layers with
//                  sigmoid activations (questions → k → k → questions)
//                  and the L2 weight-norm penalty
//
//   trainer.rs   — per-student SGD with the masked reconstruction
//                  loss, step learning-rate decay and optional
//                  early stopping
//
//   evaluator.rs — thresholded (>= 0.5) accuracy and validation
//                  loss against labeled triples
//
//   schedule.rs  — the one-shot step decay of the learning rate
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)

/// Autoencoder architecture
pub mod model;

/// Training loop
pub mod trainer;

/// Accuracy and validation loss on labeled triples
pub mod evaluator;

/// Learning-rate schedule
pub mod schedule;
