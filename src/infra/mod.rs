// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting file output used by the application layer:
//
//   checkpoint.rs — saving and loading model weights with a
//                   Burn recorder, plus the model and training
//                   configs as JSON so evaluation can rebuild
//                   the same model
//
//   metrics.rs    — per-epoch metrics CSV and the JSON
//                   training history behind the learning curves
//
// Reference: Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Training metrics CSV logger and history
pub mod metrics;
