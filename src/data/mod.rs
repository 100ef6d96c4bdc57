// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// From CSV answer files to tensors:
//
//   train/valid/test CSV
//       │
//       ▼
//   CsvResponseLoader → raw ResponseMatrix + labeled TripleSets
//       │
//       ▼
//   TrainingData      → raw + zero-filled pair, one UserRow per student
//       │
//       ▼
//   ResponseBatcher   → input and observed-mask tensors
//
// Reference: Burn Book §4 (Datasets and Batchers)

/// Reads answer CSV files into a matrix and triple sets
pub mod loader;

/// Implements Burn's Dataset trait for per-student rows
pub mod dataset;

/// Implements Burn's Batcher trait to create tensors
pub mod batcher;
