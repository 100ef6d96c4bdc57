// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types describing the problem: the response matrix,
// labeled triples, the error taxonomy and the loader trait.
//
// Rules for this layer:
//   - NO Burn framework types
//   - NO file I/O
//   - Only plain structs, enums, and traits

/// Typed errors for the whole pipeline
pub mod error;

/// Dense student x question answer matrix
pub mod response_matrix;

/// Labeled (user, question, is_correct) sets
pub mod triple;

/// Data source abstraction
pub mod traits;
