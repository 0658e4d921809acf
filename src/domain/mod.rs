// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs and traits describing what the converter
// works with: evidence documents, tokens, question records.
//
// Rules for this layer:
//   - NO burn tensor types here
//   - NO file I/O
//   - Only plain structs, enums, and traits
//
// Everything else (loading, tokenising, ranking, writing) lives
// in the data and infra layers and speaks in these types.

// An evidence document loaded from the dataset
pub mod document;

// A surface form with its character offset
pub mod token;

// The output record: question, paragraphs, answer spans
pub mod question;

// Core abstractions (traits) that other layers implement
pub mod traits;
