// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The converter programs against these traits rather than the
// concrete loaders and tokenizers:
//   - TriviaQaLoader implements EvidenceSource
//   - WordTokenizer, WhitespaceTokenizer, CharacterTokenizer and
//     PretrainedTokenizer implement Tokenizer
// so tests can hand the question builder an in-memory source.

use anyhow::Result;

use crate::domain::document::{Document, EvidenceKind};
use crate::domain::token::Token;

// ─── EvidenceSource ───────────────────────────────────────────────────────────
/// Anything that can resolve an evidence filename to a document.
pub trait EvidenceSource {
    /// Load one evidence document.
    /// Returns Ok(None) when the file is absent from the source.
    fn load_document(&self, kind: EvidenceKind, filename: &str) -> Result<Option<Document>>;
}

// ─── Tokenizer ────────────────────────────────────────────────────────────────
/// Splits text into tokens carrying character offsets.
///
/// Offsets must be non-decreasing and index characters of `text`.
pub trait Tokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>>;
}
