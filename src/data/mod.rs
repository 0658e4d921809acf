// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between the raw TriviaQA release and the JSONL
// records, in the order it runs for one question:
//
//   qa/<split>.json + evidence/*
//       │
//       ▼
//   TriviaQaLoader    → raw questions, evidence documents
//       │
//       ▼
//   Preprocessor      → cleaned paragraphs
//       │
//       ▼
//   Tokenizer         → tokens with character offsets
//       │
//       ▼
//   ParagraphMerger   → paragraphs glued up to a token budget
//       │
//       ▼
//   TfIdfRanker       → paragraphs sorted by relevance, top N kept
//       │
//       ▼
//   answer_spans      → token spans of every accepted answer
//       │
//       ▼
//   RecordWriter      → one JSON line per question
//
// RecordReader and partition_batches go the other way: they
// read the records back and group per-paragraph instances by
// question for downstream consumers.

/// Reads question files and evidence documents
pub mod loader;

/// Cleans evidence text and splits it into paragraphs
pub mod preprocessor;

/// Rule-based tokenizers and the tokenizer configuration
pub mod tokenizer;

/// Merges consecutive paragraphs up to a token budget
pub mod merger;

/// Ranks paragraphs against the question with TF-IDF
pub mod ranker;

/// Locates answer strings as token spans
pub mod answer_spans;

/// Runs the steps above for one question
pub mod question_builder;

/// JSONL writer and reader for question records
pub mod records;

/// Groups consecutive items sharing a key into batches
pub mod partition;
