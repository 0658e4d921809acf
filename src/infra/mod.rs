// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// File-system and third-party plumbing used by the application
// layer:
//
//   archive.rs         — Input preparation
//                        Uses a dataset directory in place or
//                        unpacks a (gzipped) tar archive into a
//                        temporary directory that is removed when
//                        the run ends.
//
//   tokenizer_store.rs — Tokenizer construction
//                        Builds the tokenizer named in the config,
//                        loading HuggingFace tokenizer.json files
//                        for the "pretrained" kind.
//
//   config_store.rs    — JSON config loading with file context
//
// Reference: Rust Book §9 (Error Handling with anyhow)

/// Directory / tar archive input handling
pub mod archive;

/// Tokenizer construction from config
pub mod tokenizer_store;

/// JSON configuration files
pub mod config_store;
