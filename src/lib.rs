// ============================================================
// triviaqa-prep
// ============================================================
// Layers, outermost first:
//
//   1. cli          — argument parsing
//   2. application  — the conversion workflow
//   3. domain       — records, tokens, core traits
//   4. data         — loading, cleaning, ranking, JSONL I/O
//   5. ml           — attention and similarity scorers (Burn)
//   6. infra        — archives, tokenizer files, config files

#![recursion_limit = "256"]

pub mod cli;
pub mod application;
pub mod domain;
pub mod data;
pub mod ml;
pub mod infra;
