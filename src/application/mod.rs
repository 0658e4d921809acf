// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Coordinates the other layers to accomplish one goal:
// converting a TriviaQA release into JSONL records.
//
// Rules for this layer:
//   - No tensor code here (that's Layer 5)
//   - No argument parsing or printing (that's Layer 1)
//   - No direct archive or tokenizer-file handling (Layer 6)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The dataset conversion workflow
pub mod convert_use_case;
