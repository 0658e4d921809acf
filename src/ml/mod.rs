// ============================================================
// Layer 5 — Scoring Layer (Burn)
// ============================================================
// All Burn specific code lives here. The conversion pipeline
// never touches tensors; these scorers are used by models that
// consume the converted records.
//
// What's in this layer:
//
//   ops.rs              — L2 normalisation and masked softmax
//
//   linear.rs           — Combination strings ("x,y,x*y") and the
//                         learned w · combine(x, y) + b scorer
//
//   attention.rs        — vector vs matrix:  [B, D] × [B, N, D] → [B, N]
//                         dot product, cosine, linear
//
//   matrix_attention.rs — matrix vs matrix:  [B, N1, D] × [B, N2, D] → [B, N1, N2]
//                         dot product, cosine, linear
//
//   similarity.rs       — row pairs:         [N, D] × [N, D] → [N]
//                         dot product (optionally scaled), cosine
//
// Each family has a serde-tagged config enum whose `init` builds
// the scorer, e.g. {"type": "linear", "tensor_1_dim": 3, ...}.
//
// Reference: Burn Book §3 (Building Blocks)
//            Luong et al. (2015) Effective Approaches to
//            Attention-based Neural Machine Translation

/// Tensor helpers shared by the scorers
pub mod ops;

/// Linear combination scoring and its parameters
pub mod linear;

/// Vector vs matrix attention
pub mod attention;

/// Matrix vs matrix attention
pub mod matrix_attention;

/// Row-wise similarity functions
pub mod similarity;
