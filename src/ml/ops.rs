// ============================================================
// Layer 5 — Shared Tensor Ops
// ============================================================
use burn::prelude::*;
use burn::tensor::activation::softmax;

/// Added to norms and softmax denominators so zero vectors and
/// fully masked rows divide cleanly.
pub const TINY: f64 = 1e-13;

/// Scale every vector along the last dimension to unit L2 norm.
/// A zero vector stays zero.
pub fn l2_normalize<B: Backend, const D: usize>(tensor: Tensor<B, D>) -> Tensor<B, D> {
    let norm = (tensor.clone() * tensor.clone())
        .sum_dim(D - 1)
        .sqrt()
        .add_scalar(TINY);
    tensor / norm
}

/// Softmax over the last dimension of `[batch, n]` scores.
///
/// With a mask (1.0 = keep, 0.0 = drop), masked positions get zero
/// probability and the rest are renormalised to sum to one.
pub fn masked_softmax<B: Backend>(scores: Tensor<B, 2>, mask: Option<Tensor<B, 2>>) -> Tensor<B, 2> {
    match mask {
        None => softmax(scores, 1),
        Some(mask) => {
            let probs = softmax(scores * mask.clone(), 1) * mask;
            let total = probs.clone().sum_dim(1).add_scalar(TINY);
            probs / total
        }
    }
}
