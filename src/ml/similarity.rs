// ============================================================
// Layer 5 — Similarity Functions
// ============================================================
// Row-wise similarity of two equally shaped batches of vectors:
//
//   tensor_1 : [n, dim]
//   tensor_2 : [n, dim]
//   output   : [n]        output[i] = sim(tensor_1[i], tensor_2[i])
//
// dot product: Σ x·y, optionally divided by sqrt(dim)
// cosine     : Σ (x/|x|)·(y/|y|)

use burn::prelude::*;
use serde::{Deserialize, Serialize};

use super::ops::l2_normalize;

pub trait SimilarityFunction<B: Backend> {
    fn forward(&self, tensor_1: Tensor<B, 2>, tensor_2: Tensor<B, 2>) -> Tensor<B, 1>;
}

/// Sum the element-wise product of each row pair.
fn row_dot<B: Backend>(tensor_1: Tensor<B, 2>, tensor_2: Tensor<B, 2>) -> Tensor<B, 1> {
    let [n, _] = tensor_1.dims();
    (tensor_1 * tensor_2).sum_dim(1).reshape([n])
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DotProductSimilarity {
    /// Divide by sqrt(dim), as in scaled dot-product attention.
    pub scale_output: bool,
}

impl<B: Backend> SimilarityFunction<B> for DotProductSimilarity {
    fn forward(&self, tensor_1: Tensor<B, 2>, tensor_2: Tensor<B, 2>) -> Tensor<B, 1> {
        let [_, dim] = tensor_1.dims();
        let scores   = row_dot(tensor_1, tensor_2);
        if self.scale_output {
            scores.div_scalar((dim as f64).sqrt())
        } else {
            scores
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CosineSimilarity;

impl<B: Backend> SimilarityFunction<B> for CosineSimilarity {
    fn forward(&self, tensor_1: Tensor<B, 2>, tensor_2: Tensor<B, 2>) -> Tensor<B, 1> {
        row_dot(l2_normalize(tensor_1), l2_normalize(tensor_2))
    }
}

// ─── Config / registry ────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum SimilarityConfig {
    DotProduct {
        #[serde(default)]
        scale_output: bool,
    },
    Cosine {},
}

impl SimilarityConfig {
    pub fn init(&self) -> SimilarityModule {
        match self {
            Self::DotProduct { scale_output } => {
                SimilarityModule::DotProduct(DotProductSimilarity { scale_output: *scale_output })
            }
            Self::Cosine {} => SimilarityModule::Cosine(CosineSimilarity),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum SimilarityModule {
    DotProduct(DotProductSimilarity),
    Cosine(CosineSimilarity),
}

impl<B: Backend> SimilarityFunction<B> for SimilarityModule {
    fn forward(&self, tensor_1: Tensor<B, 2>, tensor_2: Tensor<B, 2>) -> Tensor<B, 1> {
        match self {
            Self::DotProduct(s) => s.forward(tensor_1, tensor_2),
            Self::Cosine(s)     => s.forward(tensor_1, tensor_2),
        }
    }
}
