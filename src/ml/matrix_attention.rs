// ============================================================
// Layer 5 — Matrix Attention
// ============================================================
// Scores every row of one matrix against every row of another:
//
//   matrix_1 : [batch, rows_1, dim_1]
//   matrix_2 : [batch, rows_2, dim_2]
//   output   : [batch, rows_1, rows_2]
//
//   output[b, i, j] = sim(matrix_1[b, i], matrix_2[b, j])
//
// Three similarities are provided:
//   - dot product     x · y
//   - cosine          (x / |x|) · (y / |y|)
//   - linear          w · combine(x, y) + b   (see linear.rs)
//
// No normalisation is applied; the output is raw similarity.

use anyhow::Result;
use burn::prelude::*;
use serde::{Deserialize, Serialize};

use super::linear::LinearWeights;
use super::ops::l2_normalize;

pub trait MatrixAttention<B: Backend> {
    fn forward(&self, matrix_1: Tensor<B, 3>, matrix_2: Tensor<B, 3>) -> Tensor<B, 3>;
}

// ─── Dot product ──────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, Default)]
pub struct DotProductMatrixAttention;

impl<B: Backend> MatrixAttention<B> for DotProductMatrixAttention {
    fn forward(&self, matrix_1: Tensor<B, 3>, matrix_2: Tensor<B, 3>) -> Tensor<B, 3> {
        matrix_1.matmul(matrix_2.swap_dims(1, 2))
    }
}

// ─── Cosine ───────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, Default)]
pub struct CosineMatrixAttention;

impl<B: Backend> MatrixAttention<B> for CosineMatrixAttention {
    fn forward(&self, matrix_1: Tensor<B, 3>, matrix_2: Tensor<B, 3>) -> Tensor<B, 3> {
        l2_normalize(matrix_1).matmul(l2_normalize(matrix_2).swap_dims(1, 2))
    }
}

// ─── Linear ───────────────────────────────────────────────────────────────────
#[derive(Clone)]
pub struct LinearMatrixAttention<B: Backend> {
    weights: LinearWeights<B>,
}

impl<B: Backend> LinearMatrixAttention<B> {
    pub fn new(
        tensor_1_dim: usize,
        tensor_2_dim: usize,
        combination:  &str,
        device:       &B::Device,
    ) -> Result<Self> {
        Ok(Self {
            weights: LinearWeights::init(tensor_1_dim, tensor_2_dim, combination, device)?,
        })
    }

    /// Overwrite the learned parameters, e.g. with trained values.
    pub fn with_weights(mut self, weights: Tensor<B, 1>, bias: f32) -> Result<Self> {
        self.weights.set(weights, bias)?;
        Ok(self)
    }
}

impl<B: Backend> MatrixAttention<B> for LinearMatrixAttention<B> {
    fn forward(&self, matrix_1: Tensor<B, 3>, matrix_2: Tensor<B, 3>) -> Tensor<B, 3> {
        self.weights.scores(matrix_1, matrix_2)
    }
}

// ─── Config / registry ────────────────────────────────────────────────────────
/// Selects a matrix attention by name:
///
///   {"type": "dot_product"}
///   {"type": "cosine"}
///   {"type": "linear", "tensor_1_dim": 3, "tensor_2_dim": 3, "combination": "x,y"}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum MatrixAttentionConfig {
    DotProduct,
    Cosine,
    Linear {
        tensor_1_dim: usize,
        tensor_2_dim: usize,
        #[serde(default = "default_combination")]
        combination:  String,
    },
}

pub(crate) fn default_combination() -> String {
    "x,y".to_string()
}

impl MatrixAttentionConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Result<MatrixAttentionModule<B>> {
        Ok(match self {
            Self::DotProduct => MatrixAttentionModule::DotProduct(DotProductMatrixAttention),
            Self::Cosine => MatrixAttentionModule::Cosine(CosineMatrixAttention),
            Self::Linear { tensor_1_dim, tensor_2_dim, combination } => {
                MatrixAttentionModule::Linear(LinearMatrixAttention::new(
                    *tensor_1_dim,
                    *tensor_2_dim,
                    combination,
                    device,
                )?)
            }
        })
    }
}

/// A matrix attention built from config.
#[derive(Clone)]
pub enum MatrixAttentionModule<B: Backend> {
    DotProduct(DotProductMatrixAttention),
    Cosine(CosineMatrixAttention),
    Linear(LinearMatrixAttention<B>),
}

impl<B: Backend> MatrixAttention<B> for MatrixAttentionModule<B> {
    fn forward(&self, matrix_1: Tensor<B, 3>, matrix_2: Tensor<B, 3>) -> Tensor<B, 3> {
        match self {
            Self::DotProduct(a) => a.forward(matrix_1, matrix_2),
            Self::Cosine(a)     => a.forward(matrix_1, matrix_2),
            Self::Linear(a)     => a.forward(matrix_1, matrix_2),
        }
    }
}
