// ============================================================
// Layer 5 — Vector Attention
// ============================================================
// Scores one vector per batch element against every row of a
// matrix, then optionally turns the scores into a distribution:
//
//   vector : [batch, dim_1]
//   matrix : [batch, rows, dim_2]
//   mask   : [batch, rows]   1.0 = real row, 0.0 = padding
//   output : [batch, rows]
//
//   scores[b, i] = sim(vector[b], matrix[b, i])
//   output       = normalize ? masked_softmax(scores, mask) : scores
//
// A vector is a one-row matrix, so each similarity is computed by
// the matching MatrixAttention and the middle axis dropped.

use anyhow::Result;
use burn::prelude::*;
use serde::{Deserialize, Serialize};

use super::matrix_attention::{
    default_combination, CosineMatrixAttention, DotProductMatrixAttention,
    LinearMatrixAttention, MatrixAttention,
};
use super::ops::masked_softmax;

pub trait Attention<B: Backend> {
    /// Raw `[batch, rows]` similarity scores.
    fn similarities(&self, vector: Tensor<B, 2>, matrix: Tensor<B, 3>) -> Tensor<B, 2>;

    /// Whether `forward` applies a masked softmax.
    fn normalize(&self) -> bool;

    fn forward(
        &self,
        vector: Tensor<B, 2>,
        matrix: Tensor<B, 3>,
        mask:   Option<Tensor<B, 2>>,
    ) -> Tensor<B, 2> {
        let scores = self.similarities(vector, matrix);
        if self.normalize() {
            masked_softmax(scores, mask)
        } else {
            scores
        }
    }
}

/// Run a matrix attention with `vector` as the only row of the first matrix.
fn as_single_row<B: Backend, M: MatrixAttention<B>>(
    attention: &M,
    vector:    Tensor<B, 2>,
    matrix:    Tensor<B, 3>,
) -> Tensor<B, 2> {
    let [batch, dim]  = vector.dims();
    let [_, rows, _]  = matrix.dims();
    attention
        .forward(vector.reshape([batch, 1, dim]), matrix)
        .reshape([batch, rows])
}

// ─── Dot product ──────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy)]
pub struct DotProductAttention {
    pub normalize: bool,
}

impl Default for DotProductAttention {
    fn default() -> Self {
        Self { normalize: true }
    }
}

impl<B: Backend> Attention<B> for DotProductAttention {
    fn similarities(&self, vector: Tensor<B, 2>, matrix: Tensor<B, 3>) -> Tensor<B, 2> {
        as_single_row(&DotProductMatrixAttention, vector, matrix)
    }

    fn normalize(&self) -> bool {
        self.normalize
    }
}

// ─── Cosine ───────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy)]
pub struct CosineAttention {
    pub normalize: bool,
}

impl Default for CosineAttention {
    fn default() -> Self {
        Self { normalize: true }
    }
}

impl<B: Backend> Attention<B> for CosineAttention {
    fn similarities(&self, vector: Tensor<B, 2>, matrix: Tensor<B, 3>) -> Tensor<B, 2> {
        as_single_row(&CosineMatrixAttention, vector, matrix)
    }

    fn normalize(&self) -> bool {
        self.normalize
    }
}

// ─── Linear ───────────────────────────────────────────────────────────────────
#[derive(Clone)]
pub struct LinearAttention<B: Backend> {
    inner:     LinearMatrixAttention<B>,
    normalize: bool,
}

impl<B: Backend> LinearAttention<B> {
    pub fn new(
        tensor_1_dim: usize,
        tensor_2_dim: usize,
        combination:  &str,
        normalize:    bool,
        device:       &B::Device,
    ) -> Result<Self> {
        Ok(Self {
            inner: LinearMatrixAttention::new(tensor_1_dim, tensor_2_dim, combination, device)?,
            normalize,
        })
    }

    pub fn with_weights(mut self, weights: Tensor<B, 1>, bias: f32) -> Result<Self> {
        self.inner = self.inner.with_weights(weights, bias)?;
        Ok(self)
    }
}

impl<B: Backend> Attention<B> for LinearAttention<B> {
    fn similarities(&self, vector: Tensor<B, 2>, matrix: Tensor<B, 3>) -> Tensor<B, 2> {
        as_single_row(&self.inner, vector, matrix)
    }

    fn normalize(&self) -> bool {
        self.normalize
    }
}

// ─── Config / registry ────────────────────────────────────────────────────────
/// Selects an attention by name:
///
///   {"type": "dot_product", "normalize": false}
///   {"type": "cosine"}
///   {"type": "linear", "tensor_1_dim": 3, "tensor_2_dim": 3, "combination": "x,y"}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum AttentionConfig {
    DotProduct {
        #[serde(default = "default_normalize")]
        normalize: bool,
    },
    Cosine {
        #[serde(default = "default_normalize")]
        normalize: bool,
    },
    Linear {
        tensor_1_dim: usize,
        tensor_2_dim: usize,
        #[serde(default = "default_combination")]
        combination:  String,
        #[serde(default = "default_normalize")]
        normalize:    bool,
    },
}

fn default_normalize() -> bool {
    true
}

impl AttentionConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Result<AttentionModule<B>> {
        Ok(match self {
            Self::DotProduct { normalize } => {
                AttentionModule::DotProduct(DotProductAttention { normalize: *normalize })
            }
            Self::Cosine { normalize } => {
                AttentionModule::Cosine(CosineAttention { normalize: *normalize })
            }
            Self::Linear { tensor_1_dim, tensor_2_dim, combination, normalize } => {
                AttentionModule::Linear(LinearAttention::new(
                    *tensor_1_dim,
                    *tensor_2_dim,
                    combination,
                    *normalize,
                    device,
                )?)
            }
        })
    }
}

/// An attention built from config.
#[derive(Clone)]
pub enum AttentionModule<B: Backend> {
    DotProduct(DotProductAttention),
    Cosine(CosineAttention),
    Linear(LinearAttention<B>),
}

impl<B: Backend> Attention<B> for AttentionModule<B> {
    fn similarities(&self, vector: Tensor<B, 2>, matrix: Tensor<B, 3>) -> Tensor<B, 2> {
        match self {
            Self::DotProduct(a) => a.similarities(vector, matrix),
            Self::Cosine(a)     => a.similarities(vector, matrix),
            Self::Linear(a)     => a.similarities(vector, matrix),
        }
    }

    fn normalize(&self) -> bool {
        match self {
            Self::DotProduct(a) => a.normalize,
            Self::Cosine(a)     => a.normalize,
            Self::Linear(a)     => a.normalize,
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    type TestBackend = burn::backend::NdArray;
    type Device      = <TestBackend as Backend>::Device;

    fn values(t: Tensor<TestBackend, 2>) -> Vec<f32> {
        t.into_data().to_vec::<f32>().unwrap()
    }

    fn assert_all_close(actual: &[f32], expected: &[f32], epsilon: f32) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert_abs_diff_eq!(*a, *e, epsilon = epsilon);
        }
    }

    fn batch_inputs(device: &Device) -> (Tensor<TestBackend, 2>, Tensor<TestBackend, 3>) {
        let vector = Tensor::from_floats([[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]], device);
        let matrix = Tensor::from_floats(
            [[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]], [[7.0, 8.0, 9.0], [10.0, 11.0, 12.0]]],
            device,
        );
        (vector, matrix)
    }

    #[test]
    fn test_dot_product_scores() {
        let device = Default::default();
        let vector = Tensor::<TestBackend, 2>::from_floats([[1.0, 1.0, 1.0]], &device);
        let matrix = Tensor::<TestBackend, 3>::from_floats([[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]], &device);

        let attention = DotProductAttention { normalize: false };
        let out = attention.forward(vector, matrix, None);
        assert_eq!(out.dims(), [1, 2]);
        assert_all_close(&values(out), &[6.0, 15.0], 1e-4);
    }

    #[test]
    fn test_dot_product_batched() {
        let device           = Default::default();
        let (vector, matrix) = batch_inputs(&device);
        let out = DotProductAttention { normalize: false }.forward(vector, matrix, None);
        assert_all_close(&values(out), &[0.0, 0.0, 24.0, 33.0], 1e-4);
    }

    #[test]
    fn test_dot_product_normalized() {
        let device = Default::default();
        let vector = Tensor::<TestBackend, 2>::from_floats([[1.0, 1.0, 1.0]], &device);
        let matrix = Tensor::<TestBackend, 3>::from_floats([[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]], &device);

        let out = values(DotProductAttention::default().forward(vector, matrix, None));
        // softmax([6, 15])
        let e = (-9.0f32).exp();
        assert_abs_diff_eq!(out[0], e / (1.0 + e), epsilon = 1e-5);
        assert_abs_diff_eq!(out.iter().sum::<f32>(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_mask_zeroes_padding_rows() {
        let device = Default::default();
        let vector = Tensor::<TestBackend, 2>::from_floats([[1.0, 1.0, 1.0]], &device);
        let matrix = Tensor::<TestBackend, 3>::from_floats(
            [[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [9.0, 9.0, 9.0]]],
            &device,
        );
        let mask = Tensor::<TestBackend, 2>::from_floats([[1.0, 1.0, 0.0]], &device);

        let out = values(DotProductAttention::default().forward(vector, matrix, Some(mask)));
        assert_abs_diff_eq!(out[2], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(out[0] + out[1], 1.0, epsilon = 1e-5);
        assert!(out[1] > out[0]);
    }

    #[test]
    fn test_cosine_scores() {
        let device = Default::default();
        let vector = Tensor::<TestBackend, 2>::from_floats([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]], &device);
        let matrix = Tensor::<TestBackend, 3>::from_floats(
            [[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]], [[2.0, 0.0, 0.0], [0.0, 3.0, 0.0]]],
            &device,
        );
        let out = values(CosineAttention { normalize: false }.forward(vector, matrix, None));
        assert_all_close(&out, &[0.0, 0.0, 1.0, 0.0], 1e-4);
    }

    #[test]
    fn test_linear_with_fixed_weights() {
        let device           = Default::default();
        let (vector, matrix) = batch_inputs(&device);
        let weights = Tensor::<TestBackend, 1>::from_floats([-0.3, 0.5, 2.0, -1.0, 1.0, 1.0], &device);

        let attention = LinearAttention::<TestBackend>::new(3, 3, "x,y", false, &device)
            .unwrap()
            .with_weights(weights, 0.1)
            .unwrap();
        let out = values(attention.forward(vector, matrix, None));
        // batch 0: x = 0, y·[-1,1,1] = 4, 7 ; batch 1: x·[-.3,.5,2] = 2.2, y = 10, 13
        assert_all_close(&out, &[4.1, 7.1, 12.3, 15.3], 1e-4);
    }

    #[test]
    fn test_config_defaults_to_normalized() {
        let config: AttentionConfig = serde_json::from_str(r#"{"type": "cosine"}"#).unwrap();
        assert_eq!(config, AttentionConfig::Cosine { normalize: true });

        let device = Default::default();
        let module = config.init::<TestBackend>(&device).unwrap();
        assert!(module.normalize());
    }

    #[test]
    fn test_config_linear() {
        let device = Default::default();
        let config: AttentionConfig = serde_json::from_str(
            r#"{"type": "linear", "tensor_1_dim": 3, "tensor_2_dim": 3, "combination": "x,y,x*y", "normalize": false}"#,
        )
        .unwrap();
        let module = config.init::<TestBackend>(&device).unwrap();
        assert!(!module.normalize());

        let (vector, matrix) = batch_inputs(&device);
        assert_eq!(module.forward(vector, matrix, None).dims(), [2, 2]);
    }

    #[test]
    fn test_config_rejects_unknown_fields() {
        assert!(serde_json::from_str::<AttentionConfig>(r#"{"type": "dot_product", "scale": 2}"#).is_err());
        assert!(serde_json::from_str::<AttentionConfig>(r#"{"type": "additive"}"#).is_err());
    }
}
