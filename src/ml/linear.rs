// ============================================================
// Layer 5 — Linear Combination Scoring
// ============================================================
// A linear scorer computes, for every pair (x, y):
//
//   score(x, y) = w · combine(x, y) + b
//
// where combine concatenates a list of terms chosen by a
// combination string such as "x,y" or "x,y,x*y":
//
//   term   size   meaning
//   x      d1     first input
//   y      d2     second input
//   x*y    d      element-wise product   (needs d1 == d2)
//   x+y    d      element-wise sum       (needs d1 == d2)
//   x-y    d      element-wise difference(needs d1 == d2)
//   x/y    d      element-wise quotient  (needs d1 == d2)
//
// The concatenation is never materialised. The weight vector is
// sliced per term and each term contributes its own dot product,
// which for matrices [B, N1, D] and [B, N2, D] gives:
//
//   x   → (m1 · w_x)            [B, N1, 1]  broadcast over N2
//   y   → (m2 · w_y)ᵀ           [B, 1, N2]  broadcast over N1
//   x*y → (m1 ⊙ w) @ m2ᵀ        [B, N1, N2]
//   x/y → (m1 ⊙ w) @ (1/m2)ᵀ    [B, N1, N2]
//
// Reference: Seo et al. (2017) BiDAF, trilinear attention

use anyhow::{bail, ensure, Result};
use burn::module::Param;
use burn::prelude::*;
use burn::tensor::Distribution;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Term {
    X,
    Y,
    Product,
    Sum,
    Difference,
    Quotient,
}

impl Term {
    fn parse(text: &str) -> Result<Self> {
        Ok(match text {
            "x"   => Term::X,
            "y"   => Term::Y,
            "x*y" => Term::Product,
            "x+y" => Term::Sum,
            "x-y" => Term::Difference,
            "x/y" => Term::Quotient,
            other => bail!("Unknown combination term '{}'", other),
        })
    }
}

/// A parsed combination string together with the input sizes.
#[derive(Debug, Clone, PartialEq)]
pub struct Combination {
    terms: Vec<Term>,
    x_dim: usize,
    y_dim: usize,
}

impl Combination {
    pub fn parse(text: &str, x_dim: usize, y_dim: usize) -> Result<Self> {
        let terms = text
            .split(',')
            .map(|t| Term::parse(t.trim()))
            .collect::<Result<Vec<_>>>()?;

        for term in &terms {
            if !matches!(term, Term::X | Term::Y) {
                ensure!(
                    x_dim == y_dim,
                    "Combination '{}' needs equal input sizes, got {} and {}",
                    text, x_dim, y_dim
                );
            }
        }

        Ok(Self { terms, x_dim, y_dim })
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    fn term_dim(&self, term: Term) -> usize {
        match term {
            Term::Y => self.y_dim,
            _ => self.x_dim,
        }
    }

    /// Length of the concatenated feature vector, i.e. of the weights.
    pub fn output_dim(&self) -> usize {
        self.terms.iter().map(|&t| self.term_dim(t)).sum()
    }

    /// `w · combine(m1[i], m2[j]) + b` for every row pair:
    /// `[B, N1, D1]` × `[B, N2, D2]` → `[B, N1, N2]`.
    pub fn scores<B: Backend>(
        &self,
        matrix_1: Tensor<B, 3>,
        matrix_2: Tensor<B, 3>,
        weights:  Tensor<B, 1>,
        bias:     Tensor<B, 1>,
    ) -> Tensor<B, 3> {
        let [batch, rows, _] = matrix_1.dims();
        let [_, cols, _]     = matrix_2.dims();

        let mut scores = Tensor::<B, 3>::zeros([batch, rows, cols], &matrix_1.device())
            + bias.reshape([1, 1, 1]);

        let mut offset = 0;
        for &term in &self.terms {
            let dim = self.term_dim(term);
            let w   = weights.clone().slice([offset..offset + dim]).reshape([1, 1, dim]);
            offset += dim;

            scores = match term {
                Term::X => scores + row_part(&matrix_1, &w),
                Term::Y => scores + col_part(&matrix_2, &w),
                Term::Sum => scores + row_part(&matrix_1, &w) + col_part(&matrix_2, &w),
                Term::Difference => scores + row_part(&matrix_1, &w) - col_part(&matrix_2, &w),
                Term::Product => {
                    scores + (matrix_1.clone() * w).matmul(matrix_2.clone().swap_dims(1, 2))
                }
                Term::Quotient => {
                    scores + (matrix_1.clone() * w).matmul(matrix_2.clone().recip().swap_dims(1, 2))
                }
            };
        }

        scores
    }
}

/// `m1 · w` per row → `[B, N1, 1]`
fn row_part<B: Backend>(matrix: &Tensor<B, 3>, w: &Tensor<B, 3>) -> Tensor<B, 3> {
    (matrix.clone() * w.clone()).sum_dim(2)
}

/// `m2 · w` per row, laid out along the last axis → `[B, 1, N2]`
fn col_part<B: Backend>(matrix: &Tensor<B, 3>, w: &Tensor<B, 3>) -> Tensor<B, 3> {
    (matrix.clone() * w.clone()).sum_dim(2).swap_dims(1, 2)
}

// ─── LinearWeights ────────────────────────────────────────────────────────────
/// The learned parameters of a linear scorer.
#[derive(Clone)]
pub struct LinearWeights<B: Backend> {
    pub combination:   Combination,
    pub weight_vector: Param<Tensor<B, 1>>,
    pub bias:          Param<Tensor<B, 1>>,
}

impl<B: Backend> LinearWeights<B> {
    /// Weights uniform in ±sqrt(6 / (len + 1)), bias zero.
    pub fn init(
        tensor_1_dim: usize,
        tensor_2_dim: usize,
        combination:  &str,
        device:       &B::Device,
    ) -> Result<Self> {
        let combination = Combination::parse(combination, tensor_1_dim, tensor_2_dim)?;
        let len   = combination.output_dim();
        let bound = (6.0 / (len as f64 + 1.0)).sqrt();

        let weights = Tensor::<B, 1>::random([len], Distribution::Uniform(-bound, bound), device);
        let bias    = Tensor::<B, 1>::zeros([1], device);

        Ok(Self {
            combination,
            weight_vector: Param::from_tensor(weights),
            bias:          Param::from_tensor(bias),
        })
    }

    /// Replace the parameters with fixed values.
    pub fn set(&mut self, weights: Tensor<B, 1>, bias: f32) -> Result<()> {
        let [len] = weights.dims();
        ensure!(
            len == self.combination.output_dim(),
            "Expected {} weights for this combination, got {}",
            self.combination.output_dim(), len
        );
        let device = weights.device();
        self.weight_vector = Param::from_tensor(weights);
        self.bias = Param::from_tensor(Tensor::<B, 1>::from_floats([bias], &device));
        Ok(())
    }

    pub fn scores(&self, matrix_1: Tensor<B, 3>, matrix_2: Tensor<B, 3>) -> Tensor<B, 3> {
        self.combination
            .scores(matrix_1, matrix_2, self.weight_vector.val(), self.bias.val())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    type TestBackend = burn::backend::NdArray;

    fn values(t: Tensor<TestBackend, 3>) -> Vec<f32> {
        t.into_data().to_vec::<f32>().unwrap()
    }

    #[test]
    fn test_parse_terms() {
        let c = Combination::parse("x, y,x*y", 3, 3).unwrap();
        assert_eq!(c.terms(), &[Term::X, Term::Y, Term::Product]);
        assert_eq!(c.output_dim(), 9);
    }

    #[test]
    fn test_unequal_dims_only_for_plain_terms() {
        assert_eq!(Combination::parse("x,y", 2, 5).unwrap().output_dim(), 7);
        assert!(Combination::parse("x,x*y", 2, 5).is_err());
    }

    #[test]
    fn test_unknown_term() {
        assert!(Combination::parse("x,z", 3, 3).is_err());
        assert!(Combination::parse("", 3, 3).is_err());
    }

    #[test]
    fn test_product_term_matches_manual_sum() {
        let device = Default::default();
        let m1 = Tensor::<TestBackend, 3>::from_floats([[[1.0, 2.0]]], &device);
        let m2 = Tensor::<TestBackend, 3>::from_floats([[[3.0, 4.0], [5.0, 6.0]]], &device);
        let w  = Tensor::<TestBackend, 1>::from_floats([0.5, 2.0], &device);
        let b  = Tensor::<TestBackend, 1>::from_floats([1.0], &device);

        let c   = Combination::parse("x*y", 2, 2).unwrap();
        let out = values(c.scores(m1, m2, w, b));
        // 0.5*1*3 + 2*2*4 + 1 = 18.5 ; 0.5*1*5 + 2*2*6 + 1 = 27.5
        assert_abs_diff_eq!(out[0], 18.5, epsilon = 1e-4);
        assert_abs_diff_eq!(out[1], 27.5, epsilon = 1e-4);
    }

    #[test]
    fn test_difference_and_quotient_terms() {
        let device = Default::default();
        let m1 = Tensor::<TestBackend, 3>::from_floats([[[4.0]]], &device);
        let m2 = Tensor::<TestBackend, 3>::from_floats([[[2.0]]], &device);
        let w  = Tensor::<TestBackend, 1>::from_floats([1.0, 3.0], &device);
        let b  = Tensor::<TestBackend, 1>::from_floats([0.0], &device);

        let c   = Combination::parse("x-y,x/y", 1, 1).unwrap();
        let out = values(c.scores(m1, m2, w, b));
        // 1*(4-2) + 3*(4/2) = 8
        assert_abs_diff_eq!(out[0], 8.0, epsilon = 1e-4);
    }

    #[test]
    fn test_init_shapes_and_bounds() {
        let device  = Default::default();
        let weights = LinearWeights::<TestBackend>::init(3, 3, "x,y", &device).unwrap();
        let w: Vec<f32> = weights.weight_vector.val().into_data().to_vec().unwrap();
        let b: Vec<f32> = weights.bias.val().into_data().to_vec().unwrap();

        let bound = (6.0f32 / 7.0).sqrt();
        assert_eq!(w.len(), 6);
        assert!(w.iter().all(|v| v.abs() <= bound));
        assert_eq!(b, vec![0.0]);
    }

    #[test]
    fn test_set_rejects_wrong_length() {
        let device  = Default::default();
        let mut lin = LinearWeights::<TestBackend>::init(3, 3, "x,y", &device).unwrap();
        let short   = Tensor::<TestBackend, 1>::from_floats([1.0, 2.0], &device);
        assert!(lin.set(short, 0.0).is_err());
    }
}
