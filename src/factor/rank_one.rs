use ndarray::{Array1, Array2, Axis};
use statrs::statistics::Statistics;

use super::check_input;
use crate::error::NmfError;

/// Result of the closed-form rank-1 factorization: X ≈ w * h^T
#[derive(Debug, Clone)]
pub struct RankOneResult {
    /// Length m; equal to the first column of X
    pub w: Array1<f64>,
    /// Length n; h[0] = 1
    pub h: Array1<f64>,
}

impl RankOneResult {
    /// Outer product w * h^T
    pub fn reconstruct(&self) -> Array2<f64> {
        let col = self.w.view().insert_axis(Axis(1));
        let row = self.h.view().insert_axis(Axis(0));
        col.dot(&row)
    }
}

/// Single-pass rank-1 factorization.
///
/// w is taken as the first column of X, which fixes the scale so that
/// h[0] = 1. Every other column is projected onto w / ||w|| and h[i] is the
/// mean of projected / w over the entries where w is nonzero. Zero columns,
/// or an all-zero first column, give h[i] = 0. No residual is checked, so
/// inputs without rank-1 structure get a best-effort answer.
pub fn rank_one_factorize(x: &Array2<f64>) -> Result<RankOneResult, NmfError> {
    check_input(x)?;

    let n = x.ncols();
    let w = x.column(0).to_owned();
    let norm = w.dot(&w).sqrt();
    let support: Vec<usize> = w
        .iter()
        .enumerate()
        .filter(|(_, &v)| v != 0.0)
        .map(|(idx, _)| idx)
        .collect();

    let mut h = Array1::zeros(n);
    h[0] = 1.0;
    if norm == 0.0 || support.is_empty() {
        return Ok(RankOneResult { w, h });
    }

    let unit = &w / norm;
    for i in 1..n {
        let column = x.column(i);
        let projected = &unit * column.dot(&unit);
        h[i] = support
            .iter()
            .map(|&j| projected[j] / w[j])
            .mean();
    }

    Ok(RankOneResult { w, h })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factor::test_utils::{outer, random_positive};
    use ndarray::array;

    #[test]
    fn test_exact_rank_one_roundtrip() {
        let w = array![5.0, 3.0, 7.0];
        let h = array![0.1, 2.0, 3.0, 0.7];
        let x = outer(&w, &h);

        let result = rank_one_factorize(&x).unwrap();
        assert_eq!(result.w.len(), 3);
        assert_eq!(result.h.len(), 4);
        assert_eq!(result.h[0], 1.0);

        let approx = result.reconstruct();
        for (a, b) in approx.iter().zip(x.iter()) {
            assert!((a - b).abs() < 1e-9, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_h_is_least_squares_multiplier() {
        let x = array![[1.0, 2.0, 0.5], [2.0, 4.0, 1.0]];
        let result = rank_one_factorize(&x).unwrap();
        assert_eq!(result.w, array![1.0, 2.0]);
        assert!((result.h[1] - 2.0).abs() < 1e-12);
        assert!((result.h[2] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_zero_column_gives_zero_weight() {
        let x = array![[1.0, 0.0, 3.0], [2.0, 0.0, 6.0]];
        let result = rank_one_factorize(&x).unwrap();
        assert_eq!(result.h[1], 0.0);
        assert!((result.h[2] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_first_column_does_not_divide() {
        let x = array![[0.0, 1.0], [0.0, 2.0]];
        let result = rank_one_factorize(&x).unwrap();
        assert_eq!(result.h, array![1.0, 0.0]);
        assert!(result.reconstruct().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_sparse_first_column_skips_zero_entries() {
        // w has a zero entry; the mean runs over the nonzero support only
        let x = array![[2.0, 4.0], [0.0, 5.0], [1.0, 2.0]];
        let result = rank_one_factorize(&x).unwrap();
        assert!(result.h.iter().all(|v| v.is_finite()));
        assert!((result.h[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_column_input() {
        let x = array![[3.0], [4.0]];
        let result = rank_one_factorize(&x).unwrap();
        assert_eq!(result.h, array![1.0]);
        assert_eq!(result.reconstruct(), x);
    }

    #[test]
    fn test_general_input_is_nonnegative_best_effort() {
        let x = random_positive(6, 9, 0.5, 5.0, 11);
        let result = rank_one_factorize(&x).unwrap();
        assert!(result.w.iter().all(|&v| v >= 0.0));
        assert!(result.h.iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert!(matches!(
            rank_one_factorize(&array![[1.0, -2.0]]),
            Err(NmfError::InvalidInput(_))
        ));
        assert!(matches!(
            rank_one_factorize(&Array2::<f64>::zeros((0, 3))),
            Err(NmfError::InvalidInput(_))
        ));
    }
}
