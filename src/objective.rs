use ndarray::{Array2, Zip};

use crate::error::{NmfError, NumericalStep};

/// Generalized Poisson log-likelihood: sum(X * ln(XA) - XA).
///
/// Higher is better. Every entry of `approx` must be strictly positive and
/// finite; a zero entry would put `ln(0)` into the sum, so it is reported as
/// a numerical error instead of being propagated.
pub fn objective(orig: &Array2<f64>, approx: &Array2<f64>) -> Result<f64, NmfError> {
    if orig.dim() != approx.dim() {
        return Err(NmfError::invalid(format!(
            "objective shape mismatch: {:?} vs {:?}",
            orig.dim(),
            approx.dim()
        )));
    }
    if approx.iter().any(|&v| v <= 0.0 || !v.is_finite()) {
        return Err(NmfError::numerical(NumericalStep::Objective, 0));
    }

    let score = Zip::from(orig)
        .and(approx)
        .fold(0.0, |acc, &x, &xa| acc + x * xa.ln() - xa);

    if !score.is_finite() {
        return Err(NmfError::numerical(NumericalStep::Objective, 0));
    }
    Ok(score)
}

/// Frobenius norm ||X - W*H||_F
pub fn reconstruction_error(x: &Array2<f64>, w: &Array2<f64>, h: &Array2<f64>) -> f64 {
    let approx = w.dot(h);
    let diff = x - &approx;
    diff.mapv(|v| v * v).sum().sqrt()
}

/// ||X - W*H||_F / ||X||_F, or the raw error when X is all zeros
pub fn relative_reconstruction_error(x: &Array2<f64>, w: &Array2<f64>, h: &Array2<f64>) -> f64 {
    let error = reconstruction_error(x, w, h);
    let x_norm = x.mapv(|v| v * v).sum().sqrt();
    if x_norm > 0.0 {
        error / x_norm
    } else {
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_objective_of_matrix_with_itself() {
        let x = array![[1.0, 2.0, 3.0], [0.5, 4.0, 7.0]];
        let expected: f64 = x.iter().map(|&v: &f64| v * v.ln() - v).sum();

        let first = objective(&x, &x).unwrap();
        let second = objective(&x, &x).unwrap();
        assert!((first - expected).abs() < 1e-12);
        assert_eq!(first, second);
    }

    #[test]
    fn test_objective_zero_counts_contribute_only_minus_xa() {
        let x = array![[0.0, 0.0]];
        let xa = array![[2.0, 3.0]];
        let score = objective(&x, &xa).unwrap();
        assert!((score + 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_objective_prefers_better_fit() {
        let x = array![[4.0, 1.0], [2.0, 8.0]];
        let close = array![[3.9, 1.1], [2.1, 7.8]];
        let far = array![[1.0, 5.0], [6.0, 1.0]];
        assert!(objective(&x, &close).unwrap() > objective(&x, &far).unwrap());
    }

    #[test]
    fn test_objective_rejects_zero_reconstruction() {
        let x = array![[1.0, 2.0]];
        let xa = array![[1.0, 0.0]];
        assert_eq!(
            objective(&x, &xa),
            Err(NmfError::NumericalError {
                step: NumericalStep::Objective,
                iteration: 0
            })
        );
    }

    #[test]
    fn test_objective_rejects_nan_reconstruction() {
        let x = array![[1.0, 2.0]];
        let xa = array![[1.0, f64::NAN]];
        assert!(matches!(
            objective(&x, &xa),
            Err(NmfError::NumericalError { .. })
        ));
    }

    #[test]
    fn test_objective_shape_mismatch() {
        let x = array![[1.0, 2.0]];
        let xa = array![[1.0], [2.0]];
        assert!(matches!(objective(&x, &xa), Err(NmfError::InvalidInput(_))));
    }

    #[test]
    fn test_reconstruction_error_exact_product() {
        let w = array![[1.0], [2.0]];
        let h = array![[3.0, 4.0]];
        let x = w.dot(&h);
        assert!(reconstruction_error(&x, &w, &h) < 1e-12);
        assert!(relative_reconstruction_error(&x, &w, &h) < 1e-12);
    }

    #[test]
    fn test_relative_error_of_zero_matrix() {
        let x = Array2::<f64>::zeros((2, 2));
        let w = array![[1.0], [0.0]];
        let h = array![[1.0, 0.0]];
        assert!((relative_reconstruction_error(&x, &w, &h) - 1.0).abs() < 1e-12);
    }
}
