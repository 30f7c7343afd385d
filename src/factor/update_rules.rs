use ndarray::{Array2, Zip};

use crate::error::{NmfError, NumericalStep};

/// XA = W * H, rejecting entries that are zero or non-finite
pub fn reconstruct(w: &Array2<f64>, h: &Array2<f64>) -> Result<Array2<f64>, NmfError> {
    let xa = w.dot(h);
    if xa.iter().any(|&v| v <= 0.0 || !v.is_finite()) {
        return Err(NmfError::numerical(NumericalStep::Reconstruction, 0));
    }
    Ok(xa)
}

/// Elementwise ratio X / XA. `xa` must come from [`reconstruct`].
pub fn ratio(x: &Array2<f64>, xa: &Array2<f64>, parallel: bool) -> Array2<f64> {
    if parallel {
        Zip::from(x).and(xa).par_map_collect(|&x, &xa| x / xa)
    } else {
        Zip::from(x).and(xa).map_collect(|&x, &xa| x / xa)
    }
}

/// Elementwise in-place update: base *= coeff
pub fn multiplicative_update(base: &mut Array2<f64>, coeff: &Array2<f64>, parallel: bool) {
    if parallel {
        Zip::from(base).and(coeff).par_for_each(|b, &c| *b *= c);
    } else {
        Zip::from(base).and(coeff).for_each(|b, &c| *b *= c);
    }
}

/// W[i,a] *= sum_mu R[i,mu] * H[a,mu], i.e. W *= R * H^T
pub fn update_w(
    w: &mut Array2<f64>,
    ratio: &Array2<f64>,
    h: &Array2<f64>,
    parallel: bool,
) -> Result<(), NmfError> {
    let coeff = ratio.dot(&h.t()); // m×r
    multiplicative_update(w, &coeff, parallel);
    ensure_finite(w, NumericalStep::UpdateW)
}

/// H[a,mu] *= sum_i W[i,a] * R[i,mu], i.e. H *= W^T * R
///
/// `ratio` is the one used for the preceding W update; it is not rebuilt from
/// the updated W.
pub fn update_h(
    h: &mut Array2<f64>,
    w: &Array2<f64>,
    ratio: &Array2<f64>,
    parallel: bool,
) -> Result<(), NmfError> {
    let coeff = w.t().dot(ratio); // r×n
    multiplicative_update(h, &coeff, parallel);
    ensure_finite(h, NumericalStep::UpdateH)
}

fn ensure_finite(a: &Array2<f64>, step: NumericalStep) -> Result<(), NmfError> {
    if a.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(NmfError::numerical(step, 0))
    }
}
