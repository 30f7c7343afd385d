use ndarray::{Array1, Array2, Axis};

use crate::error::{NmfError, NumericalStep};

/// Scale each column of W to sum to 1:
///   DW = diag(W.sum(axis=0) ^ -1)
///   W  = W * DW
///
/// Returns the column sums before scaling. A zero column sum is a
/// degenerate factor and is reported rather than divided through.
pub fn normalize_columns(w: &mut Array2<f64>) -> Result<Array1<f64>, NmfError> {
    let col_sums = w.sum_axis(Axis(0));

    for (j, &cs) in col_sums.iter().enumerate() {
        if !cs.is_finite() {
            return Err(NmfError::numerical(NumericalStep::Normalization, 0));
        }
        if cs == 0.0 {
            return Err(NmfError::DegenerateFactor {
                column: j,
                iteration: 0,
            });
        }
    }

    for (j, &cs) in col_sums.iter().enumerate() {
        w.column_mut(j).mapv_inplace(|v| v / cs);
    }

    Ok(col_sums)
}
