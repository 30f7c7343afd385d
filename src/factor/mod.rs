use ndarray::Array2;

use crate::error::NmfError;

pub mod normalization;
pub mod rank_one;
pub mod update_rules;
pub mod updater;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-exports for convenience
pub use rank_one::{rank_one_factorize, RankOneResult};
pub use updater::{
    factorize, factorize_with_config, FactorizationResult, FactorizationStatus,
    MultiplicativeUpdater,
};

/// Reject empty matrices and any negative or non-finite entry
pub fn check_input(x: &Array2<f64>) -> Result<(), NmfError> {
    if x.is_empty() {
        return Err(NmfError::invalid(format!(
            "input matrix is empty ({} x {})",
            x.nrows(),
            x.ncols()
        )));
    }
    if let Some(((i, j), &v)) = x.indexed_iter().find(|(_, &v)| v < 0.0 || !v.is_finite()) {
        return Err(NmfError::invalid(format!(
            "entry ({}, {}) = {} is not a finite nonnegative number",
            i, j, v
        )));
    }
    Ok(())
}
