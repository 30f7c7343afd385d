use std::error::Error;
use std::fmt;

/// Step of the multiplicative-update iteration that produced a bad value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericalStep {
    Reconstruction,
    Objective,
    UpdateW,
    Normalization,
    UpdateH,
}

impl fmt::Display for NumericalStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NumericalStep::Reconstruction => "reconstruction W*H",
            NumericalStep::Objective => "objective evaluation",
            NumericalStep::UpdateW => "W update",
            NumericalStep::Normalization => "W column normalization",
            NumericalStep::UpdateH => "H update",
        };
        write!(f, "{}", name)
    }
}

/// Errors raised by the factorization routines.
///
/// Hitting the iteration cap is not an error; it is reported through
/// [`crate::FactorizationStatus::MaxIterReached`].
#[derive(Debug, Clone, PartialEq)]
pub enum NmfError {
    /// Rejected before any computation starts
    InvalidInput(String),
    /// Zero reconstruction entry under a log, or NaN/Inf anywhere in the run
    NumericalError {
        step: NumericalStep,
        iteration: usize,
    },
    /// A column of W summed to zero during renormalization
    DegenerateFactor { column: usize, iteration: usize },
}

impl NmfError {
    pub(crate) fn invalid<S: Into<String>>(msg: S) -> Self {
        NmfError::InvalidInput(msg.into())
    }

    pub(crate) fn numerical(step: NumericalStep, iteration: usize) -> Self {
        NmfError::NumericalError { step, iteration }
    }

    /// Attach the iteration index to an error raised by a helper that does not know it
    pub(crate) fn at_iteration(self, iteration: usize) -> Self {
        match self {
            NmfError::NumericalError { step, .. } => NmfError::NumericalError { step, iteration },
            NmfError::DegenerateFactor { column, .. } => {
                NmfError::DegenerateFactor { column, iteration }
            }
            other => other,
        }
    }
}

impl fmt::Display for NmfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NmfError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            NmfError::NumericalError { step, iteration } => write!(
                f,
                "Numerical error during {} at iteration {}",
                step, iteration
            ),
            NmfError::DegenerateFactor { column, iteration } => write!(
                f,
                "Degenerate factor: column {} of W sums to zero at iteration {}",
                column, iteration
            ),
        }
    }
}

impl Error for NmfError {}
