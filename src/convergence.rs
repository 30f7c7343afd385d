use statrs::statistics::Statistics;

use crate::error::NmfError;

pub const DEFAULT_EPSILON: f64 = 1e-6;
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Ring buffer of recent objective values used to detect a stalled iteration.
///
/// Each [`check`](ConvergenceTracker::check) compares the incoming value with
/// the mean of the whole buffer, then overwrites the oldest slot. Slots start
/// at zero and count toward the mean until they are overwritten, so the first
/// `capacity` values are compared against a mean pulled toward zero.
#[derive(Debug, Clone)]
pub struct ConvergenceTracker {
    values: Vec<f64>,
    position: usize,
    recorded: usize,
    epsilon: f64,
}

impl ConvergenceTracker {
    pub fn new(capacity: usize, epsilon: f64) -> Result<Self, NmfError> {
        if capacity == 0 {
            return Err(NmfError::invalid("history capacity must be at least 1"));
        }
        if !epsilon.is_finite() || epsilon < 0.0 {
            return Err(NmfError::invalid(format!(
                "epsilon must be a finite nonnegative number, got {}",
                epsilon
            )));
        }
        Ok(Self {
            values: vec![0.0; capacity],
            position: 0,
            recorded: 0,
            epsilon,
        })
    }

    pub fn capacity(&self) -> usize {
        self.values.len()
    }

    /// Number of slots overwritten by a recorded value (saturates at capacity)
    pub fn len(&self) -> usize {
        self.recorded.min(self.values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.recorded == 0
    }

    pub fn is_full(&self) -> bool {
        self.recorded >= self.values.len()
    }

    /// Mean over all `capacity` slots, including those still at zero
    pub fn mean(&self) -> f64 {
        self.values.iter().mean()
    }

    /// Record `value` and report whether it sits within epsilon of the buffer mean.
    ///
    /// The comparison uses the buffer as it was before this call.
    pub fn check(&mut self, value: f64) -> bool {
        let converged = (value - self.mean()).abs() < self.epsilon;

        let capacity = self.values.len();
        self.values[self.position] = value;
        self.position = (self.position + 1) % capacity;
        self.recorded += 1;

        converged
    }
}
