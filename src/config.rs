/**
 * File: /src/config.rs
 * Created Date: Saturday, October 17th 2026
 * Author: Zihan
 * -----
 * Last Modified: Saturday, 17th October 2026 3:12:08 pm
 * Modified By: the developer formerly known as Zihan at <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-17		Zihan	Solver configuration for Poisson NMF
 */
use std::fs::File;

use ndarray::Array2;
use ndarray_npy::ReadNpyExt;
use serde::{Deserialize, Serialize};

use crate::convergence::{DEFAULT_EPSILON, DEFAULT_HISTORY_CAPACITY};
use crate::error::NmfError;

/// Parameters of one factorization call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NmfConfig {
    /// Inner dimension r of W (m x r) and H (r x n)
    pub rank: usize,
    /// Hard cap on outer iterations
    pub max_iter: usize,
    /// Convergence threshold on |objective - mean(history)|
    pub epsilon: f64,
    /// Ring buffer size of the objective history
    pub history_capacity: usize,
    /// Number of random restarts; the highest final objective wins
    pub n_init: usize,
    pub seed: Option<u64>,
    /// Use rayon for the elementwise kernels
    pub parallel: bool,
}

impl Default for NmfConfig {
    fn default() -> Self {
        Self {
            rank: 2,
            max_iter: 1000,
            epsilon: DEFAULT_EPSILON,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            n_init: 1,
            seed: None,
            parallel: false,
        }
    }
}

impl NmfConfig {
    pub fn with_rank(rank: usize) -> Self {
        Self {
            rank,
            ..Default::default()
        }
    }

    /// Check the parameters against an input of shape `(m, n)`
    pub fn validate(&self, shape: (usize, usize)) -> Result<(), NmfError> {
        let (m, n) = shape;
        if m == 0 || n == 0 {
            return Err(NmfError::invalid(format!(
                "input matrix is empty ({} x {})",
                m, n
            )));
        }
        if self.rank == 0 {
            return Err(NmfError::invalid("rank must be at least 1"));
        }
        if self.rank > m.min(n) {
            return Err(NmfError::invalid(format!(
                "rank {} exceeds min(m, n) = {}",
                self.rank,
                m.min(n)
            )));
        }
        if self.history_capacity == 0 {
            return Err(NmfError::invalid("history capacity must be at least 1"));
        }
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(NmfError::invalid(format!(
                "epsilon must be a finite nonnegative number, got {}",
                self.epsilon
            )));
        }
        if self.n_init == 0 {
            return Err(NmfError::invalid("n_init must be at least 1"));
        }
        Ok(())
    }
}

/// Command line configuration for the `poisson_nmf` binary
pub struct Config {
    matrix: Array2<f64>,
    nmf: NmfConfig,
}

impl Config {
    /// constructor
    ///
    /// # Examples
    /// ```bash
    /// $ cargo run -- data/counts.npy 4 1000 1e-6 10
    /// ```
    pub fn new(mut args: impl Iterator<Item = String>) -> Result<Config, Box<dyn std::error::Error>> {
        // args:
        // 0: program name
        // 1: matrix path
        // 2: rank
        // 3: max_iter (optional)
        // 4: epsilon (optional)
        // 5: history capacity (optional)
        args.next();
        let path = args.next().ok_or("missing matrix path")?;
        let rank = args.next().ok_or("missing rank")?.parse::<usize>()?;

        let mut nmf = NmfConfig::with_rank(rank);
        if let Some(max_iter) = args.next() {
            nmf.max_iter = max_iter.parse::<usize>()?;
        }
        if let Some(epsilon) = args.next() {
            nmf.epsilon = epsilon.parse::<f64>()?;
        }
        if let Some(capacity) = args.next() {
            nmf.history_capacity = capacity.parse::<usize>()?;
        }

        let reader = File::open(&path)?;
        let matrix = Array2::<f64>::read_npy(reader)?;
        nmf.validate(matrix.dim())?;

        Ok(Config { matrix, nmf })
    }

    pub fn get_matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    pub fn get_nmf(&self) -> &NmfConfig {
        &self.nmf
    }

    pub fn get_row(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn get_col(&self) -> usize {
        self.matrix.ncols()
    }
}
