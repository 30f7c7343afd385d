/*
 * File: /src/lib.rs
 * Created Date: Saturday, October 17th 2026
 * Author: Zihan
 * -----
 * Last Modified: Saturday, 17th October 2026 2:40:19 pm
 * Modified By: the developer formerly known as Zihan at <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-17		Zihan	Poisson NMF with multiplicative updates
 */
//! Nonnegative matrix factorization under the generalized Poisson
//! log-likelihood, solved with multiplicative updates, plus a closed-form
//! rank-1 solver.
//!
//! ```no_run
//! use ndarray::array;
//! use poisson_nmf::{factorize, FactorizationStatus};
//!
//! let x = array![[1.0, 2.0, 3.0], [2.0, 4.0, 6.0]];
//! let result = factorize(&x, 1, 1000, 1e-6, 10).unwrap();
//! assert_eq!(result.status, FactorizationStatus::Converged);
//! ```
pub mod config;
pub mod convergence;
pub mod error;
pub mod factor;
pub mod objective;

use chrono::Local;
use log::{LevelFilter, SetLoggerError};

pub use config::NmfConfig;
pub use convergence::ConvergenceTracker;
pub use error::{NmfError, NumericalStep};
pub use factor::{
    factorize, factorize_with_config, rank_one_factorize, FactorizationResult,
    FactorizationStatus, MultiplicativeUpdater, RankOneResult,
};
pub use objective::{objective, reconstruction_error, relative_reconstruction_error};

/// Install `simple_logger` at the given level
pub fn init_logger(level: LevelFilter) -> Result<(), SetLoggerError> {
    simple_logger::SimpleLogger::new().with_level(level).init()
}

/// Wall-clock time used in run banners
pub fn timestamp() -> String {
    Local::now().format("%H:%M:%S").to_string()
}
