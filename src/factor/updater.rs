use std::time::Instant;

use log::{debug, info, warn};
use ndarray::Array2;
use ndarray_rand::rand::rngs::StdRng;
use ndarray_rand::rand::SeedableRng;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rayon::prelude::*;

use super::check_input;
use super::normalization::normalize_columns;
use super::update_rules::{ratio, reconstruct, update_h, update_w};
use crate::config::NmfConfig;
use crate::convergence::ConvergenceTracker;
use crate::error::NmfError;
use crate::objective::objective;

/// How a factorization run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactorizationStatus {
    /// The objective settled within epsilon of its recent history
    Converged,
    /// The iteration cap was hit first; the factors are the latest ones
    MaxIterReached,
}

/// Result of a factorization: X ≈ W * H
#[derive(Debug, Clone)]
pub struct FactorizationResult {
    /// m×r, each column sums to 1 once at least one update has run
    pub w: Array2<f64>,
    /// r×n
    pub h: Array2<f64>,
    pub status: FactorizationStatus,
    /// Number of update steps applied
    pub iterations: usize,
    /// Objective of the returned factors
    pub objective: f64,
    /// Objective evaluated at the start of every iteration, in order
    pub objective_trace: Vec<f64>,
}

impl FactorizationResult {
    pub fn reconstruct(&self) -> Array2<f64> {
        self.w.dot(&self.h)
    }

    pub fn is_converged(&self) -> bool {
        self.status == FactorizationStatus::Converged
    }
}

/// Multiplicative-update solver for the Poisson (KL) objective.
///
/// Owns W and H for the duration of one run. Each [`step`](Self::step):
/// 1. XA = W * H
/// 2. evaluate sum(X ln XA - XA) and stop if the history says it stalled
/// 3. W *= (X / XA) * H^T
/// 4. normalize the columns of W to sum to 1
/// 5. H *= W^T * (X / XA)
///
/// Step 5 reads the renormalized W but the XA from step 1. XA is
/// deliberately not recomputed between the two updates; doing so changes
/// the convergence path.
pub struct MultiplicativeUpdater<'a> {
    x: &'a Array2<f64>,
    w: Array2<f64>,
    h: Array2<f64>,
    tracker: ConvergenceTracker,
    max_iter: usize,
    parallel: bool,
    iteration: usize,
    trace: Vec<f64>,
    status: Option<FactorizationStatus>,
}

impl<'a> MultiplicativeUpdater<'a> {
    /// Validate the input and draw W, H from Uniform[0, 1)
    pub fn new(x: &'a Array2<f64>, config: &NmfConfig, seed: u64) -> Result<Self, NmfError> {
        check_input(x)?;
        config.validate(x.dim())?;
        Self::seeded(x, config, seed)
    }

    /// Start from caller-supplied factors
    pub fn from_factors(
        x: &'a Array2<f64>,
        w: Array2<f64>,
        h: Array2<f64>,
        config: &NmfConfig,
    ) -> Result<Self, NmfError> {
        check_input(x)?;
        config.validate(x.dim())?;

        let (m, n) = x.dim();
        let r = config.rank;
        if w.dim() != (m, r) || h.dim() != (r, n) {
            return Err(NmfError::invalid(format!(
                "factor shapes {:?} and {:?} do not match X {:?} at rank {}",
                w.dim(),
                h.dim(),
                x.dim(),
                r
            )));
        }
        check_input(&w).map_err(|e| name_factor("W", e))?;
        check_input(&h).map_err(|e| name_factor("H", e))?;

        Self::with_factors(x, w, h, config)
    }

    /// Random init for an X and config that have already been validated
    fn seeded(x: &'a Array2<f64>, config: &NmfConfig, seed: u64) -> Result<Self, NmfError> {
        let (m, n) = x.dim();
        let r = config.rank;
        let mut rng = StdRng::seed_from_u64(seed);
        let w = Array2::random_using((m, r), Uniform::new(0.0, 1.0), &mut rng);
        let h = Array2::random_using((r, n), Uniform::new(0.0, 1.0), &mut rng);

        Self::with_factors(x, w, h, config)
    }

    fn with_factors(
        x: &'a Array2<f64>,
        w: Array2<f64>,
        h: Array2<f64>,
        config: &NmfConfig,
    ) -> Result<Self, NmfError> {
        Ok(Self {
            x,
            w,
            h,
            tracker: ConvergenceTracker::new(config.history_capacity, config.epsilon)?,
            max_iter: config.max_iter,
            parallel: config.parallel,
            iteration: 0,
            trace: Vec::new(),
            status: None,
        })
    }

    pub fn w(&self) -> &Array2<f64> {
        &self.w
    }

    pub fn h(&self) -> &Array2<f64> {
        &self.h
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// `None` while still iterating
    pub fn status(&self) -> Option<FactorizationStatus> {
        self.status
    }

    /// Run one iteration. Returns the terminal status once the run has ended.
    pub fn step(&mut self) -> Result<Option<FactorizationStatus>, NmfError> {
        if let Some(status) = self.status {
            return Ok(Some(status));
        }
        let iteration = self.iteration;

        let xa = reconstruct(&self.w, &self.h).map_err(|e| e.at_iteration(iteration))?;
        let value = objective(self.x, &xa).map_err(|e| e.at_iteration(iteration))?;
        self.trace.push(value);
        debug!("iteration {}: objective = {:.6}", iteration, value);

        if self.tracker.check(value) {
            self.status = Some(FactorizationStatus::Converged);
            return Ok(self.status);
        }
        if iteration >= self.max_iter {
            self.status = Some(FactorizationStatus::MaxIterReached);
            return Ok(self.status);
        }

        // R is built once from the pre-update XA and shared by both updates
        let r = ratio(self.x, &xa, self.parallel);
        update_w(&mut self.w, &r, &self.h, self.parallel).map_err(|e| e.at_iteration(iteration))?;
        normalize_columns(&mut self.w).map_err(|e| e.at_iteration(iteration))?;
        update_h(&mut self.h, &self.w, &r, self.parallel).map_err(|e| e.at_iteration(iteration))?;

        self.iteration += 1;
        Ok(None)
    }

    /// Iterate until convergence or the cap and hand the factors back
    pub fn run(mut self) -> Result<FactorizationResult, NmfError> {
        let status = loop {
            if let Some(status) = self.step()? {
                break status;
            }
        };
        let objective = self.trace.last().copied().unwrap_or(f64::NEG_INFINITY);

        Ok(FactorizationResult {
            w: self.w,
            h: self.h,
            status,
            iterations: self.iteration,
            objective,
            objective_trace: self.trace,
        })
    }
}

fn name_factor(name: &str, err: NmfError) -> NmfError {
    match err {
        NmfError::InvalidInput(msg) => NmfError::invalid(format!("factor {}: {}", name, msg)),
        other => other,
    }
}

/// Factorize X ≈ W * H with rank `rank` using one random initialization
pub fn factorize(
    x: &Array2<f64>,
    rank: usize,
    max_iterations: usize,
    epsilon: f64,
    history_capacity: usize,
) -> Result<FactorizationResult, NmfError> {
    let config = NmfConfig {
        rank,
        max_iter: max_iterations,
        epsilon,
        history_capacity,
        ..Default::default()
    };
    factorize_with_config(x, &config)
}

/// Run `config.n_init` random restarts and keep the highest final objective.
///
/// Restarts that fail are logged and skipped; the first error is returned
/// only when every restart fails. The winner does not depend on `parallel`.
/// X and the config are validated once here, not again per restart.
pub fn factorize_with_config(
    x: &Array2<f64>,
    config: &NmfConfig,
) -> Result<FactorizationResult, NmfError> {
    check_input(x)?;
    config.validate(x.dim())?;

    let base_seed = config.seed.unwrap_or(42);
    let run_init = |init_idx: usize| {
        let seed = base_seed.wrapping_add(init_idx as u64);
        let start = Instant::now();
        let outcome = MultiplicativeUpdater::seeded(x, config, seed).and_then(|u| u.run());
        (init_idx, seed, start.elapsed(), outcome)
    };

    // Restarts are independent; with `parallel` they run across the rayon pool
    let outcomes: Vec<_> = if config.parallel && config.n_init > 1 {
        (0..config.n_init).into_par_iter().map(run_init).collect()
    } else {
        (0..config.n_init).map(run_init).collect()
    };

    let mut best: Option<FactorizationResult> = None;
    let mut first_error: Option<NmfError> = None;

    for (init_idx, seed, elapsed, outcome) in outcomes {
        match outcome {
            Ok(result) => {
                info!(
                    "NMF init {} (seed {}): {:?} after {} iterations, objective {:.6}, {:?}",
                    init_idx, seed, result.status, result.iterations, result.objective, elapsed
                );
                let better = best
                    .as_ref()
                    .map_or(true, |b| result.objective > b.objective);
                if better {
                    best = Some(result);
                }
            }
            Err(e) => {
                warn!("NMF init {} (seed {}) failed: {}", init_idx, seed, e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    match (best, first_error) {
        (Some(result), _) => Ok(result),
        (None, Some(e)) => Err(e),
        (None, None) => Err(NmfError::invalid("no initialization was run")),
    }
}
