/// Shared test fixtures for the factorization routines
use ndarray::{Array1, Array2, Axis};
use ndarray_rand::rand::rngs::StdRng;
use ndarray_rand::rand::SeedableRng;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;

/// 20x20 block-diagonal matrix: blocks (0,0) and (1,1) are 5.0, the rest 0.1.
/// Exactly rank 2 and strictly positive.
pub fn make_block_diagonal() -> Array2<f64> {
    let n = 20;
    let mut x = Array2::from_elem((n, n), 0.1);
    for i in 0..10 {
        for j in 0..10 {
            x[[i, j]] = 5.0;
            x[[i + 10, j + 10]] = 5.0;
        }
    }
    x
}

/// Outer product w * h^T
pub fn outer(w: &Array1<f64>, h: &Array1<f64>) -> Array2<f64> {
    let col = w.view().insert_axis(Axis(1));
    let row = h.view().insert_axis(Axis(0));
    col.dot(&row)
}

/// m x n matrix of integer counts drawn uniformly from [0, 100)
pub fn random_counts(m: usize, n: usize, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::random_using((m, n), Uniform::new(0u32, 100), &mut rng).mapv(f64::from)
}

/// Strictly positive m x n matrix with entries in [lo, hi)
pub fn random_positive(m: usize, n: usize, lo: f64, hi: f64, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::random_using((m, n), Uniform::new(lo, hi), &mut rng)
}
