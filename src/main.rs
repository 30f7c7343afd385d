/*
 * File: /src/main.rs
 * Created Date: Saturday, October 17th 2026
 * Author: Zihan
 * -----
 * Last Modified: Saturday, 17th October 2026 3:30:51 pm
 * Modified By: the developer formerly known as Zihan at <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-17		Zihan	CLI driver for Poisson NMF
 */
use std::error::Error;
use std::process;
use std::time::Instant;

use log::{error, info, LevelFilter};
use ndarray_npy::write_npy;

use poisson_nmf::config::Config;
use poisson_nmf::{factorize_with_config, init_logger, relative_reconstruction_error, timestamp};

const METHOD: &str = "poisson_nmf";

fn run(config: &Config) -> Result<(), Box<dyn Error>> {
    let nmf = config.get_nmf();
    info!(
        "[method: {}] [{}] Matrix {}x{}, rank {}, max_iter {}, epsilon {:e}, history {}",
        METHOD,
        timestamp(),
        config.get_row(),
        config.get_col(),
        nmf.rank,
        nmf.max_iter,
        nmf.epsilon,
        nmf.history_capacity
    );

    let start_time = Instant::now();
    let result = factorize_with_config(config.get_matrix(), nmf)?;
    let error = relative_reconstruction_error(config.get_matrix(), &result.w, &result.h);
    info!(
        "[method: {}] [{}] {:?} after {} iterations in {:?}, objective {:.6}, relative error {:.6}",
        METHOD,
        timestamp(),
        result.status,
        result.iterations,
        start_time.elapsed(),
        result.objective,
        error
    );

    write_npy("W.npy", &result.w)?;
    write_npy("H.npy", &result.h)?;
    info!("[method: {}] [{}] Wrote W.npy and H.npy", METHOD, timestamp());
    Ok(())
}

fn main() {
    init_logger(LevelFilter::Info).expect("Failed to initialize logger");

    let config = Config::new(std::env::args()).unwrap_or_else(|err| {
        eprintln!("Problem parsing arguments: {}", err);
        eprintln!("usage: poisson_nmf <matrix.npy> <rank> [max_iter] [epsilon] [history]");
        process::exit(1);
    });

    if let Err(e) = run(&config) {
        error!("[method: {}] [{}] {}", METHOD, timestamp(), e);
        process::exit(2);
    }
}
