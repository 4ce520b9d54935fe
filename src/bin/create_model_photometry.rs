//! Computes the model photometry matrix of a parameter grid.
//!
//! Usage:
//! ```text
//! create-model-photometry --sed-root-path seds --sed-group CWW \
//!     --reddening-curve-list none --ebv-start 0 \
//!     --z-start 0 --z-stop 2 --z-step 0.01 \
//!     --filter-root-path filters --filter-group sdss \
//!     --binary-photometry-matrix models.bin
//! ```

use std::process::ExitCode;

use clap::Parser;
use log::{LevelFilter, error};
use phz_model::{ModelingArgs, ModelingConfig, NeverAbort};

fn main() -> ExitCode {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = ModelingArgs::parse();
    match ModelingConfig::from_args(&args).and_then(|config| config.run(&NeverAbort)) {
        Ok(matrix) => {
            println!("{}", matrix.summary());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
