//! Jacobi command-line interface.
//!
//! Reads a dense system from standard input (or `--input`) and prints the
//! iteration count and final test-row residual:
//! ```sh
//! jacobi < system.txt
//! jacobi 4 < system.txt
//! jacobi 8 --backend pool --solution out.json < system.txt
//! ```

mod config;
mod runner;

use clap::Parser;
use std::path::PathBuf;

use config::{BackendKind, InputSource, RunConfig};

#[derive(Parser)]
#[command(name = "jacobi")]
#[command(about = "Jacobi iterative solver for dense linear systems")]
#[command(version)]
struct Cli {
    /// Number of worker threads sharing each iteration.
    #[arg(default_value_t = 1)]
    n_threads: usize,
    /// How worker threads are managed between iterations.
    #[arg(short, long, value_enum, default_value_t = BackendKind::ForkJoin)]
    backend: BackendKind,
    /// Read the system from this file instead of standard input.
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// Also write the report and final estimate as JSON.
    #[arg(short, long)]
    solution: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = RunConfig {
        n_threads: cli.n_threads,
        backend: cli.backend,
        input: cli.input.map_or(InputSource::Stdin, InputSource::File),
        solution_path: cli.solution,
    };

    let output = runner::run(&config)?;
    println!("{}", runner::summary_line(&output.report));

    if let Some(path) = &config.solution_path {
        runner::write_solution_json(&output, path)?;
    }
    Ok(())
}
