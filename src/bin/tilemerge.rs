//! Tilemerge CLI Binary
//!
//! Command-line interface for flattening external tilesets.

use anyhow::Context;
use clap::Parser;
use std::process;
use tilemerge::cli::{map_error, Cli, RunContext};
use tilemerge::logging::init_logging;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    let context = match RunContext::new(&cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    };

    if let Err(e) = init_logging(Some(&context.config().logging)) {
        eprintln!("{}", map_error(&e));
        process::exit(1);
    }

    info!("Tilemerge starting");

    match run(&context) {
        Ok(output) => {
            info!("Command completed successfully");
            println!("{}", output);
        }
        Err(e) => {
            error!("Command failed: {:#}", e);
            match e.downcast_ref::<tilemerge::FlattenError>() {
                Some(flatten) => eprintln!("{}", map_error(flatten)),
                None => eprintln!("{:#}", e),
            }
            process::exit(1);
        }
    }
}

/// Drive the job on a single-threaded runtime; all concurrency is cooperative.
fn run(context: &RunContext) -> anyhow::Result<String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    Ok(runtime.block_on(context.execute())?)
}
