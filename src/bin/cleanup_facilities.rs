// src/bin/cleanup_facilities.rs - Offline cleanup: states, names, railroads, descriptions
use anyhow::Result;
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

use enrichment_lib::cleanup::{clean_location_name, run_cleanup};
use enrichment_lib::utils::env::load_env;
use enrichment_lib::utils::io::{read_records, write_json_pretty};
use enrichment_lib::utils::progress_bars::logging::{BatchJob, BatchLogger};

const SAMPLE_LIMIT: usize = 5;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct CleanupArgs {
    /// Print statistics and samples without writing
    #[arg(long)]
    dry_run: bool,

    #[arg(long, default_value = "public/facilities.json")]
    input: PathBuf,

    /// Defaults to writing back to the input file
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    let env = load_env();
    env_logger::init();
    env.log();
    let args = CleanupArgs::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Cleanup failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: CleanupArgs) -> Result<()> {
    let logger = BatchLogger::new(BatchJob::Cleanup);
    logger.log_start(&args.input.display().to_string(), args.dry_run);
    let mut records = read_records(&args.input)?;
    logger.log_data_loaded(records.len());

    if args.dry_run {
        info!("{} Sample name cleanups:", logger.tag());
        let samples = records
            .facilities()
            .iter()
            .filter(|f| f.name.contains(','))
            .filter_map(|f| {
                clean_location_name(&f.name, f.facility_type.as_deref())
                    .map(|cleaned| (f.name.as_str(), cleaned))
            })
            .take(SAMPLE_LIMIT);
        for (before, after) in samples {
            info!("{}   {:<40} -> {}", logger.tag(), before, after);
        }
    }

    let stats = run_cleanup(records.facilities_mut());
    logger.log_cleanup_summary(&stats);

    if args.dry_run {
        info!("{} Dry run, nothing written", logger.tag());
        return Ok(());
    }

    let output = args.output.as_ref().unwrap_or(&args.input);
    let values = records.into_values();
    write_json_pretty(output, &values)?;
    logger.log_written(values.len(), &output.display().to_string());
    Ok(())
}
