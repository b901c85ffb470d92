// src/bin/geocode_facilities.rs - Fill missing coordinates via Nominatim
use anyhow::Result;
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

use enrichment_lib::geocoding::{geocode_breakdown, geocode_missing, NominatimClient, SqliteGeocodeCache};
use enrichment_lib::utils::env::load_env;
use enrichment_lib::utils::io::{read_records, write_json_pretty};
use enrichment_lib::utils::progress_bars::logging::{BatchJob, BatchLogger};
use enrichment_lib::utils::progress_bars::progress_config::ProgressConfig;
use enrichment_lib::utils::CancellationToken;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct GeocodeArgs {
    /// Report what could be geocoded without calling the API
    #[arg(long)]
    dry_run: bool,

    #[arg(long, default_value = "public/facilities.json")]
    input: PathBuf,

    /// Defaults to writing back to the input file
    #[arg(long)]
    output: Option<PathBuf>,

    #[arg(long, default_value = "scripts/.geocode_cache.db")]
    cache_db: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let env = load_env();
    env_logger::init();
    env.log();
    let args = GeocodeArgs::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Geocoding failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: GeocodeArgs) -> Result<()> {
    let logger = BatchLogger::new(BatchJob::Geocode);
    logger.log_start(&args.input.display().to_string(), args.dry_run);
    let mut records = read_records(&args.input)?;
    logger.log_data_loaded(records.len());

    let breakdown = geocode_breakdown(records.facilities());
    info!(
        "{} Missing lat/lon: {} of {}",
        logger.tag(),
        breakdown.missing,
        breakdown.total
    );
    if args.dry_run {
        info!("{}   Has street address: {}", logger.tag(), breakdown.has_street);
        info!("{}   Has city + state:   {}", logger.tag(), breakdown.has_city_state);
        info!("{}   Has zip code:       {}", logger.tag(), breakdown.has_zip);
        info!(
            "{} Estimated time: ~{} seconds ({:.0} minutes)",
            logger.tag(),
            breakdown.estimated_seconds,
            breakdown.estimated_seconds as f64 / 60.0
        );
        return Ok(());
    }

    let mut cache = SqliteGeocodeCache::open(&args.cache_db)?;
    let mut geocoder = NominatimClient::new()?;
    let progress = ProgressConfig::from_env().create_bar(breakdown.missing as u64, "geocode");
    let cancel = CancellationToken::new();
    cancel.cancel_on_ctrl_c();

    let stats = geocode_missing(
        records.facilities_mut(),
        &mut cache,
        &mut geocoder,
        &cancel,
        progress.as_ref(),
    )
    .await;

    let output = args.output.as_ref().unwrap_or(&args.input);
    let values = records.into_values();
    write_json_pretty(output, &values)?;
    logger.log_geocode_summary(&stats);
    logger.log_written(values.len(), &output.display().to_string());
    info!(
        "Done. {} geocoded, {} from cache, {} failed.",
        stats.geocoded, stats.cached, stats.failed
    );
    Ok(())
}
