use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

mod cli;
mod output;

use cli::Args;
use pvyield::{DailyEnergyEstimator, Location, SystemConfig, time};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.log_level());

    let base = match &args.config {
        Some(path) => SystemConfig::load(path)?,
        None => SystemConfig::default(),
    };
    let config = args.apply_overrides(base);

    let tz = time::timezone_from_arg(&args.timezone, args.longitude, args.latitude)?;
    let start = time::parse_date(&args.start, tz)?;
    let end = time::parse_date(&args.end, tz)?;
    if end < start {
        warn!(%start, %end, "end date precedes start date, nothing to estimate");
    }

    let location = Location::new(args.latitude, args.longitude)?;
    let estimator = DailyEnergyEstimator::new(location, config)?.with_timezone(tz);
    debug!(config = ?estimator.config(), %tz, "system configuration");
    let result = estimator.estimate(start, end, args.efficiency)?;

    if args.json {
        output::print_json(&result)?;
    } else {
        output::print_summary(&result);
        if args.per_day {
            output::print_per_day(&result);
        }
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` wins over the `-v` level.
fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
