use anyhow::{Context, Result};
use chrono::{TimeDelta, Utc};
use clap::Parser;
use enedis_portal::config::Config;
use enedis_portal::logging::init_logging;
use enedis_portal::portal::{PortalClient, Resolution};
use enedis_portal::pricing;
use enedis_portal::sink::{InfluxSink, MeasurementSink, SeriesMetadata};
use std::path::PathBuf;
use tracing::{debug, info};

/// Pull consumption from the Enedis portal and push it to InfluxDB
#[derive(Parser)]
#[command(author, version = env!("APP_VERSION"), about)]
struct Args {
    /// YAML configuration file; default locations are tried when omitted
    #[arg(long, short, env = "ENEDIS_PORTAL_CONFIG")]
    config: Option<PathBuf>,

    /// Number of past days to retrieve (overrides the configuration)
    #[arg(long)]
    days: Option<u32>,

    /// Aggregation requested from the portal
    #[arg(long, default_value = "hourly")]
    resolution: Resolution,

    /// Fetch and log, but do not write to InfluxDB
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to read configuration {}", path.display()))?,
        None => Config::load().context("Failed to load configuration")?,
    };
    if let Some(days) = args.days {
        config.days = days;
    }
    config.validate()?;

    init_logging(&config.logging)?;

    info!("Will get last {} days from Enedis", config.days);
    let client = PortalClient::new(config.client_config()?).context("Failed to log in")?;

    let to = Utc::now();
    let from = to - TimeDelta::days(i64::from(config.days));
    let measurements = client
        .fetch(args.resolution, &from, &to)
        .context("Failed to get measures from Enedis")?;

    let metadata = SeriesMetadata {
        measurement: config.influx.measurement.clone(),
        max_power_kva: config.portal.max_power_kva,
        offpeak_configured: !client.offpeak_periods().is_empty(),
    };

    let currency = &config.pricing.currency_symbol;
    if !config.pricing.provider_name.is_empty() {
        info!(
            "Subscribed to {} - annual fee {:.2} {currency}",
            config.pricing.provider_name, config.pricing.annual_fee
        );
    }
    for m in &measurements {
        debug!(
            "Measure {} : {:.3} | {} | price {:.4} {currency}",
            m.date.to_rfc3339(),
            m.power,
            metadata.tariff_period(m),
            pricing::cost_of(m, &config.pricing)
        );
    }

    let summary = pricing::summarize(&measurements, &config.pricing);
    info!(
        "{} measures, {:.3} kWh ({:.3} off-peak), total price {:.4} {currency}",
        summary.measurements,
        summary.total_energy(),
        summary.offpeak_energy,
        summary.total_cost()
    );

    if args.dry_run {
        info!("Dry run, nothing written");
        return Ok(());
    }

    let mut sink = InfluxSink::new(&config.influx, &config.http)?;
    let written = sink
        .write(&measurements, &metadata)
        .context("Failed to write points to InfluxDB")?;
    info!("Wrote {written} points");
    Ok(())
}
