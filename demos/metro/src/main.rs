//! metro — drive one traffic scaler over a metro region and report what a
//! dashboard would see.
//!
//! Without `--telemetry` the feed is empty, so the scaler runs on its
//! synthetic grid.  With a CSV path (`lat,lng,free_flow_speed,current_speed`)
//! the samples are used when they yield enough segments.
//!
//! ```text
//! RUST_LOG=info cargo run -p metro --release -- --population 1000000 --zoom 12
//! ```

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use log::info;

use ts_core::BoundingBox;
use ts_scaler::{
    CsvTelemetry, ScalerBuilder, ScalerConfig, StaticTelemetry, TelemetrySource, TrafficScaler,
};

#[derive(Parser)]
#[command(name = "metro")]
#[command(about = "Synthesize a city-scale vehicle population and query it by viewport")]
struct Cli {
    /// Vehicles to materialize (overrides the config file)
    #[arg(long)]
    population: Option<usize>,

    /// Master seed (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Zoom level for the downtown viewport query
    #[arg(long, default_value = "14")]
    zoom: u8,

    /// Telemetry CSV to read instead of an empty feed
    #[arg(long)]
    telemetry: Option<PathBuf>,

    /// Scaler config JSON; unspecified keys keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print stats as JSON instead of a table
    #[arg(long)]
    json: bool,
}

// Central business district viewport.
const DOWNTOWN: BoundingBox = BoundingBox { north: 12.99, south: 12.95, east: 77.62, west: 77.57 };

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ScalerConfig::from_json_path(path)?,
        None => ScalerConfig::default(),
    };
    if let Some(n) = cli.population {
        config.target_population = n;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    match &cli.telemetry {
        Some(path) => {
            let scaler = ScalerBuilder::new(CsvTelemetry::new(path)).config(config).build()?;
            report(&scaler, &cli).await
        }
        None => {
            let scaler = ScalerBuilder::new(StaticTelemetry::empty()).config(config).build()?;
            report(&scaler, &cli).await
        }
    }
}

async fn report<S: TelemetrySource>(scaler: &TrafficScaler<S>, cli: &Cli) -> Result<()> {
    let cfg = scaler.config();
    println!("=== metro — traffic scaler ===");
    println!(
        "Population: {}  |  Seed: {}  |  Region: {}",
        cfg.target_population, cfg.seed, cfg.region
    );
    println!();

    let t0 = Instant::now();
    let outcome = scaler.refresh().await;
    println!("Refresh: {outcome:?} in {:.3} s", t0.elapsed().as_secs_f64());
    info!("second refresh inside the cache window: {:?}", scaler.refresh().await);

    let stats = scaler.stats();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("  vehicles   : {}", stats.total_vehicles);
        println!("  segments   : {}", stats.segment_count);
        println!("  RSUs       : {}", stats.total_rsus);
        println!("  grid cells : {}", stats.grid_cell_count);
        println!("  incidents  : {}", stats.incident_count);
        println!("  origin     : {:?}", stats.data_origin);
    }
    println!();

    println!("{:<10} {:<10} {:>10} {:>10}", "Viewport", "Tier", "Returned", "Cap");
    println!("{}", "-".repeat(44));
    let queries = [("city", None, 6u8), ("downtown", Some(&DOWNTOWN), 11), ("downtown", Some(&DOWNTOWN), cli.zoom)];
    for (name, bounds, zoom) in queries {
        let t = Instant::now();
        let got = scaler.vehicles(bounds, zoom);
        println!(
            "{:<10} {:<10} {:>10} {:>10}   z{zoom} {:.1?}",
            name,
            format!("{:?}", cfg.lod.tier(bounds.is_some(), zoom)),
            got.len(),
            cfg.lod.cap(bounds.is_some(), zoom),
            t.elapsed()
        );
    }
    println!();

    let rsus = scaler.rsus(Some(&DOWNTOWN));
    println!("Downtown RSUs: {}", rsus.len());
    if let Some(r) = scaler.nearest_rsu(DOWNTOWN.center()) {
        println!("  nearest to centre: {} at {} ({:?})", r.id, r.position, r.status);
    }

    let zones = scaler.congestion_zones();
    println!("Congestion zones: {}", zones.len());
    for z in zones.iter().take(5) {
        println!("  {} {:?} level {:.0} r={:.0} m at {}", z.id, z.severity, z.level, z.radius_m, z.center);
    }
    Ok(())
}
