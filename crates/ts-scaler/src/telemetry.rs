//! Telemetry collaborators: where a refresh gets its raw readings.
//!
//! A [`TelemetrySource`] yields one [`TelemetryFeed`] per refresh.  Any error
//! it returns is absorbed by the scaler, which keeps the previous snapshot or
//! falls back to a synthetic network.
//!
//! # CSV feed format
//!
//! ```text
//! lat,lng,free_flow_speed,current_speed
//! 12.9716,77.5946,60,30
//! 12.9806,77.5946,,
//! ```
//!
//! Rows form one polyline in file order.  Speed columns may be blank; the
//! feed's speed pair is the mean over the rows that carry one.

use std::future::Future;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use ts_core::GeoPoint;
use ts_network::TelemetrySnapshot;

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("telemetry provider unavailable: {0}")]
    Unavailable(String),

    #[error("telemetry I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed telemetry at row {row}: {message}")]
    Parse { row: usize, message: String },
}

pub type TelemetryResult<T> = Result<T, TelemetryError>;

// ── Feed ──────────────────────────────────────────────────────────────────────

/// Provider-reported congestion hotspot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CongestionRow {
    pub lat: f64,
    pub lng: f64,
    /// 0–100; clamped on ingestion.
    pub level: f64,
    #[serde(default)]
    pub radius_m: Option<f64>,
}

/// Everything a single provider fetch returns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TelemetryFeed {
    pub snapshot: TelemetrySnapshot,
    /// Incident records in the provider's own shape, passed through as-is.
    pub incidents: Vec<serde_json::Value>,
    pub congestion_rows: Vec<CongestionRow>,
}

impl TelemetryFeed {
    pub fn from_snapshot(snapshot: TelemetrySnapshot) -> Self {
        Self { snapshot, ..Self::default() }
    }

    pub fn with_incidents(mut self, incidents: Vec<serde_json::Value>) -> Self {
        self.incidents = incidents;
        self
    }

    pub fn with_congestion_rows(mut self, rows: Vec<CongestionRow>) -> Self {
        self.congestion_rows = rows;
        self
    }
}

// ── Source trait ──────────────────────────────────────────────────────────────

/// Asynchronous provider of telemetry feeds.
pub trait TelemetrySource: Send + Sync {
    fn fetch(&self) -> impl Future<Output = TelemetryResult<TelemetryFeed>> + Send;
}

/// Returns the same feed on every fetch.
#[derive(Clone, Debug, Default)]
pub struct StaticTelemetry {
    feed: TelemetryFeed,
}

impl StaticTelemetry {
    pub fn new(feed: TelemetryFeed) -> Self {
        Self { feed }
    }

    /// A source with no samples, incidents, or hotspots.  Every refresh then
    /// runs on the synthetic grid.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl TelemetrySource for StaticTelemetry {
    async fn fetch(&self) -> TelemetryResult<TelemetryFeed> {
        Ok(self.feed.clone())
    }
}

/// Re-reads a CSV file (format in the module docs) on every fetch.
#[derive(Clone, Debug)]
pub struct CsvTelemetry {
    path: PathBuf,
}

impl CsvTelemetry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TelemetrySource for CsvTelemetry {
    async fn fetch(&self) -> TelemetryResult<TelemetryFeed> {
        let bytes = tokio::fs::read(&self.path).await?;
        let feed = load_feed_reader(bytes.as_slice())?;
        debug!("{}: {} samples", self.path.display(), feed.snapshot.samples.len());
        Ok(feed)
    }
}

// ── CSV parsing ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct SampleRow {
    lat: f64,
    lng: f64,
    #[serde(default)]
    free_flow_speed: Option<f64>,
    #[serde(default)]
    current_speed: Option<f64>,
}

/// Parse a telemetry CSV from any reader.
///
/// A file with a header but no rows yields an empty feed.  Rows with
/// coordinates off the globe are kept; the synthesizer drops the segments
/// touching them.  Only rows that fail to deserialize are errors.
pub fn load_feed_reader<R: Read>(reader: R) -> TelemetryResult<TelemetryFeed> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut samples = Vec::new();
    let mut off_globe = 0usize;
    let (mut ff_sum, mut ff_n) = (0.0, 0usize);
    let (mut cur_sum, mut cur_n) = (0.0, 0usize);

    for (i, result) in rdr.deserialize::<SampleRow>().enumerate() {
        let row = i + 1;
        let rec = result.map_err(|e| TelemetryError::Parse { row, message: e.to_string() })?;

        let point = GeoPoint::new(rec.lat, rec.lng);
        if !point.is_valid() {
            off_globe += 1;
        }
        samples.push(point);

        if let Some(ff) = rec.free_flow_speed.filter(|v| v.is_finite()) {
            ff_sum += ff;
            ff_n += 1;
        }
        if let Some(cur) = rec.current_speed.filter(|v| v.is_finite()) {
            cur_sum += cur;
            cur_n += 1;
        }
    }

    if off_globe > 0 {
        warn!("{off_globe} of {} telemetry rows have off-globe coordinates", samples.len());
    }

    let mean = |sum: f64, n: usize| if n == 0 { 0.0 } else { sum / n as f64 };
    Ok(TelemetryFeed::from_snapshot(TelemetrySnapshot {
        samples,
        free_flow_speed: mean(ff_sum, ff_n),
        current_speed: mean(cur_sum, cur_n),
    }))
}
