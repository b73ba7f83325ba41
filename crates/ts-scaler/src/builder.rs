//! Fluent builder for constructing a [`TrafficScaler`].

use std::time::Duration;

use ts_core::BoundingBox;
use ts_entity::EntityGenerator;
use ts_network::RoadNetworkSynthesizer;

use crate::{ScalerConfig, ScalerResult, TelemetrySource, TrafficScaler};

/// Fluent builder for [`TrafficScaler<S>`].
///
/// The telemetry source is required; everything else defaults to
/// [`ScalerConfig::default`].  Per-field setters override whatever config
/// was supplied, in call order.
///
/// # Example
///
/// ```rust,ignore
/// let scaler = ScalerBuilder::new(CsvTelemetry::new("feed.csv"))
///     .config(ScalerConfig::from_json_path("scaler.json")?)
///     .seed(7)
///     .build()?;
/// scaler.refresh().await;
/// ```
pub struct ScalerBuilder<S: TelemetrySource> {
    source: S,
    config: ScalerConfig,
}

impl<S: TelemetrySource> ScalerBuilder<S> {
    pub fn new(source: S) -> Self {
        Self { source, config: ScalerConfig::default() }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: ScalerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn target_population(mut self, n: usize) -> Self {
        self.config.target_population = n;
        self
    }

    pub fn cache_duration(mut self, d: Duration) -> Self {
        self.config.cache_duration_ms = d.as_millis() as u64;
        self
    }

    pub fn region(mut self, region: BoundingBox) -> Self {
        self.config.region = region;
        self
    }

    /// Validate the configuration and assemble the scaler.  No refresh runs
    /// until [`TrafficScaler::refresh`] is awaited.
    pub fn build(self) -> ScalerResult<TrafficScaler<S>> {
        self.config.validate()?;
        let synthesizer = RoadNetworkSynthesizer::new(self.config.grid.clone())?;
        let generator =
            EntityGenerator::new(self.config.categories.clone(), self.config.min_vehicle_speed_kmh)?;
        Ok(TrafficScaler::from_parts(self.config, self.source, synthesizer, generator))
    }
}
