//! Congestion zones for the dashboard's heat overlay.
//!
//! Zones come from the provider's hotspot rows when the feed carries any;
//! otherwise they are derived from the most congested segments of the
//! current dataset.  Either way at most `max_zones` are kept, most congested
//! first.

use serde::{Deserialize, Serialize};

use ts_core::{GeoPoint, ZoneId};
use ts_network::TrafficDataset;

use crate::{CongestionRow, ScalerError, ScalerResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CongestionConfig {
    /// Segments below this congestion level never become zones.
    pub min_level: f64,
    pub max_zones: usize,
    /// Radius for provider rows that omit one.
    pub default_radius_m: f64,
}

impl Default for CongestionConfig {
    fn default() -> Self {
        Self { min_level: 60.0, max_zones: 200, default_radius_m: 300.0 }
    }
}

impl CongestionConfig {
    pub fn validate(&self) -> ScalerResult<()> {
        if !(0.0..=100.0).contains(&self.min_level) {
            return Err(ScalerError::Config(format!(
                "congestion.min_level must be in 0..=100, got {}",
                self.min_level
            )));
        }
        if !(self.default_radius_m > 0.0) || !self.default_radius_m.is_finite() {
            return Err(ScalerError::Config(format!(
                "congestion.default_radius_m must be positive, got {}",
                self.default_radius_m
            )));
        }
        Ok(())
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Moderate,
    High,
    Severe,
}

impl Severity {
    pub fn from_level(level: f64) -> Self {
        match level {
            l if l >= 85.0 => Severity::Severe,
            l if l >= 70.0 => Severity::High,
            l if l >= 40.0 => Severity::Moderate,
            _ => Severity::Low,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum ZoneSource {
    Provider,
    Segments,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CongestionZone {
    pub id: ZoneId,
    pub center: GeoPoint,
    pub radius_m: f64,
    /// 0–100.
    pub level: f64,
    pub severity: Severity,
    pub source: ZoneSource,
}

/// Provider rows when present, else the dataset's hottest segments.
pub fn derive_zones(
    rows: &[CongestionRow],
    dataset: &TrafficDataset,
    cfg: &CongestionConfig,
) -> Vec<CongestionZone> {
    if rows.is_empty() {
        zones_from_segments(dataset, cfg)
    } else {
        zones_from_rows(rows, cfg)
    }
}

/// Rows with coordinates off the globe or a non-finite level are dropped.
pub fn zones_from_rows(rows: &[CongestionRow], cfg: &CongestionConfig) -> Vec<CongestionZone> {
    let mut kept: Vec<(GeoPoint, f64, f64)> = rows
        .iter()
        .filter_map(|r| {
            let center = GeoPoint::new(r.lat, r.lng);
            if !center.is_valid() || !r.level.is_finite() {
                return None;
            }
            let radius = r
                .radius_m
                .filter(|m| m.is_finite() && *m > 0.0)
                .unwrap_or(cfg.default_radius_m);
            Some((center, r.level.clamp(0.0, 100.0), radius))
        })
        .collect();

    // Stable sort keeps provider order among equal levels.
    kept.sort_by(|a, b| b.1.total_cmp(&a.1));
    kept.truncate(cfg.max_zones);

    kept.into_iter()
        .enumerate()
        .map(|(i, (center, level, radius_m))| CongestionZone {
            id: ZoneId(i as u32),
            center,
            radius_m,
            level,
            severity: Severity::from_level(level),
            source: ZoneSource::Provider,
        })
        .collect()
}

/// One zone per segment at or above `min_level`, centred on its midpoint and
/// spanning half its length.
pub fn zones_from_segments(dataset: &TrafficDataset, cfg: &CongestionConfig) -> Vec<CongestionZone> {
    let mut hot: Vec<_> = dataset
        .segments
        .iter()
        .filter(|s| s.congestion >= cfg.min_level)
        .collect();
    hot.sort_by(|a, b| b.congestion.total_cmp(&a.congestion).then(a.id.cmp(&b.id)));
    hot.truncate(cfg.max_zones);

    hot.into_iter()
        .enumerate()
        .map(|(i, s)| CongestionZone {
            id: ZoneId(i as u32),
            center: s.midpoint(),
            radius_m: s.length_km * 500.0,
            level: s.congestion,
            severity: Severity::from_level(s.congestion),
            source: ZoneSource::Segments,
        })
        .collect()
}
