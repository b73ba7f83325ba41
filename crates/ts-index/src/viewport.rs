//! Level-of-detail viewport queries.
//!
//! # Tiers
//!
//! | Tier       | When                                         | Result                                   | Cap                         |
//! |------------|----------------------------------------------|------------------------------------------|-----------------------------|
//! | `Overview` | no bounds, or `zoom < overview_max_zoom`     | one vehicle per populated cell           | `overview_cap`              |
//! | `Cluster`  | `overview_max_zoom ≤ zoom < full_res_min_zoom` | strided samples per cell in bounds       | `cluster_cap_base · growth^(zoom − overview_max_zoom)` |
//! | `Full`     | `zoom ≥ full_res_min_zoom`                   | every vehicle inside bounds              | `full_res_cap`              |
//!
//! Result size never exceeds the tier cap, whatever the population.  Cost is
//! bounded by the cells touched plus the cap: the full tier scans only the
//! cells under the viewport and stops at the cap.
//!
//! Sampling is deterministic (evenly strided), so the same query against the
//! same snapshot always returns the same vehicles.

use log::debug;

use ts_core::BoundingBox;
use ts_entity::Vehicle;

use crate::grid::{CellKey, SpatialIndex};
use crate::{IndexError, IndexResult};

// ── LodConfig ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LodConfig {
    /// Zoom levels strictly below this are served from the overview tier.
    pub overview_max_zoom: u8,
    /// Zoom levels at or above this are served at full resolution.
    pub full_res_min_zoom: u8,
    pub overview_cap: usize,
    pub full_res_cap: usize,
    /// Samples per cell at `zoom == overview_max_zoom`.
    pub cluster_samples_base: usize,
    /// Extra samples per cell for each zoom level above `overview_max_zoom`.
    pub cluster_samples_per_zoom: usize,
    /// Cluster-tier cap at `zoom == overview_max_zoom`.
    pub cluster_cap_base: usize,
    /// Cluster-tier cap multiplier per zoom level.
    pub cluster_cap_growth: f64,
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            overview_max_zoom:        10,
            full_res_min_zoom:        15,
            overview_cap:             5_000,
            full_res_cap:             100_000,
            cluster_samples_base:     2,
            cluster_samples_per_zoom: 3,
            cluster_cap_base:         2_000,
            cluster_cap_growth:       2.0,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum LodTier {
    Overview,
    Cluster,
    Full,
}

impl LodConfig {
    pub fn validate(&self) -> IndexResult<()> {
        if self.overview_max_zoom > self.full_res_min_zoom {
            return Err(IndexError::Lod(format!(
                "overview_max_zoom {} exceeds full_res_min_zoom {}",
                self.overview_max_zoom, self.full_res_min_zoom
            )));
        }
        if self.overview_cap == 0 || self.full_res_cap == 0 || self.cluster_cap_base == 0 {
            return Err(IndexError::Lod("tier caps must be positive".into()));
        }
        if self.cluster_samples_base == 0 {
            return Err(IndexError::Lod("cluster_samples_base must be positive".into()));
        }
        if !(self.cluster_cap_growth >= 1.0) || !self.cluster_cap_growth.is_finite() {
            return Err(IndexError::Lod(format!(
                "cluster_cap_growth must be finite and >= 1, got {}",
                self.cluster_cap_growth
            )));
        }
        Ok(())
    }

    pub fn tier(&self, has_bounds: bool, zoom: u8) -> LodTier {
        if !has_bounds || zoom < self.overview_max_zoom {
            LodTier::Overview
        } else if zoom >= self.full_res_min_zoom {
            LodTier::Full
        } else {
            LodTier::Cluster
        }
    }

    /// Maximum result size for a query.
    pub fn cap(&self, has_bounds: bool, zoom: u8) -> usize {
        match self.tier(has_bounds, zoom) {
            LodTier::Overview => self.overview_cap,
            LodTier::Full => self.full_res_cap,
            LodTier::Cluster => {
                let steps = zoom.saturating_sub(self.overview_max_zoom) as i32;
                let cap = self.cluster_cap_base as f64 * self.cluster_cap_growth.powi(steps);
                (cap.min(self.full_res_cap as f64) as usize).max(1)
            }
        }
    }

    /// Samples drawn from each cell in the cluster tier.
    pub fn samples_per_cell(&self, zoom: u8) -> usize {
        let steps = zoom.saturating_sub(self.overview_max_zoom) as usize;
        self.cluster_samples_base + steps * self.cluster_samples_per_zoom
    }
}

// ── ViewportQuery ─────────────────────────────────────────────────────────────

/// Borrowed view over one snapshot's index and vehicles.  Results borrow
/// from the snapshot only, not from `lod`.
pub struct ViewportQuery<'a, 'l> {
    index: &'a SpatialIndex,
    vehicles: &'a [Vehicle],
    lod: &'l LodConfig,
}

impl<'a, 'l> ViewportQuery<'a, 'l> {
    /// `index` must have been built from `vehicles`.
    pub fn new(index: &'a SpatialIndex, vehicles: &'a [Vehicle], lod: &'l LodConfig) -> Self {
        debug_assert_eq!(index.len(), vehicles.len());
        Self { index, vehicles, lod }
    }

    /// Vehicles to render for `bounds` at `zoom`, at most
    /// `lod.cap(bounds.is_some(), zoom)` of them.
    pub fn vehicles(&self, bounds: Option<&BoundingBox>, zoom: u8) -> Vec<&'a Vehicle> {
        let tier = self.lod.tier(bounds.is_some(), zoom);
        let cap = self.lod.cap(bounds.is_some(), zoom);
        let out = match (tier, bounds) {
            (LodTier::Cluster, Some(b)) => self.cluster_sampled(b, zoom, cap),
            (LodTier::Full, Some(b)) => self.full_resolution(b, cap),
            _ => self.overview(bounds, cap),
        };
        debug!("zoom {zoom} → {tier:?} tier, {} of cap {cap}", out.len());
        out
    }

    /// One vehicle per populated cell, cells evenly strided down to `cap`.
    /// With `bounds`, only cells overlapping it are considered and each
    /// representative is the first of its cell inside `bounds`.
    pub fn overview(&self, bounds: Option<&BoundingBox>, cap: usize) -> Vec<&'a Vehicle> {
        let intersecting;
        let keys: &[CellKey] = match bounds {
            Some(b) => {
                intersecting = self.index.cells_intersecting(b);
                &intersecting
            }
            None => self.index.keys(),
        };

        let vehicles = self.vehicles;
        strided(keys, cap)
            .filter_map(|k| {
                let cell = self.index.cell(k);
                match bounds {
                    None => cell.first(),
                    Some(b) => cell.iter().find(|&&i| b.contains(vehicles[i as usize].position)),
                }
            })
            .map(|&i| &vehicles[i as usize])
            .collect()
    }

    /// Up to `samples_per_cell(zoom)` vehicles from each cell overlapping
    /// `bounds`, trimmed so the total stays within `cap`.
    pub fn cluster_sampled(&self, bounds: &BoundingBox, zoom: u8, cap: usize) -> Vec<&'a Vehicle> {
        let keys = self.index.cells_intersecting(bounds);
        if keys.is_empty() {
            return Vec::new();
        }

        // Spread the budget across all cells rather than filling it from the
        // south-west corner.
        let per_cell = self.lod.samples_per_cell(zoom).min((cap / keys.len()).max(1));

        let mut out = Vec::with_capacity(cap.min(keys.len() * per_cell));
        for key in strided(&keys, cap) {
            for i in strided(self.index.cell(key), per_cell) {
                let v = &self.vehicles[i as usize];
                if bounds.contains(v.position) {
                    out.push(v);
                }
            }
            if out.len() >= cap {
                out.truncate(cap);
                break;
            }
        }
        out
    }

    /// Every vehicle inside `bounds`, up to `cap`.
    pub fn full_resolution(&self, bounds: &BoundingBox, cap: usize) -> Vec<&'a Vehicle> {
        let mut out = Vec::new();
        for key in self.index.cells_intersecting(bounds) {
            for &i in self.index.cell(key) {
                let v = &self.vehicles[i as usize];
                if bounds.contains(v.position) {
                    out.push(v);
                    if out.len() == cap {
                        return out;
                    }
                }
            }
        }
        out
    }
}

/// At most `k` items, evenly spaced across `items`, in order.
fn strided<T: Copy>(items: &[T], k: usize) -> impl Iterator<Item = T> + '_ {
    let n = items.len();
    let take = k.min(n);
    (0..take).map(move |j| if take == n { items[j] } else { items[j * n / take] })
}
