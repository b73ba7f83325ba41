//! The [`TrafficScaler`] service: cached refreshes and the query surface.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, error, info, warn};
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::time::Instant;

use ts_core::{BoundingBox, GeoPoint, ScalerRng};
use ts_entity::{EntityGenerator, RoadsideUnit, Vehicle, place_rsus};
use ts_index::{RsuIndex, SpatialIndex};
use ts_network::{RoadNetworkSynthesizer, allocate_population};

use crate::{
    CongestionZone, DataOrigin, ScalerConfig, ScalerResult, Snapshot, TelemetryFeed,
    TelemetrySource, derive_zones,
};

// ── Public state types ────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum CacheState {
    /// No snapshot yet, the cache window has lapsed, or it was invalidated.
    Stale,
    Fresh,
}

/// What a call to [`TrafficScaler::refresh`] did.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RefreshOutcome {
    /// The current snapshot was still fresh; nothing was rebuilt.
    Cached,
    /// A new snapshot was built and published.
    Refreshed(DataOrigin),
    /// The fetch failed; the previous snapshot stays in place.
    ServedStale,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ScalerStats {
    pub total_vehicles: usize,
    pub total_rsus: usize,
    pub grid_cell_count: usize,
    pub segment_count: usize,
    /// Unix milliseconds; `None` before the first refresh.
    pub last_updated_ms: Option<u64>,
    pub data_origin: Option<DataOrigin>,
    pub incident_count: usize,
}

// ── TrafficScaler ─────────────────────────────────────────────────────────────

/// Owns the current snapshot and rebuilds it from `S` when the cache lapses.
///
/// Refreshes are serialized: a caller arriving while another refresh is in
/// flight waits for it and then usually finds the cache fresh.  Queries never
/// wait on a refresh; they read whichever snapshot was last published.
///
/// Create via [`ScalerBuilder`](crate::ScalerBuilder).
pub struct TrafficScaler<S> {
    config: ScalerConfig,
    source: S,
    synthesizer: RoadNetworkSynthesizer,
    generator: EntityGenerator,
    current: RwLock<Option<Arc<Snapshot>>>,
    in_flight: Mutex<()>,
    /// Number of snapshots built so far; seeds the next one.
    epoch: AtomicU64,
    /// Bumped by every `invalidate()`.
    invalidations: AtomicU64,
    /// Value of `invalidations` read before the fetch that built the current
    /// snapshot.
    published_at_invalidation: AtomicU64,
}

impl<S: TelemetrySource> TrafficScaler<S> {
    pub(crate) fn from_parts(
        config: ScalerConfig,
        source: S,
        synthesizer: RoadNetworkSynthesizer,
        generator: EntityGenerator,
    ) -> Self {
        Self {
            config,
            source,
            synthesizer,
            generator,
            current: RwLock::new(None),
            in_flight: Mutex::new(()),
            epoch: AtomicU64::new(0),
            invalidations: AtomicU64::new(0),
            published_at_invalidation: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &ScalerConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    // ── Cache ─────────────────────────────────────────────────────────────

    pub fn state(&self) -> CacheState {
        match self.snapshot() {
            Some(s)
                if self.invalidations.load(Ordering::Acquire)
                    == self.published_at_invalidation.load(Ordering::Acquire)
                    && s.refreshed_at.elapsed() < self.config.cache_duration() =>
            {
                CacheState::Fresh
            }
            _ => CacheState::Stale,
        }
    }

    /// Mark the current snapshot stale.  Queries keep serving it until the
    /// next refresh publishes a replacement.
    pub fn invalidate(&self) {
        self.invalidations.fetch_add(1, Ordering::AcqRel);
    }

    /// The last published snapshot.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.current.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Fetch, synthesize, allocate, generate, and index, unless the cache is
    /// still fresh.
    ///
    /// Never fails: a failed fetch keeps the previous snapshot or, when there
    /// is none, builds one from the synthetic grid.
    pub async fn refresh(&self) -> RefreshOutcome {
        let _in_flight = self.in_flight.lock().await;

        if self.state() == CacheState::Fresh {
            debug!("snapshot still fresh, refresh skipped");
            return RefreshOutcome::Cached;
        }

        // An invalidate() landing after this read leaves the new snapshot stale.
        let seen = self.invalidations.load(Ordering::Acquire);
        let started = Instant::now();
        let (feed, origin) = match self.source.fetch().await {
            Ok(feed) => (feed, DataOrigin::Live),
            Err(e) if self.snapshot().is_some() => {
                warn!("telemetry fetch failed, serving previous snapshot: {e}");
                return RefreshOutcome::ServedStale;
            }
            Err(e) => {
                warn!("telemetry fetch failed with no snapshot yet, using synthetic grid: {e}");
                (TelemetryFeed::default(), DataOrigin::Synthetic)
            }
        };

        let snapshot = match self.build_snapshot(&feed, origin) {
            Ok(s) => s,
            Err(e) if self.snapshot().is_some() => {
                error!("snapshot build failed, serving previous snapshot: {e}");
                return RefreshOutcome::ServedStale;
            }
            Err(e) => {
                error!("snapshot build failed, retrying on synthetic grid: {e}");
                match self.build_snapshot(&TelemetryFeed::default(), DataOrigin::Synthetic) {
                    Ok(s) => s,
                    Err(e) => {
                        error!("synthetic snapshot build failed: {e}");
                        return RefreshOutcome::ServedStale;
                    }
                }
            }
        };

        let origin = snapshot.origin;
        info!(
            "refresh {} ({:?}): {} segments, {} vehicles, {} RSUs, {} cells in {:.1?}",
            snapshot.epoch,
            origin,
            snapshot.dataset.segment_count(),
            snapshot.vehicles.len(),
            snapshot.rsus.len(),
            snapshot.index.cell_count(),
            started.elapsed()
        );
        self.publish(snapshot, seen);
        RefreshOutcome::Refreshed(origin)
    }

    fn publish(&self, snapshot: Snapshot, seen: u64) {
        let snapshot = Arc::new(snapshot);
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = Some(snapshot);
        self.published_at_invalidation.store(seen, Ordering::Release);
    }

    /// Synchronous CPU-bound half of a refresh.  Only called with `in_flight`
    /// held.
    fn build_snapshot(&self, feed: &TelemetryFeed, origin: DataOrigin) -> ScalerResult<Snapshot> {
        let cfg = &self.config;
        let epoch = self.epoch.fetch_add(1, Ordering::Relaxed);
        let seed = ScalerRng::epoch_seed(cfg.seed, epoch);
        let mut rng = ScalerRng::new(seed);
        let mut rsu_rng = rng.child(1);

        let mut dataset = self.synthesizer.synthesize(&feed.snapshot, &cfg.region, &mut rng);
        allocate_population(&mut dataset, cfg.target_population)?;

        let last_updated_ms = unix_millis();
        let vehicles = self.generator.generate_vehicles(&dataset, seed, last_updated_ms);
        let rsus = place_rsus(&dataset, &cfg.rsu, &mut rsu_rng);

        let index = SpatialIndex::build(&vehicles, cfg.index_cell_deg)?;
        let rsu_index = RsuIndex::build(&rsus);
        let congestion = derive_zones(&feed.congestion_rows, &dataset, &cfg.congestion);

        Ok(Snapshot {
            dataset,
            vehicles,
            rsus,
            index,
            rsu_index,
            congestion,
            incidents: feed.incidents.clone(),
            origin,
            epoch,
            last_updated_ms,
            refreshed_at: Instant::now(),
        })
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Vehicles to render for `bounds` at `zoom`, tiered by level of detail.
    /// Empty before the first refresh.
    pub fn vehicles(&self, bounds: Option<&BoundingBox>, zoom: u8) -> Vec<Vehicle> {
        self.snapshot()
            .map(|s| s.vehicles_in(bounds, zoom, &self.config.lod).into_iter().cloned().collect())
            .unwrap_or_default()
    }

    /// RSUs inside `bounds`, or all of them.
    pub fn rsus(&self, bounds: Option<&BoundingBox>) -> Vec<RoadsideUnit> {
        self.snapshot()
            .map(|s| s.rsus_in(bounds).into_iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn nearest_rsu(&self, pos: GeoPoint) -> Option<RoadsideUnit> {
        self.snapshot().and_then(|s| s.nearest_rsu(pos).cloned())
    }

    pub fn congestion_zones(&self) -> Vec<CongestionZone> {
        self.snapshot().map(|s| s.congestion.clone()).unwrap_or_default()
    }

    /// Raw incident records from the last successful fetch.
    pub fn incidents(&self) -> Vec<serde_json::Value> {
        self.snapshot().map(|s| s.incidents.clone()).unwrap_or_default()
    }

    pub fn stats(&self) -> ScalerStats {
        let Some(s) = self.snapshot() else {
            return ScalerStats::default();
        };
        ScalerStats {
            total_vehicles: s.vehicles.len(),
            total_rsus: s.rsus.len(),
            grid_cell_count: s.index.cell_count(),
            segment_count: s.dataset.segment_count(),
            last_updated_ms: Some(s.last_updated_ms),
            data_origin: Some(s.origin),
            incident_count: s.incidents.len(),
        }
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
