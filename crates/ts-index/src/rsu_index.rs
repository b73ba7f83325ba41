//! R-tree over placed roadside units.
//!
//! RSU counts are small enough that a plain scan would do, but the tree also
//! answers nearest-unit lookups for incident overlays.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use ts_core::{BoundingBox, GeoPoint};
use ts_entity::RoadsideUnit;

/// Entry stored in the R-tree: a `[lat, lng]` point and the RSU's position in
/// the snapshot's RSU list.
#[derive(Clone)]
struct RsuEntry {
    point: [f64; 2],
    idx: u32,
}

impl RTreeObject for RsuEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for RsuEntry {
    /// Squared Euclidean distance in lat/lng space.  Adequate for ranking
    /// neighbours within a single metro area.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlng = self.point[1] - point[1];
        dlat * dlat + dlng * dlng
    }
}

pub struct RsuIndex {
    tree: RTree<RsuEntry>,
}

impl RsuIndex {
    /// Bulk-load for O(N log N) construction.
    pub fn build(rsus: &[RoadsideUnit]) -> Self {
        let entries: Vec<RsuEntry> = rsus
            .iter()
            .enumerate()
            .map(|(i, r)| RsuEntry { point: [r.position.lat, r.position.lng], idx: i as u32 })
            .collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Indices of RSUs inside `bounds` (edges inclusive), ascending.
    pub fn within(&self, bounds: &BoundingBox) -> Vec<u32> {
        if bounds.validate().is_err() {
            return Vec::new();
        }
        let envelope = AABB::from_corners([bounds.south, bounds.west], [bounds.north, bounds.east]);
        let mut hits: Vec<u32> = self
            .tree
            .locate_in_envelope(&envelope)
            .map(|e| e.idx)
            .collect();
        hits.sort_unstable();
        hits
    }

    /// Index of the RSU nearest to `pos`, or `None` if there are none.
    pub fn nearest(&self, pos: GeoPoint) -> Option<u32> {
        self.tree.nearest_neighbor(&[pos.lat, pos.lng]).map(|e| e.idx)
    }
}
