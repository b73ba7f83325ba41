//! Vehicle categories and their distribution table.
//!
//! The category set is closed.  Each category carries an integer share of the
//! population (percent) and the range its trust scores are drawn from.  A
//! [`CategoryTable`] is only usable once [`CategoryTable::validate`] has
//! accepted it: shares must sum to exactly 100 and no category may repeat.

use ts_core::SegmentRng;

use crate::{EntityError, EntityResult};

/// Percentage points the table must sum to.
pub const TOTAL_WEIGHT: u32 = 100;

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum VehicleCategory {
    Car,
    TwoWheeler,
    Truck,
    Bus,
    Ambulance,
    Other,
}

impl VehicleCategory {
    pub const ALL: [VehicleCategory; 6] = [
        VehicleCategory::Car,
        VehicleCategory::TwoWheeler,
        VehicleCategory::Truck,
        VehicleCategory::Bus,
        VehicleCategory::Ambulance,
        VehicleCategory::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VehicleCategory::Car        => "car",
            VehicleCategory::TwoWheeler => "two_wheeler",
            VehicleCategory::Truck      => "truck",
            VehicleCategory::Bus        => "bus",
            VehicleCategory::Ambulance  => "ambulance",
            VehicleCategory::Other      => "other",
        }
    }

    /// Operator label shown next to the vehicle on the map.
    pub fn owner_label(self) -> &'static str {
        match self {
            VehicleCategory::Car | VehicleCategory::TwoWheeler => "Private Owner",
            VehicleCategory::Truck     => "Freight Operator",
            VehicleCategory::Bus       => "Metro Transit",
            VehicleCategory::Ambulance => "Emergency Services",
            VehicleCategory::Other     => "Unregistered",
        }
    }
}

impl std::fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── CategoryProfile ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CategoryProfile {
    pub category: VehicleCategory,
    /// Share of the population in percent.
    pub weight: u32,
    pub trust_min: f64,
    pub trust_max: f64,
}

impl CategoryProfile {
    pub fn new(category: VehicleCategory, weight: u32, trust_min: f64, trust_max: f64) -> Self {
        Self { category, weight, trust_min, trust_max }
    }
}

// ── CategoryTable ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CategoryTable {
    profiles: Vec<CategoryProfile>,
}

impl Default for CategoryTable {
    /// 65 % car, 25 % two-wheeler, 5 % truck, 3 % bus, 1 % ambulance, 1 % other.
    fn default() -> Self {
        use VehicleCategory::*;
        Self {
            profiles: vec![
                CategoryProfile::new(Car,        65, 50.0, 100.0),
                CategoryProfile::new(TwoWheeler, 25, 40.0, 95.0),
                CategoryProfile::new(Truck,       5, 45.0, 90.0),
                CategoryProfile::new(Bus,         3, 65.0, 100.0),
                CategoryProfile::new(Ambulance,   1, 85.0, 100.0),
                CategoryProfile::new(Other,       1, 30.0, 80.0),
            ],
        }
    }
}

impl CategoryTable {
    /// Validate and wrap `profiles`.
    pub fn new(profiles: Vec<CategoryProfile>) -> EntityResult<Self> {
        let table = Self { profiles };
        table.validate()?;
        Ok(table)
    }

    pub fn validate(&self) -> EntityResult<()> {
        let total: u32 = self.profiles.iter().map(|p| p.weight).sum();
        if total != TOTAL_WEIGHT {
            return Err(EntityError::Config(format!(
                "category weights sum to {total}, expected {TOTAL_WEIGHT}"
            )));
        }

        let mut seen = Vec::with_capacity(self.profiles.len());
        for p in &self.profiles {
            if seen.contains(&p.category) {
                return Err(EntityError::Config(format!("category {} listed twice", p.category)));
            }
            seen.push(p.category);

            let in_range = (0.0..=100.0).contains(&p.trust_min) && (0.0..=100.0).contains(&p.trust_max);
            if !in_range || p.trust_min > p.trust_max {
                return Err(EntityError::Config(format!(
                    "trust range [{}, {}] for {} must be ordered and within [0, 100]",
                    p.trust_min, p.trust_max, p.category
                )));
            }
        }
        Ok(())
    }

    pub fn profiles(&self) -> &[CategoryProfile] {
        &self.profiles
    }

    pub fn profile(&self, category: VehicleCategory) -> Option<&CategoryProfile> {
        self.profiles.iter().find(|p| p.category == category)
    }

    /// Map a roll in `[0, 100)` onto the cumulative weight table.
    ///
    /// Rolls past the end (only possible on an unvalidated table) land on the
    /// last profile.
    pub fn pick(&self, roll: u32) -> &CategoryProfile {
        let mut acc = 0;
        for p in &self.profiles {
            acc += p.weight;
            if roll < acc {
                return p;
            }
        }
        &self.profiles[self.profiles.len() - 1]
    }

    #[inline]
    pub fn sample(&self, rng: &mut SegmentRng) -> &CategoryProfile {
        self.pick(rng.gen_range(0..TOTAL_WEIGHT))
    }
}
