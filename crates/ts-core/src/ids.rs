//! Strongly typed identifier wrappers.
//!
//! Ids are dense indices assigned in generation order, so `id.index()` can be
//! used directly against the owning `Vec`.  Ids carry no identity across
//! refreshes: vehicle 17 of one epoch is unrelated to vehicle 17 of the next.

use std::fmt;

/// Generate a typed ID wrapper with a short display prefix (`VEH-000042`).
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty) => $prefix:literal;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            pub const PREFIX: &'static str = $prefix;

            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{:06}", $prefix, self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a road segment within one `TrafficDataset`.
    pub struct SegmentId(u32) => "SEG";
}

typed_id! {
    /// Index of a generated vehicle.  Max ~4.3 billion per refresh.
    pub struct VehicleId(u32) => "VEH";
}

typed_id! {
    /// Index of a placed roadside unit.
    pub struct RsuId(u32) => "RSU";
}

typed_id! {
    /// Index of a congestion zone.
    pub struct ZoneId(u32) => "CZ";
}
