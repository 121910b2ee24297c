use serde::{Deserialize, Serialize};

/// A geographic position in degrees (WGS84 longitude/latitude).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// Heading of a parked entity within its slot.
///
/// Slots only admit two orientations — nose-in or nose-out — so this is
/// an enum rather than a free angle. `radians()` recovers the value a
/// map renderer feeds to its icon style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rotation {
    /// 0 radians.
    Deg0,
    /// π radians.
    Deg180,
}

impl Rotation {
    pub fn radians(self) -> f64 {
        match self {
            Self::Deg0 => 0.0,
            Self::Deg180 => std::f64::consts::PI,
        }
    }

    /// Classify a free-angle rotation back into a heading.
    ///
    /// Accepts anything within `tol` radians of 0 or π; external history
    /// documents carry rotations as raw radians.
    pub fn from_radians(radians: f64, tol: f64) -> Option<Self> {
        if radians.abs() <= tol {
            Some(Self::Deg0)
        } else if (radians - std::f64::consts::PI).abs() <= tol {
            Some(Self::Deg180)
        } else {
            None
        }
    }
}
