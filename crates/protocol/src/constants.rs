use std::time::Duration;

use crate::types::GeoPoint;

/// Timer interval between frames at 1× speed.
pub const BASE_INTERVAL: Duration = Duration::from_millis(2000);

/// Frames generated for a run when the caller does not say otherwise.
pub const DEFAULT_FRAME_COUNT: usize = 30;

/// Size of the default entity appearance palette.
pub const DEFAULT_VARIANT_COUNT: usize = 4;

/// Center of the demo lot (Sarajevo).
pub const LOT_CENTER: GeoPoint = GeoPoint {
    lon: 18.3974186,
    lat: 43.8544868,
};
