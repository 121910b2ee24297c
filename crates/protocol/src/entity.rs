use serde::{Deserialize, Serialize};

use crate::types::{GeoPoint, Rotation};

/// One renderable entity for the current frame.
///
/// This is the unit of the publish contract between the playback core and
/// a renderer: on every cursor change the core hands the renderer the full
/// list of entities visible in the active frame, flattened in column order
/// then in-slot order. The renderer owns everything from here on —
/// projection, sprites, icon anchoring are none of the core's business.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisibleEntity {
    /// Where the entity sits.
    pub position: GeoPoint,
    /// Which way it faces.
    pub rotation: Rotation,
    /// Index into the renderer's fixed appearance palette.
    pub variant: usize,
}

impl VisibleEntity {
    pub fn new(position: GeoPoint, rotation: Rotation, variant: usize) -> Self {
        Self {
            position,
            rotation,
            variant,
        }
    }
}
