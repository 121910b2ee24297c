use serde::{Deserialize, Serialize};

/// Wire shape of a pre-computed history supplied by an external source.
///
/// ```text
///   generator ──┐
///               ├─▶ History ──▶ PlaybackController ──▶ VisibleEntity[] ──▶ Renderer
///   HistoryDoc ─┘   (core)
/// ```
///
/// A document is an ordered list of frames, each an ordered flat list of
/// point records. `columns` gives the per-column slot counts used to
/// rebuild the layout grouping from the flat lists; when absent, every
/// frame is treated as a single column. Once loaded, a document-sourced
/// history is indistinguishable from a locally generated one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryDoc {
    /// Slot count per column, in column order.
    #[serde(default)]
    pub columns: Option<Vec<usize>>,
    /// One entry per frame, each a flat list of point records in column
    /// order then in-column order.
    pub frames: Vec<Vec<PointRecord>>,
}

/// One slot in one frame: `[lon, lat, visible, rotation_radians, variant]`.
///
/// `rotation_radians` and `variant` are `null` exactly when `visible` is
/// false; the loader rejects documents that violate this.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointRecord(
    pub f64,
    pub f64,
    pub bool,
    pub Option<f64>,
    pub Option<usize>,
);

impl PointRecord {
    pub fn lon(&self) -> f64 {
        self.0
    }

    pub fn lat(&self) -> f64 {
        self.1
    }

    pub fn visible(&self) -> bool {
        self.2
    }

    pub fn rotation_radians(&self) -> Option<f64> {
        self.3
    }

    pub fn variant(&self) -> Option<usize> {
        self.4
    }
}
