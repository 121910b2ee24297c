use lotlapse_protocol::{GeoPoint, Rotation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("layout has no columns")]
    Empty,
    #[error("column {0} has no slots")]
    EmptyColumn(usize),
}

/// Occupancy state of a single slot.
///
/// Exists only while the slot is occupied, so rotation and variant can
/// never be observed on a vacant slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Occupant {
    pub rotation: Rotation,
    pub variant: usize,
}

/// A single spatial slot: a fixed position plus its current occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub position: GeoPoint,
    pub occupant: Option<Occupant>,
}

impl Slot {
    /// A slot with nothing parked in it.
    pub fn vacant(position: GeoPoint) -> Self {
        Self {
            position,
            occupant: None,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }
}

/// An ordered run of slots sharing one logical grouping (a lane).
///
/// Length is fixed when the layout is built and never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    slots: Vec<Slot>,
}

impl Column {
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub(crate) fn from_slots(slots: Vec<Slot>) -> Self {
        Self { slots }
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [Slot] {
        &mut self.slots
    }
}

/// The fixed spatial skeleton shared by every frame of a run.
///
/// Column count and per-column slot counts are validated once here and
/// hold for the whole run; frames copy the skeleton, never alias it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    columns: Vec<Column>,
}

impl Layout {
    /// Build a layout from per-column position lists.
    ///
    /// An empty layout or an empty column is a configuration error the
    /// rest of the system refuses to operate on.
    pub fn from_positions(columns: Vec<Vec<GeoPoint>>) -> Result<Self, LayoutError> {
        if columns.is_empty() {
            return Err(LayoutError::Empty);
        }
        for (index, column) in columns.iter().enumerate() {
            if column.is_empty() {
                return Err(LayoutError::EmptyColumn(index));
            }
        }
        Ok(Self {
            columns: columns
                .into_iter()
                .map(|positions| Column::from_slots(positions.into_iter().map(Slot::vacant).collect()))
                .collect(),
        })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Total slots across all columns.
    pub fn slot_count(&self) -> usize {
        self.columns.iter().map(Column::len).sum()
    }

    pub(crate) fn from_columns(columns: Vec<Column>) -> Self {
        Self { columns }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(lon: f64, lat: f64) -> GeoPoint {
        GeoPoint::new(lon, lat)
    }

    #[test]
    fn builds_from_positions() {
        let layout =
            Layout::from_positions(vec![vec![p(1.0, 2.0), p(1.0, 2.1)], vec![p(1.1, 2.0)]])
                .unwrap();
        assert_eq!(layout.column_count(), 2);
        assert_eq!(layout.slot_count(), 3);
        assert!(layout.columns()[0].slots().iter().all(|s| !s.is_occupied()));
    }

    #[test]
    fn rejects_empty_layout() {
        assert!(matches!(
            Layout::from_positions(vec![]),
            Err(LayoutError::Empty)
        ));
    }

    #[test]
    fn rejects_empty_column() {
        let result = Layout::from_positions(vec![vec![p(1.0, 2.0)], vec![]]);
        assert!(matches!(result, Err(LayoutError::EmptyColumn(1))));
    }
}
