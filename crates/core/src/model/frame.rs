use lotlapse_protocol::VisibleEntity;
use serde::{Deserialize, Serialize};

use crate::model::layout::{Column, Layout, Slot};

/// One occupancy snapshot of the layout at a discrete animation step.
///
/// A frame owns its slots outright — it is a structural copy of the
/// layout skeleton, never a view into it or into another frame. That is
/// what lets the generator redraw occupancy per frame without ever
/// corrupting an earlier snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    columns: Vec<Column>,
}

impl Frame {
    /// Fresh all-vacant copy of the layout skeleton (positions only).
    pub fn vacant(layout: &Layout) -> Self {
        Self {
            columns: layout
                .columns()
                .iter()
                .map(|column| {
                    Column::from_slots(
                        column
                            .slots()
                            .iter()
                            .map(|slot| Slot::vacant(slot.position))
                            .collect(),
                    )
                })
                .collect(),
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub(crate) fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    pub(crate) fn from_columns(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Entities visible in this frame, flattened in column order then
    /// in-column order. This is exactly what the playback controller
    /// publishes to the renderer.
    pub fn visible_entities(&self) -> Vec<VisibleEntity> {
        self.columns
            .iter()
            .flat_map(Column::slots)
            .filter_map(|slot| {
                slot.occupant
                    .map(|o| VisibleEntity::new(slot.position, o.rotation, o.variant))
            })
            .collect()
    }

    /// Whether this frame has the same column/slot structure and the same
    /// coordinates per index as `layout`.
    pub fn matches_skeleton(&self, layout: &Layout) -> bool {
        self.columns.len() == layout.column_count()
            && self
                .columns
                .iter()
                .zip(layout.columns())
                .all(|(mine, theirs)| {
                    mine.len() == theirs.len()
                        && mine
                            .slots()
                            .iter()
                            .zip(theirs.slots())
                            .all(|(a, b)| a.position == b.position)
                })
    }
}
