//! Loader for pre-computed histories supplied by an external source.
//!
//! Accepts the JSON [`HistoryDoc`] shape and validates it into a
//! [`History`] that playback treats exactly like a generated one.

use thiserror::Error;

use lotlapse_protocol::{GeoPoint, HistoryDoc, PointRecord, Rotation};

use crate::model::{Column, Frame, History, HistoryError, Occupant, Slot};

/// How far (radians) a document rotation may stray from 0 or π.
const ROTATION_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("history: {0}")]
    Invalid(#[from] HistoryError),
    #[error("column layout sums to {expected} slots but frame {frame} has {actual}")]
    ColumnMismatch {
        frame: usize,
        expected: usize,
        actual: usize,
    },
    #[error("column {column} is declared with zero slots")]
    EmptyColumn { column: usize },
    #[error("frame {frame} slot {slot}: visible entity is missing rotation or variant")]
    MissingOccupancy { frame: usize, slot: usize },
    #[error("frame {frame} slot {slot}: vacant entity carries rotation or variant")]
    UnexpectedOccupancy { frame: usize, slot: usize },
    #[error("frame {frame} slot {slot}: rotation {radians} is neither 0 nor π")]
    BadRotation {
        frame: usize,
        slot: usize,
        radians: f64,
    },
}

/// Parse and validate a JSON history document.
///
/// Enforces everything the rest of the system assumes: at least one
/// frame, identical structure and coordinates across frames, and
/// rotation/variant present iff the slot is visible.
pub fn load_history(data: &[u8]) -> Result<History, LoadError> {
    let doc: HistoryDoc = serde_json::from_slice(data)?;
    history_from_doc(&doc)
}

/// Validate an already-deserialized document.
pub fn history_from_doc(doc: &HistoryDoc) -> Result<History, LoadError> {
    let mut frames = Vec::with_capacity(doc.frames.len());
    for (frame_index, records) in doc.frames.iter().enumerate() {
        frames.push(build_frame(frame_index, records, doc.columns.as_deref())?);
    }
    Ok(History::new(frames)?)
}

fn build_frame(
    frame_index: usize,
    records: &[PointRecord],
    columns: Option<&[usize]>,
) -> Result<Frame, LoadError> {
    let mut slots = Vec::with_capacity(records.len());
    for (slot_index, record) in records.iter().enumerate() {
        slots.push(build_slot(frame_index, slot_index, record)?);
    }

    // Regroup the flat slot list into columns. Without a declared column
    // layout the whole frame is one column.
    let Some(lengths) = columns else {
        return Ok(Frame::from_columns(vec![Column::from_slots(slots)]));
    };

    let expected: usize = lengths.iter().sum();
    if expected != slots.len() {
        return Err(LoadError::ColumnMismatch {
            frame: frame_index,
            expected,
            actual: slots.len(),
        });
    }

    let mut grouped = Vec::with_capacity(lengths.len());
    let mut rest = slots.as_slice();
    for (column_index, &len) in lengths.iter().enumerate() {
        if len == 0 {
            return Err(LoadError::EmptyColumn {
                column: column_index,
            });
        }
        let (head, tail) = rest.split_at(len);
        grouped.push(Column::from_slots(head.to_vec()));
        rest = tail;
    }
    Ok(Frame::from_columns(grouped))
}

fn build_slot(
    frame_index: usize,
    slot_index: usize,
    record: &PointRecord,
) -> Result<Slot, LoadError> {
    let position = GeoPoint::new(record.lon(), record.lat());
    let occupant = match (record.visible(), record.rotation_radians(), record.variant()) {
        (true, Some(radians), Some(variant)) => {
            let rotation = Rotation::from_radians(radians, ROTATION_TOLERANCE).ok_or(
                LoadError::BadRotation {
                    frame: frame_index,
                    slot: slot_index,
                    radians,
                },
            )?;
            Some(Occupant { rotation, variant })
        }
        (true, _, _) => {
            return Err(LoadError::MissingOccupancy {
                frame: frame_index,
                slot: slot_index,
            });
        }
        (false, None, None) => None,
        (false, _, _) => {
            return Err(LoadError::UnexpectedOccupancy {
                frame: frame_index,
                slot: slot_index,
            });
        }
    };
    Ok(Slot { position, occupant })
}
