use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::frame::Frame;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history has no frames")]
    Empty,
    #[error("frame {frame} has a different column/slot structure than frame 0")]
    RaggedFrame { frame: usize },
    #[error("frame {frame} disagrees with frame 0 on a slot coordinate")]
    CoordinateMismatch { frame: usize },
}

/// The ordered, append-only sequence of frames for one playback run.
///
/// A history is populated exactly once — by the generator or the external
/// loader — and read-only by index afterwards. Both construction paths
/// guarantee it is non-empty and structurally uniform, which is what lets
/// the playback controller index into it without runtime checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    frames: Vec<Frame>,
}

impl History {
    /// Validate and adopt externally built frames.
    ///
    /// Every frame must share frame 0's column count, per-column slot
    /// counts, and per-index coordinates.
    pub fn new(frames: Vec<Frame>) -> Result<Self, HistoryError> {
        let Some(first) = frames.first() else {
            return Err(HistoryError::Empty);
        };

        for (index, frame) in frames.iter().enumerate().skip(1) {
            if frame.columns().len() != first.columns().len()
                || frame
                    .columns()
                    .iter()
                    .zip(first.columns())
                    .any(|(a, b)| a.len() != b.len())
            {
                return Err(HistoryError::RaggedFrame { frame: index });
            }
            let coordinates_match = frame
                .columns()
                .iter()
                .zip(first.columns())
                .all(|(a, b)| {
                    a.slots()
                        .iter()
                        .zip(b.slots())
                        .all(|(x, y)| x.position == y.position)
                });
            if !coordinates_match {
                return Err(HistoryError::CoordinateMismatch { frame: index });
            }
        }

        Ok(Self { frames })
    }

    /// Adopt frames the generator already produced against one skeleton.
    pub(crate) fn from_generated(frames: Vec<Frame>) -> Self {
        debug_assert!(!frames.is_empty());
        Self { frames }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Index of the final frame.
    pub fn last_index(&self) -> usize {
        self.frames.len() - 1
    }

    #[cfg(test)]
    pub(crate) fn frames_mut(&mut self) -> &mut [Frame] {
        &mut self.frames
    }
}
