//! Append-only session history

use behavior::ScreenPosition;
use serde::{Deserialize, Serialize};

/// One logged frame (frames with at least one face)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp_ms: u64,
    pub engagement_score: f64,
    /// Engagement fell below the event threshold on this frame
    pub distraction_event: bool,
}

/// Everything the end-of-session summary needs.
///
/// Only the aggregator appends; everyone else reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionHistory {
    entries: Vec<HistoryEntry>,
    emotions: Vec<String>,
    positions: Vec<ScreenPosition>,
    /// Frame size of the first logged frame, used to lay out the heatmap
    frame_size: Option<(u32, u32)>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_entry(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub(crate) fn push_face(&mut self, emotion: &str, position: ScreenPosition) {
        self.emotions.push(emotion.to_string());
        self.positions.push(position);
    }

    pub(crate) fn note_frame_size(&mut self, width: u32, height: u32) {
        if self.frame_size.is_none() && width > 0 && height > 0 {
            self.frame_size = Some((width, height));
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn emotions(&self) -> &[String] {
        &self.emotions
    }

    pub fn positions(&self) -> &[ScreenPosition] {
        &self.positions
    }

    pub fn frame_size(&self) -> Option<(u32, u32)> {
        self.frame_size
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn distraction_event_count(&self) -> usize {
        self.entries.iter().filter(|e| e.distraction_event).count()
    }

    /// Mean logged engagement, 0.0 when nothing was logged
    pub fn average_engagement(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let total: f64 = self.entries.iter().map(|e| e.engagement_score).sum();
        total / self.entries.len() as f64
    }

    /// Count face positions per cell of a `rows x cols` grid over a
    /// `width x height` frame.
    ///
    /// Positions outside the frame land in the nearest border cell. A zero
    /// grid or frame dimension yields an empty grid.
    pub fn heatmap(&self, cols: usize, rows: usize, width: u32, height: u32) -> Vec<Vec<u32>> {
        if cols == 0 || rows == 0 || width == 0 || height == 0 {
            return Vec::new();
        }

        let mut grid = vec![vec![0u32; cols]; rows];
        for pos in &self.positions {
            let col = cell(pos.x, width, cols);
            let row = cell(pos.y, height, rows);
            grid[row][col] += 1;
        }
        grid
    }
}

/// Grid cell of `coord` along an axis of `extent` pixels split into `cells`
fn cell(coord: i32, extent: u32, cells: usize) -> usize {
    let extent = u64::from(extent);
    let clamped = (coord.max(0) as u64).min(extent - 1);
    let index = clamped * cells as u64 / extent;
    (index as usize).min(cells - 1)
}
