//! Seat occupancy tracking

use serde::{Deserialize, Serialize};
use tracing::info;

/// Seat state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SeatState {
    #[default]
    Occupied,
    Empty,
}

/// Presence tracker with delayed absence and instant recovery.
///
/// The seat only turns empty after faces have been missing for the whole
/// timeout; any frame with a face marks it occupied again.
#[derive(Debug, Clone)]
pub struct SeatOccupancy {
    state: SeatState,
    last_face_seen_ms: u64,
    absence_timeout_ms: u64,
    leaving_seat_count: u32,
}

impl SeatOccupancy {
    /// `started_at_ms` counts as the last time a face was seen
    pub fn new(started_at_ms: u64, absence_timeout_ms: u64) -> Self {
        Self {
            state: SeatState::Occupied,
            last_face_seen_ms: started_at_ms,
            absence_timeout_ms,
            leaving_seat_count: 0,
        }
    }

    /// Update with one frame; returns true on the frame the seat turns empty
    pub fn update(&mut self, timestamp_ms: u64, face_count: usize) -> bool {
        if face_count > 0 {
            if self.state == SeatState::Empty {
                info!("Seat occupied again after absence");
            }
            self.state = SeatState::Occupied;
            self.last_face_seen_ms = timestamp_ms;
            return false;
        }

        let absent_for = timestamp_ms.saturating_sub(self.last_face_seen_ms);
        if self.state == SeatState::Occupied && absent_for >= self.absence_timeout_ms {
            self.state = SeatState::Empty;
            self.leaving_seat_count += 1;
            info!(
                "Seat empty after {}ms without a face (count: {})",
                absent_for, self.leaving_seat_count
            );
            return true;
        }
        false
    }

    pub fn state(&self) -> SeatState {
        self.state
    }

    pub fn is_seat_empty(&self) -> bool {
        self.state == SeatState::Empty
    }

    pub fn last_face_seen_ms(&self) -> u64 {
        self.last_face_seen_ms
    }

    pub fn leaving_seat_count(&self) -> u32 {
        self.leaving_seat_count
    }
}
