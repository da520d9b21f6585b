//! The user's current pick of seats.
//!
//! Selection stores coordinates only; seat data is always read back from the
//! [`Grid`], so a status change made through one path is visible through the
//! other.

use serde::Serialize;
use tracing::debug;

use crate::models::{Grid, Seat, SeatKey, SeatStatus};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    keys: Vec<SeatKey>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, key: SeatKey) -> bool {
        self.keys.contains(&key)
    }

    /// Keys in the order they were picked.
    pub fn keys(&self) -> &[SeatKey] {
        &self.keys
    }

    /// Keys ordered by row, then column.
    pub fn sorted_keys(&self) -> Vec<SeatKey> {
        let mut keys = self.keys.clone();
        keys.sort_unstable();
        keys
    }

    /// Selected seats in display order, resolved against the grid.
    pub fn seats<'g>(&self, grid: &'g Grid) -> Vec<&'g Seat> {
        self.sorted_keys()
            .into_iter()
            .filter_map(|key| grid.get(key))
            .collect()
    }

    pub fn total_price(&self, grid: &Grid) -> f64 {
        self.keys
            .iter()
            .filter_map(|&key| grid.get(key))
            .fold(0.0, |sum, seat| sum + seat.price)
    }

    /// Marks the seat as selected. Booked, disabled and unknown seats are
    /// left alone and `false` is returned.
    pub fn select(&mut self, grid: &mut Grid, key: SeatKey) -> bool {
        let Some(seat) = grid.get_mut(key) else {
            return false;
        };
        if seat.status.is_locked() {
            debug!("Seat {} is {}, not selectable", seat.id, seat.status);
            return false;
        }
        seat.status = SeatStatus::Selected;
        if !self.keys.contains(&key) {
            self.keys.push(key);
        }
        true
    }

    /// Returns the seat to available and drops it from the selection.
    pub fn deselect(&mut self, grid: &mut Grid, key: SeatKey) {
        if let Some(seat) = grid.get_mut(key) {
            seat.status = SeatStatus::Available;
        }
        self.keys.retain(|&k| k != key);
    }

    /// Returns the new selected state of the seat.
    pub fn toggle(&mut self, grid: &mut Grid, key: SeatKey) -> bool {
        if grid.status(key) == Some(SeatStatus::Selected) {
            self.deselect(grid, key);
            false
        } else {
            self.select(grid, key)
        }
    }

    /// Deselects everything.
    pub fn clear(&mut self, grid: &mut Grid) {
        for key in self.keys.drain(..) {
            if let Some(seat) = grid.get_mut(key) {
                seat.status = SeatStatus::Available;
            }
        }
    }

    /// Empties the selection without touching seat statuses. Used once the
    /// selected seats have been moved to another status.
    pub fn forget(&mut self) -> Vec<SeatKey> {
        std::mem::take(&mut self.keys)
    }
}

/// Admin override: writes any status, no guard, selection untouched.
pub fn set_status(grid: &mut Grid, key: SeatKey, status: SeatStatus) -> bool {
    match grid.get_mut(key) {
        Some(seat) => {
            seat.status = status;
            true
        }
        None => false,
    }
}
