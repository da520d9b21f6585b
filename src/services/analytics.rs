//! Occupancy figures for the whole hall.

use serde::Serialize;
use std::fmt;

use crate::models::{Grid, SeatStatus};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeatStats {
    pub total_seats: usize,
    /// Available plus currently selected.
    pub available_seats: usize,
    pub booked_seats: usize,
    pub disabled_seats: usize,
    /// Percentage of booked seats, 0 for an empty hall.
    pub occupancy_rate: f64,
}

impl SeatStats {
    pub fn collect(grid: &Grid) -> Self {
        let mut stats = SeatStats {
            total_seats: 0,
            available_seats: 0,
            booked_seats: 0,
            disabled_seats: 0,
            occupancy_rate: 0.0,
        };

        for seat in grid.iter() {
            stats.total_seats += 1;
            match seat.status {
                SeatStatus::Available | SeatStatus::Selected => stats.available_seats += 1,
                SeatStatus::Booked => stats.booked_seats += 1,
                SeatStatus::Disabled => stats.disabled_seats += 1,
            }
        }

        if stats.total_seats > 0 {
            stats.occupancy_rate = stats.booked_seats as f64 / stats.total_seats as f64 * 100.0;
        }
        stats
    }

    pub fn formatted_occupancy(&self) -> String {
        format!("{:.1}%", self.occupancy_rate)
    }
}

impl fmt::Display for SeatStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total: {} | Available: {} | Booked: {} | Disabled: {} | Occupancy: {}",
            self.total_seats,
            self.available_seats,
            self.booked_seats,
            self.disabled_seats,
            self.formatted_occupancy()
        )
    }
}
