use serde::Serialize;
use tracing::debug;

use super::layout::{LayoutError, Pricing, SeatConfig};
use super::seat::{Seat, SeatKey, SeatStatus};

/// Row-major `rows x columns` seat container. Built once from a layout and
/// pricing; afterwards only seat statuses change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid {
    layout: SeatConfig,
    pricing: Pricing,
    seats: Vec<Seat>,
}

impl Grid {
    /// Validates both inputs, then lays out every seat as available.
    pub fn build(layout: SeatConfig, pricing: Pricing) -> Result<Self, LayoutError> {
        layout.validate_layout()?;
        pricing.validate_pricing()?;

        let mut seats = Vec::with_capacity(layout.rows * layout.columns);
        for row in 0..layout.rows {
            for col in 0..layout.columns {
                let seat_type = layout.seat_type_at(row, col);
                let is_discount = layout.is_discount_row(row);
                seats.push(Seat {
                    id: layout.seat_label(row, col),
                    row,
                    col,
                    seat_type,
                    is_discount,
                    status: SeatStatus::Available,
                    price: pricing.price_for(seat_type, is_discount),
                });
            }
        }

        debug!("Built seat grid {}x{}", layout.rows, layout.columns);
        Ok(Self { layout, pricing, seats })
    }

    pub fn layout(&self) -> &SeatConfig {
        &self.layout
    }

    pub fn rows(&self) -> usize {
        self.layout.rows
    }

    pub fn columns(&self) -> usize {
        self.layout.columns
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    fn index(&self, key: SeatKey) -> Option<usize> {
        (key.row < self.layout.rows && key.col < self.layout.columns)
            .then(|| key.row * self.layout.columns + key.col)
    }

    pub fn contains(&self, key: SeatKey) -> bool {
        self.index(key).is_some()
    }

    pub fn get(&self, key: SeatKey) -> Option<&Seat> {
        let i = self.index(key)?;
        Some(&self.seats[i])
    }

    pub fn get_mut(&mut self, key: SeatKey) -> Option<&mut Seat> {
        let i = self.index(key)?;
        Some(&mut self.seats[i])
    }

    pub fn status(&self, key: SeatKey) -> Option<SeatStatus> {
        self.get(key).map(|seat| seat.status)
    }

    pub fn row(&self, row: usize) -> &[Seat] {
        if row >= self.layout.rows {
            return &[];
        }
        let start = row * self.layout.columns;
        &self.seats[start..start + self.layout.columns]
    }

    pub fn row_iter(&self) -> impl Iterator<Item = &[Seat]> + '_ {
        (0..self.layout.rows).map(move |row| self.row(row))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Seat> + '_ {
        self.seats.iter()
    }

    pub fn seat_by_label(&self, id: &str) -> Option<&Seat> {
        self.layout
            .parse_seat_label(id)
            .and_then(|key| self.get(key))
    }

    /// Puts every seat back to available. Types and prices are untouched.
    pub fn reset_statuses(&mut self) {
        for seat in &mut self.seats {
            seat.status = SeatStatus::Available;
        }
    }
}
