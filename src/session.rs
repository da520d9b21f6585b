//! Seating session: the single mutable context a front end drives.
//!
//! Owns the grid, the current selection, the user/admin mode and the list
//! of confirmed bookings. Every front-end event maps to one `on_*` method.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{Grid, LayoutError, Pricing, Seat, SeatConfig, SeatKey, SeatStatus};
use crate::services::{
    analytics::SeatStats,
    search::{self, SeatBlock, SeatTypeFilter},
    selection::{self, Selection},
    validation,
};

/// Expected outcomes a front end reports back to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    #[error("no seats selected")]
    EmptySelection,
    #[error(
        "could not find {group_size} adjacent {seat_type} seats, try a different seat type or group size"
    )]
    NoSuitableBlock {
        group_size: usize,
        seat_type: SeatTypeFilter,
    },
    #[error("group size must be at least 1")]
    InvalidGroupSize,
    #[error("admins cannot set seats to {0}")]
    InvalidAdminStatus(SeatStatus),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    User,
    Admin,
}

/// What a seat activation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatActivation {
    Selected,
    Deselected,
    /// Booked or disabled seat clicked in user mode.
    Ignored,
    /// Admin mode: the brush status was written to the seat.
    StatusSet(SeatStatus),
    /// Coordinates outside the hall.
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingReceipt {
    pub id: Uuid,
    pub seats: Vec<String>,
    pub total: f64,
    pub confirmed_at: DateTime<Utc>,
}

/// Everything a front end needs to redraw.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot<'a> {
    pub mode: Mode,
    pub grid: &'a Grid,
    pub selection: Vec<&'a Seat>,
    pub total_price: String,
    pub stats: SeatStats,
}

#[derive(Debug, Clone)]
pub struct SeatingSession {
    grid: Grid,
    selection: Selection,
    mode: Mode,
    admin_brush: SeatStatus,
    receipts: Vec<BookingReceipt>,
}

impl SeatingSession {
    pub fn new(layout: SeatConfig, pricing: Pricing) -> Result<Self, LayoutError> {
        let grid = Grid::build(layout, pricing)?;
        info!("Seating session ready with {} seats", grid.len());
        Ok(Self::from_grid(grid))
    }

    pub fn from_grid(grid: Grid) -> Self {
        Self {
            grid,
            selection: Selection::new(),
            mode: Mode::User,
            admin_brush: SeatStatus::Booked,
            receipts: Vec::new(),
        }
    }

    // --- Queries ---

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn admin_brush(&self) -> SeatStatus {
        self.admin_brush
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn sorted_selection(&self) -> Vec<&Seat> {
        self.selection.seats(&self.grid)
    }

    pub fn total_price(&self) -> f64 {
        self.selection.total_price(&self.grid)
    }

    pub fn formatted_total(&self) -> String {
        format!("{:.2}", self.total_price())
    }

    pub fn stats(&self) -> SeatStats {
        SeatStats::collect(&self.grid)
    }

    pub fn receipts(&self) -> &[BookingReceipt] {
        &self.receipts
    }

    pub fn snapshot(&self) -> SessionSnapshot<'_> {
        SessionSnapshot {
            mode: self.mode,
            grid: &self.grid,
            selection: self.sorted_selection(),
            total_price: self.formatted_total(),
            stats: self.stats(),
        }
    }

    /// Adjacency and availability check of the current selection.
    pub fn check_selection(&self) -> Result<(), validation::SelectionIssue> {
        validation::check_group_selection(&self.grid, self.selection.keys())
    }

    /// Rows in which booking the current selection would strand a single
    /// seat, with the stranded column.
    pub fn selection_gaps(&self) -> Vec<(usize, usize)> {
        let mut rows: Vec<usize> = self.selection.keys().iter().map(|key| key.row).collect();
        rows.sort_unstable();
        rows.dedup();
        rows.into_iter()
            .filter_map(|row| {
                validation::single_seat_gap(&self.grid, row, self.selection.keys())
                    .map(|col| (row, col))
            })
            .collect()
    }

    // --- Events ---

    pub fn on_seat_activate(&mut self, row: usize, col: usize) -> SeatActivation {
        let key = SeatKey::new(row, col);
        if !self.grid.contains(key) {
            warn!("Ignoring activation of seat ({}, {}) outside the hall", row, col);
            return SeatActivation::Unknown;
        }

        match self.mode {
            Mode::Admin => {
                selection::set_status(&mut self.grid, key, self.admin_brush);
                info!(
                    "Admin set {} to {}",
                    self.grid.layout().seat_label(row, col),
                    self.admin_brush
                );
                SeatActivation::StatusSet(self.admin_brush)
            }
            Mode::User => {
                if self.grid.status(key) == Some(SeatStatus::Selected) {
                    self.selection.deselect(&mut self.grid, key);
                    SeatActivation::Deselected
                } else if self.selection.select(&mut self.grid, key) {
                    SeatActivation::Selected
                } else {
                    SeatActivation::Ignored
                }
            }
        }
    }

    /// Switching modes always drops the current selection.
    pub fn on_mode_change(&mut self, is_user_mode: bool) {
        self.mode = if is_user_mode { Mode::User } else { Mode::Admin };
        self.selection.clear(&mut self.grid);
        debug!("Switched to {:?} mode", self.mode);
    }

    pub fn set_admin_brush(&mut self, status: SeatStatus) -> Result<(), BookingError> {
        if !status.is_admin_settable() {
            return Err(BookingError::InvalidAdminStatus(status));
        }
        self.admin_brush = status;
        Ok(())
    }

    /// Replaces the selection with the best block for the group.
    pub fn on_auto_select_requested(
        &mut self,
        group_size: usize,
        seat_type: SeatTypeFilter,
    ) -> Result<SeatBlock, BookingError> {
        if group_size == 0 {
            return Err(BookingError::InvalidGroupSize);
        }

        self.selection.clear(&mut self.grid);

        let block = search::find_best_seats(&self.grid, group_size, seat_type).ok_or(
            BookingError::NoSuitableBlock {
                group_size,
                seat_type,
            },
        )?;

        for key in block.keys() {
            self.selection.select(&mut self.grid, key);
        }
        info!(
            "Auto-selected {} seats from {} for a {} request",
            block.len,
            self.grid.layout().seat_label(block.row, block.start),
            seat_type
        );
        Ok(block)
    }

    pub fn on_confirm_booking(&mut self) -> Result<BookingReceipt, BookingError> {
        if self.selection.is_empty() {
            return Err(BookingError::EmptySelection);
        }

        for (row, col) in self.selection_gaps() {
            warn!(
                "Booking leaves {} as a single free seat",
                self.grid.layout().seat_label(row, col)
            );
        }

        let total = self.total_price();
        let mut keys = self.selection.forget();
        keys.sort_unstable();
        let mut seats = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some(seat) = self.grid.get_mut(key) {
                seat.status = SeatStatus::Booked;
                seats.push(seat.id.clone());
            }
        }

        let receipt = BookingReceipt {
            id: Uuid::new_v4(),
            seats,
            total,
            confirmed_at: Utc::now(),
        };
        info!(
            "Booking {} confirmed: {} seats, total {:.2}",
            receipt.id,
            receipt.seats.len(),
            receipt.total
        );
        self.receipts.push(receipt.clone());
        Ok(receipt)
    }

    pub fn on_clear_selection(&mut self) {
        self.selection.clear(&mut self.grid);
    }

    /// Writes `status` to every selected seat, then empties the selection
    /// leaving the new statuses in place. Returns how many seats changed.
    pub fn on_admin_set_status(&mut self, status: SeatStatus) -> Result<usize, BookingError> {
        if !status.is_admin_settable() {
            return Err(BookingError::InvalidAdminStatus(status));
        }
        if self.selection.is_empty() {
            return Err(BookingError::EmptySelection);
        }

        let mut changed = 0;
        for key in self.selection.forget() {
            if selection::set_status(&mut self.grid, key, status) {
                changed += 1;
            }
        }
        info!("Admin set {} seats to {}", changed, status);
        Ok(changed)
    }

    pub fn on_reset_all(&mut self) {
        self.grid.reset_statuses();
        self.selection.forget();
        self.receipts.clear();
        info!("All seats reset to available");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> SeatingSession {
        SeatingSession::new(SeatConfig::default(), Pricing::default()).unwrap()
    }

    #[test]
    fn user_clicks_toggle_selection() {
        let mut session = session();
        assert_eq!(session.on_seat_activate(7, 4), SeatActivation::Selected);
        assert_eq!(session.selection().len(), 1);
        assert_eq!(session.on_seat_activate(7, 4), SeatActivation::Deselected);
        assert!(session.selection().is_empty());
        assert_eq!(session.on_seat_activate(30, 4), SeatActivation::Unknown);
    }

    #[test]
    fn admin_clicks_paint_the_brush_status() {
        let mut session = session();
        session.on_mode_change(false);
        session.set_admin_brush(SeatStatus::Disabled).unwrap();
        assert_eq!(
            session.on_seat_activate(0, 0),
            SeatActivation::StatusSet(SeatStatus::Disabled)
        );
        assert_eq!(session.grid().status(SeatKey::new(0, 0)), Some(SeatStatus::Disabled));
        assert!(session.selection().is_empty());

        session.on_mode_change(true);
        assert_eq!(session.on_seat_activate(0, 0), SeatActivation::Ignored);
    }

    #[test]
    fn mode_change_clears_selection() {
        let mut session = session();
        session.on_seat_activate(3, 3);
        session.on_mode_change(false);
        assert!(session.selection().is_empty());
        assert_eq!(session.grid().status(SeatKey::new(3, 3)), Some(SeatStatus::Available));
        assert_eq!(session.mode(), Mode::Admin);
    }

    #[test]
    fn auto_select_replaces_selection() {
        let mut session = session();
        session.on_seat_activate(0, 0);
        let block = session.on_auto_select_requested(3, SeatTypeFilter::Any).unwrap();
        assert_eq!(block.row, 7);
        assert_eq!(session.selection().len(), 3);
        assert_eq!(session.grid().status(SeatKey::new(0, 0)), Some(SeatStatus::Available));
        let ids: Vec<&str> = session.sorted_selection().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["H8", "H9", "H10"]);
        assert_eq!(session.formatted_total(), "30.00");
    }

    #[test]
    fn auto_select_reports_missing_block() {
        let mut session = session();
        assert_eq!(
            session.on_auto_select_requested(8, SeatTypeFilter::Vip),
            Err(BookingError::NoSuitableBlock {
                group_size: 8,
                seat_type: SeatTypeFilter::Vip
            })
        );
        assert_eq!(
            session.on_auto_select_requested(0, SeatTypeFilter::Any),
            Err(BookingError::InvalidGroupSize)
        );
        assert!(session.selection().is_empty());
    }

    #[test]
    fn confirm_books_selected_seats() {
        let mut session = session();
        session.on_seat_activate(9, 4);
        session.on_seat_activate(0, 4);
        let receipt = session.on_confirm_booking().unwrap();
        assert_eq!(receipt.seats, ["A5", "J5"]);
        assert_eq!(receipt.total, 22.5);
        assert!(session.selection().is_empty());
        assert_eq!(session.grid().status(SeatKey::new(9, 4)), Some(SeatStatus::Booked));
        assert_eq!(session.stats().booked_seats, 2);
        assert_eq!(session.receipts().len(), 1);
    }

    #[test]
    fn confirm_without_selection_changes_nothing() {
        let mut session = session();
        let before = session.grid().clone();
        assert_eq!(session.on_confirm_booking(), Err(BookingError::EmptySelection));
        assert_eq!(session.grid(), &before);
    }

    #[test]
    fn admin_apply_status_moves_selection() {
        let mut session = session();
        assert_eq!(
            session.on_admin_set_status(SeatStatus::Disabled),
            Err(BookingError::EmptySelection)
        );

        session.on_seat_activate(2, 2);
        session.on_seat_activate(2, 3);
        assert_eq!(session.on_admin_set_status(SeatStatus::Disabled), Ok(2));
        assert!(session.selection().is_empty());
        assert_eq!(session.grid().status(SeatKey::new(2, 2)), Some(SeatStatus::Disabled));
        assert_eq!(session.stats().disabled_seats, 2);
    }

    #[test]
    fn selected_cannot_be_painted_by_admin() {
        let mut session = session();
        session.on_mode_change(false);
        assert_eq!(
            session.set_admin_brush(SeatStatus::Selected),
            Err(BookingError::InvalidAdminStatus(SeatStatus::Selected))
        );
        assert_eq!(session.admin_brush(), SeatStatus::Booked);
        session.on_seat_activate(7, 7);
        session.on_mode_change(true);

        session.on_seat_activate(7, 8);
        assert_eq!(
            session.on_admin_set_status(SeatStatus::Selected),
            Err(BookingError::InvalidAdminStatus(SeatStatus::Selected))
        );
        assert_eq!(session.selection().len(), 1);

        session.on_clear_selection();
        assert!(session
            .grid()
            .iter()
            .all(|seat| seat.status != SeatStatus::Selected));
        assert_eq!(session.grid().status(SeatKey::new(7, 7)), Some(SeatStatus::Booked));
    }

    #[test]
    fn reset_clears_everything() {
        let mut session = session();
        session.on_seat_activate(1, 1);
        session.on_confirm_booking().unwrap();
        session.on_seat_activate(4, 4);
        session.on_mode_change(false);
        session.on_seat_activate(6, 6);
        session.on_reset_all();

        assert!(session.grid().iter().all(Seat::is_available));
        assert!(session.selection().is_empty());
        assert!(session.receipts().is_empty());
    }

    #[test]
    fn gaps_are_reported_per_row() {
        let mut session = session();
        session.on_mode_change(false);
        session.on_seat_activate(7, 2);
        session.on_mode_change(true);
        session.on_seat_activate(7, 0);
        assert_eq!(session.selection_gaps(), [(7, 1)]);
        assert!(session.check_selection().is_ok());
    }

    #[test]
    fn snapshot_serializes() {
        let mut session = session();
        session.on_seat_activate(5, 0);
        let json = serde_json::to_value(session.snapshot()).unwrap();
        assert_eq!(json["mode"], "user");
        assert_eq!(json["total_price"], "10.00");
        assert_eq!(json["selection"][0]["id"], "F1");
        assert_eq!(json["stats"]["total_seats"], 180);
    }
}
