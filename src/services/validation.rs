//! Sanity checks on a set of seats before it is booked.

use thiserror::Error;

use crate::models::{Grid, SeatKey, SeatStatus};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionIssue {
    #[error("seat ({row}, {col}) is outside the hall")]
    OutOfRange { row: usize, col: usize },
    #[error("seat {id} is {status}")]
    NotAvailable { id: String, status: SeatStatus },
    #[error("group seats must be in the same row")]
    MixedRows,
    #[error("group seats must be adjacent ({left} and {right} are not)")]
    NotAdjacent { left: String, right: String },
}

/// Every seat must exist and still be bookable; two or more seats must form
/// one unbroken run in a single row. The two seats on either side of the
/// aisle count as neighbours.
pub fn check_group_selection(grid: &Grid, keys: &[SeatKey]) -> Result<(), SelectionIssue> {
    for &key in keys {
        let seat = grid.get(key).ok_or(SelectionIssue::OutOfRange {
            row: key.row,
            col: key.col,
        })?;
        if !matches!(seat.status, SeatStatus::Available | SeatStatus::Selected) {
            return Err(SelectionIssue::NotAvailable {
                id: seat.id.clone(),
                status: seat.status,
            });
        }
    }

    if keys.len() < 2 {
        return Ok(());
    }

    let mut sorted = keys.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    if sorted.iter().any(|key| key.row != sorted[0].row) {
        return Err(SelectionIssue::MixedRows);
    }

    let layout = grid.layout();
    for pair in sorted.windows(2) {
        if pair[1].col != pair[0].col + 1 {
            return Err(SelectionIssue::NotAdjacent {
                left: layout.seat_label(pair[0].row, pair[0].col),
                right: layout.seat_label(pair[1].row, pair[1].col),
            });
        }
    }

    Ok(())
}

/// Column of the first available seat in `row` that would end up boxed in
/// on both sides once `booking` is taken. Neighbours across the aisle do not
/// count, and seats at either end of the row are never reported.
pub fn single_seat_gap(grid: &Grid, row: usize, booking: &[SeatKey]) -> Option<usize> {
    let layout = grid.layout();
    let seats = grid.row(row);

    let blocked = |col: usize| {
        booking.contains(&SeatKey::new(row, col))
            || matches!(seats[col].status, SeatStatus::Booked | SeatStatus::Disabled)
    };

    (1..seats.len().saturating_sub(1)).find(|&col| {
        seats[col].is_available()
            && !booking.contains(&SeatKey::new(row, col))
            && layout.same_segment(col - 1, col)
            && layout.same_segment(col, col + 1)
            && blocked(col - 1)
            && blocked(col + 1)
    })
}
