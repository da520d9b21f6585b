//! Plain-text drawing of the hall and the side panels.

use crate::models::{Grid, Seat, SeatStatus, SeatType};
use crate::services::analytics::SeatStats;
use crate::session::{BookingReceipt, SeatingSession};

pub const LEGEND: &str =
    "o free   V free VIP   A free accessible   * selected   x booked   # disabled";

fn glyph(seat: &Seat) -> char {
    match (seat.status, seat.seat_type) {
        (SeatStatus::Available, SeatType::Normal) => 'o',
        (SeatStatus::Available, SeatType::Vip) => 'V',
        (SeatStatus::Available, SeatType::Accessible) => 'A',
        (SeatStatus::Selected, _) => '*',
        (SeatStatus::Booked, _) => 'x',
        (SeatStatus::Disabled, _) => '#',
    }
}

/// Column header, one line per row and a wider gap at the aisle.
pub fn render_grid(grid: &Grid) -> String {
    let layout = grid.layout();
    let label_width = layout.row_labels.iter().map(String::len).max().unwrap_or(0);
    let cell = |col: usize, text: String| {
        let gap = if layout.aisle_before(col) { "  " } else { "" };
        format!("{gap}{text:>3}")
    };

    let header: String = (0..grid.columns())
        .map(|col| cell(col, (col + 1).to_string()))
        .collect();
    let mut lines = vec![format!("{:label_width$}{header}", "")];

    for (seats, label) in grid.row_iter().zip(&layout.row_labels) {
        let cells: String = seats
            .iter()
            .map(|seat| cell(seat.col, glyph(seat).to_string()))
            .collect();
        lines.push(format!("{label:<label_width$}{cells}"));
    }

    lines.push(LEGEND.to_string());
    lines.join("\n")
}

pub fn render_selection(session: &SeatingSession) -> String {
    let seats = session.sorted_selection();
    let ids = if seats.is_empty() {
        "None".to_string()
    } else {
        seats.iter().map(|seat| seat.id.as_str()).collect::<Vec<_>>().join(", ")
    };
    format!("Selected: {} | Total: {}", ids, session.formatted_total())
}

pub fn render_stats(stats: &SeatStats) -> String {
    stats.to_string()
}

pub fn render_receipt(receipt: &BookingReceipt) -> String {
    format!(
        "Booking confirmed! {} | Seats: {} | Total: {:.2} | {}",
        receipt.id,
        receipt.seats.join(", "),
        receipt.total,
        receipt.confirmed_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
}
