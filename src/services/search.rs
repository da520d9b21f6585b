//! Best-block search for group bookings.
//!
//! Rows are visited from the middle of the hall outwards. The first row that
//! holds a long enough run of free seats wins, and inside that row the run
//! closest to the centre column is taken. Blocks are never compared across
//! rows.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

use crate::models::{Grid, SeatKey, SeatType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatTypeFilter {
    #[default]
    Any,
    Normal,
    Vip,
    Accessible,
}

impl SeatTypeFilter {
    pub const fn matches(self, seat_type: SeatType) -> bool {
        match self {
            SeatTypeFilter::Any => true,
            SeatTypeFilter::Normal => matches!(seat_type, SeatType::Normal),
            SeatTypeFilter::Vip => matches!(seat_type, SeatType::Vip),
            SeatTypeFilter::Accessible => matches!(seat_type, SeatType::Accessible),
        }
    }

    /// Filters tried in order: the requested one, then `Any` as a fallback.
    pub const fn search_passes(self) -> &'static [SeatTypeFilter] {
        match self {
            SeatTypeFilter::Any => &[SeatTypeFilter::Any],
            SeatTypeFilter::Normal => &[SeatTypeFilter::Normal, SeatTypeFilter::Any],
            SeatTypeFilter::Vip => &[SeatTypeFilter::Vip, SeatTypeFilter::Any],
            SeatTypeFilter::Accessible => &[SeatTypeFilter::Accessible, SeatTypeFilter::Any],
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            SeatTypeFilter::Any => "any",
            SeatTypeFilter::Normal => "normal",
            SeatTypeFilter::Vip => "vip",
            SeatTypeFilter::Accessible => "accessible",
        }
    }
}

impl fmt::Display for SeatTypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown seat type '{0}' (expected any, normal, vip or accessible)")]
pub struct ParseSeatTypeError(pub String);

impl FromStr for SeatTypeFilter {
    type Err = ParseSeatTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" => Ok(SeatTypeFilter::Any),
            "normal" => Ok(SeatTypeFilter::Normal),
            "vip" => Ok(SeatTypeFilter::Vip),
            "accessible" => Ok(SeatTypeFilter::Accessible),
            _ => Err(ParseSeatTypeError(s.to_string())),
        }
    }
}

/// Contiguous run of seats in one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeatBlock {
    pub row: usize,
    pub start: usize,
    pub len: usize,
}

impl SeatBlock {
    pub fn columns(&self) -> Range<usize> {
        self.start..self.start + self.len
    }

    pub fn keys(&self) -> Vec<SeatKey> {
        self.columns().map(|col| SeatKey::new(self.row, col)).collect()
    }

    /// Twice the distance between the block's mean column and `center`,
    /// kept integral so ties compare exactly.
    fn center_offset(&self, center: usize) -> usize {
        (2 * self.start + self.len - 1).abs_diff(2 * center)
    }
}

/// Row indices ordered by distance from `rows / 2`, lower row first on ties.
pub fn row_visit_order(rows: usize) -> Vec<usize> {
    let middle = rows / 2;
    let mut order: Vec<usize> = (0..rows).collect();
    order.sort_by_key(|&row| (row.abs_diff(middle), row));
    order
}

/// Best block of exactly `group_size` seats, falling back to any seat type
/// when the requested type has no room. `None` when nothing fits.
pub fn find_best_seats(grid: &Grid, group_size: usize, filter: SeatTypeFilter) -> Option<SeatBlock> {
    if group_size == 0 {
        return None;
    }

    let order = row_visit_order(grid.rows());
    filter.search_passes().iter().find_map(|&pass| {
        let found = order
            .iter()
            .find_map(|&row| best_block_in_row(grid, row, group_size, pass));
        match &found {
            Some(block) => debug!(
                "Found {} seats ({}) in row {} from column {}",
                group_size, pass, block.row, block.start
            ),
            None => debug!("No block of {} {} seats", group_size, pass),
        }
        found
    })
}

fn row_can_match(grid: &Grid, row: usize, filter: SeatTypeFilter) -> bool {
    let layout = grid.layout();
    match filter {
        SeatTypeFilter::Vip => layout.vip_rows.contains(&row),
        SeatTypeFilter::Accessible => layout.has_accessible_in_row(row),
        SeatTypeFilter::Any | SeatTypeFilter::Normal => true,
    }
}

/// Candidate block of this row closest to the centre column, lowest start
/// column on ties.
pub fn best_block_in_row(
    grid: &Grid,
    row: usize,
    group_size: usize,
    filter: SeatTypeFilter,
) -> Option<SeatBlock> {
    if !row_can_match(grid, row, filter) {
        return None;
    }
    let center = grid.columns() / 2;
    find_consecutive_blocks(grid, row, group_size, filter)
        .into_iter()
        .min_by_key(|block| (block.center_offset(center), block.start))
}

/// Every run of available, type-matching seats of at least `group_size`,
/// cut down to its centred `group_size` sub-run. The aisle ends a run.
pub fn find_consecutive_blocks(
    grid: &Grid,
    row: usize,
    group_size: usize,
    filter: SeatTypeFilter,
) -> Vec<SeatBlock> {
    let layout = grid.layout();
    let mut blocks = Vec::new();
    if group_size == 0 {
        return blocks;
    }

    let mut close_run = |run: &mut Option<usize>, end: usize| {
        if let Some(start) = run.take() {
            let len = end - start;
            if len >= group_size {
                blocks.push(SeatBlock {
                    row,
                    start: start + (len - group_size) / 2,
                    len: group_size,
                });
            }
        }
    };

    let mut run: Option<usize> = None;
    for seat in grid.row(row) {
        if layout.aisle_before(seat.col) {
            close_run(&mut run, seat.col);
        }
        if seat.is_available() && filter.matches(seat.seat_type) {
            run.get_or_insert(seat.col);
        } else {
            close_run(&mut run, seat.col);
        }
    }
    close_run(&mut run, grid.columns());

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Pricing, SeatConfig, SeatStatus};
    use crate::services::selection::set_status;

    fn hall(layout: SeatConfig) -> Grid {
        Grid::build(layout, Pricing::default()).unwrap()
    }

    fn cols(block: SeatBlock) -> Vec<usize> {
        block.columns().collect()
    }

    #[test]
    fn rows_are_visited_from_the_middle() {
        assert_eq!(row_visit_order(5), [2, 1, 3, 0, 4]);
        assert_eq!(row_visit_order(4), [2, 1, 3, 0]);
        assert!(row_visit_order(0).is_empty());
    }

    #[test]
    fn single_row_block_is_centred() {
        let grid = hall(SeatConfig::plain(1, 10));
        let block = find_best_seats(&grid, 4, SeatTypeFilter::Any).unwrap();
        assert_eq!(block.row, 0);
        assert_eq!(cols(block), [3, 4, 5, 6]);
    }

    #[test]
    fn aisle_breaks_runs() {
        let grid = hall(SeatConfig::plain(1, 8).with_aisle_after(3));
        let blocks = find_consecutive_blocks(&grid, 0, 3, SeatTypeFilter::Any);
        assert_eq!(blocks.len(), 2);
        assert_eq!(cols(blocks[0]), [0, 1, 2]);
        assert_eq!(cols(blocks[1]), [4, 5, 6]);

        assert!(find_best_seats(&grid, 5, SeatTypeFilter::Any).is_none());
    }

    #[test]
    fn group_may_fill_a_whole_segment() {
        let grid = hall(SeatConfig::plain(1, 8).with_aisle_after(3));
        let block = find_best_seats(&grid, 4, SeatTypeFilter::Any).unwrap();
        // centre column is 8 / 2 = 4, so the right half is closer
        assert_eq!(cols(block), [4, 5, 6, 7]);
    }

    #[test]
    fn equidistant_blocks_prefer_lower_start() {
        let mut grid = hall(SeatConfig::plain(1, 11));
        set_status(&mut grid, SeatKey::new(0, 5), SeatStatus::Booked);
        let block = find_best_seats(&grid, 1, SeatTypeFilter::Any).unwrap();
        // runs 0..5 and 6..11 trim to columns 2 and 8, both 3 away from 5
        assert_eq!(cols(block), [2]);
    }

    #[test]
    fn unavailable_seats_split_runs() {
        let mut grid = hall(SeatConfig::plain(1, 10));
        set_status(&mut grid, SeatKey::new(0, 4), SeatStatus::Booked);
        set_status(&mut grid, SeatKey::new(0, 7), SeatStatus::Selected);
        let blocks = find_consecutive_blocks(&grid, 0, 2, SeatTypeFilter::Any);
        let spans: Vec<Vec<usize>> = blocks.into_iter().map(cols).collect();
        // runs 0..4 and 5..7 and 8..10
        assert_eq!(spans, [vec![1, 2], vec![5, 6], vec![8, 9]]);
    }

    #[test]
    fn first_matching_row_wins_even_if_off_centre() {
        let mut grid = hall(SeatConfig::plain(3, 6));
        // middle row only has room at its left edge
        for col in 2..6 {
            set_status(&mut grid, SeatKey::new(1, col), SeatStatus::Booked);
        }
        let block = find_best_seats(&grid, 2, SeatTypeFilter::Any).unwrap();
        assert_eq!(block.row, 1);
        assert_eq!(cols(block), [0, 1]);
    }

    #[test]
    fn equidistant_rows_prefer_the_lower_index() {
        let mut grid = hall(SeatConfig::plain(5, 4));
        for col in 0..4 {
            set_status(&mut grid, SeatKey::new(2, col), SeatStatus::Disabled);
        }
        let block = find_best_seats(&grid, 2, SeatTypeFilter::Any).unwrap();
        assert_eq!(block.row, 1);
    }

    #[test]
    fn vip_request_lands_in_vip_rows() {
        let grid = hall(SeatConfig::default());
        let block = find_best_seats(&grid, 2, SeatTypeFilter::Vip).unwrap();
        assert_eq!(block.row, 9);
        assert_eq!(cols(block), [7, 8]);
        assert!(block
            .keys()
            .iter()
            .all(|&key| grid.get(key).unwrap().seat_type == SeatType::Vip));
    }

    #[test]
    fn accessible_request_uses_row_f() {
        let grid = hall(SeatConfig::default());
        let block = find_best_seats(&grid, 2, SeatTypeFilter::Accessible).unwrap();
        assert_eq!(block.row, 5);
        assert_eq!(cols(block), [10, 11]);
    }

    #[test]
    fn falls_back_to_any_type() {
        let grid = hall(SeatConfig::default());
        // only two accessible seats sit side by side
        let block = find_best_seats(&grid, 3, SeatTypeFilter::Accessible).unwrap();
        assert_eq!(block.row, 7);
        assert_eq!(block.len, 3);
    }

    #[test]
    fn nothing_fits() {
        let grid = hall(SeatConfig::default());
        assert!(find_best_seats(&grid, 7, SeatTypeFilter::Any).is_none());
        assert!(find_best_seats(&grid, 0, SeatTypeFilter::Any).is_none());
        let empty = hall(SeatConfig::plain(0, 0));
        assert!(find_best_seats(&empty, 1, SeatTypeFilter::Vip).is_none());
    }

    #[test]
    fn filter_parsing() {
        assert_eq!("VIP".parse::<SeatTypeFilter>(), Ok(SeatTypeFilter::Vip));
        assert!("balcony".parse::<SeatTypeFilter>().is_err());
    }
}
