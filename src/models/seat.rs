use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Grid coordinate of a seat, zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeatKey {
    pub row: usize,
    pub col: usize,
}

impl SeatKey {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatType {
    Normal,
    Vip,
    Accessible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatStatus {
    Available,
    Selected,
    Booked,
    Disabled,
}

impl SeatStatus {
    pub const ALL: [SeatStatus; 4] = [
        SeatStatus::Available,
        SeatStatus::Selected,
        SeatStatus::Booked,
        SeatStatus::Disabled,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            SeatStatus::Available => "available",
            SeatStatus::Selected => "selected",
            SeatStatus::Booked => "booked",
            SeatStatus::Disabled => "disabled",
        }
    }

    /// Booked and disabled seats can never be picked by a user.
    pub const fn is_locked(self) -> bool {
        matches!(self, SeatStatus::Booked | SeatStatus::Disabled)
    }

    /// `Selected` only comes from a user pick, so that every selected seat
    /// is also in the selection.
    pub const fn is_admin_settable(self) -> bool {
        !matches!(self, SeatStatus::Selected)
    }
}

impl fmt::Display for SeatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown seat status '{0}' (expected available, selected, booked or disabled)")]
pub struct ParseStatusError(pub String);

impl FromStr for SeatStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        SeatStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

impl fmt::Display for SeatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SeatType::Normal => "normal",
            SeatType::Vip => "vip",
            SeatType::Accessible => "accessible",
        })
    }
}

/// A single seat of the grid. Type and price are fixed when the grid is
/// built; only the status changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seat {
    pub id: String,
    pub row: usize,
    pub col: usize,
    #[serde(rename = "type")]
    pub seat_type: SeatType,
    pub is_discount: bool,
    pub status: SeatStatus,
    pub price: f64,
}

impl Seat {
    pub const fn key(&self) -> SeatKey {
        SeatKey::new(self.row, self.col)
    }

    pub const fn is_available(&self) -> bool {
        matches!(self.status, SeatStatus::Available)
    }
}
