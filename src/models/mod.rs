pub mod layout;
pub mod seat;
pub mod grid;

pub use layout::{LayoutError, Pricing, SeatConfig};
pub use seat::{ParseStatusError, Seat, SeatKey, SeatStatus, SeatType};
pub use grid::Grid;
