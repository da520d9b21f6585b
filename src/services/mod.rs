pub mod analytics;
pub mod search;
pub mod selection;
pub mod validation;

pub use analytics::SeatStats;
pub use search::{find_best_seats, SeatBlock, SeatTypeFilter};
pub use selection::Selection;
