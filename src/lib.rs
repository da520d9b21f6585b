pub mod config;
pub mod models;
pub mod services;
pub mod session;
pub mod controllers;

pub use session::{BookingError, SeatingSession};

/// Builds a session from the environment: layout file if one is configured,
/// otherwise the stock theater, and the admin brush from the config.
pub fn session_from_config(
    config: &crate::config::Config,
) -> Result<SeatingSession, crate::config::ConfigError> {
    let venue = crate::config::VenueSettings::load(&config.venue)?;
    let mut session = SeatingSession::new(venue.layout, venue.pricing)?;
    session
        .set_admin_brush(config.venue.admin_status)
        .map_err(|e| crate::config::ConfigError::InvalidVar {
            name: "SEATING_ADMIN_STATUS",
            value: config.venue.admin_status.to_string(),
            reason: e.to_string(),
        })?;
    Ok(session)
}
