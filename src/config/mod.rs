use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::{LayoutError, Pricing, SeatConfig, SeatStatus};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value '{value}': {reason}")]
    InvalidVar {
        name: &'static str,
        value: String,
        reason: String,
    },
    #[error("failed to load layout file {path}: {source}")]
    LayoutFile {
        path: PathBuf,
        #[source]
        source: ::config::ConfigError,
    },
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

// Main configuration container
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub venue: VenueConfig,
}

// Application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub environment: String,
    pub rust_log: String,
}

// Where the hall layout comes from and how the admin panel starts
#[derive(Debug, Clone, Deserialize)]
pub struct VenueConfig {
    pub layout_file: Option<PathBuf>,
    pub admin_status: SeatStatus,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Config {
            app: AppConfig {
                environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
                rust_log: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "seating_system=info".to_string()),
            },
            venue: VenueConfig {
                layout_file: env::var_os("SEATING_LAYOUT_FILE")
                    .filter(|path| !path.is_empty())
                    .map(PathBuf::from),
                admin_status: match env::var("SEATING_ADMIN_STATUS") {
                    Ok(value) => parse_admin_status(value)?,
                    Err(_) => SeatStatus::Booked,
                },
            },
        })
    }
}

fn parse_admin_status(value: String) -> Result<SeatStatus, ConfigError> {
    let invalid = |value: String, reason: String| ConfigError::InvalidVar {
        name: "SEATING_ADMIN_STATUS",
        value,
        reason,
    };
    match value.parse::<SeatStatus>() {
        Ok(status) if status.is_admin_settable() => Ok(status),
        Ok(status) => Err(invalid(value, format!("admins cannot set seats to {}", status))),
        Err(e) => Err(invalid(value, e.to_string())),
    }
}

/// Hall layout plus ticket prices, as read from a layout file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VenueSettings {
    #[serde(default)]
    pub layout: SeatConfig,
    #[serde(default)]
    pub pricing: Pricing,
}

impl VenueSettings {
    /// Built-in theater when no file is configured. Format is picked from the
    /// file extension (toml, json, yaml).
    pub fn load(venue: &VenueConfig) -> Result<Self, ConfigError> {
        match &venue.layout_file {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let settings: VenueSettings = ::config::Config::builder()
            .add_source(::config::File::from(path))
            .build()
            .and_then(|raw| raw.try_deserialize())
            .map_err(|source| ConfigError::LayoutFile {
                path: path.to_path_buf(),
                source,
            })?;

        settings.layout.validate_layout()?;
        settings.pricing.validate_pricing()?;
        tracing::info!(
            "Loaded {}x{} layout from {}",
            settings.layout.rows,
            settings.layout.columns,
            path.display()
        );
        Ok(settings)
    }
}
