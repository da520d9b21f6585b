pub mod commands;
pub mod render;

pub use commands::{execute, Command, CommandError};
