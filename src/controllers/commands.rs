//! Line commands of the terminal front end and their execution against a
//! [`SeatingSession`].

use std::str::FromStr;
use thiserror::Error;

use super::render;
use crate::models::{ParseStatusError, SeatStatus};
use crate::services::search::{ParseSeatTypeError, SeatTypeFilter};
use crate::session::{BookingError, Mode, SeatActivation, SeatingSession};

pub const HELP: &str = "\
Commands:
  show                   draw the hall
  mode user|admin        switch mode (clears the selection)
  seat <ID>              click a seat, e.g. `seat H7`
  auto <n> [type]        pick the best block of n seats (any, normal, vip, accessible)
  book                   confirm the selected seats
  clear                  drop the selection
  brush <status>         status that admin clicks apply
  apply <status>         admin: set the status of every selected seat
  reset                  make every seat available again
  stats                  occupancy figures
  selection              selected seats and total price
  check                  adjacency and single-seat gap check of the selection
  history                confirmed bookings
  export                 session snapshot as JSON
  help                   this text
  quit                   leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show,
    Mode(Mode),
    Seat(String),
    Auto {
        group_size: usize,
        seat_type: SeatTypeFilter,
    },
    Book,
    Clear,
    Brush(SeatStatus),
    Apply(SeatStatus),
    Reset,
    Stats,
    Selection,
    Check,
    History,
    Export,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}', type `help`")]
    Unknown(String),
    #[error("`{command}` needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[error("'{0}' is not a group size")]
    InvalidNumber(String),
    #[error("unknown mode '{0}' (expected user or admin)")]
    InvalidMode(String),
    #[error(transparent)]
    Status(#[from] ParseStatusError),
    #[error(transparent)]
    SeatType(#[from] ParseSeatTypeError),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(CommandError::Empty)?.to_ascii_lowercase();
        let mut arg = |command: &'static str, argument: &'static str| {
            required(&mut words, command, argument)
        };

        let command = match name.as_str() {
            "show" | "grid" => Command::Show,
            "mode" => match arg("mode", "user or admin")?.to_ascii_lowercase().as_str() {
                "user" => Command::Mode(Mode::User),
                "admin" => Command::Mode(Mode::Admin),
                other => return Err(CommandError::InvalidMode(other.to_string())),
            },
            "seat" => Command::Seat(arg("seat", "a seat id")?.to_string()),
            "auto" => {
                let size = arg("auto", "a group size")?;
                let group_size = size
                    .parse()
                    .map_err(|_| CommandError::InvalidNumber(size.to_string()))?;
                let seat_type = match arg("auto", "a seat type") {
                    Ok(kind) => kind.parse()?,
                    Err(_) => SeatTypeFilter::Any,
                };
                Command::Auto {
                    group_size,
                    seat_type,
                }
            }
            "book" | "confirm" => Command::Book,
            "clear" => Command::Clear,
            "brush" => Command::Brush(arg("brush", "a status")?.parse()?),
            "apply" => Command::Apply(arg("apply", "a status")?.parse()?),
            "reset" => Command::Reset,
            "stats" => Command::Stats,
            "selection" => Command::Selection,
            "check" => Command::Check,
            "history" => Command::History,
            "export" => Command::Export,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => return Err(CommandError::Unknown(name)),
        };
        Ok(command)
    }
}

fn required<'a>(
    words: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, CommandError> {
    words
        .next()
        .ok_or(CommandError::MissingArgument { command, argument })
}

/// Runs one command and returns what should be printed.
pub fn execute(session: &mut SeatingSession, command: Command) -> String {
    match command {
        Command::Show => render::render_grid(session.grid()),
        Command::Mode(mode) => {
            session.on_mode_change(mode == Mode::User);
            format!("{:?} mode, selection cleared", mode)
        }
        Command::Seat(id) => {
            let Some(key) = session.grid().seat_by_label(&id).map(|seat| seat.key()) else {
                return format!("No seat '{}' in this hall", id);
            };
            match session.on_seat_activate(key.row, key.col) {
                SeatActivation::Selected => {
                    format!("{} selected\n{}", id, render::render_selection(session))
                }
                SeatActivation::Deselected => {
                    format!("{} released\n{}", id, render::render_selection(session))
                }
                SeatActivation::Ignored => format!("{} cannot be selected", id),
                SeatActivation::StatusSet(status) => format!("{} is now {}", id, status),
                SeatActivation::Unknown => format!("No seat '{}' in this hall", id),
            }
        }
        Command::Auto {
            group_size,
            seat_type,
        } => match session.on_auto_select_requested(group_size, seat_type) {
            Ok(_) => format!(
                "{}\n{}",
                render::render_grid(session.grid()),
                render::render_selection(session)
            ),
            Err(e) => e.to_string(),
        },
        Command::Book => match session.on_confirm_booking() {
            Ok(receipt) => render::render_receipt(&receipt),
            Err(e) => format!("Please select at least one seat ({})", e),
        },
        Command::Clear => {
            session.on_clear_selection();
            render::render_selection(session)
        }
        Command::Brush(status) => match session.set_admin_brush(status) {
            Ok(()) => format!("Admin clicks now set seats to {}", status),
            Err(e) => e.to_string(),
        },
        Command::Apply(status) => match session.on_admin_set_status(status) {
            Ok(changed) => format!("{} seats set to {}", changed, status),
            Err(BookingError::EmptySelection) => {
                "Please select at least one seat to change status".to_string()
            }
            Err(e) => e.to_string(),
        },
        Command::Reset => {
            session.on_reset_all();
            "All seats reset to available".to_string()
        }
        Command::Stats => render::render_stats(&session.stats()),
        Command::Selection => render::render_selection(session),
        Command::Check => check_report(session),
        Command::History => {
            if session.receipts().is_empty() {
                "No bookings yet".to_string()
            } else {
                session
                    .receipts()
                    .iter()
                    .map(render::render_receipt)
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
        Command::Export => match serde_json::to_string_pretty(&session.snapshot()) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize session snapshot: {:?}", e);
                "Export failed".to_string()
            }
        },
        Command::Help => HELP.to_string(),
        Command::Quit => String::new(),
    }
}

fn check_report(session: &SeatingSession) -> String {
    if session.selection().is_empty() {
        return "Nothing selected".to_string();
    }
    let mut lines = vec![match session.check_selection() {
        Ok(()) => "Selection is one adjacent group".to_string(),
        Err(issue) => format!("Selection problem: {}", issue),
    }];
    let layout = session.grid().layout();
    for (row, col) in session.selection_gaps() {
        lines.push(format!(
            "Booking would leave {} as a single free seat",
            layout.seat_label(row, col)
        ));
    }
    lines.join("\n")
}
