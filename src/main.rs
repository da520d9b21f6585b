use std::io::{self, BufRead, Write};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use seating_system::{
    config::Config,
    controllers::{self, render, Command},
};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    // stdout carries the hall drawing, logs go to stderr
    let json_logs = config.app.environment == "production";
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log))
        .with(json_logs.then(|| fmt::layer().json().with_writer(io::stderr)))
        .with((!json_logs).then(|| fmt::layer().with_writer(io::stderr)))
        .init();

    info!("Starting seat booking console ({})", config.app.environment);

    let mut session = seating_system::session_from_config(&config)?;

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", render::render_grid(session.grid()))?;
    writeln!(stdout, "Type `help` for commands.")?;

    // --- Command loop ---
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(command) => {
                let output = controllers::execute(&mut session, command);
                writeln!(stdout, "{}", output)?;
            }
            Err(e) => {
                warn!("Rejected command {:?}: {}", line.trim(), e);
                writeln!(stdout, "{}", e)?;
            }
        }
    }

    info!("Session closed: {}", session.stats());
    Ok(())
}
