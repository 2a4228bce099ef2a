//! eshotel - hotel listing desk
//!
//! Merchants maintain hotel listings and submit them for review; admins
//! approve, reject and publish them. Everything runs against a local
//! SQLite database through a line-oriented console.

use std::io::{self, BufRead, Write};

use clap::Parser;
use eshotel_core::config::{self, AppConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod state;
mod viewmodel;

use viewmodel::Reply;

fn main() {
    let args = cli::Cli::parse();

    let config = args
        .config
        .clone()
        .map_or_else(config::default_config_path, Ok)
        .and_then(|path| AppConfig::load(&path));
    let log_filter = config
        .as_ref()
        .map(|c| c.log_filter.clone())
        .unwrap_or_else(|_| AppConfig::default().log_filter);

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_filter)))
        .init();

    tracing::info!("Starting eshotel");

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let mut app_state = match state::AppState::open(&config, args.data_dir.as_deref()) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run_console(&mut app_state) {
        tracing::error!("Console error: {}", e);
        std::process::exit(1);
    }
}

fn run_console<S: eshotel_core::SlotStore>(app_state: &mut state::AppState<S>) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    writeln!(stdout, "eshotel console. Type help for commands.")?;
    loop {
        write!(stdout, "eshotel> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match viewmodel::dispatch(app_state, &line) {
            Reply::Output(text) if text.is_empty() => {}
            Reply::Output(text) => writeln!(stdout, "{}", text)?,
            Reply::Quit => break,
        }
    }

    tracing::info!("Shutting down");
    Ok(())
}
