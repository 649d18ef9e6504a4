use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use levelwise::{execute, CliOptions, MiningError, MiningResult, Mode, Outcome};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn prompt_mode() -> MiningResult<Mode> {
    print!("Enter 1 for cleaning data or 2 for itemset mining: ");
    if let Err(e) = io::stdout().flush() {
        tracing::debug!(error = %e, "failed to flush prompt");
    }

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|_| MiningError::InvalidSelection { input: String::new() })?;
    line.parse()
}

fn run() -> MiningResult<()> {
    let options = CliOptions::parse(std::env::args().skip(1))?;
    let config = options.resolve()?;
    let mode = match options.mode.as_deref() {
        Some(raw) => raw.parse()?,
        None => prompt_mode()?,
    };

    match execute(&config, mode)? {
        Outcome::Cleaned => println!("Data cleaning complete"),
        Outcome::Mined { run, rows } => {
            if run.last_nonempty_k() == 0 {
                println!("No item meets minimum support {}", run.min_support());
                return Ok(());
            }
            println!("Last created table with records = L{}", run.last_nonempty_k());
            for row in &rows {
                println!("{row}");
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    init_logging();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "exiting");
            ExitCode::from(1)
        }
    }
}
