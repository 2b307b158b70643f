//! Statecraft CLI Entry Point
//!
//! # Usage
//!
//! ```bash
//! # Check a board (exit 1 on errors)
//! statecraft validate board.yaml
//!
//! # Short text summary
//! statecraft summarize board.yaml
//!
//! # Live read-only view in the browser
//! statecraft render board.yaml --port 3000 --open
//!
//! # Board format reference
//! statecraft spec
//! ```

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;

use statecraft::commands::{self, CommandStatus};
use statecraft::config::{RenderOptions, DEFAULT_BOARD_PATH, DEFAULT_RENDER_PORT};
use statecraft::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "statecraft",
    version = VERSION,
    about = "Validate, summarize, and render Statecraft board files"
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a board file (exit 0 if valid, 1 on errors)
    Validate {
        /// Path to board file
        #[arg(default_value = DEFAULT_BOARD_PATH)]
        path: PathBuf,
        #[arg(hide = true)]
        extra: Vec<String>,
    },
    /// Print a short text summary of the board
    Summarize {
        /// Path to board file
        #[arg(default_value = DEFAULT_BOARD_PATH)]
        path: PathBuf,
        #[arg(hide = true)]
        extra: Vec<String>,
    },
    /// Serve the board in the browser (read-only UI)
    Render {
        /// Path to board file
        #[arg(default_value = DEFAULT_BOARD_PATH)]
        path: PathBuf,
        /// Port for the server
        #[arg(short, long, default_value_t = DEFAULT_RENDER_PORT)]
        port: u16,
        /// Open browser after starting server
        #[arg(long)]
        open: bool,
        /// Serve a prebuilt UI from this directory instead of the built-in page
        #[arg(long, value_name = "DIR")]
        static_dir: Option<PathBuf>,
    },
    /// Print the board format reference
    Spec,
}

/// Configures the logging system with appropriate formatting.
fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            use std::io::Write;

            match record.level() {
                log::Level::Warn | log::Level::Error => {
                    writeln!(buf, "[{}] {}", record.level(), record.args())
                }
                _ => writeln!(buf, "{}", record.args()),
            }
        })
        .init();
}

fn run(cli: Cli) -> Result<CommandStatus, Box<dyn std::error::Error>> {
    let mut out = io::stdout().lock();
    let mut err = io::stderr().lock();

    let status = match cli.command {
        Command::Validate { path, extra } => {
            if commands::reject_extra_paths(&extra, &mut err)? == CommandStatus::Failure {
                return Ok(CommandStatus::Failure);
            }
            commands::validate(&path, &mut err)?
        }
        Command::Summarize { path, extra } => {
            if commands::reject_extra_paths(&extra, &mut err)? == CommandStatus::Failure {
                return Ok(CommandStatus::Failure);
            }
            commands::summarize(&path, &mut out, &mut err)?
        }
        Command::Render {
            path,
            port,
            open,
            static_dir,
        } => {
            drop(err);
            let options = RenderOptions {
                port,
                open_browser: open,
                static_dir,
                ..RenderOptions::new(path)
            };
            commands::render(options, &mut out)?
        }
        Command::Spec => commands::spec(&mut out)?,
    };

    Ok(status)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match run(cli) {
        Ok(status) => status.into(),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
