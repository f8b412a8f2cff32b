//! n8nctl CLI entry point.

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;
use n8nctl::cli::{Cli, CommandDispatcher};
use n8nctl::ui::{create_ui, disable_colors, OutputMode};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN
///
/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("n8nctl=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("n8nctl=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    // Args are not logged whole: `config init --api-key` would end up in the log.
    tracing::debug!(instance = ?cli.instance, json = cli.json, "n8nctl starting");

    if cli.no_color {
        disable_colors();
    }

    let output_mode = OutputMode::from_flags(cli.verbose, cli.quiet);
    let mut ui = create_ui(std::io::stdin().is_terminal(), output_mode);

    let result = CommandDispatcher::from_cli(&cli)
        .and_then(|dispatcher| dispatcher.dispatch(&cli.command, ui.as_mut()));

    match result {
        Ok(result) => ExitCode::from(u8::try_from(result.exit_code).unwrap_or(1)),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
