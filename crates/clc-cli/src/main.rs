//! `clc` binary entrypoint.

use std::io::{self, IsTerminal};
use std::process::ExitCode;
use std::sync::Arc;

use clc_cli::commands::register_all;
use clc_cli::{App, CliError, Invocation, OutputFormat};
use clc_plug::{CancelScope, CommandRegistry, TerminalSpinner};
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let mut registry = CommandRegistry::new();
    if let Err(e) = register_all(&mut registry) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }
    let mut app = match App::new(registry) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if io::stderr().is_terminal() {
        app = app.with_status_display(Arc::new(TerminalSpinner::new()));
    }

    let invocation = match app.parse(std::env::args_os()) {
        Ok(invocation) => invocation,
        Err(CliError::Usage(e)) => {
            // Help and version requests land here too.
            let _ = e.print();
            return ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(2));
        }
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(invocation.globals.verbose);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(&app, &invocation)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose && std::env::var_os(EnvFilter::DEFAULT_ENV).is_none() {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run(app: &App, invocation: &Invocation) -> Result<(), CliError> {
    let scope = CancelScope::new();
    let interrupt = scope.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("interrupt received");
            interrupt.cancel();
        }
    });

    let rows = app.execute(invocation, scope).await?;
    let format = OutputFormat::new(invocation.globals.format);
    let mut stdout = io::stdout().lock();
    format.write(&mut stdout, &rows)
}
