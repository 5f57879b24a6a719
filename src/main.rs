/*!
 * redwifi console
 *
 * Command line front end over the console session: one-shot commands for
 * scripting and an interactive console for an operator.
 */

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod app;
mod cli;
mod handlers;
mod messages;

use cli::{run_command, Cli, ReportedFailure};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    if let Err(e) = run_command(cli).await {
        // Failures already shown as notifications only set the exit code
        if e.downcast_ref::<ReportedFailure>().is_none() {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}
