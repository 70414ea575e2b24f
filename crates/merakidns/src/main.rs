mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, ColorMode, Command};
use crate::config::Context;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);
    let status = output::Status {
        color: output::should_color(cli.global.color.unwrap_or(ColorMode::Auto)),
        quiet: cli.global.quiet,
    };

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        status.failure(&format!("failed during {}", err.stage()));
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands work on the file, not on a profile context
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "merakidns", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let ctx = Context::load(&cli.global)?;
            tracing::debug!(command = ?cmd, profile = %ctx.profile_name, "dispatching command");
            commands::dispatch(cmd, &ctx).await
        }
    }
}
