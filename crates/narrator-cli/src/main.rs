//! CLI entry point.
//!
//! Wiring happens in `bootstrap`; this file only sets up logging, parses
//! arguments and dispatches to handlers.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use narrator_cli::handlers::narrate::NarrateArgs;
use narrator_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers};

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables before clap reads GEMINI_API_KEY
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            let code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

/// Log to stderr so the player's announcements on stdout stay clean.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command.as_ref() else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let ctx = bootstrap(CliConfig::from_cli(&cli)?);

    match command {
        Commands::Narrate {
            image,
            context,
            voice,
            speed,
            focus,
        } => {
            let args = NarrateArgs {
                image,
                context: context.as_deref(),
                voice: *voice,
                speed: *speed,
                focus_mode: *focus,
            };
            handlers::narrate::execute(&ctx, args).await?;
        }
        Commands::Resume { focus } => handlers::resume::execute(&ctx, *focus).await?,
        Commands::Voices => handlers::voices::execute()?,
        Commands::Session { command } => handlers::session::execute(&ctx, *command).await?,
    }
    Ok(())
}
