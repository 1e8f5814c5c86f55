use aspect_cli::cli::{Cli, Commands};
use aspect_cli::commands;
use aspect_cli::error::{exit_with_error, CliResult};
use aspect_versioning::DiffMode;
use clap::Parser;

fn init_tracing(cli: &Cli) {
    //   --quiet   → "off"
    //   --verbose → RUST_LOG if set, otherwise "info"
    //   default   → "warn"
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    } else {
        tracing_subscriber::EnvFilter::new("warn")
    };

    let ansi = !(cli.no_color || std::env::var_os("NO_COLOR").is_some());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(ansi)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();

    // Errors go to stderr, so piping stdout keeps them colored
    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    init_tracing(&cli);

    match run(cli) {
        Ok(payload) => println!("{payload}"),
        Err(e) => exit_with_error(e),
    }
}

fn run(cli: Cli) -> CliResult<String> {
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Complete { io } => commands::run_diff(&io, DiffMode::CompleteUpdate, config),
        Commands::Entries { io } => commands::run_diff(&io, DiffMode::Entries, config),
    }
}
