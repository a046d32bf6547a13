//! happy CLI - register orphanages from the terminal
//!
//! - `create`: interactive form page with map widget (ratatui)
//! - `submit`: non-interactive submission for scripts
//! - `config`: manage ~/.happy/config.toml
//! - `completions`: shell completion scripts

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use happy_core::config::load_dotenv;

mod commands;
mod config;
mod host;
mod tracing_setup;
mod tui;

#[derive(Parser, Debug)]
#[command(
    name = "happy",
    author,
    version,
    about = "Register orphanages: form, map position and photos, posted to the Happy API",
    long_about = "Fill in the orphanage form in an interactive terminal page (or from flags), \
                  pick its location on the map, attach photos and submit it to the API."
)]
struct Cli {
    /// Enable debug logging (to stderr)
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces to an OTLP endpoint (requires the telemetry feature)
    #[arg(long, global = true)]
    otel: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the interactive "create orphanage" page
    Create(commands::create::CreateArgs),
    /// Submit an orphanage without the interactive page
    Submit(commands::submit::SubmitArgs),
    /// Manage happy configuration (init, show, path)
    Config(config::ConfigArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let tracing_config = tracing_setup::TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
        interactive: matches!(cli.command, Commands::Create(_)),
    };
    tracing_setup::init(&tracing_config).ok();

    #[cfg(not(feature = "telemetry"))]
    if cli.otel {
        tracing::warn!("--otel ignored: happy was built without the telemetry feature");
    }

    load_dotenv();

    let result = match cli.command {
        Commands::Create(args) => commands::run_create(args).await,
        Commands::Submit(args) => commands::run_submit(args).await,
        Commands::Config(args) => config::run_config(args),
        Commands::Completions(args) => run_completions(args),
    };

    tracing_setup::shutdown_otel();
    result
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
