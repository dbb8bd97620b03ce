use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use ptimer::OutputFormat;
use ptimer::commands;
use ptimer::config;
use ptimer::edit::TimeFields;
use ptimer::platform;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ptimer")]
#[command(about = "A small persistent stopwatch for the terminal")]
#[command(version)]
struct Cli {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive stopwatch (default)
    Run,
    /// Print the saved time
    Show,
    /// Overwrite the saved time
    Set(SetArgs),
    /// Reset the saved time to zero
    Reset,
    /// View or change display options
    Options {
        #[arg(long, action = ArgAction::Set, help = "Show milliseconds (true/false)")]
        show_ms: Option<bool>,
        #[arg(long, action = ArgAction::Set, help = "Always show HH:MM:SS (true/false)")]
        full_format: Option<bool>,
    },
    /// Inspect configuration
    Config(ConfigArgs),
}

#[derive(Args)]
struct SetArgs {
    #[arg(
        help = "Time as S, M:SS or H:MM:SS with optional .mmm",
        conflicts_with_all = ["hours", "minutes", "seconds", "millis"]
    )]
    time: Option<TimeFields>,
    #[arg(long, default_value_t = 0)]
    hours: u64,
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u64).range(0..=59))]
    minutes: u64,
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u64).range(0..=59))]
    seconds: u64,
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u64).range(0..=999))]
    millis: u64,
}

impl SetArgs {
    fn fields(&self) -> Result<TimeFields> {
        match self.time {
            Some(fields) => Ok(fields),
            None => Ok(TimeFields::new(
                self.hours,
                self.minutes,
                self.seconds,
                self.millis,
            )?),
        }
    }
}

#[derive(Args)]
struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Subcommand)]
enum ConfigAction {
    List,
    Get { key: String },
    /// Write a default config.toml
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries the timer display, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ptimer=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let override_dir = platform::env_override();
    let state_dir = platform::get_state_dir(override_dir.as_deref())?;

    let config = config::load_from_dir(&state_dir)?;

    let paths = match &config.state.state_dir_override {
        Some(dir) if override_dir.is_none() => platform::state_paths(Some(dir.as_path()))?,
        _ => platform::StatePaths::in_dir(state_dir.clone()),
    };
    tracing::debug!(session = %paths.session.display(), "Resolved state paths");

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => commands::timer::run(&paths, &config)?,
        Commands::Show => commands::timer::show(&paths, cli.output)?,
        Commands::Set(args) => commands::timer::set(&paths, args.fields()?)?,
        Commands::Reset => commands::timer::reset(&paths)?,
        Commands::Options {
            show_ms,
            full_format,
        } => commands::timer::options(&paths, show_ms, full_format, cli.output)?,
        Commands::Config(args) => match args.action {
            ConfigAction::List => commands::config::list(&config)?,
            ConfigAction::Get { key } => commands::config::get(&key, &config)?,
            ConfigAction::Init => commands::config::init(&state_dir)?,
        },
    }

    Ok(())
}
