//! CLI application for Brazilian utility bill OCR processing.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, parse, process, reminders};

/// Brazilian bill OCR - Extract amount, due date and payment codes from utility bills
#[derive(Parser)]
#[command(name = "contas")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a single bill image
    Process(process::ProcessArgs),

    /// Process multiple bill images
    Batch(batch::BatchArgs),

    /// Extract bill fields from already recognized text
    Parse(parse::ParseArgs),

    /// Show the reminder schedule for a due date
    Reminders(reminders::RemindersArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Process(args) => process::run(args, cli.config.as_deref()).await,
        Commands::Batch(args) => batch::run(args, cli.config.as_deref()).await,
        Commands::Parse(args) => parse::run(args, cli.config.as_deref()),
        Commands::Reminders(args) => reminders::run(args),
        Commands::Config(args) => config::run(args, cli.config.as_deref()),
    }
}
