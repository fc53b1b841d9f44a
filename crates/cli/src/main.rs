mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mindflow", version)]
#[command(about = "Crisis screening, mood insights and supportive chat", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Screen text for crisis language
    Classify { text: String },
    /// Score the crisis self-assessment
    SelfCheck {
        #[arg(long)]
        hopeless: bool,
        #[arg(long)]
        self_harm: bool,
        #[arg(long)]
        suicide: bool,
        #[arg(long)]
        trapped: bool,
        #[arg(long)]
        substance_use: bool,
    },
    /// Derive insights and statistics from a JSON array of mood samples
    Analyze {
        file: PathBuf,
        /// Statistics window in days
        #[arg(short, long, default_value = "30")]
        period: u32,
    },
    /// Run each message as one turn of a fresh conversation
    Chat {
        #[arg(required = true)]
        messages: Vec<String>,
    },
    /// List crisis resources for a locale
    Resources {
        #[arg(short, long)]
        country: Option<String>,
        #[arg(short, long)]
        language: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Classify { text } => commands::classify::run(&text)?,
        Commands::SelfCheck { hopeless, self_harm, suicide, trapped, substance_use } => {
            let check = mindflow_core::SelfCheck {
                feeling_hopeless: hopeless,
                thoughts_of_self_harm: self_harm,
                thoughts_of_suicide: suicide,
                feeling_trapped: trapped,
                increased_substance_use: substance_use,
            };
            commands::crisis::run_self_check(&check).await?;
        },
        Commands::Analyze { file, period } => commands::analyze::run(&file, period).await?,
        Commands::Chat { messages } => commands::chat::run(&messages).await?,
        Commands::Resources { country, language } => {
            commands::crisis::run_resources(country, language).await?;
        },
    }

    Ok(())
}
