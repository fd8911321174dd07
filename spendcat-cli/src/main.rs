use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use spendcat_cli::analyze::run_analysis;
use spendcat_cli::config::{self, Config};
use spendcat_cli::session::Session;
use spendcat_cli::{report, state};
use spendcat_core::{AppStatus, Breakdown};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("SPENDCAT_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(name = "spendcat", version = VERSION, about = "Categorize last month's spend from bank statements")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send statements and screenshots to the model and print the breakdown
    Analyze {
        /// Spreadsheets (.xlsx, .xls, .csv) and images (.png, .jpg, .webp, ...)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Also print every transaction
        #[arg(long)]
        details: bool,

        /// Write the categorized transactions to this JSON file
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Re-aggregate a transaction list saved with `analyze --save`
    Summarize {
        json: PathBuf,

        #[arg(long)]
        details: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Print the category labels offered to the model
    Categories,

    /// Manage ~/.spendcat/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spendcat=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Analyze { files, details, save } => {
            let cfg = config::load_config()?;
            analyze(&cfg, &files, details, save).await?;
        }

        Command::Summarize { json, details, format } => {
            let cfg = config::load_config()?;
            let txns = state::read_transactions(&json)?;
            let breakdown = Breakdown::from_transactions(&txns);
            match format {
                OutputFormat::Table => {
                    print!("{}", report::render(&breakdown, &txns, &cfg.report.currency_symbol, details));
                }
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&breakdown)?);
                }
            }
        }

        Command::Categories => {
            let cfg = config::load_config()?;
            for label in &cfg.categories.labels {
                println!("{label}");
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config()?,
        },
    }

    Ok(())
}

async fn analyze(cfg: &Config, files: &[PathBuf], details: bool, save: Option<PathBuf>) -> Result<()> {
    let today = cfg.report.today()?;

    let mut session = Session::new();
    session.add_files(files)?;
    if let Some(msg) = session.error_message() {
        bail!("{msg}");
    }
    if session.files().is_empty() {
        bail!("none of the given files are spreadsheets or images");
    }

    run_analysis(&mut session, cfg, today).await?;

    if session.status() == AppStatus::Error {
        bail!("{}", session.error_message().unwrap_or("analysis failed"));
    }
    let Some(breakdown) = session.breakdown() else {
        bail!("analysis did not complete");
    };

    if let Some(path) = save {
        state::write_transactions(&path, session.transactions())?;
        println!("Saved {} transactions to {}\n", session.transactions().len(), path.display());
    }

    print!(
        "{}",
        report::render(&breakdown, session.transactions(), &cfg.report.currency_symbol, details)
    );
    Ok(())
}
