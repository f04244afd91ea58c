//! Command line client for the signed trivia question service.
//!
//! Commands:
//! - `fetch` signs a request with a local EC key and prints the question
//! - `config validate` and `config show` inspect the effective settings

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod error;
mod fetch;
mod logging;

use error::CliError;
use fetch::{FetchArgs, OutputFormat};

#[derive(Parser)]
#[command(name = "quizcall")]
#[command(about = "Fetch signed trivia questions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one question
    Fetch {
        /// Question category
        #[arg(long, short = 't', allow_negative_numbers = true)]
        question_type: i64,

        /// Firm identifier registered with the service
        #[arg(long, short, env = "QUIZCALL_FIRM_ID")]
        firm_id: String,

        /// Path to the PEM encoded EC private key
        #[arg(long, short, env = "QUIZCALL_KEY_FILE")]
        key_file: PathBuf,

        /// Path to a TOML configuration file (default: embedded settings)
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Print the signed URL without sending the request
        #[arg(long)]
        dry_run: bool,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate settings after environment overrides
    Validate {
        /// Path to the TOML configuration file
        #[arg(long, short)]
        config: Option<PathBuf>,
    },

    /// Print the effective settings as TOML
    Show {
        /// Path to the TOML configuration file
        #[arg(long, short)]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Fetch {
            question_type,
            firm_id,
            key_file,
            config,
            dry_run,
            format,
        } => {
            let settings = config::load_settings(config.as_deref())?;
            let args = FetchArgs {
                question_type,
                firm_id: &firm_id,
                key_file: &key_file,
                dry_run,
                format,
            };
            fetch::run(settings, &args)
        }
        Commands::Config { action } => match action {
            ConfigAction::Validate { config } => config::validate(config.as_deref()),
            ConfigAction::Show { config } => config::show(config.as_deref()),
        },
    }
}
