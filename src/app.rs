//! Application orchestration and command routing.
//!
//! Handles command-line argument parsing and delegates to appropriate command handlers.

use crate::commands::{self, TranscribeOptions};
use crate::config::{self, ImgscribeConfig};
use crate::logging;
use crate::transcription::TranscriptionProvider;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

/// Transcribe images to text with hosted vision models
#[derive(Parser)]
#[command(name = "imgscribe")]
#[command(version)]
#[command(about = "Transcribe images to text with hosted vision models")]
#[command(long_about = "Transcribe images to text with hosted vision models.\n\nThe image is sent inline to a Groq or OpenAI chat-completion endpoint together\nwith a JSON schema, and the structured transcript is printed.\n\nEXAMPLES:\n    # Transcribe with the default provider (Groq)\n    $ imgscribe scan.jpg\n    \n    # Use OpenAI and write the transcript to a file\n    $ imgscribe -p openai scan.jpg -o scan.txt\n    \n    # Print the transcript as JSON\n    $ imgscribe --json scan.jpg\n    \n    # Reset outputs/mydoc_data without transcribing\n    $ imgscribe -n mydoc")]
#[command(
    after_help = "ENVIRONMENT:\n    GROQ_API_KEY        Groq credential\n    OPENAI_API_KEY      OpenAI credential\n    RUST_LOG            Log filter (default: info)\n\nCONFIGURATION:\n    Config file:        ~/.config/imgscribe/imgscribe.toml\n    Logs:               ~/.local/state/imgscribe/imgscribe.log.*"
)]
struct Cli {
    /// Only reset outputs/<NAME>_data for the given document and exit
    #[arg(short = 'n', long = "new")]
    new_version: bool,

    /// Image to transcribe (document name with -n)
    #[arg(value_name = "IMAGE")]
    image: Option<PathBuf>,

    /// Provider to use: groq or openai
    #[arg(short, long, value_name = "PROVIDER")]
    provider: Option<TranscriptionProvider>,

    /// Model id to send instead of the provider default
    #[arg(short, long, value_name = "MODEL")]
    model: Option<String>,

    /// Write transcript to file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the transcript as JSON
    #[arg(long)]
    json: bool,

    /// Read configuration from this file
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the JSON schema sent as the structured output format
    Schema,

    /// Show the config file location and effective settings
    Config,

    /// Show recent log entries from the application
    ///
    /// Display the last 50 lines of the most recent log file.
    Logs,

    /// Generate shell completion script
    ///
    /// Examples:
    ///   imgscribe completions bash > imgscribe.bash
    ///   imgscribe completions zsh > _imgscribe
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Runs the main application based on command-line arguments.
///
/// # Exit Codes
/// - 0: Success
/// - 1: Any error returned from here (missing API key, unreadable image, API failure)
/// - 2: Usage error (invalid arguments)
///
/// # Errors
/// - If the configuration file is invalid
/// - If the provider's API key is missing
/// - If command execution fails
pub async fn run() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Commands that don't need logging or config
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            generate(*shell, &mut Cli::command(), "imgscribe", &mut io::stdout());
            return Ok(());
        }
        Some(Commands::Logs) => return commands::handle_logs(),
        _ => {}
    }

    // A missing or read-only state directory must not block a one-shot run
    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Logging disabled: {e}");
    }
    config::load_dotenv();

    let config_data = ImgscribeConfig::load(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Schema) => commands::handle_schema()?,
        Some(Commands::Config) => commands::handle_config(cli.config.as_deref(), &config_data)?,
        None => {
            let Some(image) = cli.image else {
                let what = if cli.new_version { "a document name" } else { "an image path" };
                Cli::command()
                    .error(
                        ErrorKind::MissingRequiredArgument,
                        format!("expected {what} (see --help)"),
                    )
                    .exit();
            };

            // Every mode needs the provider credential, including -n
            let provider = cli.provider.unwrap_or(config_data.provider);
            config::get_api_key(provider)?;

            if cli.new_version {
                commands::handle_prepare(&image, &config_data.output_dir)?;
            } else {
                let options = TranscribeOptions {
                    provider: cli.provider,
                    model: cli.model,
                    output: cli.output,
                    json: cli.json,
                };
                commands::handle_transcribe(&image, options, &config_data).await?;
            }
        }
        Some(Commands::Completions { .. }) | Some(Commands::Logs) => {
            unreachable!("These commands are handled earlier")
        }
    }

    Ok(())
}
