use crate::models::config::LogFormat;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "image-ocr",
    version,
    about = "Extract text from an image with Tesseract",
    subcommand_negates_reqs = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub recognize: RecognizeArgs,

    /// Override the configuration file path
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Log format on stderr
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormatArg>,

    /// More log output (repeatable)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Less log output (repeatable)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,
}

#[derive(Debug, Args)]
pub struct RecognizeArgs {
    /// Path to the image or PDF file; put `--` before a path named like a
    /// subcommand (`image-ocr -- serve`)
    #[arg(value_name = "IMAGE_PATH", required = true)]
    pub image: Option<PathBuf>,

    /// Tesseract language code [default: from config, "eng"]
    #[arg(value_name = "LANGUAGE_CODE")]
    pub language: Option<String>,

    /// Print a tagged JSON report instead of plain text
    #[arg(long)]
    pub json: bool,

    /// Exit with status 1 when recognition fails
    #[arg(long)]
    pub strict: bool,

    /// Resize the image to this width before recognition
    #[arg(long, value_name = "PIXELS")]
    pub resize_width: Option<u32>,

    /// Convert to grayscale before recognition
    #[arg(long)]
    pub grayscale: bool,

    /// Apply an Otsu binary threshold before recognition
    #[arg(long)]
    pub threshold: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List languages the installed engine supports
    Langs,

    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Run the HTTP upload server
    Serve {
        /// Address to bind [default: from config]
        #[arg(long)]
        host: Option<String>,

        /// Port to bind [default: from config]
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as JSON
    Show,
    /// Print the configuration file location
    Path,
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum LogFormatArg {
    Text,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
