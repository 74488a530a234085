//! Command-line surface

pub mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};

use crate::config::{Config, StorageTarget};

#[derive(Parser, Debug)]
#[command(
    name = "certqr",
    version,
    about = "Generate certificate-verification QR codes in a student spreadsheet and export them to PDF"
)]
pub struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Less log output
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a verification QR code next to every student row
    Generate(GenerateArgs),
    /// Remove every QR code from the sheet
    Clear(ClearArgs),
    /// Export columns A to I as a PDF and store it
    Export(ExportArgs),
    /// Inspect or create the config file
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Which sheet to work on
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Local .xlsx workbook instead of a Google spreadsheet
    #[arg(long, value_name = "PATH", conflicts_with = "spreadsheet")]
    pub xlsx: Option<PathBuf>,

    /// Google spreadsheet ID or URL (defaults to google.spreadsheet_id)
    #[arg(long, value_name = "ID")]
    pub spreadsheet: Option<String>,

    /// Sheet name (defaults to the first sheet)
    #[arg(long, value_name = "NAME")]
    pub sheet: Option<String>,

    /// Where to save the updated workbook (defaults to <name>_qr.xlsx)
    #[arg(long, value_name = "PATH", requires = "xlsx", conflicts_with = "in_place")]
    pub output: Option<PathBuf>,

    /// Overwrite the input workbook
    #[arg(long, requires = "xlsx")]
    pub in_place: bool,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Print the QR URLs without touching the sheet
    #[arg(long)]
    pub dry_run: bool,

    /// Also write a CSV listing every generated QR code
    #[arg(long, value_name = "CSV")]
    pub report: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ClearArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Do not ask for confirmation
    #[arg(short = 'y', long)]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Google spreadsheet ID or URL (defaults to google.spreadsheet_id)
    #[arg(long, value_name = "ID")]
    pub spreadsheet: Option<String>,

    /// Sheet name (defaults to the first sheet)
    #[arg(long, value_name = "NAME")]
    pub sheet: Option<String>,

    /// Where to store the PDF (defaults to storage.target)
    #[arg(long, value_enum)]
    pub store: Option<StorageTarget>,

    /// Folder for --store local (defaults to storage.folder)
    #[arg(long, value_name = "PATH")]
    pub folder: Option<PathBuf>,

    /// Do not ask for confirmation
    #[arg(short = 'y', long)]
    pub yes: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the config file location
    Path,
    /// Print the effective configuration
    Show,
    /// Write a config file with default values
    Init,
}

/// Log level from the -v/-q counts; warn by default
pub fn log_level(verbose: u8, quiet: u8) -> log::LevelFilter {
    match 2 + verbose as i16 - quiet as i16 {
        i16::MIN..=0 => log::LevelFilter::Off,
        1 => log::LevelFilter::Error,
        2 => log::LevelFilter::Warn,
        3 => log::LevelFilter::Info,
        4 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let (config, config_path) = Config::load(cli.config.as_deref())?;
    log::debug!("Config: {}", config_path.display());

    match cli.command {
        Commands::Generate(args) => commands::generate::handle_generate(args, &config).await,
        Commands::Clear(args) => commands::clear::handle_clear(args, &config).await,
        Commands::Export(args) => commands::export::handle_export(args, &config).await,
        Commands::Config(cmd) => commands::config::handle_config(cmd, &config, &config_path),
    }
}
