mod actions;
mod api;
mod auth;
mod certificate;
mod cli;
mod config;
mod export;
mod prompt;
mod sheet;
mod storage;

use clap::Parser;
use colored::*;

use cli::Cli;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli::log_level(args.verbose, args.quiet))
        .parse_default_env()
        .format_timestamp(None)
        .init();

    if let Err(err) = cli::run(args).await {
        eprintln!("{} {:#}", "error:".red().bold(), err);
        std::process::exit(1);
    }
}
