mod api;
mod app;
mod cli;
mod config;
mod domain;
mod history;
mod infrastructure;
mod render;
mod storage;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use clap::Parser;
use infrastructure::{directories, logging};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = cli::Cli::parse();
    let mut config = config::load_config()?;
    cli.apply_overrides(&mut config)?;

    let paths = directories::ensure_directories(&config.directories)?;
    logging::init_tracing(&config, &paths)?;

    let app = app::ClassifierApp::initialize(&config, &paths)?;
    cli::run(cli.command, &app).await
}
