use std::{
    io::{self, Read},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::{
    app::ClassifierApp,
    config::AppConfig,
    domain::{Attachment, ClassificationRequest},
    render,
    storage::KeyValueStore,
};

/// Command-line client for the email classification service.
#[derive(Debug, Parser)]
#[command(name = "email-classifier", version)]
#[command(about = "Classify emails as productive or unproductive", long_about = None)]
pub struct Cli {
    /// Base URL of the classification service (overrides CLASSIFIER_API_URL).
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify an email given as text and/or a .txt/.pdf file.
    Classify(ClassifyArgs),
    /// Show recent classifications, newest first.
    History,
    /// Delete the stored classification history.
    ClearHistory,
    /// Show how many emails were processed and the average request time.
    Stats,
}

#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// Email body.
    #[arg(long, conflicts_with = "stdin")]
    pub text: Option<String>,

    /// Read the email body from standard input.
    #[arg(long)]
    pub stdin: bool,

    /// Email file (.txt or .pdf).
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Ask the service for a suggested reply.
    #[arg(long)]
    pub reply: bool,

    /// Ask the service for a detailed analysis.
    #[arg(long)]
    pub detailed: bool,
}

impl Cli {
    pub fn apply_overrides(&self, config: &mut AppConfig) -> Result<()> {
        if let Some(url) = &self.api_url {
            config.api.base_url = url.clone();
            config.api.endpoint()?;
        }
        Ok(())
    }
}

impl ClassifyArgs {
    async fn into_request(self) -> Result<ClassificationRequest> {
        let text = if self.stdin {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read email text from stdin")?;
            Some(buffer)
        } else {
            self.text
        };

        let file = match &self.file {
            Some(path) => Some(Attachment::read(path).await?),
            None => None,
        };

        Ok(ClassificationRequest {
            text,
            file,
            generate_reply: self.reply,
            detailed_analysis: self.detailed,
        })
    }
}

pub async fn run<S: KeyValueStore>(command: Command, app: &ClassifierApp<S>) -> Result<()> {
    match command {
        Command::Classify(args) => {
            let request = args.into_request().await?;
            let report = app.classify(request).await?;
            render::print_report(&report);
        }
        Command::History => render::print_history(&app.history_entries()),
        Command::ClearHistory => {
            app.clear_history();
            println!("History cleared.");
        }
        Command::Stats => render::print_stats(&app.stats()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_classify_flags() {
        let cli = Cli::try_parse_from([
            "email-classifier",
            "--api-url",
            "http://localhost:9000",
            "classify",
            "--text",
            "hello there, team",
            "--reply",
        ])
        .unwrap();

        assert_eq!(cli.api_url.as_deref(), Some("http://localhost:9000"));
        let Command::Classify(args) = cli.command else {
            panic!("expected classify");
        };
        assert_eq!(args.text.as_deref(), Some("hello there, team"));
        assert!(args.reply);
        assert!(!args.detailed);
        assert!(args.file.is_none());
    }

    #[test]
    fn text_and_stdin_conflict() {
        let parsed = Cli::try_parse_from([
            "email-classifier",
            "classify",
            "--text",
            "x",
            "--stdin",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn parses_history_commands() {
        let cli = Cli::try_parse_from(["email-classifier", "clear-history"]).unwrap();
        assert!(matches!(cli.command, Command::ClearHistory));
        let cli = Cli::try_parse_from(["email-classifier", "stats"]).unwrap();
        assert!(matches!(cli.command, Command::Stats));
    }
}
