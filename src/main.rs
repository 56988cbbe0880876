use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use bookchat::connector::api::{Container, ContainerConfig, Router, DEFAULT_BOOK_PATH};
use bookchat::{Commands, GenerationSettings};

#[derive(Parser)]
#[command(name = "bookchat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Plain-text book embedded in the system prompt
    #[arg(short, long, global = true, default_value = DEFAULT_BOOK_PATH)]
    book: PathBuf,

    /// Model id (defaults to $ANTHROPIC_MODEL, then the built-in model)
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Maximum reply length in tokens
    #[arg(
        long,
        global = true,
        default_value_t = GenerationSettings::default().max_tokens(),
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    max_tokens: u32,

    /// Answer with an offline echo model instead of the Anthropic API
    #[arg(long, global = true)]
    mock_provider: bool,

    /// Keep the greeting exchange in the conversation history
    #[arg(long, global = true)]
    persist_greeting: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    // Logs go to stderr; stdout carries the streamed replies.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let container = Container::new(ContainerConfig {
        book_path: cli.book,
        model: cli.model,
        max_tokens: cli.max_tokens,
        mock_provider: cli.mock_provider,
        persist_greeting: cli.persist_greeting,
    })
    .await?;

    let router = Router::new(&container);
    let output = router.route(cli.command).await?;
    if !output.is_empty() {
        println!("{}", output);
    }

    Ok(())
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn chat_is_the_interactive_command() {
        let cli = Cli::try_parse_from(["bookchat", "chat", "--no-greeting"]).unwrap();
        assert!(matches!(cli.command, Commands::Chat { no_greeting: true }));
        assert_eq!(cli.book, PathBuf::from(DEFAULT_BOOK_PATH));
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from([
            "bookchat",
            "ask",
            "What is the book about?",
            "--mock-provider",
            "--max-tokens",
            "64",
        ])
        .unwrap();
        assert!(cli.mock_provider);
        assert_eq!(cli.max_tokens, 64);
        assert!(matches!(cli.command, Commands::Ask { ref question, greet: false } if question == "What is the book about?"));
    }

    #[test]
    fn zero_max_tokens_is_rejected() {
        let result = Cli::try_parse_from(["bookchat", "prompt", "--max-tokens", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn ask_requires_a_question() {
        assert!(Cli::try_parse_from(["bookchat", "ask"]).is_err());
    }
}
