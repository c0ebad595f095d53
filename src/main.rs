use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use ragchat::{BackendKind, Commands, Container, ContainerConfig, Router};

#[derive(Parser)]
#[command(name = "ragchat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Model backend: anthropic, openai, or echo
    #[arg(short, long, global = true, default_value = "anthropic")]
    backend: String,

    /// Model id (defaults to ANTHROPIC_MODEL / OPENAI_MODEL)
    #[arg(short, long, global = true)]
    model: Option<String>,

    #[arg(long, global = true, default_value = "1024")]
    max_tokens: u32,

    #[arg(long, global = true)]
    chroma_url: Option<String>,

    /// ChromaDB collection for conversation history
    #[arg(long, global = true, default_value = "chat_history")]
    namespace: String,

    /// Prior turns retrieved as context for each message
    #[arg(long, global = true, default_value = "5")]
    context_k: usize,

    /// Seconds to wait for one turn before giving up
    #[arg(long, global = true, default_value = "60")]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let container = Container::new(ContainerConfig {
        backend: BackendKind::parse(&cli.backend)?,
        model: cli.model,
        max_tokens: cli.max_tokens,
        chroma_url: cli.chroma_url,
        namespace: cli.namespace,
        context_k: cli.context_k,
        timeout: Duration::from_secs(cli.timeout_secs),
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
    fn defaults_match_documented_values() {
        let cli = Cli::try_parse_from(["ragchat", "status"]).unwrap();
        assert_eq!(cli.backend, "anthropic");
        assert_eq!(cli.max_tokens, 1024);
        assert_eq!(cli.context_k, 5);
        assert_eq!(cli.namespace, "chat_history");
    }

    #[test]
    fn ask_requires_prompt() {
        assert!(Cli::try_parse_from(["ragchat", "ask"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["ragchat", "chat", "--backend", "echo", "-e", "out.txt"])
            .unwrap();
        assert_eq!(cli.backend, "echo");
        assert!(matches!(cli.command, Commands::Chat { export: Some(_) }));
    }
}
