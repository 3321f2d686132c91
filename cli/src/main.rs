// Orangutan CLI - entry point

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

mod repl;

/// Orangutan Code - AI-powered coding assistant using local LLMs
#[derive(Parser, Debug)]
#[command(name = "orangutan")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Project directory to work in
    #[arg(short = 'p', long = "path", default_value = ".")]
    path: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "warn".to_string())
                .as_str(),
        )
        .init();

    let cli = Cli::parse();
    let cwd = cli
        .path
        .canonicalize()
        .with_context(|| format!("project directory not found: {}", cli.path.display()))?;
    if !cwd.is_dir() {
        anyhow::bail!("not a directory: {}", cwd.display());
    }

    info!("starting in {}", cwd.display());

    let config = orangutan_config::Config::default();
    repl::run(cwd, config).await
}
