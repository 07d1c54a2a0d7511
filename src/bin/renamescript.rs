//! Renamescript CLI - check scripts and preview renames
//!
//! Requests are read as JSON in the shape of `renamescript::RenameRequest`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use renamescript::{RenameRequest, Renamer, RenamerConfig, Script};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "renamescript")]
#[command(about = "Evaluate rename scripts against file metadata", long_about = None)]
struct Cli {
    /// Renamer configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a script and report syntax errors
    Check {
        /// Script file
        script: PathBuf,
    },

    /// Evaluate a script against a request
    Rename {
        /// Script file
        script: PathBuf,

        /// Request file (JSON)
        request: PathBuf,

        /// Script kind (default: the configured interpreter id)
        #[arg(long)]
        kind: Option<String>,

        /// Only compute the filename
        #[arg(long)]
        filename_only: bool,
    },

    /// Write the default configuration to a file
    InitConfig {
        /// Output path
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => RenamerConfig::load(path)?,
        None => RenamerConfig::default(),
    };

    match cli.command {
        Commands::Check { script } => {
            let text = read_text(&script)?;
            let renamer = Renamer::new(config);
            match renamer.check(&text) {
                Ok(tree) => println!("ok: {} statement(s)", tree.statements.len()),
                Err(err) => anyhow::bail!("{}: {}", script.display(), err),
            }
        }

        Commands::Rename {
            script,
            request,
            kind,
            filename_only,
        } => {
            let text = read_text(&script)?;
            let data = fs::read(&request)
                .with_context(|| format!("Failed to read request: {:?}", request))?;
            let request: RenameRequest =
                serde_json::from_slice(&data).context("Failed to deserialize request")?;

            let renamer = Renamer::new(config);
            let script = Script {
                kind: kind.unwrap_or_else(|| renamer.config().interpreter_id.clone()),
                text,
            };

            if filename_only {
                match renamer.filename(&script, &request)? {
                    Some(name) => println!("{}", name),
                    None => println!("(skipped)"),
                }
                return Ok(());
            }

            match renamer.rename(&script, &request)? {
                Some(result) => {
                    println!("filename:    {}", result.filename);
                    println!(
                        "destination: {} ({})",
                        result.destination.name,
                        result.destination.location.display()
                    );
                    println!("subfolder:   {}", result.subfolder.display());
                    println!("path:        {}", result.full_path().display());
                }
                None => println!("(skipped)"),
            }
        }

        Commands::InitConfig { path } => {
            config.save(&path)?;
            println!("Wrote configuration to {:?}", path);
        }
    }

    Ok(())
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read script: {:?}", path))
}
