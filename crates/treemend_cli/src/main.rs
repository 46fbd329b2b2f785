//! treemend CLI
//!
//! Canonical lossless syntax-tree repair for untrusted parser output.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use treemend_core::{canonicalize, verify};
use treemend_raw::RawNode;

/// treemend - repair untrusted parser spans into a lossless canonical tree
#[derive(Parser)]
#[command(name = "tmend")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Canonicalize a raw tree against its source document
    Convert {
        /// Source document path
        source: PathBuf,

        /// Raw tree JSON path (stdin if omitted)
        #[arg(short, long)]
        raw: Option<PathBuf>,

        /// Pretty-print the output JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Canonicalize, then re-check every invariant and the round trip
    Verify {
        /// Source document path
        source: PathBuf,

        /// Raw tree JSON path (stdin if omitted)
        #[arg(short, long)]
        raw: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Convert {
            source,
            raw,
            pretty,
        } => convert_command(&source, raw.as_deref(), pretty),
        Commands::Verify { source, raw } => verify_command(&source, raw.as_deref()),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_inputs(source: &Path, raw: Option<&Path>) -> Result<(String, RawNode)> {
    let document = fs::read_to_string(source).into_diagnostic()?;
    let raw_json = match raw {
        Some(path) => fs::read_to_string(path).into_diagnostic()?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .into_diagnostic()?;
            buffer
        }
    };
    let raw = RawNode::from_json_str(&raw_json).into_diagnostic()?;
    debug!("loaded {} bytes of source from {}", document.len(), source.display());
    Ok((document, raw))
}

fn convert_command(source: &Path, raw: Option<&Path>, pretty: bool) -> Result<()> {
    let (document, raw) = load_inputs(source, raw)?;
    let tree = canonicalize(&document, &raw).into_diagnostic()?;

    let output = if pretty {
        serde_json::to_string_pretty(&tree).into_diagnostic()?
    } else {
        serde_json::to_string(&tree).into_diagnostic()?
    };
    println!("{output}");
    Ok(())
}

fn verify_command(source: &Path, raw: Option<&Path>) -> Result<()> {
    let (document, raw) = load_inputs(source, raw)?;
    let tree = canonicalize(&document, &raw).into_diagnostic()?;
    verify(&tree, &document).into_diagnostic()?;

    println!(
        "ok: {} nodes, {} bytes round-trip losslessly",
        tree.len(),
        document.len()
    );
    Ok(())
}
