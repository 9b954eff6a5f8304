mod config;
mod server;

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rmcp::service::ServerInitializeError;
use rmcp::{ServiceExt, transport::stdio};
use seq_core::{Catalog, MIN_QUERY_TERMS, Prediction, Predictor, Sequence, export_json};

use crate::config::CliConfig;

const NO_ANSWER: &str = ":(";
const STYLE_HINT: &str = "!! Please follow the style 1, 2, 3, 4";

#[derive(Parser)]
#[command(name = "seqnext", about = "Next-term prediction for integer sequences")]
struct Cli {
    /// TOML config file (defaults to $SEQNEXT_CONFIG when set)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict the next term of a comma-separated sequence
    Predict {
        /// Terms, e.g. `1, 4, 9, 16` or `1 4 9 16`
        #[arg(required = true, allow_hyphen_values = true)]
        terms: Vec<String>,

        /// Print the full prediction as JSON
        #[arg(long)]
        json: bool,

        /// Override the configured recursion budget
        #[arg(long)]
        depth: Option<u32>,
    },

    /// Read sequences from stdin, one per line, until EOF
    Interactive,

    /// List the known sequences used for lookups
    Catalog,

    /// Start MCP server on stdio transport
    Serve,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = CliConfig::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Predict { terms, json, depth } => cmd_predict(config, terms, *json, *depth),
        Commands::Interactive => cmd_interactive(config),
        Commands::Catalog => cmd_catalog(),
        Commands::Serve => cmd_serve(config).await,
    }
}

/// Arguments are joined with commas, so `1 2 3`, `1, 2, 3` and `"1, 2, 3"`
/// all read the same.
fn parse_terms(args: &[String]) -> Result<Sequence> {
    let seq: Sequence = args
        .join(",")
        .parse()
        .context("terms must be comma-separated integers")?;
    seq.require_len(MIN_QUERY_TERMS)?;
    Ok(seq)
}

fn render(prediction: &Prediction) -> String {
    let next = prediction
        .value
        .map_or_else(|| NO_ANSWER.to_string(), |v| v.to_string());
    format!("{}\nnext: {next}", prediction.explanation)
}

fn cmd_predict(config: CliConfig, terms: &[String], json: bool, depth: Option<u32>) -> Result<()> {
    let mut search = config.search;
    if let Some(depth) = depth {
        search.depth_limit = depth;
    }

    let seq = parse_terms(terms)?;
    let prediction = Predictor::new(search).predict(&seq);

    if json {
        println!(
            "{}",
            export_json(&prediction).context("failed to serialize prediction")?
        );
    } else {
        println!("{}", render(&prediction));
    }
    Ok(())
}

fn cmd_interactive(config: CliConfig) -> Result<()> {
    let predictor = Predictor::new(config.search);
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let seq = match line.parse::<Sequence>() {
            Ok(seq) => seq,
            Err(e) => {
                tracing::debug!("rejected input {line:?}: {e}");
                writeln!(stdout, "{STYLE_HINT}")?;
                continue;
            }
        };
        if let Err(e) = seq.require_len(MIN_QUERY_TERMS) {
            writeln!(stdout, "!! {e}")?;
            continue;
        }

        let prediction = predictor.predict(&seq);
        writeln!(stdout, "{}\n", render(&prediction))?;
        stdout.flush()?;
    }
    Ok(())
}

fn cmd_catalog() -> Result<()> {
    let catalog = Catalog::standard();
    let width = catalog.iter().map(|e| e.name.len()).max().unwrap_or(0);
    for entry in catalog.iter() {
        println!(
            "{:<width$}  (familiarity {})  {}",
            entry.name, entry.familiarity, entry.terms
        );
    }
    println!("{} entries", catalog.len());
    Ok(())
}

/// Stdin reaching EOF during the handshake is a normal way to stop a
/// stdio server, not a startup failure.
fn closed_before_init(err: &ServerInitializeError) -> bool {
    matches!(err, ServerInitializeError::ConnectionClosed(_))
}

async fn cmd_serve(config: CliConfig) -> Result<()> {
    tracing::info!(
        depth_limit = config.search.depth_limit,
        "starting MCP server"
    );

    let server = server::SeqServer::new(config.search);
    let service = match server.serve(stdio()).await {
        Ok(service) => service,
        Err(e) if closed_before_init(&e) => {
            tracing::info!("client disconnected before initialization: {e}");
            return Ok(());
        }
        Err(e) => return Err(e).context("failed to start MCP server"),
    };
    service.waiting().await?;

    tracing::info!("MCP server stopped");
    Ok(())
}
