//! IndiLab CLI: compute technical indicators from the command line.
//!
//! Commands:
//! - `compute`: run one JSON request and print the JSON reply
//! - `csv`: compute an indicator over bars read from a CSV file
//! - `batch`: run a JSON array of requests on the worker pool
//! - `catalog`: print the indicator catalog
//! - `serve`: answer newline-delimited JSON requests from stdin

mod bars;

use std::fs::File;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use indilab_core::{IndicatorEngine, IndicatorRequest, ParamValue};
use indilab_runner::{
    encode_reply, parse_request, IndicatorClient, ReplyEnvelope, RunnerConfig, WorkerPool,
    WorkerReply,
};

#[derive(Parser)]
#[command(name = "indilab", version, about = "IndiLab CLI: technical indicators over OHLCV series")]
struct Cli {
    /// Runner config TOML. Falls back to $INDILAB_CONFIG, then defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one request given as JSON and print the reply.
    Compute {
        /// Request file. Reads stdin when omitted.
        input: Option<PathBuf>,

        /// Pretty-print the reply.
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Compute an indicator over a CSV file of bars.
    Csv {
        /// CSV with a header row; needs at least a `close` column.
        path: PathBuf,

        /// Indicator identifier, e.g. SMA or bbands.
        #[arg(long, short)]
        indicator: String,

        /// Parameter as NAME=VALUE; repeatable.
        #[arg(long = "param", short, value_parser = bars::parse_param)]
        params: Vec<(String, ParamValue)>,

        /// Pretty-print the reply.
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Run a JSON array of requests on the worker pool.
    Batch {
        /// Requests file. Reads stdin when omitted.
        input: Option<PathBuf>,

        /// Pretty-print the replies.
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Print the indicator catalog as JSON.
    Catalog {
        /// Pretty-print the document.
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Answer newline-delimited JSON requests from stdin, one reply line each.
    Serve,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = RunnerConfig::load(cli.config.as_deref()).context("loading runner config")?;
    debug!(?config, "runner config");

    let ok = match cli.command {
        Commands::Compute { input, pretty } => run_compute(input.as_deref(), pretty, &config)?,
        Commands::Csv {
            path,
            indicator,
            params,
            pretty,
        } => run_csv(&path, indicator, params, pretty, &config)?,
        Commands::Batch { input, pretty } => run_batch(input.as_deref(), pretty, &config)?,
        Commands::Catalog { pretty } => {
            let engine = IndicatorEngine::default();
            print_json(&engine.catalog().document(), pretty)?;
            true
        }
        Commands::Serve => run_serve(&config)?,
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

fn read_input(input: Option<&Path>) -> Result<String> {
    let mut text = String::new();
    match input {
        Some(path) => {
            File::open(path)
                .with_context(|| format!("opening {}", path.display()))?
                .read_to_string(&mut text)?;
        }
        None => {
            io::stdin().read_to_string(&mut text)?;
        }
    }
    Ok(text)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}

/// Print the reply and report whether it was a success.
fn emit(id: Option<u64>, reply: WorkerReply, pretty: bool) -> Result<bool> {
    if let WorkerReply::Error { error, .. } = &reply {
        warn!(%error, "request failed");
    }
    let ok = reply.is_success();
    print_json(&ReplyEnvelope { id, reply }, pretty)?;
    Ok(ok)
}

fn run_compute(input: Option<&Path>, pretty: bool, config: &RunnerConfig) -> Result<bool> {
    let text = read_input(input)?;
    let envelope = match parse_request(&text) {
        Ok(envelope) => envelope,
        Err(e) => return emit(None, e.to_reply(), pretty),
    };
    let client = IndicatorClient::new(IndicatorEngine::default(), config)?;
    let reply = client.compute(envelope.request)?;
    emit(envelope.id, reply, pretty)
}

fn run_csv(
    path: &Path,
    indicator: String,
    params: Vec<(String, ParamValue)>,
    pretty: bool,
    config: &RunnerConfig,
) -> Result<bool> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let data = bars::read_bars(file).with_context(|| format!("loading bars from {}", path.display()))?;
    info!(bars = data.len(), %indicator, "loaded CSV");

    let mut request = IndicatorRequest::new(indicator, data);
    request.params.extend(params);

    let client = IndicatorClient::new(IndicatorEngine::default(), config)?;
    let reply = client.compute(request)?;
    emit(None, reply, pretty)
}

fn run_batch(input: Option<&Path>, pretty: bool, config: &RunnerConfig) -> Result<bool> {
    let text = read_input(input)?;
    let requests: Vec<IndicatorRequest> =
        serde_json::from_str(&text).context("parsing request array")?;

    let pool = WorkerPool::new(IndicatorEngine::default(), &config.pool)?;
    info!(requests = requests.len(), threads = pool.threads(), "running batch");
    let replies = pool.compute_batch(&requests);

    let ok = replies.iter().all(WorkerReply::is_success);
    print_json(&replies, pretty)?;
    Ok(ok)
}

fn run_serve(config: &RunnerConfig) -> Result<bool> {
    let client = IndicatorClient::new(IndicatorEngine::default(), config)?;
    info!(
        inline_threshold = client.inline_threshold(),
        "serving requests on stdin"
    );

    let stdin = io::stdin();
    let mut out = io::stdout().lock();
    let mut served = 0u64;

    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        let (id, reply) = match parse_request(&line) {
            Ok(envelope) => (envelope.id, client.compute(envelope.request)?),
            Err(e) => (None, e.to_reply()),
        };
        writeln!(out, "{}", encode_reply(&ReplyEnvelope { id, reply })?)?;
        out.flush()?;
        served += 1;
    }

    info!(served, "stdin closed");
    Ok(true)
}
