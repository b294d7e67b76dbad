//! Cache hierarchy simulator CLI.
//!
//! This binary drives the cache model with an address trace. It performs:
//! 1. **Configuration:** Built-in defaults, an optional JSON file, then command-line overrides.
//! 2. **Simulation:** Streams the trace (file or stdin) through the hierarchy in order.
//! 3. **Reporting:** Prints per-level statistics as a table or as JSON.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::process;

use cachesim_core::common::{ConfigError, TraceError};
use cachesim_core::trace::TraceReader;
use cachesim_core::{CacheConfig, Hierarchy, HierarchyConfig};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    author,
    version,
    about = "Two-level cache hierarchy timing simulator",
    long_about = "Feed an address trace through split L1 instruction/data caches backed by a unified L2.\n\nTrace lines are `<I|D> <hex address>`; `#` starts a comment.\n\nExamples:\n  cachesim traces/gcc.trace\n  cachesim --icache 256:2:1 --dcache 256:4:1 --l2cache 2048:8:10 --blocksize 64 traces/gcc.trace\n  zcat trace.gz | cachesim --config p550.json --json -"
)]
struct Cli {
    /// Trace file; `-` or omitted reads stdin.
    trace: Option<PathBuf>,

    /// JSON hierarchy configuration applied before the overrides below.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Instruction cache geometry: sets, ways and hit time, colon-separated.
    #[arg(long, value_name = "S:W:H")]
    icache: Option<CacheConfig>,

    /// Data cache geometry: sets, ways and hit time, colon-separated.
    #[arg(long, value_name = "S:W:H")]
    dcache: Option<CacheConfig>,

    /// L2 geometry: sets, ways and hit time, colon-separated.
    #[arg(long, value_name = "S:W:H")]
    l2cache: Option<CacheConfig>,

    /// Block size in bytes.
    #[arg(long)]
    blocksize: Option<u32>,

    /// Main-memory latency in cycles.
    #[arg(long)]
    memspeed: Option<u32>,

    /// Make L2 inclusive of both L1 caches; `--inclusive=false` turns it off.
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    inclusive: Option<bool>,

    /// Print statistics as JSON.
    #[arg(long)]
    json: bool,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Installs the stderr subscriber; `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Error surfaced to the user.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Trace(#[from] TraceError),
    #[error("{}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("writing statistics: {0}")]
    Json(#[from] serde_json::Error),
    #[error("writing report: {0}")]
    Output(#[from] io::Error),
}

/// Builds the configuration: JSON file (or defaults), then flag overrides.
fn load_config(cli: &Cli) -> Result<HierarchyConfig, CliError> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
                path: path.clone(),
                source,
            })?;
            HierarchyConfig::from_json(&text)?
        }
        None => HierarchyConfig::default(),
    };

    if let Some(icache) = cli.icache {
        config.icache = icache;
    }
    if let Some(dcache) = cli.dcache {
        config.dcache = dcache;
    }
    if let Some(l2) = cli.l2cache {
        config.l2 = l2;
    }
    if let Some(block_size) = cli.blocksize {
        config.block_size = block_size;
    }
    if let Some(latency) = cli.memspeed {
        config.memory_latency = latency;
    }
    if let Some(inclusive) = cli.inclusive {
        config.inclusive = inclusive;
    }

    config.validate()?;
    Ok(config)
}

fn open_trace(path: Option<&PathBuf>) -> Result<Box<dyn BufRead>, CliError> {
    match path {
        Some(p) if p.as_os_str() != "-" => {
            let file = File::open(p).map_err(|source| CliError::Io {
                path: p.clone(),
                source,
            })?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(io::stdin().lock())),
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let config = load_config(cli)?;
    let mut sim = Hierarchy::new(&config)?;

    let total_cycles = sim.run_trace(TraceReader::new(open_trace(cli.trace.as_ref())?))?;
    info!(accesses = sim.clock(), total_cycles, "trace complete");

    let stats = sim.stats();
    if cli.json {
        let out = serde_json::to_string_pretty(&stats)?;
        println!("{out}");
    } else {
        print_config(&config, &sim);
        stats.print()?;
        println!("total_cycles             {total_cycles}");
    }
    Ok(())
}

fn print_config(config: &HierarchyConfig, sim: &Hierarchy) {
    let level = |c: &CacheConfig| {
        format!(
            "{} sets x {} ways, {} cycle hit",
            c.sets,
            c.effective_ways(),
            c.hit_time
        )
    };
    println!("Configuration:");
    println!("  L1-I: {}", level(&config.icache));
    println!("  L1-D: {}", level(&config.dcache));
    println!("  L2:   {}", level(&config.l2));
    println!(
        "  block {} B, memory {} cycles, {}",
        config.block_size,
        config.memory_latency,
        if sim.is_inclusive() { "inclusive" } else { "non-inclusive" }
    );
    println!();
}
