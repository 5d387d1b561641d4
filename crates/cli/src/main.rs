//! Prediction table command line front end.
//!
//! This binary drives the model without a schematic editor. It performs:
//! 1. **Fill:** Create a table file of a given geometry and fill policy.
//! 2. **Check:** Parse a table file and report malformed lines and labels.
//! 3. **Run:** Execute a JSON stimulus script against a configured table and print the
//!    settled outputs of every step, optionally with statistics and a dump of the final contents.
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `warn`).

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use predtab_core::common::Error;
use predtab_core::memory::codec;
use predtab_core::memory::{FillPolicy, FsLoader, LabelTable, WordStore};
use predtab_core::sim::{Script, StepOutput, run_script};
use predtab_core::stats::TableStats;
use predtab_core::{Config, PredictionTable};

#[derive(Parser, Debug)]
#[command(
    name = "predtab",
    author,
    version,
    about = "Tagged branch-target prediction table model",
    long_about = "Create, check and exercise prediction table contents.\n\nExamples:\n  predtab fill -o table.txt --policy undefined\n  predtab check table.txt\n  predtab run --script steps.json --init table.txt --stats"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Policy {
    Zero,
    Undefined,
    Random,
}

impl From<Policy> for FillPolicy {
    fn from(p: Policy) -> Self {
        match p {
            Policy::Zero => Self::Zero,
            Policy::Undefined => Self::Undefined,
            Policy::Random => Self::Random,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a freshly filled table file.
    Fill {
        /// Output file; stdout when absent.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of words.
        #[arg(long, default_value_t = 256)]
        words: usize,

        /// Word width in bits.
        #[arg(long, default_value_t = 18)]
        width: u32,

        /// Initial contents.
        #[arg(long, value_enum, default_value = "zero")]
        policy: Policy,
    },

    /// Parse a table file and report problems.
    Check {
        /// Table file.
        path: PathBuf,

        /// Number of words.
        #[arg(long, default_value_t = 256)]
        words: usize,

        /// Word width in bits.
        #[arg(long, default_value_t = 18)]
        width: u32,

        /// List labels found in the file.
        #[arg(long)]
        labels: bool,
    },

    /// Run a stimulus script.
    Run {
        /// JSON stimulus script.
        #[arg(short, long)]
        script: PathBuf,

        /// JSON configuration; defaults when absent. `memory.resource` is resolved
        /// relative to this file.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Table file loaded before the first step.
        #[arg(long)]
        init: Option<PathBuf>,

        /// Write the final table contents here.
        #[arg(long)]
        dump: Option<PathBuf>,

        /// Include statistics in the report.
        #[arg(long)]
        stats: bool,
    },
}

#[derive(Serialize)]
struct RunReport {
    steps: Vec<StepOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<TableStats>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Fill {
            output,
            words,
            width,
            policy,
        } => cmd_fill(output.as_deref(), words, width, policy),
        Commands::Check {
            path,
            words,
            width,
            labels,
        } => cmd_check(&path, words, width, labels),
        Commands::Run {
            script,
            config,
            init,
            dump,
            stats,
        } => cmd_run(&script, config.as_deref(), init.as_deref(), dump.as_deref(), stats),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            error!("{e}");
            eprintln!("[!] {e}");
            process::exit(2);
        }
    }
}

fn open_output(path: Option<&Path>) -> io::Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => Box::new(BufWriter::new(File::create(p)?)),
        None => Box::new(BufWriter::new(io::stdout())),
    })
}

/// Fills a new store and writes it in file format.
fn cmd_fill(output: Option<&Path>, words: usize, width: u32, policy: Policy) -> Result<i32, Error> {
    let mut store = WordStore::new(words, width)?;
    store.fill(policy.into());
    let mut out = open_output(output)?;
    codec::save(&store, &mut out)?;
    out.flush()?;
    info!(words, width, ?policy, "table written");
    Ok(0)
}

/// Parses a table file; exits non-zero if any line was rejected.
fn cmd_check(path: &Path, words: usize, width: u32, show_labels: bool) -> Result<i32, Error> {
    let mut store = WordStore::new(words, width)?;
    let mut labels = LabelTable::new();
    let reader = BufReader::new(File::open(path)?);
    let report = codec::parse(reader, &mut store, Some(&mut labels))?;

    println!(
        "{}: {} lines, {} records, {} labels, {} errors",
        path.display(),
        report.lines,
        report.records,
        report.labels,
        report.errors.len()
    );
    for e in &report.errors {
        println!("  {e}");
    }
    if show_labels {
        for (addr, name) in labels.iter() {
            println!("  {addr:04x} {name}");
        }
    }
    Ok(if report.is_clean() { 0 } else { 1 })
}

/// Directory that `memory.resource` names are resolved against: the config file's own
/// directory, or the working directory without a config file.
fn resource_root(config: Option<&Path>) -> PathBuf {
    config
        .and_then(Path::parent)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

/// Runs a script and prints a JSON report.
fn cmd_run(
    script: &Path,
    config: Option<&Path>,
    init: Option<&Path>,
    dump: Option<&Path>,
    with_stats: bool,
) -> Result<i32, Error> {
    let root = resource_root(config);
    let config = match config {
        Some(p) => Config::from_json(&fs::read_to_string(p)?)?,
        None => Config::default(),
    };
    let script = Script::from_json(&fs::read_to_string(script)?)?;

    let mut table = PredictionTable::from_config(&config, &FsLoader::new(root))?;
    if let Some(p) = init {
        let report = table.load(BufReader::new(File::open(p)?))?;
        info!(records = report.records, errors = report.errors.len(), "initial contents loaded");
    }

    let steps = run_script(&mut table, &script);
    let report = RunReport {
        steps,
        stats: with_stats.then(|| *table.stats()),
    };
    let json = serde_json::to_string_pretty(&report).map_err(predtab_core::common::ConfigError::from)?;
    println!("{json}");

    if let Some(p) = dump {
        let mut out = open_output(Some(p))?;
        table.save(&mut out)?;
        out.flush()?;
    }
    Ok(0)
}
