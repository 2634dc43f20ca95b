use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use cellflow_common::{CoreError, exit_code};
use cellflow_eval::ReferenceEvaluator;
use cellflow_eval::engine::{EvalConfig, new_engine};
use cellflow_io::{IoConfig, IoError, OutputFormat, read_grid, render, write_output};
use clap::{ArgAction, Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "cellflow",
    version,
    about = "Evaluate a delimited grid of cell expressions in parallel"
)]
struct Cli {
    /// Input file, one row per line.
    input: PathBuf,

    /// Where to write the rendered results.
    #[arg(short, long, env = "CELLFLOW_OUTPUT", default_value = "results.csv")]
    output: PathBuf,

    /// Single-byte field separator of the input file.
    #[arg(long, env = "CELLFLOW_DELIMITER", default_value = "|", value_parser = parse_delimiter)]
    delimiter: u8,

    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,

    /// Run buckets one after another on the calling thread.
    #[arg(long, conflicts_with = "threads")]
    sequential: bool,

    /// Worker pool size. Defaults to the number of logical cores.
    #[arg(long, env = "CELLFLOW_THREADS", value_parser = clap::value_parser!(u16).range(1..))]
    threads: Option<u16>,

    /// Fail on circular references instead of leaving the cells as text.
    #[arg(long)]
    detect_cycles: bool,

    /// Also print the rendered results to stdout.
    #[arg(long)]
    print: bool,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Table,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Table => OutputFormat::Table,
            Format::Json => OutputFormat::Json,
        }
    }
}

fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s.as_bytes() {
        [b] if b.is_ascii() && *b != b'\n' && *b != b'\r' => Ok(*b),
        _ => Err(format!("expected a single ASCII character other than a line break, got {s:?}")),
    }
}

impl Cli {
    fn eval_config(&self) -> EvalConfig {
        EvalConfig {
            enable_parallel: !self.sequential,
            max_threads: self.threads.map(usize::from),
            detect_cycles: self.detect_cycles,
        }
    }

    fn io_config(&self) -> IoConfig {
        IoConfig {
            delimiter: self.delimiter,
            format: self.format.into(),
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: &Cli) -> Result<()> {
    let started = Instant::now();
    let io_config = cli.io_config();

    let grid = read_grid(&cli.input, &io_config)?;
    let engine = new_engine(ReferenceEvaluator, cli.eval_config());
    let plan = engine
        .plan(&grid)
        .with_context(|| format!("planning {}", cli.input.display()))?;
    tracing::info!(
        dynamic_cells = plan.stats.dynamic_cells,
        buckets = plan.stats.buckets_surviving,
        absorbed = plan.stats.buckets_absorbed,
        "plan ready"
    );

    let outcome = engine
        .execute(plan)
        .with_context(|| format!("evaluating {}", cli.input.display()))?;
    let rendered = render(outcome.values(), io_config.format)?;

    if cli.print {
        println!("ResultBoard:");
        print!("{rendered}");
    }
    write_output(&cli.output, &rendered)?;

    println!(
        "Execution ended. Workers launched: {}. Total time: {:?}.",
        outcome.summary.buckets_dispatched,
        started.elapsed()
    );
    println!("Results written to: {}.", cli.output.display());
    Ok(())
}

/// Exit code of the first typed error in the chain.
fn exit_code_for(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| {
            cause
                .downcast_ref::<CoreError>()
                .map(CoreError::exit_code)
                .or_else(|| cause.downcast_ref::<IoError>().map(IoError::exit_code))
        })
        .unwrap_or(exit_code::INVALID_ARGUMENTS)
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(exit_code::INVALID_ARGUMENTS)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code_for(&err))
        }
    }
}
