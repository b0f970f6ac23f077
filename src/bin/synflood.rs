//! Reproduce the SYN flood metrics from a labeled flow capture.
//!
//! ```bash
//! synflood --csv data/syn.csv --window 500 --vector-size 256 \
//!     --results results/syn_flood_metrics.json
//! ```
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use synflood::{encode_dataset, read_records, ConfigIO, EvalConfig, EvalError, Evaluator};

#[derive(Parser)]
#[command(name = "synflood")]
#[command(version, about = "Windowed retrain-and-score evaluation of a SYN flood detector", long_about = None)]
struct Cli {
    /// Comma separated flow capture
    #[arg(long)]
    csv: PathBuf,

    /// JSON configuration, flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Records per window
    #[arg(long)]
    window: Option<usize>,

    /// Width of the encoded feature vectors
    #[arg(long, short = 'd')]
    vector_size: Option<usize>,

    /// Seed shared by every window's fit
    #[arg(long)]
    seed: Option<u64>,

    /// Score windows concurrently
    #[arg(long)]
    parallel: bool,

    /// Worker threads for --parallel
    #[arg(long)]
    threads: Option<usize>,

    /// The capture's first row is a header
    #[arg(long)]
    has_headers: bool,

    /// Where to write the metrics report
    #[arg(long, default_value = "results/syn_flood_metrics.json")]
    results: PathBuf,
}

impl Cli {
    fn eval_config(&self) -> Result<EvalConfig, EvalError> {
        let mut cfg = match &self.config {
            Some(path) => EvalConfig::load(path)?,
            None => EvalConfig::default(),
        };
        if let Some(window) = self.window {
            cfg.window = window;
        }
        if let Some(vector_size) = self.vector_size {
            cfg.vector_size = vector_size;
        }
        if let Some(seed) = self.seed {
            cfg.seed = seed;
        }
        if self.parallel {
            cfg.parallel = true;
        }
        if self.threads.is_some() {
            cfg.num_threads = self.threads;
        }
        if self.has_headers {
            cfg.has_headers = true;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn run(cli: &Cli) -> Result<(), EvalError> {
    let tic = Instant::now();
    let cfg = cli.eval_config()?;

    info!("Loading {}", cli.csv.display());
    let records = read_records(&cli.csv, &cfg.layout, cfg.has_headers)?;
    let data = encode_dataset(&records, &cfg)?;
    drop(records);

    let evaluation = Evaluator::new(cfg)?.evaluate(&data)?;
    let mut report = evaluation.report;
    report.set_runtime(tic.elapsed());

    let saved = report.save(&cli.results);
    println!("\n=== Metrics ===");
    println!("{}", report);
    saved?;
    info!("Report written to {}", cli.results.display());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
