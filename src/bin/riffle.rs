use std::env;
use std::error::Error;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::thread;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, bail};
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::{debug, info};

use riffle::archive::default_path;
use riffle::file::ReadJsonFile;
use riffle::print::{tabulate_outcome, tabulate_sweep};
use riffle::progress::LogProgress;
use riffle::sweep::{sweep, SweepConfig};

#[derive(Debug, clap::Parser, Clone)]
#[command(allow_negative_numbers = true)]
struct Args {
    /// number of trials per shuffle count
    #[clap(short = 'n', long, default_value_t = 100)]
    trials: i64,

    /// smallest number of shuffles to simulate
    #[clap(long, default_value_t = 1)]
    min_shuffles: i64,

    /// largest number of shuffles to simulate (inclusive)
    #[clap(long, default_value_t = 24)]
    max_shuffles: i64,

    /// number of cards in the deck
    #[clap(short = 'd', long, default_value_t = 52)]
    deck_size: i64,

    /// number of parallel workers (defaults to the available parallelism)
    #[clap(short = 'w', long)]
    workers: Option<usize>,

    /// seed for the random streams (defaults to one derived from the clock)
    #[clap(short = 's', long)]
    seed: Option<u64>,

    /// where to write the outcome archive to
    #[clap(short = 'o', long)]
    out: Option<PathBuf>,

    /// JSON file to source the sweep configuration from, in place of the other flags
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// log progress within each simulation
    #[clap(short = 'p', long)]
    progress: bool,

    /// print the outcome frequencies for the given shuffle count
    #[clap(long)]
    show: Option<u64>,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        for (name, value) in [
            ("trials", self.trials),
            ("min-shuffles", self.min_shuffles),
            ("max-shuffles", self.max_shuffles),
            ("deck-size", self.deck_size),
        ] {
            if value < 0 {
                bail!("--{name} cannot be negative, got {value}");
            }
        }
        if self.workers == Some(0) {
            bail!("--workers must be at least 1");
        }
        Ok(())
    }

    fn sweep_config(&self) -> anyhow::Result<SweepConfig> {
        if let Some(path) = self.config.as_ref() {
            return Ok(SweepConfig::read_json_file(path)?);
        }
        Ok(SweepConfig {
            trials: u64::try_from(self.trials)?,
            min_shuffles: u64::try_from(self.min_shuffles)?,
            max_shuffles: u64::try_from(self.max_shuffles)?,
            deck_size: usize::try_from(self.deck_size)?,
            workers: self.workers.unwrap_or_else(default_workers),
            seed: self.seed.unwrap_or_else(clock_seed),
        })
    }
}

fn default_workers() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

fn main() -> Result<(), Box<dyn Error>> {
    if env::var("RUST_BACKTRACE").is_err() {
        env::set_var("RUST_BACKTRACE", "full")
    }
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    args.validate()?;
    debug!("args: {args:?}");

    let config = args.sweep_config()?;
    config.validate()?;
    if let Some(shuffles) = args.show {
        config.ensure_swept(shuffles)?;
    }
    info!("sweep config: {config:?}");

    let start_time = Instant::now();
    let progress_step = u64::max(config.trials / 10, 1);
    let archive = sweep(&config, |shuffles| {
        args.progress
            .then(|| LogProgress::new(format!("{shuffles} shuffles"), progress_step))
    })?;
    let elapsed_time = start_time.elapsed();
    info!(
        "swept {} shuffle counts in {:.3}s",
        archive.len(),
        elapsed_time.as_millis() as f64 / 1_000.
    );
    let out = args
        .out
        .clone()
        .unwrap_or_else(|| default_path(config.trials));
    archive.write(&out)?;
    info!("wrote outcomes to {}", out.display());

    info!("\n{}", Console::default().render(&tabulate_sweep(&archive)));
    if let Some(shuffles) = args.show {
        let outcome = archive
            .get(shuffles)
            .ok_or_else(|| anyhow!("{shuffles} shuffles were not simulated"))?;
        info!("\n{}", Console::default().render(&tabulate_outcome(outcome)));
    }
    Ok(())
}
