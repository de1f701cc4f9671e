//! Sweeps a range of shuffle counts, running one simulation per count with otherwise identical
//! parameters, and collects the results into an [OutcomeArchive].

use std::ops::RangeInclusive;

use anyhow::bail;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::archive::OutcomeArchive;
use crate::mc::{SimulationError, Simulator, DEFAULT_DECK_SIZE};
use crate::progress::Progress;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepConfig {
    pub trials: u64,
    pub min_shuffles: u64,
    pub max_shuffles: u64,
    pub deck_size: usize,
    pub workers: usize,
    pub seed: u64,
}
impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            trials: 100,
            min_shuffles: 1,
            max_shuffles: 24,
            deck_size: DEFAULT_DECK_SIZE,
            workers: 1,
            seed: 0,
        }
    }
}
impl SweepConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.min_shuffles > self.max_shuffles {
            bail!(
                "minimum shuffles ({}) cannot exceed maximum shuffles ({})",
                self.min_shuffles,
                self.max_shuffles
            );
        }
        if self.workers == 0 {
            bail!("at least one worker is required");
        }
        Ok(())
    }

    pub fn shuffles(&self) -> RangeInclusive<u64> {
        self.min_shuffles..=self.max_shuffles
    }

    /// Fails unless `shuffles` lies within the swept range.
    pub fn ensure_swept(&self, shuffles: u64) -> anyhow::Result<()> {
        if !self.shuffles().contains(&shuffles) {
            bail!(
                "{shuffles} shuffles lie outside the swept range {}..={}",
                self.min_shuffles,
                self.max_shuffles
            );
        }
        Ok(())
    }
}

/// Runs the sweep described by `config`. Each shuffle count gets its own seed, derived from the
/// configured seed and the count, and is reported to `progress` separately.
pub fn sweep<P: Progress>(
    config: &SweepConfig,
    progress: impl Fn(u64) -> P,
) -> Result<OutcomeArchive, SimulationError> {
    let mut archive = OutcomeArchive::default();
    for shuffles in config.shuffles() {
        debug!("sweeping {shuffles} shuffles");
        let outcome = Simulator::default()
            .with_trials(config.trials)
            .with_shuffles(shuffles)
            .with_deck_size(config.deck_size)
            .with_workers(config.workers)
            .with_seed(config.seed.wrapping_add(shuffles))
            .with_progress(progress(shuffles))
            .run()?;
        info!(
            "{shuffles} shuffles: {} trials, total variation {:.6}",
            outcome.trials(),
            outcome.total_variation()
        );
        archive.insert(shuffles, outcome);
    }
    Ok(archive)
}
