//! The Monte Carlo driver. Each trial starts from an identity deck, applies a fixed number of
//! riffles and tallies the final position of every card into an [OutcomeMatrix].
//!
//! Trials are independent, so a run is partitioned into batches that are simulated in parallel,
//! each with its own random stream and its own partial matrix, and then summed elementwise. The
//! outcome of a run depends only on its parameters, its seed and the number of workers; never on
//! the scheduling of the batches.
//!
//! Memory use is dominated by the outcome matrices: `deck_size²` counters of 8 bytes each, held
//! once per worker plus once for the reduction. A deck size whose matrix cannot be allocated is
//! reported as [SimulationError::ResourceExhaustion] before any trial is run.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use thiserror::Error;
use tinyrand::{Rand, Seeded, StdRand};
use tracing::debug;

use crate::deck;
use crate::outcome::OutcomeMatrix;
use crate::progress::{NoProgress, Progress};
use crate::shuffle;

pub const DEFAULT_DECK_SIZE: usize = 52;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimulationError {
    #[error("invalid argument {name}: {value}")]
    InvalidArgument { name: &'static str, value: i64 },

    #[error("cannot allocate an outcome matrix for a deck of {deck_size} cards")]
    ResourceExhaustion { deck_size: u64 },
}

/// Simulates `n_simulations` trials of `n_shuffles` riffles on a deck of `deck_size` cards, using
/// a single worker and the default seed. Negative arguments are rejected before any trial is run.
pub fn run(
    n_simulations: i64,
    n_shuffles: i64,
    deck_size: i64,
) -> Result<OutcomeMatrix, SimulationError> {
    let trials = non_negative("n_simulations", n_simulations)?;
    let shuffles = non_negative("n_shuffles", n_shuffles)?;
    let deck_size = non_negative("deck_size", deck_size)?;
    let deck_size = usize::try_from(deck_size)
        .map_err(|_| SimulationError::ResourceExhaustion { deck_size })?;
    Simulator::default()
        .with_trials(trials)
        .with_shuffles(shuffles)
        .with_deck_size(deck_size)
        .run()
}

fn non_negative(name: &'static str, value: i64) -> Result<u64, SimulationError> {
    u64::try_from(value).map_err(|_| SimulationError::InvalidArgument { name, value })
}

/// A reusable, configurable simulation. The `progress` sink is notified after every trial.
#[derive(Debug, Clone)]
pub struct Simulator<P: Progress = NoProgress> {
    trials: u64,
    shuffles: u64,
    deck_size: usize,
    workers: usize,
    seed: u64,
    progress: P,
}
impl Default for Simulator<NoProgress> {
    fn default() -> Self {
        Self {
            trials: 0,
            shuffles: 0,
            deck_size: DEFAULT_DECK_SIZE,
            workers: 1,
            seed: 0,
            progress: NoProgress,
        }
    }
}

impl<P: Progress> Simulator<P> {
    pub fn with_trials(mut self, trials: u64) -> Self {
        self.trials = trials;
        self
    }

    pub fn with_shuffles(mut self, shuffles: u64) -> Self {
        self.shuffles = shuffles;
        self
    }

    pub fn with_deck_size(mut self, deck_size: usize) -> Self {
        self.deck_size = deck_size;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_progress<Q: Progress>(self, progress: Q) -> Simulator<Q> {
        Simulator {
            trials: self.trials,
            shuffles: self.shuffles,
            deck_size: self.deck_size,
            workers: self.workers,
            seed: self.seed,
            progress,
        }
    }

    pub fn trials(&self) -> u64 {
        self.trials
    }

    pub fn shuffles(&self) -> u64 {
        self.shuffles
    }

    pub fn deck_size(&self) -> usize {
        self.deck_size
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.workers == 0 {
            return Err(SimulationError::InvalidArgument {
                name: "workers",
                value: 0,
            });
        }
        Ok(())
    }

    pub fn run(&self) -> Result<OutcomeMatrix, SimulationError> {
        self.validate()?;
        let start_time = Instant::now();
        let mut outcome = allocate(self.deck_size)?;
        let batches = partition(self.trials, self.workers);
        debug!(
            "simulating {} trials of {} shuffles on {} cards, seed: {}, batches: {batches:?}",
            self.trials, self.shuffles, self.deck_size, self.seed
        );

        let completed = AtomicU64::new(0);
        let partials = batches
            .par_iter()
            .enumerate()
            .map(|(batch, &trials)| -> Result<OutcomeMatrix, SimulationError> {
                let mut partial = allocate(self.deck_size)?;
                let mut rand = StdRand::seed(batch_seed(self.seed, batch as u64));
                run_batch(trials, self.shuffles, &mut rand, &mut partial, || {
                    let completed = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    self.progress.trial_completed(completed, self.trials);
                });
                Ok(partial)
            })
            .collect::<Result<Vec<_>, _>>()?;

        for partial in &partials {
            outcome.merge(partial);
        }
        debug_assert_eq!(self.trials, outcome.trials());
        debug!(
            "simulated {} trials in {:.3}s",
            self.trials,
            start_time.elapsed().as_millis() as f64 / 1_000.
        );
        Ok(outcome)
    }
}

fn allocate(deck_size: usize) -> Result<OutcomeMatrix, SimulationError> {
    OutcomeMatrix::try_allocate(deck_size).map_err(|_| SimulationError::ResourceExhaustion {
        deck_size: deck_size as u64,
    })
}

/// Runs `trials` trials serially on a single random stream, tallying into `outcome`. Apart from
/// the first trial, no allocations are made.
pub fn run_batch(
    trials: u64,
    shuffles: u64,
    rand: &mut impl Rand,
    outcome: &mut OutcomeMatrix,
    mut trial_completed: impl FnMut(),
) {
    let deck_size = outcome.deck_size();
    let mut deck = deck::identity(deck_size);
    let mut scratch = Vec::with_capacity(deck_size);
    for _ in 0..trials {
        deck::reset(&mut deck);
        shuffle::shuffle_in_place(&mut deck, &mut scratch, shuffles, rand);
        outcome.tally(&deck);
        trial_completed();
    }
}

/// Splits `trials` into `batches` near-equal parts, the earlier parts taking the remainder.
pub fn partition(trials: u64, batches: usize) -> Vec<u64> {
    debug_assert!(batches > 0);
    let quotient = trials / batches as u64;
    let remainder = trials % batches as u64;
    (0..batches as u64)
        .map(|batch| quotient + u64::from(batch < remainder))
        .collect()
}

/// Derives the seed of the given `batch` from the run's `seed` with the SplitMix64 mixer, so that
/// neighbouring batches draw from uncorrelated streams.
pub fn batch_seed(seed: u64, batch: u64) -> u64 {
    let mut z = seed.wrapping_add(batch.wrapping_add(1).wrapping_mul(0x9e3779b97f4a7c15));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}
