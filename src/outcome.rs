//! The [OutcomeMatrix] tallies, across trials, the final position of every original card. Cell
//! `(card, position)` counts the trials in which `card` finished at `position`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::deck::Card;
use crate::linear::{AllocationError, Matrix};

/// Persisted as `{trials, deck_size, counts}`, where `counts` holds `deck_size` rows of
/// `deck_size` counts each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "OutcomeRecord", try_from = "OutcomeRecord")]
pub struct OutcomeMatrix {
    trials: u64,
    counts: Matrix<u64>,
}
impl OutcomeMatrix {
    pub fn allocate(deck_size: usize) -> Self {
        Self {
            trials: 0,
            counts: Matrix::allocate(deck_size, deck_size),
        }
    }

    pub fn try_allocate(deck_size: usize) -> Result<Self, AllocationError> {
        Ok(Self {
            trials: 0,
            counts: Matrix::try_allocate(deck_size, deck_size)?,
        })
    }

    pub fn deck_size(&self) -> usize {
        self.counts.rows()
    }

    /// The number of trials tallied so far.
    pub fn trials(&self) -> u64 {
        self.trials
    }

    pub fn counts(&self) -> &Matrix<u64> {
        &self.counts
    }

    /// Records the final state of one trial's deck.
    #[inline]
    pub fn tally(&mut self, deck: &[Card]) {
        debug_assert_eq!(self.deck_size(), deck.len());
        for (position, &card) in deck.iter().enumerate() {
            self.counts[(card, position)] += 1;
        }
        self.trials += 1;
    }

    /// Folds the tallies of `other` into this matrix.
    pub fn merge(&mut self, other: &OutcomeMatrix) {
        self.counts.add_assign(&other.counts);
        self.trials += other.trials;
    }

    pub fn row_sums(&self) -> Vec<u64> {
        self.counts.row_sums()
    }

    pub fn col_sums(&self) -> Vec<u64> {
        self.counts.col_sums()
    }

    /// Checks that every card finished somewhere, and that every position was filled, in each of
    /// the tallied trials.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let check = |axis: Axis, sums: Vec<u64>| {
            match sums.into_iter().enumerate().find(|&(_, sum)| sum != self.trials) {
                None => Ok(()),
                Some((index, sum)) => Err(InvariantViolation {
                    axis,
                    index,
                    sum,
                    expected: self.trials,
                }),
            }
        };
        check(Axis::Row, self.row_sums())?;
        check(Axis::Col, self.col_sums())
    }

    /// The fraction of trials in which each card finished at each position.
    pub fn frequencies(&self) -> Matrix<f64> {
        let size = self.deck_size();
        let mut frequencies = Matrix::allocate(size, size);
        if self.trials != 0 {
            let trials = self.trials as f64;
            for (frequency, &count) in frequencies
                .flatten_mut()
                .iter_mut()
                .zip(self.counts.flatten())
            {
                *frequency = count as f64 / trials;
            }
        }
        frequencies
    }

    /// The total variation distance between each card's empirical distribution of final positions
    /// and the uniform distribution, averaged over all cards. A perfectly randomised deck scores 0;
    /// an unshuffled deck of _N_ cards scores `1 - 1/N`.
    pub fn total_variation(&self) -> f64 {
        let size = self.deck_size();
        if size == 0 || self.trials == 0 {
            return 0.0;
        }
        let uniform = 1.0 / size as f64;
        let frequencies = self.frequencies();
        let sum: f64 = (0..size)
            .map(|card| {
                frequencies
                    .row_slice(card)
                    .iter()
                    .map(|frequency| (frequency - uniform).abs())
                    .sum::<f64>()
                    / 2.0
            })
            .sum();
        sum / size as f64
    }
}

#[derive(Serialize, Deserialize)]
struct OutcomeRecord {
    trials: u64,
    deck_size: usize,
    counts: Vec<Vec<u64>>,
}

impl From<OutcomeMatrix> for OutcomeRecord {
    fn from(outcome: OutcomeMatrix) -> Self {
        let deck_size = outcome.deck_size();
        Self {
            trials: outcome.trials,
            deck_size,
            counts: (0..deck_size)
                .map(|row| outcome.counts.row_slice(row).to_vec())
                .collect(),
        }
    }
}

impl TryFrom<OutcomeRecord> for OutcomeMatrix {
    type Error = MalformedOutcome;

    fn try_from(record: OutcomeRecord) -> Result<Self, Self::Error> {
        let deck_size = record.deck_size;
        if record.counts.len() != deck_size {
            return Err(MalformedOutcome::RowCount {
                deck_size,
                rows: record.counts.len(),
            });
        }
        if let Some((row, counts)) = record
            .counts
            .iter()
            .enumerate()
            .find(|(_, counts)| counts.len() != deck_size)
        {
            return Err(MalformedOutcome::RowLength {
                row,
                len: counts.len(),
                deck_size,
            });
        }
        let mut outcome = OutcomeMatrix {
            trials: record.trials,
            counts: Matrix::allocate(deck_size, deck_size),
        };
        for (row, counts) in record.counts.iter().enumerate() {
            outcome.counts.row_slice_mut(row).copy_from_slice(counts);
        }
        outcome.validate()?;
        Ok(outcome)
    }
}

/// A persisted outcome that does not describe a square matrix of consistent tallies.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MalformedOutcome {
    #[error("expected {deck_size} rows of counts, got {rows}")]
    RowCount { deck_size: usize, rows: usize },

    #[error("row {row} holds {len} counts, expected {deck_size}")]
    RowLength { row: usize, len: usize, deck_size: usize },

    #[error("inconsistent counts: {0}")]
    Inconsistent(#[from] InvariantViolation),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Col,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{axis:?} {index} sums to {sum}, expected {expected}")]
pub struct InvariantViolation {
    pub axis: Axis,
    pub index: usize,
    pub sum: u64,
    pub expected: u64,
}

#[cfg(test)]
mod tests {
    use assert_float_eq::*;

    use crate::testing::assert_slice_f64_near;

    use super::*;

    #[test]
    fn tally_records_each_card() {
        let mut outcome = OutcomeMatrix::allocate(4);
        outcome.tally(&[2, 0, 1, 3]);
        outcome.tally(&[0, 1, 2, 3]);
        assert_eq!(2, outcome.trials());
        assert_eq!(1, outcome.counts()[(2, 0)]);
        assert_eq!(1, outcome.counts()[(0, 1)]);
        assert_eq!(1, outcome.counts()[(0, 0)]);
        assert_eq!(2, outcome.counts()[(3, 3)]);
        assert_eq!(vec![2; 4], outcome.row_sums());
        assert_eq!(vec![2; 4], outcome.col_sums());
        assert_eq!(Ok(()), outcome.validate());
    }

    #[test]
    fn validate_detects_bad_row() {
        let mut outcome = OutcomeMatrix::allocate(3);
        outcome.tally(&[0, 1, 2]);
        outcome.counts.row_slice_mut(1)[1] = 0;
        assert_eq!(
            Err(InvariantViolation {
                axis: Axis::Row,
                index: 1,
                sum: 0,
                expected: 1
            }),
            outcome.validate()
        );
    }

    #[test]
    fn validate_detects_bad_col() {
        let mut outcome = OutcomeMatrix::allocate(2);
        outcome.tally(&[0, 1]);
        outcome.counts[(1, 0)] = 1;
        outcome.counts[(1, 1)] = 0;
        assert_eq!(
            Err(InvariantViolation {
                axis: Axis::Col,
                index: 0,
                sum: 2,
                expected: 1
            }),
            outcome.validate()
        );
    }

    #[test]
    fn merge_sums_counts_and_trials() {
        let mut lhs = OutcomeMatrix::allocate(2);
        lhs.tally(&[0, 1]);
        let mut rhs = OutcomeMatrix::allocate(2);
        rhs.tally(&[1, 0]);
        rhs.tally(&[1, 0]);
        lhs.merge(&rhs);
        assert_eq!(3, lhs.trials());
        assert_eq!(&[1, 2, 2, 1], lhs.counts().flatten());
        assert_eq!(Ok(()), lhs.validate());
    }

    #[test]
    fn frequencies_normalised_by_trials() {
        let mut outcome = OutcomeMatrix::allocate(2);
        outcome.tally(&[0, 1]);
        outcome.tally(&[0, 1]);
        outcome.tally(&[0, 1]);
        outcome.tally(&[1, 0]);
        assert_slice_f64_near(&[0.75, 0.25, 0.25, 0.75], outcome.frequencies().flatten(), 1);
    }

    #[test]
    fn frequencies_without_trials() {
        let outcome = OutcomeMatrix::allocate(2);
        assert_eq!(&[0.0; 4], outcome.frequencies().flatten());
    }

    #[test]
    fn total_variation_of_identity() {
        let mut outcome = OutcomeMatrix::allocate(4);
        outcome.tally(&[0, 1, 2, 3]);
        assert_f64_near!(0.75, outcome.total_variation());
    }

    #[test]
    fn total_variation_of_uniform() {
        let mut outcome = OutcomeMatrix::allocate(2);
        outcome.tally(&[0, 1]);
        outcome.tally(&[1, 0]);
        assert_eq!(0.0, outcome.total_variation());
    }

    #[test]
    fn serializes_nested_rows() {
        let mut outcome = OutcomeMatrix::allocate(3);
        outcome.tally(&[2, 0, 1]);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            serde_json::json!({
                "trials": 1,
                "deck_size": 3,
                "counts": [[0, 1, 0], [0, 0, 1], [1, 0, 0]]
            }),
            json
        );
        assert_eq!(outcome, serde_json::from_value(json).unwrap());
    }

    #[test]
    fn deserializes_empty_deck() {
        let json = r#"{"trials":4,"deck_size":0,"counts":[]}"#;
        let outcome: OutcomeMatrix = serde_json::from_str(json).unwrap();
        assert_eq!(0, outcome.deck_size());
        assert_eq!(4, outcome.trials());
    }

    #[test]
    fn rejects_missing_rows() {
        let json = r#"{"trials":1,"deck_size":3,"counts":[[1,0,0],[0,1,0]]}"#;
        let err = serde_json::from_str::<OutcomeMatrix>(json).unwrap_err();
        assert!(
            err.to_string().contains("expected 3 rows of counts, got 2"),
            "{err}"
        );
    }

    #[test]
    fn rejects_ragged_rows() {
        let json = r#"{"trials":1,"deck_size":2,"counts":[[1,0],[0]]}"#;
        let err = serde_json::from_str::<OutcomeMatrix>(json).unwrap_err();
        assert!(
            err.to_string().contains("row 1 holds 1 counts, expected 2"),
            "{err}"
        );
    }

    #[test]
    fn rejects_inconsistent_trials() {
        let json = r#"{"trials":2,"deck_size":2,"counts":[[1,0],[0,1]]}"#;
        let err = serde_json::from_str::<OutcomeMatrix>(json).unwrap_err();
        assert!(err.to_string().contains("inconsistent counts"), "{err}");
    }

    #[test]
    fn total_variation_degenerate() {
        assert_eq!(0.0, OutcomeMatrix::allocate(0).total_variation());
        assert_eq!(0.0, OutcomeMatrix::allocate(5).total_variation());
    }
}
