//! Testing helpers.

use std::collections::VecDeque;

use assert_float_eq::*;
use tinyrand::Rand;

/// A [Rand] that replays a literal sequence of coin flips, where `true` selects the first half of
/// the deck. Panics if more flips are drawn than were scripted.
pub struct Replay {
    flips: VecDeque<bool>,
}
impl Replay {
    pub fn new(flips: impl IntoIterator<Item = bool>) -> Self {
        Self {
            flips: flips.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.flips.len()
    }
}

impl Rand for Replay {
    fn next_u64(&mut self) -> u64 {
        match self.flips.pop_front() {
            Some(true) => 0,
            Some(false) => u64::MAX,
            None => panic!("no more scripted flips"),
        }
    }
}

pub fn assert_slice_f64_near(expected: &[f64], actual: &[f64], distance: u32) {
    assert_eq!(
        expected.len(),
        actual.len(),
        "lengths do not match: {} ≠ {}",
        expected.len(),
        actual.len()
    );
    for (index, &expected) in expected.iter().enumerate() {
        let actual = actual[index];
        if actual != expected {
            assert_f64_near!(expected, actual, distance);
        }
    }
}

/// Asserts that every element of `actual` lies within an absolute `tolerance` of `expected`.
pub fn assert_slice_f64_within(expected: &[f64], actual: &[f64], tolerance: f64) {
    assert_eq!(
        expected.len(),
        actual.len(),
        "lengths do not match: {} ≠ {}",
        expected.len(),
        actual.len()
    );
    for (index, &expected) in expected.iter().enumerate() {
        let actual = actual[index];
        assert!(
            (expected - actual).abs() <= tolerance,
            "element {index}: expected {expected} ± {tolerance}, got {actual}"
        );
    }
}
