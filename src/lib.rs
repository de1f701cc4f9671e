//! A fast, allocation-free Monte Carlo simulator of repeated riffle shuffles.
//! Tabulates, across many independent trials, which original card ends up at each final position
//! of the deck after a given number of shuffles.

pub mod archive;
pub mod deck;
pub mod file;
pub mod linear;
pub mod mc;
pub mod outcome;
pub mod print;
pub mod progress;
pub mod shuffle;
pub mod sweep;

#[cfg(test)]
pub(crate) mod testing;

#[doc = include_str!("../README.md")]
#[cfg(doc)]
fn readme() {}
