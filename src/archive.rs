//! Persistence of simulation results. An [OutcomeArchive] bundles the outcome matrices of several
//! runs into a single document, each keyed by its shuffle count rendered as a decimal string.

use std::collections::BTreeMap;
use std::io::Error;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::file::{ReadJsonFile, WriteJsonFile};
use crate::outcome::OutcomeMatrix;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutcomeArchive {
    entries: BTreeMap<String, OutcomeMatrix>,
}
impl OutcomeArchive {
    pub fn insert(&mut self, shuffles: u64, outcome: OutcomeMatrix) -> Option<OutcomeMatrix> {
        self.entries.insert(shuffles.to_string(), outcome)
    }

    pub fn get(&self, shuffles: u64) -> Option<&OutcomeMatrix> {
        self.entries.get(&shuffles.to_string())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending order of shuffle count. Keys that are not decimal integers (which
    /// can only come from a hand-edited archive) are skipped.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &OutcomeMatrix)> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .filter_map(|(key, outcome)| key.parse::<u64>().ok().map(|shuffles| (shuffles, outcome)))
            .collect();
        entries.sort_by_key(|&(shuffles, _)| shuffles);
        entries.into_iter()
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        self.write_json_file(path)
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self, Error> {
        Self::read_json_file(path)
    }
}

/// The conventional file name for an archive of runs of `trials` trials each.
pub fn default_path(trials: u64) -> PathBuf {
    PathBuf::from(format!("outcomes_{trials}_simulations.json"))
}
