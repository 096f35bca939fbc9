//! Ranking of enriched entries and the duplicate-location policy.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::resolver::ResolvedLocation;

/// A canonical location paired with its metric. The unit of output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub location: ResolvedLocation,
    pub metric: u64,
}

impl RankedEntry {
    pub fn new(location: ResolvedLocation, metric: u64) -> Self {
        Self { location, metric }
    }
}

/// Output line format: `<location>: <metric> stars`.
impl fmt::Display for RankedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} stars", self.location, self.metric)
    }
}

/// What to do when several links resolve to the same location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// One entry per link, even if locations repeat.
    #[default]
    KeepAll,
    /// One entry per repository, keeping the highest metric seen. Addresses
    /// differing only by `www.`, a trailing `/`, query or fragment count as
    /// one repository.
    MergeByLocation,
}

impl DuplicatePolicy {
    pub fn apply(self, entries: Vec<RankedEntry>) -> Vec<RankedEntry> {
        match self {
            DuplicatePolicy::KeepAll => entries,
            DuplicatePolicy::MergeByLocation => {
                let mut merged: BTreeMap<String, RankedEntry> = BTreeMap::new();
                for entry in entries {
                    match merged.entry(entry.location.repository_key()) {
                        Entry::Vacant(slot) => {
                            slot.insert(entry);
                        }
                        Entry::Occupied(mut slot) => {
                            if prefer(&entry, slot.get()) {
                                slot.insert(entry);
                            }
                        }
                    }
                }
                merged.into_values().collect()
            }
        }
    }
}

/// Higher metric wins; on a tie the smaller address is shown.
fn prefer(candidate: &RankedEntry, current: &RankedEntry) -> bool {
    candidate.metric > current.metric
        || (candidate.metric == current.metric
            && candidate.location.as_str() < current.location.as_str())
}

/// Sorts by metric, highest first. Equal metrics are ordered by location so
/// the result does not depend on task completion order.
pub fn rank(mut entries: Vec<RankedEntry>) -> Vec<RankedEntry> {
    entries.sort_by(|a, b| {
        b.metric
            .cmp(&a.metric)
            .then_with(|| a.location.as_str().cmp(b.location.as_str()))
    });
    entries
}
