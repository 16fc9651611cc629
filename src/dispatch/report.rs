//! Result and aggregate types.

use std::collections::HashMap;
use std::hash::Hash;
use serde::Serialize;
use uuid::Uuid;

/// Identifies one `check` call in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CheckId(Uuid);

impl CheckId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CheckId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CheckId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "check-{}", self.0)
    }
}

/// Compact description of a report, for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub observed: usize,
    pub complete: bool,
}

impl std::fmt::Display for ReportSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = if self.complete { "complete" } else { "partial" };
        write!(f, "{} observed, {}", self.observed, state)
    }
}

/// One probe's result, moved from the worker task to the collector.
#[derive(Debug)]
pub struct ProbeResult<T, O> {
    pub target: T,
    pub outcome: O,
}

/// Aggregate of every result observed by one `check` call.
///
/// When `complete` is false a missing target means "not observed yet",
/// never "failed".
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport<T: Eq + Hash, O> {
    outcomes: HashMap<T, O>,
    complete: bool,
}

impl<T: Eq + Hash, O> CheckReport<T, O> {
    pub(crate) fn new(outcomes: HashMap<T, O>, complete: bool) -> Self {
        Self { outcomes, complete }
    }

    /// True when every started probe reported before collection ended.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn get(&self, target: &T) -> Option<&O> {
        self.outcomes.get(target)
    }

    pub fn contains(&self, target: &T) -> bool {
        self.outcomes.contains_key(target)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Iterate in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&T, &O)> {
        self.outcomes.iter()
    }

    pub fn outcomes(&self) -> &HashMap<T, O> {
        &self.outcomes
    }

    pub fn into_parts(self) -> (HashMap<T, O>, bool) {
        (self.outcomes, self.complete)
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            observed: self.outcomes.len(),
            complete: self.complete,
        }
    }

    /// Count outcomes matching `pred`, e.g. the number of healthy targets.
    pub fn count_where(&self, pred: impl Fn(&O) -> bool) -> usize {
        self.outcomes.values().filter(|o| pred(o)).count()
    }
}
