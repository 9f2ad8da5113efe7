//! Aggregation of raw status lines into per-(endpoint, process group) counts.
//!
//! Supervisord programs scaled with `numprocs` share a name prefix
//! (`worker_0`, `worker_1`, ...); the exporter reports the group, not the
//! replica. Counts are rebuilt from scratch every cycle — nothing accumulates
//! across cycles.

use std::collections::BTreeMap;

use crate::collector::{EndpointStatus, ProcessStatus};

/// State word marking a healthy process. Everything else counts as fatal.
const RUNNING_MARKER: &str = "RUNNING";

/// Running/fatal counters for one (endpoint, group) pair.
///
/// Kept as `f64` because the exposition format renders them as
/// general-format real numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GroupCounts {
    pub running: f64,
    pub fatal: f64,
}

/// Aggregated outcome of one collection cycle.
///
/// Both maps are ordered so the rendered document is deterministic: sorted by
/// endpoint, then by group key.
#[derive(Debug, Default)]
pub struct CycleAggregate {
    /// Reachability per endpoint.
    pub up: BTreeMap<String, bool>,
    /// Counters keyed by (endpoint, group key).
    pub counts: BTreeMap<(String, String), GroupCounts>,
}

impl CycleAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one endpoint's collection outcome into the aggregate.
    ///
    /// An unreachable endpoint contributes only its `up = false` entry; no
    /// process counters are recorded for it this cycle.
    pub fn record(&mut self, endpoint: &str, status: &EndpointStatus) {
        match status {
            EndpointStatus::Unreachable => {
                self.up.insert(endpoint.to_string(), false);
            }
            EndpointStatus::Reachable(procs) => {
                self.up.insert(endpoint.to_string(), true);
                for proc in procs {
                    self.record_process(endpoint, proc);
                }
            }
        }
    }

    fn record_process(&mut self, endpoint: &str, proc: &ProcessStatus) {
        let key = (endpoint.to_string(), group_key(&proc.name).to_string());
        let counts = self.counts.entry(key).or_default();
        if proc.state.contains(RUNNING_MARKER) {
            counts.running += 1.0;
        } else {
            counts.fatal += 1.0;
        }
    }
}

/// Derives the process-group key from an instance name.
///
/// Everything from the last underscore onward is the replica suffix and is
/// dropped; a name without an underscore is its own group.
pub fn group_key(process_name: &str) -> &str {
    match process_name.rfind('_') {
        Some(idx) => &process_name[..idx],
        None => process_name,
    }
}
