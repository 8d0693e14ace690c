//! Metrics Collection
//!
//! Per-step opinion tallies and on-demand attribute distributions.

use opinion_events::{DistributionSnapshot, Opinion, StepRecord};
use serde::{Deserialize, Serialize};

use crate::components::agent::Agent;
use crate::components::network::Network;

/// Counts of policy failures observed during a run.
///
/// A failed compose drops that delivery; a failed decide leaves the agent's
/// opinion unchanged for the step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureCounters {
    pub compose: u64,
    pub decide: u64,
}

impl FailureCounters {
    pub fn total(&self) -> u64 {
        self.compose + self.decide
    }
}

/// Ordered history of step records.
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    history: Vec<StepRecord>,
    failures: FailureCounters,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tallies the population and appends the record.
    pub fn record_step(&mut self, step: u64, agents: &[Agent]) -> StepRecord {
        let record = StepRecord::tally(step, agents.iter().map(|a| a.opinion));
        self.history.push(record);
        record
    }

    pub fn record_compose_failure(&mut self) {
        self.failures.compose += 1;
    }

    pub fn record_decide_failure(&mut self) {
        self.failures.decide += 1;
    }

    pub fn history(&self) -> &[StepRecord] {
        &self.history
    }

    pub fn failures(&self) -> FailureCounters {
        self.failures
    }

    /// Highest count of `opinion` and the first step it was reached.
    pub fn peak(&self, opinion: Opinion) -> Option<(u64, usize)> {
        self.history
            .iter()
            .fold(None, |best: Option<(u64, usize)>, r| match best {
                Some((_, count)) if count >= r.count(opinion) => best,
                _ => Some((r.step, r.count(opinion))),
            })
    }

    /// Per-agent attributes and their histograms as they stand now.
    pub fn distribution(step: u64, agents: &[Agent], network: &Network) -> DistributionSnapshot {
        let snapshots = agents
            .iter()
            .map(|a| a.snapshot(network.community_of(a.id)))
            .collect();
        DistributionSnapshot::new(step, snapshots)
    }
}
