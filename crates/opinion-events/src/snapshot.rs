//! Snapshot Types
//!
//! Serialization structs for population and network snapshots.
//!
//! Snapshots capture per-agent attributes at a point in time, used by an
//! external reporting layer to draw distributions and network summaries.

use serde::{Deserialize, Serialize};

use crate::Opinion;

/// Default number of histogram bins over [0, 1].
pub const DEFAULT_HISTOGRAM_BINS: usize = 10;

/// State of one agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub agent_id: usize,
    pub community: usize,
    pub knowledge: f64,
    pub reputation: f64,
    pub involvement_threshold: f64,
    pub involvement: f64,
    pub opinion: Opinion,
    pub has_heard: bool,
    pub time_since_heard: u32,
}

/// Fixed-width histogram over a closed range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub min: f64,
    pub max: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bins `values` into `bins` equal-width buckets over `[min, max]`.
    ///
    /// The top edge is inclusive so that `max` itself lands in the last bin.
    /// Values outside the range and non-finite values are ignored.
    pub fn from_values(
        values: impl IntoIterator<Item = f64>,
        bins: usize,
        min: f64,
        max: f64,
    ) -> Self {
        let bins = bins.max(1);
        let mut counts = vec![0usize; bins];
        let width = (max - min) / bins as f64;

        for value in values {
            if !value.is_finite() || value < min || value > max || width <= 0.0 {
                continue;
            }
            let index = (((value - min) / width) as usize).min(bins - 1);
            counts[index] += 1;
        }

        Self { min, max, counts }
    }

    /// Histogram over the unit interval with the default bin count.
    pub fn unit(values: impl IntoIterator<Item = f64>) -> Self {
        Self::from_values(values, DEFAULT_HISTOGRAM_BINS, 0.0, 1.0)
    }

    /// Total number of binned values.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Per-agent attribute distributions at a given step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSnapshot {
    pub step: u64,
    pub agents: Vec<AgentSnapshot>,
    pub knowledge: Histogram,
    pub reputation: Histogram,
    pub involvement_threshold: Histogram,
}

impl DistributionSnapshot {
    /// Builds the snapshot and its unit-interval histograms.
    pub fn new(step: u64, agents: Vec<AgentSnapshot>) -> Self {
        let knowledge = Histogram::unit(agents.iter().map(|a| a.knowledge));
        let reputation = Histogram::unit(agents.iter().map(|a| a.reputation));
        let involvement_threshold = Histogram::unit(agents.iter().map(|a| a.involvement_threshold));

        Self {
            step,
            agents,
            knowledge,
            reputation,
            involvement_threshold,
        }
    }
}

/// Structural summary of a generated contact network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSummary {
    pub nodes: usize,
    pub edges: usize,
    pub communities: usize,
    pub block_size: usize,
    pub mean_degree: f64,
    pub isolated_nodes: usize,
    pub intra_edges: usize,
    pub inter_edges: usize,
    /// Fraction of same-block pairs that are connected.
    pub intra_density: f64,
    /// Fraction of cross-block pairs that are connected.
    pub inter_density: f64,
}

impl NetworkSummary {
    /// Observed inter/intra density ratio, `None` when either density is undefined or zero.
    pub fn density_ratio(&self) -> Option<f64> {
        if self.intra_density > 0.0 && self.communities > 1 {
            Some(self.inter_density / self.intra_density)
        } else {
            None
        }
    }
}
