//! Run Report
//!
//! End-of-run JSON document: config echo, network summary, full history and
//! the final attribute distribution.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use opinion_events::{DistributionSnapshot, NetworkSummary, StepRecord};

use crate::config::SimConfig;
use crate::error::SimError;
use crate::output::stats::FailureCounters;
use crate::simulation::Simulation;

pub const REPORT_FILE: &str = "report.json";
pub const DISTRIBUTION_FILE: &str = "distribution.json";
pub const STEPS_FILE: &str = "steps.jsonl";

/// Everything needed to plot or audit a finished run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: String,
    pub steps: u64,
    pub config: SimConfig,
    pub network: NetworkSummary,
    pub history: Vec<StepRecord>,
    pub final_distribution: DistributionSnapshot,
    pub failures: FailureCounters,
}

impl RunReport {
    pub fn from_simulation(sim: &Simulation) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            steps: sim.current_step(),
            config: sim.config().clone(),
            network: sim.network().summary(),
            history: sim.history().to_vec(),
            final_distribution: sim.distribution_snapshot(),
            failures: sim.failures(),
        }
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes `report.json` and `distribution.json` into `dir`, creating it
    /// if needed. Returns the report path.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf, SimError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let report_path = dir.join(REPORT_FILE);
        fs::write(&report_path, self.to_json()?)?;

        let distribution = serde_json::to_string_pretty(&self.final_distribution)?;
        fs::write(dir.join(DISTRIBUTION_FILE), distribution)?;

        Ok(report_path)
    }

    pub fn read_from(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
