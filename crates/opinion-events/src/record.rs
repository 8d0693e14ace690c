//! Step Records
//!
//! The per-step opinion tally emitted after the spread phase of every step.

use serde::{Deserialize, Serialize};

use crate::Opinion;

/// Opinion tally for one completed spread phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: u64,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl StepRecord {
    /// Builds a record by tallying an iterator of opinions.
    pub fn tally(step: u64, opinions: impl IntoIterator<Item = Opinion>) -> Self {
        let mut record = Self {
            step,
            ..Self::default()
        };
        for opinion in opinions {
            match opinion {
                Opinion::Positive => record.positive += 1,
                Opinion::Negative => record.negative += 1,
                Opinion::Neutral => record.neutral += 1,
            }
        }
        record
    }

    /// Count for a single polarity.
    pub fn count(&self, opinion: Opinion) -> usize {
        match opinion {
            Opinion::Positive => self.positive,
            Opinion::Negative => self.negative,
            Opinion::Neutral => self.neutral,
        }
    }

    /// Number of agents covered by the tally.
    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }

    /// Serializes the record to a JSON line (for JSONL format).
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes a record from a JSON line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}
