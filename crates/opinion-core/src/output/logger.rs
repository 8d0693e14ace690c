//! Step Logger
//!
//! Append-only JSONL stream of step records.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use opinion_events::StepRecord;

/// Writes one JSON line per step.
pub struct StepLogger {
    writer: BufWriter<File>,
    record_count: u64,
}

impl StepLogger {
    /// Create a new logger writing to the specified path
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            writer: BufWriter::new(file),
            record_count: 0,
        })
    }

    pub fn record_count(&self) -> u64 {
        self.record_count
    }

    pub fn log(&mut self, record: &StepRecord) -> std::io::Result<()> {
        let json = record.to_jsonl()?;
        writeln!(self.writer, "{}", json)?;
        self.record_count += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

impl Drop for StepLogger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!("Failed to flush step logger: {}", e);
        }
    }
}
