//! Historical run log for illustration runs
//!
//! Accumulates one record per run with per-object outcomes plus running
//! totals of estimated spend and successful generations. Loaded at start,
//! appended to, written once at end of run.

use easel_core::{EaselError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Outcome of one object within a run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunObject {
    pub id: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One historical run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRecord {
    pub timestamp: String,
    pub objects: Vec<RunObject>,
    pub success_count: usize,
    pub fail_count: usize,
    pub estimated_cost: f64,
}

/// The accumulating log document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunLog {
    #[serde(default)]
    pub runs: Vec<RunRecord>,
    #[serde(default)]
    pub total_spent: f64,
    #[serde(default)]
    pub total_generated: u64,
}

impl RunLog {
    /// Load the log, or start a fresh one when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            EaselError::PersistenceError(format!(
                "failed to parse run log {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Append a run and update the running totals
    pub fn push(&mut self, record: RunRecord) {
        self.total_spent += record.estimated_cost;
        self.total_generated += record.success_count as u64;
        self.runs.push(record);
    }

    /// Write the full document, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| {
            EaselError::PersistenceError(format!(
                "cannot write run log {}: {}",
                path.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use easel_core::now_iso8601;

    fn temp_dir() -> std::path::PathBuf {
        let dir =
            std::env::temp_dir().join(format!("easel_runlog_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn record(successes: usize, failures: usize, cost: f64) -> RunRecord {
        let mut objects = Vec::new();
        for i in 0..successes {
            objects.push(RunObject {
                id: format!("ok-{}", i),
                success: true,
                file: Some(format!("out/ok-{}.png", i)),
                error: None,
            });
        }
        for i in 0..failures {
            objects.push(RunObject {
                id: format!("bad-{}", i),
                success: false,
                file: None,
                error: Some("HTTP 500: server error".to_string()),
            });
        }
        RunRecord {
            timestamp: now_iso8601(),
            objects,
            success_count: successes,
            fail_count: failures,
            estimated_cost: cost,
        }
    }

    #[test]
    fn test_totals_accumulate_across_runs() {
        let mut log = RunLog::default();
        log.push(record(2, 1, 0.14));
        log.push(record(3, 0, 0.21));

        assert_eq!(log.runs.len(), 2);
        assert_eq!(log.total_generated, 5);
        assert!((log.total_spent - 0.35).abs() < 1e-9);
    }

    #[test]
    fn test_roundtrip() {
        let dir = temp_dir();
        let path = dir.join("runlog.json");

        let mut log = RunLog::default();
        log.push(record(1, 1, 0.07));
        log.save(&path).unwrap();

        let loaded = RunLog::load_or_default(&path).unwrap();
        assert_eq!(loaded.runs.len(), 1);
        assert_eq!(loaded.runs[0].fail_count, 1);
        assert_eq!(loaded.total_generated, 1);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_file_is_empty_log() {
        let dir = temp_dir();
        let log = RunLog::load_or_default(&dir.join("nope.json")).unwrap();
        assert!(log.runs.is_empty());
        std::fs::remove_dir_all(&dir).ok();
    }
}
