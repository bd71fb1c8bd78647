//! JSONL file writer for completed consensus runs.
//!
//! Each [`ConsensusRun`] is serialized as a single JSON line with a
//! `type` field and `timestamp`, appended to the file via a buffered writer.

use consensus_application::ports::run_recorder::RunRecorder;
use consensus_application::use_cases::run_consensus::ConsensusRun;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Record type written to the `type` field
const RECORD_TYPE: &str = "run";

/// JSONL run recorder that appends one JSON object per run.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on `Drop`.
pub struct JsonlRunRecorder {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlRunRecorder {
    /// Open (or create) the recording file at the given path.
    ///
    /// Existing content is kept; new runs are appended. Parent directories
    /// are created as needed. Returns `None` if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create run record directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open run record file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the record file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn to_record(run: &ConsensusRun) -> Option<serde_json::Value> {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let serde_json::Value::Object(mut map) = serde_json::to_value(run).ok()? else {
            return None;
        };
        map.insert(
            "type".to_string(),
            serde_json::Value::String(RECORD_TYPE.to_string()),
        );
        map.insert(
            "timestamp".to_string(),
            serde_json::Value::String(timestamp),
        );
        Some(serde_json::Value::Object(map))
    }
}

impl RunRecorder for JsonlRunRecorder {
    fn record(&self, run: &ConsensusRun) {
        let Some(record) = Self::to_record(run) else {
            warn!("Could not serialize consensus run for recording");
            return;
        };
        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
                warn!("Could not write run record to {}: {}", self.path.display(), e);
                return;
            }
            debug!(path = %self.path.display(), "Recorded consensus run");
        }
    }
}

impl Drop for JsonlRunRecorder {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use consensus_application::response_records;
    use consensus_domain::{
        BatchOutcome, CompletionResult, ModelCatalog, ModelId, SummaryStatistics, analyze,
        generate_insights,
    };
    use std::fs;

    fn sample_run(answer: &str) -> ConsensusRun {
        let models = vec![
            ModelId::new("openai/gpt-4o").unwrap(),
            ModelId::new("x-ai/grok-2").unwrap(),
        ];
        let outcomes = vec![
            BatchOutcome::success(models[0].clone(), CompletionResult::new(answer, 120)),
            BatchOutcome::failure(models[1].clone(), "Request timed out after 30000ms"),
        ];
        let analysis = analyze(&response_records(&outcomes, &ModelCatalog::builtin()));
        ConsensusRun {
            prompt: "Capital of France?".to_string(),
            models,
            outcomes,
            insights: generate_insights(&analysis),
            summary: SummaryStatistics::from_analysis(&analysis),
            analysis,
            started_at: Utc::now(),
            completed_at: Utc::now(),
        }
    }

    #[test]
    fn test_recorder_writes_valid_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs").join("consensus.jsonl");
        let recorder = JsonlRunRecorder::new(&path).unwrap();

        recorder.record(&sample_run("Paris"));
        recorder.record(&sample_run("Lyon"));

        // Flush
        drop(recorder);

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.trim().lines().collect();
        assert_eq!(lines.len(), 2);

        for line in &lines {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert_eq!(value["type"], "run");
            assert!(value.get("timestamp").is_some());
        }

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["prompt"], "Capital of France?");
        assert_eq!(first["outcomes"][0]["result"]["text"], "Paris");
        assert_eq!(first["outcomes"][1]["error"], "Request timed out after 30000ms");
        assert_eq!(first["summary"]["topResponseName"], "paris");

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["summary"]["topResponseName"], "lyon");
    }

    #[test]
    fn test_recorder_appends_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs.jsonl");

        JsonlRunRecorder::new(&path).unwrap().record(&sample_run("Paris"));
        JsonlRunRecorder::new(&path).unwrap().record(&sample_run("Paris"));

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_recorded_run_deserializes_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs.jsonl");
        let run = sample_run("Paris");

        let recorder = JsonlRunRecorder::new(&path).unwrap();
        recorder.record(&run);
        drop(recorder);

        let content = fs::read_to_string(&path).unwrap();
        let restored: ConsensusRun = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(restored.outcomes, run.outcomes);
        assert_eq!(restored.analysis, run.analysis);
    }

    #[test]
    fn test_recorder_returns_none_for_directory_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(JsonlRunRecorder::new(dir.path()).is_none());
    }
}
