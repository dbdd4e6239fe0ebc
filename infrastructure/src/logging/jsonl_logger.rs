//! JSONL file writer for execution entries.
//!
//! Each [`ExecutionEntry`] is serialized as a single JSON line with a
//! `type` field and a `logged_at` timestamp, appended via a buffered writer.

use callkit_application::ExecutionSink;
use callkit_domain::ExecutionEntry;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

const RECORD_TYPE: &str = "function_execution";

/// JSONL execution logger that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Appends to an existing file.
/// Flushes on `Drop`.
pub struct JsonlExecutionLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlExecutionLogger {
    /// Open (or create) the log at `path`, creating parent directories.
    ///
    /// Returns `None` if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create execution log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open execution log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ExecutionSink for JsonlExecutionLogger {
    fn record(&self, entry: &ExecutionEntry) {
        let Ok(serde_json::Value::Object(mut map)) = serde_json::to_value(entry) else {
            return;
        };
        map.insert(
            "type".to_string(),
            serde_json::Value::String(RECORD_TYPE.to_string()),
        );
        map.insert(
            "logged_at".to_string(),
            serde_json::Value::String(
                chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            ),
        );

        let Ok(line) = serde_json::to_string(&map) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlExecutionLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use callkit_domain::{Arguments, ExecutionOutcome};

    fn entry(name: &str, outcome: ExecutionOutcome) -> ExecutionEntry {
        ExecutionEntry::new(
            name,
            Some("call_1".to_string()),
            Arguments::new().with("location", "SF"),
            outcome,
            12,
        )
    }

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_valid_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("executions.jsonl");
        let logger = JsonlExecutionLogger::new(&path).unwrap();

        logger.record(&entry(
            "get_weather",
            ExecutionOutcome::Succeeded {
                result: "{}".to_string(),
            },
        ));
        logger.record(&entry(
            "calculate",
            ExecutionOutcome::Failed {
                code: "EXECUTION_FAILED".to_string(),
                message: "Division by zero".to_string(),
            },
        ));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        for line in &lines {
            assert_eq!(line["type"], RECORD_TYPE);
            assert!(line.get("logged_at").is_some());
            assert_eq!(line["tool_call_id"], "call_1");
        }

        assert_eq!(lines[0]["function_name"], "get_weather");
        assert_eq!(lines[0]["outcome"]["status"], "succeeded");
        assert_eq!(lines[0]["arguments"]["location"], "SF");
        assert_eq!(lines[1]["outcome"]["status"], "failed");
        assert_eq!(lines[1]["outcome"]["message"], "Division by zero");
    }

    #[test]
    fn test_appends_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("executions.jsonl");

        for _ in 0..2 {
            let logger = JsonlExecutionLogger::new(&path).unwrap();
            logger.record(&entry("f", ExecutionOutcome::Cancelled));
        }

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["outcome"]["status"], "cancelled");
    }

    #[test]
    fn test_returns_none_for_directory_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(JsonlExecutionLogger::new(dir.path()).is_none());
    }
}
