//! Append-only execution log.

use std::sync::Arc;

use callkit_domain::{ExecutionEntry, ExecutionStats};
use parking_lot::Mutex;

use crate::ports::execution_sink::{ExecutionSink, NoExecutionSink};

/// In-memory audit log of function executions.
///
/// Appends are mutex-guarded so concurrent executors never interleave a
/// partial record. Each appended entry is forwarded to the sink under the
/// same guard, so the sink sees entries in log order.
pub struct ExecutionLog {
    entries: Mutex<Vec<ExecutionEntry>>,
    sink: Arc<dyn ExecutionSink>,
}

impl ExecutionLog {
    pub fn new() -> Self {
        Self::with_sink(Arc::new(NoExecutionSink))
    }

    pub fn with_sink(sink: Arc<dyn ExecutionSink>) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            sink,
        }
    }

    pub fn append(&self, entry: ExecutionEntry) {
        let mut entries = self.entries.lock();
        self.sink.record(&entry);
        entries.push(entry);
    }

    /// Snapshot of all entries, oldest first
    pub fn entries(&self) -> Vec<ExecutionEntry> {
        self.entries.lock().clone()
    }

    /// The `n` most recent entries, oldest first
    pub fn recent(&self, n: usize) -> Vec<ExecutionEntry> {
        let entries = self.entries.lock();
        let start = entries.len().saturating_sub(n);
        entries[start..].to_vec()
    }

    pub fn last(&self) -> Option<ExecutionEntry> {
        self.entries.lock().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn stats(&self) -> ExecutionStats {
        ExecutionStats::from_entries(&self.entries.lock())
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Default for ExecutionLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use callkit_domain::{Arguments, ExecutionOutcome};

    struct CountingSink(Mutex<usize>);

    impl ExecutionSink for CountingSink {
        fn record(&self, _entry: &ExecutionEntry) {
            *self.0.lock() += 1;
        }
    }

    #[derive(Default)]
    struct OrderSink(Mutex<Vec<String>>);

    impl ExecutionSink for OrderSink {
        fn record(&self, entry: &ExecutionEntry) {
            self.0.lock().push(entry.function_name.clone());
        }
    }

    fn entry(name: &str) -> ExecutionEntry {
        ExecutionEntry::new(
            name,
            None,
            Arguments::new(),
            ExecutionOutcome::Succeeded {
                result: "ok".into(),
            },
            1,
        )
    }

    #[test]
    fn test_append_and_read() {
        let log = ExecutionLog::new();
        log.append(entry("a"));
        log.append(entry("b"));
        log.append(entry("c"));

        assert_eq!(log.len(), 3);
        let recent: Vec<_> = log.recent(2).into_iter().map(|e| e.function_name).collect();
        assert_eq!(recent, vec!["b", "c"]);
        assert_eq!(log.last().unwrap().function_name, "c");
        assert_eq!(log.stats().succeeded, 3);
    }

    #[test]
    fn test_recent_more_than_len() {
        let log = ExecutionLog::new();
        log.append(entry("only"));
        assert_eq!(log.recent(10).len(), 1);
    }

    #[test]
    fn test_sink_receives_every_entry() {
        let sink = Arc::new(CountingSink(Mutex::new(0)));
        let log = ExecutionLog::with_sink(sink.clone());
        log.append(entry("a"));
        log.append(entry("b"));
        assert_eq!(*sink.0.lock(), 2);
    }

    #[test]
    fn test_sink_order_matches_log_order() {
        let sink = Arc::new(OrderSink::default());
        let log = ExecutionLog::with_sink(sink.clone());

        std::thread::scope(|scope| {
            for t in 0..8 {
                let log = &log;
                scope.spawn(move || {
                    for i in 0..50 {
                        log.append(entry(&format!("f{t}_{i}")));
                    }
                });
            }
        });

        let logged: Vec<_> = log.entries().into_iter().map(|e| e.function_name).collect();
        assert_eq!(logged.len(), 400);
        assert_eq!(*sink.0.lock(), logged);
    }

    #[test]
    fn test_clear() {
        let log = ExecutionLog::new();
        log.append(entry("a"));
        log.clear();
        assert!(log.is_empty());
    }
}
