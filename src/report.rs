//! Execution Report
//!
//! Per-run record of what ran, what failed and how long everything took.
//! Created by the executor for one pipeline run and discarded once the host
//! consumes it; no run history is persisted.

use serde::{Deserialize, Serialize};

/// Outcome of one plugin's hook invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionItem {
    /// Plugin id
    pub plugin_id: String,

    /// Display name
    pub name: String,

    /// Whether the hook returned successfully
    pub success: bool,

    /// Wall-clock duration of the hook, failed or not
    pub duration_ms: f64,

    /// Captured error message; empty iff success
    pub error: String,
}

impl ExecutionItem {
    /// Successful item
    pub fn ok<S: Into<String>>(plugin_id: S, name: S, duration_ms: f64) -> Self {
        Self {
            plugin_id: plugin_id.into(),
            name: name.into(),
            success: true,
            duration_ms,
            error: String::new(),
        }
    }

    /// Failed item with a captured message
    pub fn failed<S: Into<String>>(plugin_id: S, name: S, duration_ms: f64, error: S) -> Self {
        Self {
            plugin_id: plugin_id.into(),
            name: name.into(),
            success: false,
            duration_ms,
            error: error.into(),
        }
    }
}

/// Append-only ordered record of a pipeline run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionReport {
    items: Vec<ExecutionItem>,
}

impl ExecutionReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item
    pub fn add(&mut self, item: ExecutionItem) {
        self.items.push(item);
    }

    /// All items, in execution order
    pub fn items(&self) -> &[ExecutionItem] {
        &self.items
    }

    /// The items that failed
    pub fn failed(&self) -> Vec<&ExecutionItem> {
        self.items.iter().filter(|i| !i.success).collect()
    }

    /// True iff every item succeeded
    pub fn ok(&self) -> bool {
        self.items.iter().all(|i| i.success)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// One human-readable line: ok/total counts, failure count, total time
    pub fn summary(&self) -> String {
        let total = self.items.len();
        let ok = self.items.iter().filter(|i| i.success).count();
        let failed = total - ok;
        let duration: f64 = self.items.iter().map(|i| i.duration_ms).sum();
        format!(
            "Plugins: {}/{} ok, {} failed, total time {:.1} ms",
            ok, total, failed, duration
        )
    }
}

impl<'a> IntoIterator for &'a ExecutionReport {
    type Item = &'a ExecutionItem;
    type IntoIter = std::slice::Iter<'a, ExecutionItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
