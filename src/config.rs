//! Run Configuration Tree
//!
//! The host hands the core an opaque configuration tree; parsing and
//! persistence of settings files stay on the host's side. This module wraps
//! the tree with the typed accessors the scheduler and discovery context
//! need: execution options, global exclude patterns and per-plugin exclude
//! patterns.

use serde_json::Value;

/// Opaque configuration tree with typed option accessors
#[derive(Debug, Clone, Default)]
pub struct ConfigTree {
    root: Value,
}

impl ConfigTree {
    /// Wrap a configuration tree
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    /// Raw value at a dotted key path, if present
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut node = &self.root;
        for part in path.split('.') {
            node = node.get(part)?;
        }
        Some(node)
    }

    /// Boolean under the `options` section, with default
    pub fn option_bool(&self, key: &str, default: bool) -> bool {
        self.get("options")
            .and_then(|o| o.get(key))
            .and_then(Value::as_bool)
            .unwrap_or(default)
    }

    /// Whether `iter_files` results are cached per pattern pair (default on)
    pub fn iter_files_cache(&self) -> bool {
        self.option_bool("iter_files_cache", true)
    }

    /// Whether the run is non-interactive; confirmation facilities must
    /// return their supplied default without blocking
    pub fn noninteractive(&self) -> bool {
        self.option_bool("noninteractive", false)
    }

    /// Global exclude patterns applied to every discovery call
    pub fn global_excludes(&self) -> Vec<String> {
        Self::string_list(self.get("exclude_patterns"))
    }

    /// Exclude patterns configured for one plugin id
    pub fn plugin_excludes(&self, plugin_id: &str) -> Vec<String> {
        let path = format!("plugins.{}.exclude_patterns", plugin_id);
        Self::string_list(self.get(&path))
    }

    fn string_list(value: Option<&Value>) -> Vec<String> {
        value
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}
