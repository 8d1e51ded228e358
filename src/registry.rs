//! Plugin Registry
//!
//! Owns plugin records, enforces id uniqueness and computes the
//! deterministic execution order: a Kahn topological sort over `requires`
//! edges, with ties broken by (priority, tag score, insertion index, id).

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::descriptor::PluginDescriptor;
use crate::error::{PluginError, PluginResult};
use crate::tags::TagScoreTable;
use crate::traits::Plugin;

/// Priority assigned when the caller does not specify one; smaller runs earlier
pub const DEFAULT_PRIORITY: i32 = 100;

/// A registered plugin with its scheduling state
pub struct PluginRecord {
    plugin: Box<dyn Plugin>,
    requires: Vec<String>,
    priority: i32,
    active: bool,
    insert_idx: usize,
    order: Option<usize>,
}

impl PluginRecord {
    /// The plugin instance
    pub fn plugin(&self) -> &dyn Plugin {
        self.plugin.as_ref()
    }

    /// The plugin's descriptor
    pub fn descriptor(&self) -> &PluginDescriptor {
        self.plugin.descriptor()
    }

    /// Ids this plugin must run after
    pub fn requires(&self) -> &[String] {
        &self.requires
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Position in the resolved order; unset until `resolve_order` runs
    pub fn order(&self) -> Option<usize> {
        self.order
    }
}

/// Registry for plugin records and execution ordering
pub struct PluginRegistry {
    records: HashMap<String, PluginRecord>,
    insert_counter: usize,
    tags: TagScoreTable,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            insert_counter: 0,
            tags: TagScoreTable::new(),
        }
    }

    /// Register a plugin with explicit dependencies and priority
    ///
    /// Fails with [`PluginError::DuplicateId`] when the id already exists;
    /// the registry is left unchanged in that case. Requires entries are
    /// trimmed and empties dropped.
    pub fn register<I, S>(&mut self, plugin: Box<dyn Plugin>, requires: I, priority: i32) -> PluginResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let id = plugin.descriptor().id().to_string();
        if self.records.contains_key(&id) {
            return Err(PluginError::duplicate_id(id));
        }
        let requires: Vec<String> = requires
            .into_iter()
            .map(|r| r.as_ref().trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();

        let record = PluginRecord {
            plugin,
            requires,
            priority,
            active: true,
            insert_idx: self.insert_counter,
            order: None,
        };
        self.insert_counter += 1;
        log::debug!("registered plugin: {}", record.descriptor());
        self.records.insert(id, record);
        Ok(())
    }

    /// Register a plugin with no dependencies and the default priority
    pub fn register_default(&mut self, plugin: Box<dyn Plugin>) -> PluginResult<()> {
        self.register(plugin, std::iter::empty::<&str>(), DEFAULT_PRIORITY)
    }

    /// Remove a record entirely; returns whether it existed
    pub fn remove(&mut self, plugin_id: &str) -> bool {
        let removed = self.records.remove(plugin_id).is_some();
        if removed {
            self.invalidate_order();
        }
        removed
    }

    /// Mark a record active; inactive records stay registered but are
    /// excluded from ordering and execution
    pub fn activate(&mut self, plugin_id: &str) -> PluginResult<()> {
        self.set_active(plugin_id, true)
    }

    /// Mark a record inactive
    pub fn deactivate(&mut self, plugin_id: &str) -> PluginResult<()> {
        self.set_active(plugin_id, false)
    }

    fn set_active(&mut self, plugin_id: &str, active: bool) -> PluginResult<()> {
        let record = self
            .records
            .get_mut(plugin_id)
            .ok_or_else(|| PluginError::not_found(plugin_id))?;
        record.active = active;
        self.invalidate_order();
        Ok(())
    }

    /// Change a record's priority
    pub fn set_priority(&mut self, plugin_id: &str, priority: i32) -> PluginResult<()> {
        let record = self
            .records
            .get_mut(plugin_id)
            .ok_or_else(|| PluginError::not_found(plugin_id))?;
        record.priority = priority;
        self.invalidate_order();
        Ok(())
    }

    /// Look up a record by id
    pub fn get(&self, plugin_id: &str) -> Option<&PluginRecord> {
        self.records.get(plugin_id)
    }

    pub fn contains(&self, plugin_id: &str) -> bool {
        self.records.contains_key(plugin_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records as (id, descriptor, active, priority), sorted by
    /// (priority, id)
    pub fn list(&self) -> Vec<(String, PluginDescriptor, bool, i32)> {
        let mut out: Vec<_> = self
            .records
            .iter()
            .map(|(id, rec)| (id.clone(), rec.descriptor().clone(), rec.active, rec.priority))
            .collect();
        out.sort_by(|a, b| (a.3, &a.0).cmp(&(b.3, &b.0)));
        out
    }

    /// Computed orders go stale whenever scheduling inputs change
    fn invalidate_order(&mut self) {
        for record in self.records.values_mut() {
            record.order = None;
        }
    }

    /// Compute the deterministic total order over active records
    ///
    /// A record is scheduled after every id it requires. Ties among records
    /// with no forced ordering break by ascending (priority, tag score,
    /// insertion index, id). A require naming an id never registered fails
    /// with [`PluginError::MissingDependency`]; a require naming an inactive
    /// id is dropped with a warning. Any cycle fails the whole call with
    /// [`PluginError::Cycle`] naming the involved ids, and no partial order
    /// is returned.
    pub fn resolve_order(&mut self) -> PluginResult<Vec<String>> {
        let active: Vec<String> = self
            .records
            .iter()
            .filter(|(_, rec)| rec.active)
            .map(|(id, _)| id.clone())
            .collect();

        let mut indegree: HashMap<&str, usize> = active.iter().map(|id| (id.as_str(), 0)).collect();
        let mut children: HashMap<&str, Vec<&str>> = active.iter().map(|id| (id.as_str(), Vec::new())).collect();

        for id in &active {
            for dep in self.records[id].requires.iter() {
                match self.records.get(dep) {
                    None => {
                        return Err(PluginError::missing_dependency(id.clone(), dep.clone()));
                    }
                    Some(rec) if !rec.active => {
                        log::warn!("plugin '{}' requires inactive plugin '{}'; edge dropped", id, dep);
                    }
                    Some(_) => {
                        *indegree.get_mut(id.as_str()).unwrap() += 1;
                        children.get_mut(dep.as_str()).unwrap().push(id.as_str());
                    }
                }
            }
        }

        // Kahn with a priority heap for a stable, deterministic tie-break
        let mut ready: BinaryHeap<Reverse<(i32, i32, usize, &str)>> = BinaryHeap::new();
        for (id, degree) in &indegree {
            if *degree == 0 {
                ready.push(Reverse(self.sort_key(id)));
            }
        }

        let mut order: Vec<String> = Vec::with_capacity(active.len());
        while let Some(Reverse((_, _, _, id))) = ready.pop() {
            order.push(id.to_string());
            for child in &children[id] {
                let degree = indegree.get_mut(child).unwrap();
                *degree -= 1;
                if *degree == 0 {
                    ready.push(Reverse(self.sort_key(child)));
                }
            }
        }

        if order.len() != active.len() {
            let mut ids = cycle_members(&indegree, &children);
            ids.sort();
            log::error!("dependency cycle detected: {}", ids.join(", "));
            return Err(PluginError::cycle(ids));
        }

        for (position, id) in order.iter().enumerate() {
            if let Some(record) = self.records.get_mut(id) {
                record.order = Some(position);
            }
        }
        Ok(order)
    }

    fn sort_key<'a>(&self, id: &'a str) -> (i32, i32, usize, &'a str) {
        let record = &self.records[id];
        (
            record.priority,
            self.tags.score(record.descriptor()),
            record.insert_idx,
            id,
        )
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Isolate the nodes that actually sit on a cycle
///
/// Kahn leaves every node with unresolved in-degree, including nodes merely
/// downstream of a cycle. Trimming nodes with no outgoing edge inside the
/// leftover set until a fixed point leaves only cycle members.
fn cycle_members(indegree: &HashMap<&str, usize>, children: &HashMap<&str, Vec<&str>>) -> Vec<String> {
    let mut leftover: Vec<&str> = indegree
        .iter()
        .filter(|(_, degree)| **degree > 0)
        .map(|(id, _)| *id)
        .collect();

    loop {
        let snapshot: std::collections::HashSet<&str> = leftover.iter().copied().collect();
        let before = leftover.len();
        leftover.retain(|id| children[id].iter().any(|child| snapshot.contains(child)));
        if leftover.len() == before {
            break;
        }
    }
    leftover.into_iter().map(str::to_string).collect()
}
