//! Plugin Executor
//!
//! Walks the resolved order, invoking each active plugin's hook with the
//! shared discovery context. Per-plugin failures are captured into the
//! report instead of propagating; one plugin's failure does not, by default,
//! prevent subsequent plugins from running.

use std::time::Instant;

use crate::context::DiscoveryContext;
use crate::registry::PluginRegistry;
use crate::report::{ExecutionItem, ExecutionReport};

/// Sequential scheduler for one pipeline run
///
/// Structural errors (duplicate ids, cycles, missing dependencies) surface
/// from registration and `resolve_order` before `run` is ever invoked; `run`
/// itself never fails.
#[derive(Debug, Clone, Default)]
pub struct PluginExecutor {
    fail_fast: bool,
}

impl PluginExecutor {
    /// Executor with the default continue-on-failure policy
    pub fn new() -> Self {
        Self { fail_fast: false }
    }

    /// Stop scheduling further plugins after the first failure
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Run the ordered active plugins against the context
    ///
    /// Hooks run strictly one at a time in the given order; a hook may
    /// mutate shared workspace state, so correctness depends on that
    /// serialization. Cancellation via the context's token stops scheduling
    /// of further plugins; it never preempts a running hook, and no timeout
    /// is imposed.
    pub async fn run(&self, registry: &PluginRegistry, order: &[String], ctx: &DiscoveryContext) -> ExecutionReport {
        let mut report = ExecutionReport::new();

        for plugin_id in order {
            if ctx.is_canceled() {
                log::warn!("run canceled before plugin '{}'", plugin_id);
                break;
            }
            let Some(record) = registry.get(plugin_id) else {
                log::warn!("plugin '{}' disappeared from registry; skipped", plugin_id);
                continue;
            };
            if !record.is_active() {
                log::debug!("plugin '{}' deactivated since ordering; skipped", plugin_id);
                continue;
            }

            let name = record.descriptor().name.clone();
            let start = Instant::now();
            let result = record.plugin().execute(ctx).await;
            let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

            match result {
                Ok(()) => {
                    log::info!("plugin '{}' ok ({:.1} ms)", plugin_id, duration_ms);
                    report.add(ExecutionItem::ok(plugin_id.clone(), name, duration_ms));
                }
                Err(err) => {
                    let message = err.to_string();
                    log::error!("plugin '{}' failed ({:.1} ms): {}", plugin_id, duration_ms, message);
                    report.add(ExecutionItem::failed(plugin_id.clone(), name, duration_ms, message));
                    if self.fail_fast {
                        log::warn!("fail-fast: stopping after '{}'", plugin_id);
                        break;
                    }
                }
            }
        }

        log::info!("{}", report.summary());
        for item in report.failed() {
            log::error!("failed plugin '{}': {}", item.plugin_id, item.error);
        }
        report
    }
}
