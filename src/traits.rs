//! Core Plugin Trait
//!
//! The single polymorphic interface every plugin implements. Plugins are
//! handed to the registry by explicit registration call; there is no implicit
//! runtime module scanning.

use async_trait::async_trait;

use crate::context::DiscoveryContext;
use crate::descriptor::PluginDescriptor;
use crate::error::PluginResult;

/// A pre/post-compile action plugin
///
/// The executor invokes [`execute`](Plugin::execute) exactly once per
/// pipeline run, strictly in resolved order, with the run's shared
/// [`DiscoveryContext`]. An `Err` marks this plugin's execution item failed
/// and, by default, does not prevent subsequent plugins from running.
///
/// Hooks run one at a time: a plugin may mutate shared workspace state, and
/// must not assume isolation from earlier plugins' filesystem side effects.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Plugin identity and metadata
    fn descriptor(&self) -> &PluginDescriptor;

    /// The hook receiving control from the scheduler
    async fn execute(&self, ctx: &DiscoveryContext) -> PluginResult<()>;
}
