//! buildhook — plugin orchestration for build-tool front ends
//!
//! Runs independently authored extension plugins before and after a
//! compilation step: deterministic dependency-ordered scheduling with
//! per-plugin fault isolation, plus a shared per-run discovery context that
//! lets every plugin query workspace files without redundant filesystem
//! traversal.
//!
//! # Example
//!
//! ```no_run
//! use buildhook::{ConfigTree, DiscoveryContext, PluginExecutor, PluginRegistry};
//!
//! # async fn pipeline(plugin: Box<dyn buildhook::Plugin>) -> buildhook::PluginResult<()> {
//! let mut registry = PluginRegistry::new();
//! registry.register_default(plugin)?;
//!
//! let ctx = DiscoveryContext::new("/path/to/workspace", ConfigTree::default())?;
//! let order = registry.resolve_order()?;
//! let report = PluginExecutor::new().run(&registry, &order, &ctx).await;
//! log::info!("{}", report.summary());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod executor;
pub mod registry;
pub mod report;
pub mod tags;
pub mod traits;
pub mod ui;

#[cfg(test)]
mod tests;

pub use config::ConfigTree;
pub use context::{DiscoveryContext, FileIter};
pub use descriptor::PluginDescriptor;
pub use error::{PluginError, PluginResult};
pub use executor::PluginExecutor;
pub use registry::{PluginRecord, PluginRegistry, DEFAULT_PRIORITY};
pub use report::{ExecutionItem, ExecutionReport};
pub use tags::{TagScoreTable, DEFAULT_TAG_SCORE};
pub use traits::Plugin;
pub use ui::{Confirm, NonInteractiveConfirm, Progress, ProgressHandle, SilentProgress};
