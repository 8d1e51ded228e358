//! Plugin Error Types
//!
//! Error taxonomy for registration, ordering, discovery and plugin execution.

use thiserror::Error;

/// Result type for plugin operations
pub type PluginResult<T> = Result<T, PluginError>;

/// Error types for plugin operations
#[derive(Error, Debug, Clone)]
pub enum PluginError {
    /// Plugin metadata rejected at construction
    #[error("Invalid plugin metadata: {message}")]
    InvalidMetadata { message: String },

    /// Plugin id already registered
    #[error("Plugin already registered: {plugin_id}")]
    DuplicateId { plugin_id: String },

    /// Plugin id unknown to the registry
    #[error("Plugin not found: {plugin_id}")]
    NotFound { plugin_id: String },

    /// A requires entry names an id that was never registered
    #[error("Plugin '{plugin_id}' requires unknown plugin '{dependency}'")]
    MissingDependency { plugin_id: String, dependency: String },

    /// Dependency cycle among active plugins
    #[error("Dependency cycle detected among plugins: {}", ids.join(", "))]
    Cycle { ids: Vec<String> },

    /// Plugin hook failed at runtime
    #[error("Plugin execution error: {message}")]
    ExecutionFailed { message: String },

    /// Workspace discovery error
    #[error("Discovery error: {message}")]
    Discovery { message: String },

    /// Configuration tree error
    #[error("Plugin configuration error: {message}")]
    Configuration { message: String },
}

impl PluginError {
    /// Create an invalid metadata error
    pub fn invalid_metadata<S: Into<String>>(message: S) -> Self {
        Self::InvalidMetadata { message: message.into() }
    }

    /// Create a duplicate id error
    pub fn duplicate_id<S: Into<String>>(plugin_id: S) -> Self {
        Self::DuplicateId { plugin_id: plugin_id.into() }
    }

    /// Create a plugin not found error
    pub fn not_found<S: Into<String>>(plugin_id: S) -> Self {
        Self::NotFound { plugin_id: plugin_id.into() }
    }

    /// Create a missing dependency error
    pub fn missing_dependency<S: Into<String>, D: Into<String>>(plugin_id: S, dependency: D) -> Self {
        Self::MissingDependency {
            plugin_id: plugin_id.into(),
            dependency: dependency.into(),
        }
    }

    /// Create a cycle error naming every involved id
    pub fn cycle(ids: Vec<String>) -> Self {
        Self::Cycle { ids }
    }

    /// Create an execution error
    pub fn execution_failed<S: Into<String>>(message: S) -> Self {
        Self::ExecutionFailed { message: message.into() }
    }

    /// Create a discovery error
    pub fn discovery<S: Into<String>>(message: S) -> Self {
        Self::Discovery { message: message.into() }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Structural errors abort the call that raised them before any plugin runs
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            PluginError::InvalidMetadata { .. }
                | PluginError::DuplicateId { .. }
                | PluginError::NotFound { .. }
                | PluginError::MissingDependency { .. }
                | PluginError::Cycle { .. }
        )
    }

    /// Runtime errors are isolated into the execution report
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PluginError::ExecutionFailed { .. } | PluginError::Discovery { .. }
        )
    }
}

impl From<std::io::Error> for PluginError {
    fn from(err: std::io::Error) -> Self {
        PluginError::discovery(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for PluginError {
    fn from(err: serde_json::Error) -> Self {
        PluginError::configuration(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = PluginError::not_found("fmt-check");
        assert_eq!(error.to_string(), "Plugin not found: fmt-check");

        let error = PluginError::cycle(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(
            error.to_string(),
            "Dependency cycle detected among plugins: a, b"
        );
    }

    #[test]
    fn test_error_classification() {
        assert!(PluginError::duplicate_id("x").is_structural());
        assert!(PluginError::missing_dependency("x", "y").is_structural());
        assert!(!PluginError::execution_failed("boom").is_structural());
        assert!(PluginError::execution_failed("boom").is_recoverable());
        assert!(!PluginError::cycle(vec![]).is_recoverable());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: PluginError = io.into();
        assert!(matches!(err, PluginError::Discovery { .. }));
        assert!(err.to_string().contains("IO error"));
    }
}
