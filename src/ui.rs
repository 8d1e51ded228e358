//! Host Collaborator Interfaces
//!
//! The graphical shell owns every real dialog and progress widget; the core
//! only sees these seams. Both traits ship non-interactive defaults so the
//! scheduler works unchanged in headless runs.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

/// Yes/no confirmation facility
///
/// In any non-interactive execution mode implementations must return the
/// supplied default without blocking.
pub trait Confirm: Send + Sync {
    fn confirm(&self, title: &str, text: &str, default: bool) -> bool;
}

/// Confirmation facility that never blocks and always answers the default
#[derive(Debug, Default, Clone)]
pub struct NonInteractiveConfirm;

impl Confirm for NonInteractiveConfirm {
    fn confirm(&self, title: &str, text: &str, default: bool) -> bool {
        log::info!("confirm [{}] {}: defaulting to {}", title, text, default);
        default
    }
}

/// Live progress handle for one long-running operation
pub trait ProgressHandle: Send + Sync {
    /// Change the maximum; 0 denotes indeterminate progress
    fn set_maximum(&self, maximum: u64);

    /// Report the current position and status text
    fn update(&self, current: u64, text: &str);

    /// Whether the user asked to cancel
    fn canceled(&self) -> bool;

    /// Release the handle
    fn close(&self);
}

/// Factory for progress handles
pub trait Progress: Send + Sync {
    /// Open a progress handle; `maximum == 0` denotes indeterminate progress
    fn start(&self, title: &str, text: &str, maximum: u64, cancelable: bool) -> Box<dyn ProgressHandle>;
}

/// Progress factory that renders nothing
///
/// Cancelable handles still observe the run's cancellation token, so a
/// headless host can interrupt long enumerations.
#[derive(Default, Clone)]
pub struct SilentProgress {
    cancel: Option<CancellationToken>,
}

impl SilentProgress {
    pub fn new() -> Self {
        Self { cancel: None }
    }

    /// Wire cancelable handles to the run's cancellation token
    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self { cancel: Some(token) }
    }
}

impl Progress for SilentProgress {
    fn start(&self, title: &str, _text: &str, maximum: u64, cancelable: bool) -> Box<dyn ProgressHandle> {
        log::debug!("progress [{}] started (maximum={})", title, maximum);
        Box::new(SilentHandle {
            cancel: if cancelable { self.cancel.clone() } else { None },
        })
    }
}

struct SilentHandle {
    cancel: Option<CancellationToken>,
}

impl ProgressHandle for SilentHandle {
    fn set_maximum(&self, _maximum: u64) {}

    fn update(&self, _current: u64, _text: &str) {}

    fn canceled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|c| c.is_cancelled())
    }

    fn close(&self) {}
}

/// Shared confirmation facility handle
pub type SharedConfirm = Arc<dyn Confirm>;

/// Shared progress factory handle
pub type SharedProgress = Arc<dyn Progress>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noninteractive_confirm_returns_default() {
        let confirm = NonInteractiveConfirm;
        assert!(confirm.confirm("Delete artifacts?", "Remove dist/", true));
        assert!(!confirm.confirm("Delete artifacts?", "Remove dist/", false));
    }

    #[test]
    fn test_silent_progress_cancellation() {
        let token = CancellationToken::new();
        let progress = SilentProgress::with_cancellation(token.clone());

        let handle = progress.start("scan", "walking workspace", 0, true);
        assert!(!handle.canceled());
        token.cancel();
        assert!(handle.canceled());

        // Non-cancelable handles never report canceled
        let fixed = progress.start("scan", "walking workspace", 10, false);
        assert!(!fixed.canceled());
        fixed.close();
    }
}
