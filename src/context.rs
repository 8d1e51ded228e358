//! Discovery Context
//!
//! Per-run facility shared by every plugin: cached, confinement-enforcing
//! glob enumeration of workspace files, plus access to the configuration
//! tree, the cancellation token and the host's dialog collaborators.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use glob::{MatchOptions, Pattern};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use walkdir::WalkDir;

use crate::config::ConfigTree;
use crate::error::{PluginError, PluginResult};
use crate::ui::{NonInteractiveConfirm, Progress, ProgressHandle, SharedConfirm, SharedProgress, SilentProgress};

/// Cache key: sorted include patterns paired with sorted exclude patterns
type PatternKey = (Vec<String>, Vec<String>);

/// Shared per-run discovery context passed to every plugin hook
///
/// The workspace root is canonicalized at construction and never changes.
/// Every path yielded by [`iter_files`](DiscoveryContext::iter_files)
/// resolves at or below that root; patterns cannot escape it because
/// enumeration is a single confined walk rather than pattern-driven
/// filesystem access.
pub struct DiscoveryContext {
    root: PathBuf,
    config: ConfigTree,
    cache: Mutex<HashMap<PatternKey, Arc<Vec<PathBuf>>>>,
    scan_count: AtomicUsize,
    cancel: CancellationToken,
    confirm: SharedConfirm,
    progress: SharedProgress,
}

impl DiscoveryContext {
    /// Create a context bound to a workspace root and a configuration tree
    pub fn new<P: AsRef<Path>>(root: P, config: ConfigTree) -> PluginResult<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(PluginError::discovery(format!(
                "workspace root is not a directory: {}",
                root.display()
            )));
        }
        let root = root.canonicalize()?;
        Ok(Self {
            root,
            config,
            cache: Mutex::new(HashMap::new()),
            scan_count: AtomicUsize::new(0),
            cancel: CancellationToken::new(),
            confirm: Arc::new(NonInteractiveConfirm),
            progress: Arc::new(SilentProgress::new()),
        })
    }

    /// Attach an externally supplied cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Attach the host's confirmation facility
    pub fn with_confirm(mut self, confirm: SharedConfirm) -> Self {
        self.confirm = confirm;
        self
    }

    /// Attach the host's progress factory
    pub fn with_progress(mut self, progress: SharedProgress) -> Self {
        self.progress = progress;
        self
    }

    /// The canonicalized workspace root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The run's configuration tree
    pub fn config(&self) -> &ConfigTree {
        &self.config
    }

    /// Advisory cancellation check; consumers poll this per discovered item
    pub fn is_canceled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// The run's cancellation token
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Ask the host a yes/no question
    ///
    /// Returns the default without blocking when the run is non-interactive.
    pub fn confirm(&self, title: &str, text: &str, default: bool) -> bool {
        if self.config.noninteractive() {
            return default;
        }
        self.confirm.confirm(title, text, default)
    }

    /// Open a progress handle; `maximum == 0` denotes indeterminate progress
    pub fn progress(&self, title: &str, text: &str, maximum: u64, cancelable: bool) -> Box<dyn ProgressHandle> {
        self.progress.start(title, text, maximum, cancelable)
    }

    /// Number of real filesystem traversals performed so far
    ///
    /// Stays flat across repeated calls with identical pattern pairs while
    /// caching is enabled.
    pub fn scan_count(&self) -> usize {
        self.scan_count.load(Ordering::Relaxed)
    }

    /// Enumerate workspace files matching `include` minus `exclude`
    ///
    /// An empty include list means every file (`**/*`). Patterns use
    /// shell-style wildcards (`*`, `?`, bracket classes) matched against the
    /// POSIX-style path relative to the workspace root; `**` crosses
    /// directory separators. Exclude patterns from the configuration tree's
    /// global list are applied on top of the caller's. Malformed patterns
    /// and unreadable directory entries are skipped with a warning.
    ///
    /// A repeat call with an identical pattern pair returns the previously
    /// materialized list without re-scanning, unless caching is disabled via
    /// `options.iter_files_cache`.
    pub fn iter_files<S: AsRef<str>>(&self, include: &[S], exclude: &[S]) -> FileIter {
        self.iter_files_internal(include, exclude, &[])
    }

    /// Like [`iter_files`](DiscoveryContext::iter_files), additionally
    /// applying the exclude patterns configured for one plugin id
    pub fn iter_files_for<S: AsRef<str>>(&self, plugin_id: &str, include: &[S], exclude: &[S]) -> FileIter {
        let extra = self.config.plugin_excludes(plugin_id);
        self.iter_files_internal(include, exclude, &extra)
    }

    fn iter_files_internal<S: AsRef<str>>(&self, include: &[S], exclude: &[S], extra_excludes: &[String]) -> FileIter {
        let mut inc: Vec<String> = include.iter().map(|s| s.as_ref().to_string()).collect();
        if inc.is_empty() {
            inc.push("**/*".to_string());
        }
        let mut exc: Vec<String> = exclude.iter().map(|s| s.as_ref().to_string()).collect();
        exc.extend(self.config.global_excludes());
        exc.extend_from_slice(extra_excludes);

        if !self.config.iter_files_cache() {
            return FileIter::new(self.scan(&inc, &exc));
        }

        let mut key: PatternKey = (inc.clone(), exc.clone());
        key.0.sort();
        key.1.sort();

        if let Some(cached) = self.cache.lock().get(&key) {
            return FileIter::new(Arc::clone(cached));
        }

        // First call for this key materializes the full list eagerly; any
        // cooperative cancellation check by a caller happens while consuming.
        let files = self.scan(&inc, &exc);
        self.cache.lock().insert(key, Arc::clone(&files));
        FileIter::new(files)
    }

    /// Walk the workspace once, keeping files that match at least one include
    /// pattern and no exclude pattern
    fn scan(&self, include: &[String], exclude: &[String]) -> Arc<Vec<PathBuf>> {
        self.scan_count.fetch_add(1, Ordering::Relaxed);

        let include = compile_patterns(include);
        let exclude = compile_patterns(exclude);
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };

        let mut collected = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log::warn!("skipping unreadable entry: {}", err);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let rel = match entry.path().strip_prefix(&self.root) {
                Ok(rel) => posix_path(rel),
                Err(_) => continue,
            };
            let included = include.iter().any(|p| p.matches_with(&rel, options));
            if !included {
                continue;
            }
            let excluded = exclude.iter().any(|p| p.matches_with(&rel, options));
            if !excluded {
                collected.push(entry.into_path());
            }
        }
        collected.sort();
        Arc::new(collected)
    }
}

impl std::fmt::Debug for DiscoveryContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoveryContext")
            .field("root", &self.root)
            .field("scan_count", &self.scan_count.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Compile glob patterns, dropping malformed ones with a warning
fn compile_patterns(patterns: &[String]) -> Vec<Pattern> {
    patterns
        .iter()
        .filter_map(|raw| match Pattern::new(raw) {
            Ok(pattern) => Some(pattern),
            Err(err) => {
                log::warn!("skipping malformed pattern '{}': {}", raw, err);
                None
            }
        })
        .collect()
}

/// Render a relative path with `/` separators for pattern matching
fn posix_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Finite iterator over a materialized discovery result
///
/// Restartable by re-invoking `iter_files` with the same arguments; with
/// caching enabled the repeat call shares the same underlying list.
pub struct FileIter {
    files: Arc<Vec<PathBuf>>,
    index: usize,
}

impl FileIter {
    fn new(files: Arc<Vec<PathBuf>>) -> Self {
        Self { files, index: 0 }
    }

    /// Number of matched files not yet yielded
    pub fn len(&self) -> usize {
        self.files.len() - self.index
    }

    /// Whether no matched file remains
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Iterator for FileIter {
    type Item = PathBuf;

    fn next(&mut self) -> Option<Self::Item> {
        let path = self.files.get(self.index)?.clone();
        self.index += 1;
        Some(path)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.files.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FileIter {}
