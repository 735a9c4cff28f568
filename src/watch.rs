//! Config File Watcher
//!
//! Watches the directory holding `agents.conf` and reloads the pool once the
//! file has been quiet for the debounce window. Editors often replace a file
//! instead of writing it in place, so the parent directory is watched and
//! events are filtered by file name.

use crate::config::{ConfigSource, WatchSettings};
use crate::error::PoolError;
use crate::pool::AgentPool;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use parking_lot::RwLock;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// How often the loop checks the running flag while idle.
const IDLE_POLL: Duration = Duration::from_millis(200);

/// Reloads an [`AgentPool`] whenever its configuration file changes.
pub struct ConfigWatcher {
    pool: Arc<AgentPool>,
    path: PathBuf,
    debounce: Duration,
    running: Arc<RwLock<bool>>,
}

/// Stops a running [`ConfigWatcher`] from another thread.
#[derive(Clone)]
pub struct WatchHandle {
    running: Arc<RwLock<bool>>,
}

impl WatchHandle {
    pub fn stop(&self) {
        *self.running.write() = false;
    }
}

impl ConfigWatcher {
    pub fn new(pool: Arc<AgentPool>, path: impl Into<PathBuf>, settings: &WatchSettings) -> Self {
        Self {
            pool,
            path: path.into(),
            debounce: Duration::from_millis(settings.debounce_ms),
            running: Arc::new(RwLock::new(false)),
        }
    }

    pub fn handle(&self) -> WatchHandle {
        WatchHandle {
            running: Arc::clone(&self.running),
        }
    }

    /// Run the watch loop on the current thread until stopped.
    ///
    /// Reload failures are logged and the loop keeps going with the previous
    /// configuration.
    pub fn run(&self) -> Result<(), PoolError> {
        *self.running.write() = true;

        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .ok_or_else(|| PoolError::Watch(format!("Not a file path: {}", self.path.display())))?;
        let dir = watch_dir(&self.path);

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            if let Err(e) = tx.send(res) {
                error!("Error sending watch event: {}", e);
            }
        })
        .map_err(|e| PoolError::Watch(format!("Failed to create watcher: {}", e)))?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| PoolError::Watch(format!("Failed to watch {}: {}", dir.display(), e)))?;

        info!(file = %self.path.display(), "Watching agent configuration");

        let source = ConfigSource::file(&self.path);
        let mut pending_since: Option<Instant> = None;

        loop {
            if !*self.running.read() {
                break;
            }

            let timeout = match pending_since {
                Some(since) => self.debounce.saturating_sub(since.elapsed()),
                None => IDLE_POLL,
            };
            match rx.recv_timeout(timeout) {
                Ok(Ok(event)) => {
                    if is_relevant(&event, &file_name) {
                        debug!(kind = ?event.kind, "Agent configuration changed");
                        pending_since = Some(Instant::now());
                    }
                }
                Ok(Err(e)) => {
                    warn!("Watch error: {}", e);
                }
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    error!("Watcher channel disconnected");
                    break;
                }
            }

            if let Some(since) = pending_since {
                if since.elapsed() >= self.debounce {
                    pending_since = None;
                    if let Ok(report) = self.pool.reload(&source) {
                        info!(
                            created = report.created.len(),
                            removed = report.removed.len(),
                            deferred = report.deferred.len(),
                            "Reloaded agent configuration"
                        );
                    }
                }
            }
        }

        *self.running.write() = false;
        info!("Stopped watching agent configuration");
        Ok(())
    }
}

fn watch_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn is_relevant(event: &Event, file_name: &OsString) -> bool {
    if matches!(event.kind, EventKind::Access(_)) {
        return false;
    }
    event
        .paths
        .iter()
        .any(|p| p.file_name() == Some(file_name.as_os_str()))
}
