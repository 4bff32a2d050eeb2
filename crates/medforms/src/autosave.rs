// File: src/autosave.rs
// Purpose: Periodic draft serialization with a page-view-bounded lifetime

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::draft::{DraftSnapshot, DraftStore};

/// Handle to the background autosave task.
///
/// Dropping it aborts the task: a page that has been navigated away must
/// not keep writing drafts. One autosaver per form instance.
pub struct DraftAutosaver {
    handle: JoinHandle<()>,
}

impl DraftAutosaver {
    /// Spawn an interval task that writes `source()` under `key` every
    /// `interval`. The first write lands after one full interval, not
    /// immediately.
    pub fn start(
        store: Arc<dyn DraftStore>,
        key: impl Into<String>,
        interval: Duration,
        source: impl Fn() -> DraftSnapshot + Send + 'static,
    ) -> Self {
        let key = key.into();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // tokio fires the first tick immediately; swallow it
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let snapshot = source();
                match store.set(&key, &snapshot) {
                    Ok(()) => {
                        debug!(key = %key, store = store.name(), fields = snapshot.len(), "draft saved")
                    }
                    Err(err) => {
                        warn!(key = %key, store = store.name(), error = %err, "draft save failed")
                    }
                }
            }
        });
        Self { handle }
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Explicit stop; dropping the handle does the same.
    pub fn stop(self) {
        self.handle.abort();
    }
}

impl Drop for DraftAutosaver {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
