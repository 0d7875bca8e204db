use std::{
    sync::{Arc, Mutex, MutexGuard, Weak},
    time::Duration,
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::listeners::{ListenerSet, Subscription};

pub const COPIED_RESET: Duration = Duration::from_millis(2000);

#[async_trait]
pub trait ClipboardCapability: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<()>;
}

pub struct MissingClipboard;

#[async_trait]
impl ClipboardCapability for MissingClipboard {
    async fn write_text(&self, _text: &str) -> Result<()> {
        Err(anyhow!("clipboard is unavailable"))
    }
}

struct FeedbackState {
    copied: bool,
    reset: Option<JoinHandle<()>>,
}

struct FeedbackInner {
    state: Mutex<FeedbackState>,
    listeners: ListenerSet<bool>,
}

impl FeedbackInner {
    fn set_copied(&self, copied: bool) {
        let changed = {
            let mut state = lock(&self.state);
            let changed = state.copied != copied;
            state.copied = copied;
            changed
        };
        if changed {
            self.listeners.notify(&copied);
        }
    }
}

/// "Copied" flag for one copy button. Resets itself [`COPIED_RESET`] after
/// the latest successful copy.
pub struct ClipboardFeedback {
    clipboard: Arc<dyn ClipboardCapability>,
    reset_after: Duration,
    inner: Arc<FeedbackInner>,
}

impl ClipboardFeedback {
    pub fn new(clipboard: Arc<dyn ClipboardCapability>) -> Self {
        Self::with_reset(clipboard, COPIED_RESET)
    }

    pub fn with_reset(clipboard: Arc<dyn ClipboardCapability>, reset_after: Duration) -> Self {
        Self {
            clipboard,
            reset_after,
            inner: Arc::new(FeedbackInner {
                state: Mutex::new(FeedbackState {
                    copied: false,
                    reset: None,
                }),
                listeners: ListenerSet::new(),
            }),
        }
    }

    pub fn copied(&self) -> bool {
        lock(&self.inner.state).copied
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&bool) + Send + Sync + 'static,
    {
        self.inner.listeners.subscribe(listener)
    }

    /// Returns whether the text reached the clipboard. Failures leave the
    /// flag untouched.
    pub async fn copy(&self, text: Option<&str>) -> bool {
        let Some(text) = text.filter(|text| !text.is_empty()) else {
            return false;
        };

        if let Err(err) = self.clipboard.write_text(text).await {
            debug!("clipboard: write failed: {err:#}");
            return false;
        }

        self.inner.set_copied(true);
        let weak = Arc::downgrade(&self.inner);
        let reset = tokio::spawn(reset_later(weak, self.reset_after));
        let previous = lock(&self.inner.state).reset.replace(reset);
        if let Some(previous) = previous {
            previous.abort();
        }
        true
    }

    /// Cancels a pending reset; used when the owning card unmounts.
    pub fn dispose(&self) {
        if let Some(reset) = lock(&self.inner.state).reset.take() {
            reset.abort();
        }
        self.inner.listeners.clear();
    }
}

impl Drop for ClipboardFeedback {
    fn drop(&mut self) {
        self.dispose();
    }
}

async fn reset_later(inner: Weak<FeedbackInner>, after: Duration) {
    tokio::time::sleep(after).await;
    if let Some(inner) = inner.upgrade() {
        lock(&inner.state).reset = None;
        inner.set_copied(false);
    }
}

fn lock(state: &Mutex<FeedbackState>) -> MutexGuard<'_, FeedbackState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
#[path = "tests/clipboard_tests.rs"]
mod tests;
