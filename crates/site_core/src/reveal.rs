//! Scroll-triggered, one-shot reveal of page blocks.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use shared::domain::TargetId;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info};

use crate::listeners::{ListenerSet, Subscription};

/// Visible fraction of a target that counts as "in view".
pub const REVEAL_THRESHOLD: f64 = 0.1;
pub const CARD_STAGGER_STEP: Duration = Duration::from_millis(150);
pub const ASSET_STAGGER_STEP: Duration = Duration::from_millis(100);

pub fn stagger_delay(index: usize, step: Duration) -> Duration {
    step.saturating_mul(u32::try_from(index).unwrap_or(u32::MAX))
}

/// Host-provided intersection observation. Each registration yields the
/// stream of intersection ratios reported for that target.
pub trait ViewportObserver: Send + Sync {
    fn observe(&self, target: TargetId, threshold: f64) -> mpsc::UnboundedReceiver<f64>;
    fn unobserve(&self, target: TargetId);
}

/// Observer for hosts without a viewport: nothing is ever reported in view.
pub struct DetachedViewport;

impl ViewportObserver for DetachedViewport {
    fn observe(&self, _target: TargetId, _threshold: f64) -> mpsc::UnboundedReceiver<f64> {
        let (_tx, rx) = mpsc::unbounded_channel();
        rx
    }

    fn unobserve(&self, _target: TargetId) {}
}

static NEXT_TARGET_ID: AtomicU64 = AtomicU64::new(1);

pub struct RevealTarget {
    id: TargetId,
    reveal_delay: Duration,
    visible: AtomicBool,
    listeners: ListenerSet<TargetId>,
}

impl RevealTarget {
    pub fn new(reveal_delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            id: TargetId(NEXT_TARGET_ID.fetch_add(1, Ordering::Relaxed)),
            reveal_delay,
            visible: AtomicBool::new(false),
            listeners: ListenerSet::new(),
        })
    }

    pub fn staggered(index: usize, step: Duration) -> Arc<Self> {
        Self::new(stagger_delay(index, step))
    }

    pub fn id(&self) -> TargetId {
        self.id
    }

    pub fn reveal_delay(&self) -> Duration {
        self.reveal_delay
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Acquire)
    }

    /// Fires once, with the target id, when the target becomes visible.
    pub fn on_reveal<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&TargetId) + Send + Sync + 'static,
    {
        self.listeners.subscribe(listener)
    }

    /// Returns false when the target was already visible.
    fn mark_visible(&self) -> bool {
        if self.visible.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.listeners.notify(&self.id);
        true
    }
}

/// Live observation of one target; unmounting (or dropping) releases it.
pub struct RevealHandle {
    target: Arc<RevealTarget>,
    observer: Arc<dyn ViewportObserver>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl RevealHandle {
    pub fn target(&self) -> &Arc<RevealTarget> {
        &self.target
    }

    pub fn is_visible(&self) -> bool {
        self.target.is_visible()
    }

    pub fn unmount(self) {
        self.release();
    }

    fn release(&self) {
        let task = self
            .task
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(task) = task {
            if !task.is_finished() {
                debug!(
                    "reveal: released before reveal target={} visible={}",
                    self.target.id,
                    self.target.is_visible()
                );
            }
            task.abort();
        }
        self.observer.unobserve(self.target.id);
    }
}

impl Drop for RevealHandle {
    fn drop(&mut self) {
        self.release();
    }
}

pub struct RevealController {
    observer: Arc<dyn ViewportObserver>,
    threshold: f64,
}

impl RevealController {
    pub fn new(observer: Arc<dyn ViewportObserver>) -> Self {
        Self {
            observer,
            threshold: REVEAL_THRESHOLD,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Starts observing `target`. Must be called inside a tokio runtime.
    pub fn mount(&self, target: Arc<RevealTarget>) -> RevealHandle {
        let mut ratios = self.observer.observe(target.id, self.threshold);
        let observer = Arc::clone(&self.observer);
        let threshold = self.threshold;
        let watched = Arc::clone(&target);

        let task = tokio::spawn(async move {
            loop {
                match ratios.recv().await {
                    Some(ratio) if ratio > 0.0 && ratio >= threshold => break,
                    Some(_) => continue,
                    None => return,
                }
            }

            if !watched.reveal_delay.is_zero() {
                tokio::time::sleep(watched.reveal_delay).await;
            }

            if watched.mark_visible() {
                info!(
                    "reveal: visible target={} delay_ms={}",
                    watched.id,
                    watched.reveal_delay.as_millis()
                );
            }
            observer.unobserve(watched.id);
        });

        RevealHandle {
            target,
            observer: Arc::clone(&self.observer),
            task: Mutex::new(Some(task)),
        }
    }
}

/// In-memory viewport driven by explicit ratio reports. Used by the preview
/// tour and by tests.
#[derive(Default)]
pub struct ScriptedViewport {
    targets: Mutex<HashMap<TargetId, mpsc::UnboundedSender<f64>>>,
}

impl ScriptedViewport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Reports `ratio` for `target`; false when the target is not observed.
    pub fn report(&self, target: TargetId, ratio: f64) -> bool {
        let targets = self.lock();
        match targets.get(&target) {
            Some(tx) => tx.send(ratio).is_ok(),
            None => false,
        }
    }

    pub fn is_observing(&self, target: TargetId) -> bool {
        self.lock().contains_key(&target)
    }

    pub fn observed(&self) -> Vec<TargetId> {
        let mut ids: Vec<TargetId> = self.lock().keys().copied().collect();
        ids.sort();
        ids
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<TargetId, mpsc::UnboundedSender<f64>>> {
        self.targets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ViewportObserver for ScriptedViewport {
    fn observe(&self, target: TargetId, _threshold: f64) -> mpsc::UnboundedReceiver<f64> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().insert(target, tx);
        rx
    }

    fn unobserve(&self, target: TargetId) {
        self.lock().remove(&target);
    }
}

#[cfg(test)]
#[path = "tests/reveal_tests.rs"]
mod tests;
