//! Presentation adapter over the external wallet capability.
//!
//! The view mirrors the capability's connection state into a
//! [`WalletSnapshot`], renders it as a [`ButtonModel`] and forwards
//! connect/disconnect intents. Every wallet failure is captured here and
//! rendered as inline text; nothing propagates to the caller.

use std::{
    sync::{Arc, Mutex, MutexGuard, Weak},
    time::Duration,
};

use serde::Serialize;
use shared::{
    domain::format_address,
    error::{ErrorCode, SiteError, WidgetError},
};
use tokio::{sync::broadcast::error::RecvError, task::JoinHandle};
use tracing::{debug, info, warn};
use wallet_integration::{ConnectHint, WalletCapability, WalletEvent};

use crate::listeners::{ListenerSet, Subscription};

pub const CONNECT_WATCHDOG: Duration = Duration::from_secs(10);
pub const CONNECT_LABEL: &str = "Connect Wallet";
pub const CONNECTING_LABEL: &str = "Connecting…";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletPhase {
    Idle,
    Initializing,
    Connecting,
    Connected,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalletSnapshot {
    pub phase: WalletPhase,
    pub address: Option<String>,
    pub error: Option<WidgetError>,
}

impl WalletSnapshot {
    fn initial(wallet: &dyn WalletCapability) -> Self {
        if !wallet.is_ready() {
            return Self {
                phase: WalletPhase::Initializing,
                address: None,
                error: None,
            };
        }

        match wallet.current_address() {
            Some(address) => Self {
                phase: WalletPhase::Connected,
                address: Some(address),
                error: None,
            },
            None => Self {
                phase: WalletPhase::Idle,
                address: None,
                error: None,
            },
        }
    }

    pub fn button(&self) -> ButtonModel {
        let error_text = self.error.as_ref().map(|err| err.message.clone());
        match self.phase {
            WalletPhase::Connected => ButtonModel {
                label: self
                    .address
                    .as_deref()
                    .map(format_address)
                    .unwrap_or_else(|| CONNECT_LABEL.to_string()),
                enabled: true,
                action: ButtonAction::OpenAccount,
                error_text: None,
            },
            WalletPhase::Connecting => ButtonModel {
                label: CONNECTING_LABEL.to_string(),
                enabled: false,
                action: ButtonAction::None,
                error_text,
            },
            // Still clickable while the kit initializes so a click can say why nothing happens.
            WalletPhase::Idle | WalletPhase::Initializing | WalletPhase::Error => ButtonModel {
                label: CONNECT_LABEL.to_string(),
                enabled: true,
                action: ButtonAction::Connect,
                error_text,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonAction {
    Connect,
    OpenAccount,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonModel {
    pub label: String,
    pub enabled: bool,
    pub action: ButtonAction,
    pub error_text: Option<String>,
}

struct SessionState {
    snapshot: WalletSnapshot,
    attempt: u64,
    watchdog: Option<JoinHandle<()>>,
}

impl SessionState {
    fn cancel_watchdog(&mut self) {
        if let Some(watchdog) = self.watchdog.take() {
            watchdog.abort();
        }
    }

    fn connected(&mut self, address: String) {
        self.cancel_watchdog();
        self.snapshot = WalletSnapshot {
            phase: WalletPhase::Connected,
            address: Some(address),
            error: None,
        };
    }

    fn failed(&mut self, err: SiteError) {
        self.cancel_watchdog();
        self.snapshot = WalletSnapshot {
            phase: WalletPhase::Error,
            address: None,
            error: Some(err.into()),
        };
    }

    fn idle(&mut self) {
        self.cancel_watchdog();
        self.snapshot = WalletSnapshot {
            phase: WalletPhase::Idle,
            address: None,
            error: None,
        };
    }

    /// A connect attempt may still be resolved by its own result after the
    /// watchdog surfaced a timeout.
    fn awaiting(&self, attempt: u64) -> bool {
        if self.attempt != attempt {
            return false;
        }
        match self.snapshot.phase {
            WalletPhase::Connecting => true,
            WalletPhase::Error => matches!(
                self.snapshot.error,
                Some(WidgetError {
                    code: ErrorCode::Timeout,
                    ..
                })
            ),
            _ => false,
        }
    }
}

pub struct WalletSessionView {
    wallet: Arc<dyn WalletCapability>,
    watchdog_timeout: Duration,
    state: Mutex<SessionState>,
    listeners: ListenerSet<WalletSnapshot>,
    event_task: Mutex<Option<JoinHandle<()>>>,
}

impl WalletSessionView {
    pub fn mount(wallet: Arc<dyn WalletCapability>) -> Arc<Self> {
        Self::mount_with_watchdog(wallet, CONNECT_WATCHDOG)
    }

    /// Subscribes to the capability's events. Must be called inside a tokio
    /// runtime.
    pub fn mount_with_watchdog(
        wallet: Arc<dyn WalletCapability>,
        watchdog_timeout: Duration,
    ) -> Arc<Self> {
        let mut events = wallet.subscribe_events();
        let view = Arc::new(Self {
            state: Mutex::new(SessionState {
                snapshot: WalletSnapshot::initial(wallet.as_ref()),
                attempt: 0,
                watchdog: None,
            }),
            wallet,
            watchdog_timeout,
            listeners: ListenerSet::new(),
            event_task: Mutex::new(None),
        });

        let weak = Arc::downgrade(&view);
        let task = tokio::spawn(async move {
            loop {
                let event = match events.recv().await {
                    Ok(event) => event,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("wallet: event stream lagged skipped={skipped}");
                        let Some(view) = weak.upgrade() else {
                            break;
                        };
                        view.resync();
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };
                let Some(view) = weak.upgrade() else {
                    break;
                };
                view.apply_event(event);
            }
        });
        *lock(&view.event_task) = Some(task);

        view
    }

    pub fn snapshot(&self) -> WalletSnapshot {
        lock(&self.state).snapshot.clone()
    }

    pub fn button(&self) -> ButtonModel {
        self.snapshot().button()
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&WalletSnapshot) + Send + Sync + 'static,
    {
        self.listeners.subscribe(listener)
    }

    pub async fn request_connect(self: &Arc<Self>, hint: ConnectHint) {
        let phase = self.snapshot().phase;
        if matches!(phase, WalletPhase::Connecting | WalletPhase::Connected) {
            debug!("wallet: connect ignored phase={phase:?}");
            return;
        }

        if !self.wallet.is_ready() {
            warn!("wallet: connect requested before wallet kit was ready");
            self.update(|state| {
                state.snapshot.error = Some(SiteError::NotReady.into());
            });
            return;
        }

        let attempt = self.enter_connecting();
        info!(
            "wallet: connect requested attempt={} wallet={} namespace={}",
            attempt,
            hint.wallet.as_deref().unwrap_or("any"),
            hint.namespace.as_deref().unwrap_or("any")
        );

        match self.wallet.connect(hint).await {
            Ok(()) => {
                // Most kits report success through the event stream; pick up an
                // address that is already available.
                if let Some(address) = self.wallet.current_address() {
                    self.update(|state| {
                        if state.awaiting(attempt) {
                            state.connected(address);
                        }
                    });
                }
            }
            Err(err) => {
                warn!("wallet: connect failed attempt={attempt}: {err:#}");
                self.update(|state| {
                    if state.awaiting(attempt) {
                        state.failed(SiteError::connection_failed(Some(err.to_string())));
                    }
                });
            }
        }
    }

    pub async fn request_disconnect(&self) {
        let phase = self.snapshot().phase;
        if phase != WalletPhase::Connected {
            debug!("wallet: disconnect ignored phase={phase:?}");
            return;
        }

        match self.wallet.disconnect().await {
            Ok(()) => {
                info!("wallet: disconnected");
                self.update(SessionState::idle);
            }
            Err(err) => warn!("wallet: disconnect failed: {err:#}"),
        }
    }

    /// Stops following the capability and cancels a pending watchdog.
    pub fn unmount(&self) {
        if let Some(task) = lock(&self.event_task).take() {
            task.abort();
        }
        lock(&self.state).cancel_watchdog();
        self.listeners.clear();
    }

    fn apply_event(self: &Arc<Self>, event: WalletEvent) {
        debug!("wallet: capability event {event:?}");
        match event {
            WalletEvent::Initialized => {
                let address = self.wallet.current_address();
                self.update(|state| {
                    if state.snapshot.phase != WalletPhase::Initializing {
                        if matches!(
                            state.snapshot.error,
                            Some(WidgetError {
                                code: ErrorCode::NotReady,
                                ..
                            })
                        ) {
                            state.snapshot.error = None;
                        }
                        return;
                    }
                    match address {
                        Some(address) => state.connected(address),
                        None => state.idle(),
                    }
                });
            }
            WalletEvent::Connecting => {
                if self.snapshot().phase != WalletPhase::Connecting {
                    self.enter_connecting();
                }
            }
            WalletEvent::Connected { address } => {
                info!("wallet: connected address={}", format_address(&address));
                self.update(|state| state.connected(address));
            }
            WalletEvent::Disconnected => self.update(SessionState::idle),
            WalletEvent::Error { message } => {
                let err = SiteError::connection_failed(message);
                warn!("wallet: capability reported error: {err}");
                self.update(|state| state.failed(err));
            }
        }
    }

    fn resync(&self) {
        if let Some(address) = self.wallet.current_address() {
            self.update(|state| state.connected(address));
        }
    }

    fn enter_connecting(self: &Arc<Self>) -> u64 {
        let weak = Arc::downgrade(self);
        let timeout = self.watchdog_timeout;
        let mut attempt = 0;
        self.update(|state| {
            state.cancel_watchdog();
            state.attempt += 1;
            attempt = state.attempt;
            state.snapshot = WalletSnapshot {
                phase: WalletPhase::Connecting,
                address: None,
                error: None,
            };
            state.watchdog = Some(tokio::spawn(watchdog(weak, attempt, timeout)));
        });
        attempt
    }

    fn on_watchdog_expired(&self, attempt: u64) {
        self.update(|state| {
            if state.attempt != attempt || state.snapshot.phase != WalletPhase::Connecting {
                return;
            }
            warn!(
                "wallet: connect watchdog expired attempt={} after_ms={}",
                attempt,
                self.watchdog_timeout.as_millis()
            );
            // The capability owns cancellation; only the rendered state changes.
            state.watchdog = None;
            state.snapshot = WalletSnapshot {
                phase: WalletPhase::Error,
                address: None,
                error: Some(SiteError::Timeout(self.watchdog_timeout).into()),
            };
        });
    }

    /// Applies `mutate` and notifies listeners when the snapshot changed.
    fn update(&self, mutate: impl FnOnce(&mut SessionState)) {
        let changed = {
            let mut state = lock(&self.state);
            let before = state.snapshot.clone();
            mutate(&mut state);
            (state.snapshot != before).then(|| state.snapshot.clone())
        };
        if let Some(snapshot) = changed {
            self.listeners.notify(&snapshot);
        }
    }
}

impl Drop for WalletSessionView {
    fn drop(&mut self) {
        self.unmount();
    }
}

async fn watchdog(view: Weak<WalletSessionView>, attempt: u64, timeout: Duration) {
    tokio::time::sleep(timeout).await;
    if let Some(view) = view.upgrade() {
        view.on_watchdog_expired(attempt);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
#[path = "tests/wallet_view_tests.rs"]
mod tests;
