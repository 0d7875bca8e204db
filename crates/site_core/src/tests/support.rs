//! Capability doubles shared by the unit test modules.

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex,
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::sync::broadcast;
use wallet_integration::{
    ConnectHint, WalletCapability, WalletEvent, WalletKitConfig, WalletKitFactory,
};

use crate::clipboard::ClipboardCapability;

pub const TEST_ADDRESS: &str = "eip155:1:0xABCDEF1234567890";

#[derive(Debug, Clone)]
pub enum ConnectScript {
    /// Intent accepted; resolution arrives (or not) through events.
    Pending,
    /// Emits `Connected` and returns Ok.
    Approve(String),
    /// Returns an error from `connect`.
    Reject(String),
}

pub struct ScriptedWallet {
    ready: AtomicBool,
    script: Mutex<ConnectScript>,
    address: Mutex<Option<String>>,
    events: broadcast::Sender<WalletEvent>,
    connect_calls: AtomicUsize,
    disconnect_calls: AtomicUsize,
    fail_disconnect: AtomicBool,
    hints: Mutex<Vec<ConnectHint>>,
}

impl ScriptedWallet {
    pub fn new(ready: bool, script: ConnectScript) -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            ready: AtomicBool::new(ready),
            script: Mutex::new(script),
            address: Mutex::new(None),
            events,
            connect_calls: AtomicUsize::new(0),
            disconnect_calls: AtomicUsize::new(0),
            fail_disconnect: AtomicBool::new(false),
            hints: Mutex::new(Vec::new()),
        })
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    pub fn set_address(&self, address: Option<&str>) {
        *self.address.lock().expect("lock") = address.map(str::to_string);
    }

    pub fn set_script(&self, script: ConnectScript) {
        *self.script.lock().expect("lock") = script;
    }

    pub fn fail_disconnect(&self) {
        self.fail_disconnect.store(true, Ordering::SeqCst);
    }

    pub fn emit(&self, event: WalletEvent) {
        let _ = self.events.send(event);
    }

    pub fn connect_calls(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }

    pub fn disconnect_calls(&self) -> usize {
        self.disconnect_calls.load(Ordering::SeqCst)
    }

    pub fn hints(&self) -> Vec<ConnectHint> {
        self.hints.lock().expect("lock").clone()
    }
}

#[async_trait]
impl WalletCapability for ScriptedWallet {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    async fn connect(&self, hint: ConnectHint) -> Result<()> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        self.hints.lock().expect("lock").push(hint);
        let script = self.script.lock().expect("lock").clone();
        match script {
            ConnectScript::Pending => Ok(()),
            ConnectScript::Approve(address) => {
                self.set_address(Some(&address));
                self.emit(WalletEvent::Connected { address });
                Ok(())
            }
            ConnectScript::Reject(message) => Err(anyhow!(message)),
        }
    }

    async fn disconnect(&self) -> Result<()> {
        self.disconnect_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_disconnect.load(Ordering::SeqCst) {
            return Err(anyhow!("wallet refused to disconnect"));
        }
        self.set_address(None);
        self.emit(WalletEvent::Disconnected);
        Ok(())
    }

    fn current_address(&self) -> Option<String> {
        self.address.lock().expect("lock").clone()
    }

    fn subscribe_events(&self) -> broadcast::Receiver<WalletEvent> {
        self.events.subscribe()
    }
}

/// Fails the first `failures` creations, then hands out `wallet`.
pub struct FlakyFactory {
    wallet: Arc<ScriptedWallet>,
    failures: AtomicUsize,
    calls: AtomicUsize,
}

impl FlakyFactory {
    pub fn new(wallet: Arc<ScriptedWallet>, failures: usize) -> Arc<Self> {
        Arc::new(Self {
            wallet,
            failures: AtomicUsize::new(failures),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletKitFactory for FlakyFactory {
    async fn create(&self, _config: &WalletKitConfig) -> Result<Arc<dyn WalletCapability>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(anyhow!("relay handshake failed"));
        }
        Ok(Arc::clone(&self.wallet) as Arc<dyn WalletCapability>)
    }
}

#[derive(Default)]
pub struct RecordingClipboard {
    writes: Mutex<Vec<String>>,
    fail: AtomicBool,
}

impl RecordingClipboard {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        let clipboard = Self::default();
        clipboard.fail.store(true, Ordering::SeqCst);
        Arc::new(clipboard)
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().expect("lock").clone()
    }
}

#[async_trait]
impl ClipboardCapability for RecordingClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow!("clipboard permission denied"));
        }
        self.writes.lock().expect("lock").push(text.to_string());
        Ok(())
    }
}
