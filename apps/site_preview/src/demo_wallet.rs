//! Stand-in wallet for previewing the button flow without a relay.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use clap::ValueEnum;
use tokio::sync::broadcast;
use tracing::info;
use wallet_integration::{ConnectHint, WalletCapability, WalletEvent, WalletKitConfig, WalletKitFactory};

pub const DEMO_ADDRESS: &str = "eip155:56:0x4B0897b0513fdC7C541B6d9D7E929C4e5364D2dB";
pub const DEMO_INIT_LATENCY: Duration = Duration::from_millis(200);
pub const DEMO_APPROVAL_LATENCY: Duration = Duration::from_millis(800);

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DemoBehavior {
    /// Approves every connect request after a short delay.
    Approve,
    /// Rejects every connect request.
    Reject,
    /// Never answers, so the connect watchdog fires.
    Hang,
    /// No wallet SDK at all; the kit never becomes ready.
    Unavailable,
}

pub struct DemoWallet {
    behavior: DemoBehavior,
    address: Arc<Mutex<Option<String>>>,
    events: broadcast::Sender<WalletEvent>,
}

impl DemoWallet {
    pub fn new(behavior: DemoBehavior) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            behavior,
            address: Arc::new(Mutex::new(None)),
            events,
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl WalletCapability for DemoWallet {
    fn is_ready(&self) -> bool {
        self.behavior != DemoBehavior::Unavailable
    }

    async fn connect(&self, hint: ConnectHint) -> Result<()> {
        info!(
            "demo: connect modal opened wallet={}",
            hint.wallet.as_deref().unwrap_or("any")
        );
        let _ = self.events.send(WalletEvent::Connecting);
        match self.behavior {
            DemoBehavior::Approve => {
                let address = Arc::clone(&self.address);
                let events = self.events.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(DEMO_APPROVAL_LATENCY).await;
                    *lock(&address) = Some(DEMO_ADDRESS.to_string());
                    let _ = events.send(WalletEvent::Connected {
                        address: DEMO_ADDRESS.to_string(),
                    });
                });
                Ok(())
            }
            DemoBehavior::Reject => {
                tokio::time::sleep(DEMO_APPROVAL_LATENCY).await;
                Err(anyhow!("User rejected the request."))
            }
            DemoBehavior::Hang => Ok(()),
            DemoBehavior::Unavailable => Err(anyhow!("wallet kit is not initialized")),
        }
    }

    async fn disconnect(&self) -> Result<()> {
        lock(&self.address).take();
        let _ = self.events.send(WalletEvent::Disconnected);
        Ok(())
    }

    fn current_address(&self) -> Option<String> {
        lock(&self.address).clone()
    }

    fn subscribe_events(&self) -> broadcast::Receiver<WalletEvent> {
        self.events.subscribe()
    }
}

pub struct DemoWalletFactory {
    behavior: DemoBehavior,
}

impl DemoWalletFactory {
    pub fn new(behavior: DemoBehavior) -> Self {
        Self { behavior }
    }
}

#[async_trait]
impl WalletKitFactory for DemoWalletFactory {
    async fn create(&self, config: &WalletKitConfig) -> Result<Arc<dyn WalletCapability>> {
        if self.behavior == DemoBehavior::Unavailable {
            return Err(anyhow!("no wallet SDK is available on this host"));
        }
        tokio::time::sleep(DEMO_INIT_LATENCY).await;
        info!(
            "demo: wallet created project_id={} behavior={:?}",
            config.project_id, self.behavior
        );
        Ok(Arc::new(DemoWallet::new(self.behavior)))
    }
}
