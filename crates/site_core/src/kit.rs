//! Process-wide wallet kit: created once in `main`, initialized once, shared
//! by reference with every view that needs the wallet.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use tokio::{
    sync::{broadcast, OnceCell},
    task::JoinHandle,
};
use tracing::{info, warn};
use wallet_integration::{
    ConnectHint, WalletCapability, WalletEvent, WalletKitConfig, WalletKitFactory,
};

pub const KIT_INIT_ATTEMPTS: usize = 3;
pub const KIT_INIT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Factory for hosts that ship without a wallet SDK.
pub struct UnavailableWalletFactory;

#[async_trait]
impl WalletKitFactory for UnavailableWalletFactory {
    async fn create(&self, _config: &WalletKitConfig) -> Result<Arc<dyn WalletCapability>> {
        Err(anyhow!("no wallet SDK is available on this host"))
    }
}

pub struct WalletKit {
    config: WalletKitConfig,
    factory: Arc<dyn WalletKitFactory>,
    instance: OnceCell<Arc<dyn WalletCapability>>,
    events: broadcast::Sender<WalletEvent>,
    forwarder: Mutex<Option<JoinHandle<()>>>,
}

impl WalletKit {
    pub fn new(config: WalletKitConfig, factory: Arc<dyn WalletKitFactory>) -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            config,
            factory,
            instance: OnceCell::new(),
            events,
            forwarder: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &WalletKitConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.instance.initialized()
    }

    pub fn capability(&self) -> Option<Arc<dyn WalletCapability>> {
        self.instance.get().cloned()
    }

    /// Creates the underlying capability once. Calls after a success are
    /// no-ops; a failed call leaves the kit uninitialized so it can be retried.
    pub async fn init(&self) -> Result<()> {
        if self.is_initialized() {
            return Ok(());
        }

        self.config
            .validate()
            .context("invalid wallet kit configuration")?;

        let factory = &self.factory;
        let config = &self.config;
        let instance = self
            .instance
            .get_or_try_init(|| async move { factory.create(config).await })
            .await
            .with_context(|| {
                format!(
                    "failed to create wallet kit for project {}",
                    self.config.project_id
                )
            })?;

        let mut forwarder = self
            .forwarder
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if forwarder.is_none() {
            let mut upstream = instance.subscribe_events();
            let events = self.events.clone();
            *forwarder = Some(tokio::spawn(async move {
                loop {
                    match upstream.recv().await {
                        Ok(event) => {
                            let _ = events.send(event);
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!("kit: upstream events lagged skipped={skipped}");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
            }));
            info!(
                "kit: initialized project_id={} networks={}",
                self.config.project_id,
                self.config
                    .networks
                    .iter()
                    .map(|network| network.caip2())
                    .collect::<Vec<_>>()
                    .join(",")
            );
            let _ = self.events.send(WalletEvent::Initialized);
        }

        Ok(())
    }

    pub async fn init_with_retry(&self, attempts: usize, delay: Duration) -> Result<()> {
        let attempts = attempts.max(1);
        let mut last_error = None;
        for attempt in 1..=attempts {
            match self.init().await {
                Ok(()) => return Ok(()),
                Err(err) => {
                    warn!("kit: init attempt {attempt}/{attempts} failed: {err:#}");
                    last_error = Some(err);
                }
            }
            if attempt < attempts {
                tokio::time::sleep(delay).await;
            }
        }
        Err(last_error.unwrap_or_else(|| anyhow!("wallet kit init was not attempted")))
    }
}

impl Drop for WalletKit {
    fn drop(&mut self) {
        let forwarder = self
            .forwarder
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(forwarder) = forwarder {
            forwarder.abort();
        }
    }
}

#[async_trait]
impl WalletCapability for WalletKit {
    fn is_ready(&self) -> bool {
        self.instance
            .get()
            .map(|wallet| wallet.is_ready())
            .unwrap_or(false)
    }

    async fn connect(&self, hint: ConnectHint) -> Result<()> {
        let wallet = self
            .capability()
            .ok_or_else(|| anyhow!("wallet kit is not initialized"))?;
        wallet.connect(hint).await
    }

    async fn disconnect(&self) -> Result<()> {
        let wallet = self
            .capability()
            .ok_or_else(|| anyhow!("wallet kit is not initialized"))?;
        wallet.disconnect().await
    }

    fn current_address(&self) -> Option<String> {
        self.instance
            .get()
            .and_then(|wallet| wallet.current_address())
    }

    fn subscribe_events(&self) -> broadcast::Receiver<WalletEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
#[path = "tests/kit_tests.rs"]
mod tests;
