use std::{str::FromStr, sync::Arc};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;
use url::Url;

pub const EIP155_NAMESPACE: &str = "eip155";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    pub namespace: String,
    pub chain_id: u64,
    pub name: String,
}

impl Network {
    pub fn mainnet() -> Self {
        Self {
            namespace: EIP155_NAMESPACE.to_string(),
            chain_id: 1,
            name: "Ethereum".to_string(),
        }
    }

    pub fn bsc() -> Self {
        Self {
            namespace: EIP155_NAMESPACE.to_string(),
            chain_id: 56,
            name: "BNB Smart Chain".to_string(),
        }
    }

    pub fn caip2(&self) -> String {
        format!("{}:{}", self.namespace, self.chain_id)
    }
}

impl FromStr for Network {
    type Err = KitConfigError;

    /// Parses a CAIP-2 chain reference such as `eip155:56`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || KitConfigError::InvalidNetwork(raw.to_string());
        let (namespace, chain_id) = raw.trim().split_once(':').ok_or_else(invalid)?;
        if namespace.is_empty() {
            return Err(invalid());
        }
        let chain_id: u64 = chain_id.parse().map_err(|_| invalid())?;
        let name = match (namespace, chain_id) {
            (EIP155_NAMESPACE, 1) => "Ethereum".to_string(),
            (EIP155_NAMESPACE, 56) => "BNB Smart Chain".to_string(),
            (EIP155_NAMESPACE, 137) => "Polygon".to_string(),
            _ => format!("{namespace} chain {chain_id}"),
        };
        Ok(Self {
            namespace: namespace.to_string(),
            chain_id,
            name,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppMetadata {
    pub name: String,
    pub description: String,
    pub url: Url,
    #[serde(default)]
    pub icons: Vec<Url>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletKitConfig {
    pub project_id: String,
    pub networks: Vec<Network>,
    pub metadata: AppMetadata,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KitConfigError {
    #[error("wallet kit project id is empty")]
    MissingProjectId,
    #[error("wallet kit needs at least one network")]
    NoNetworks,
    #[error("invalid network reference '{0}', expected namespace:chainId")]
    InvalidNetwork(String),
}

impl WalletKitConfig {
    pub fn validate(&self) -> Result<(), KitConfigError> {
        if self.project_id.trim().is_empty() {
            return Err(KitConfigError::MissingProjectId);
        }
        if self.networks.is_empty() {
            return Err(KitConfigError::NoNetworks);
        }
        Ok(())
    }
}

/// Which wallet (and chain namespace) the connect modal should lead with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectHint {
    pub wallet: Option<String>,
    pub namespace: Option<String>,
}

impl ConnectHint {
    pub fn wallet(wallet: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            wallet: Some(wallet.into()),
            namespace: Some(namespace.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    Initialized,
    Connecting,
    Connected { address: String },
    Disconnected,
    Error { message: Option<String> },
}

#[async_trait]
pub trait WalletCapability: Send + Sync {
    fn is_ready(&self) -> bool;
    async fn connect(&self, hint: ConnectHint) -> anyhow::Result<()>;
    async fn disconnect(&self) -> anyhow::Result<()>;
    fn current_address(&self) -> Option<String>;
    fn subscribe_events(&self) -> broadcast::Receiver<WalletEvent>;
}

#[async_trait]
pub trait WalletKitFactory: Send + Sync {
    async fn create(&self, config: &WalletKitConfig) -> anyhow::Result<Arc<dyn WalletCapability>>;
}
