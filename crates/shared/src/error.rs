use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const NOT_READY_MESSAGE: &str = "Wallet is still initializing. Please try again in a moment.";
pub const CONNECTION_FALLBACK_MESSAGE: &str = "Failed to connect wallet. Please try again.";
pub const TIMEOUT_MESSAGE: &str =
    "Wallet connection timed out. Check your wallet app and try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotReady,
    ConnectionFailed,
    Timeout,
    ClipboardFailed,
}

/// Inline error text rendered next to a widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetError {
    pub code: ErrorCode,
    pub message: String,
}

impl WidgetError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SiteError {
    #[error("{}", NOT_READY_MESSAGE)]
    NotReady,
    #[error("{0}")]
    ConnectionFailed(String),
    #[error("{}", TIMEOUT_MESSAGE)]
    Timeout(Duration),
    #[error("clipboard write failed: {0}")]
    ClipboardFailed(String),
}

impl SiteError {
    /// Uses the capability's message when it has one worth showing.
    pub fn connection_failed(message: Option<String>) -> Self {
        match message {
            Some(message) if !message.trim().is_empty() => Self::ConnectionFailed(message),
            _ => Self::ConnectionFailed(CONNECTION_FALLBACK_MESSAGE.to_string()),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            SiteError::NotReady => ErrorCode::NotReady,
            SiteError::ConnectionFailed(_) => ErrorCode::ConnectionFailed,
            SiteError::Timeout(_) => ErrorCode::Timeout,
            SiteError::ClipboardFailed(_) => ErrorCode::ClipboardFailed,
        }
    }
}

impl From<SiteError> for WidgetError {
    fn from(value: SiteError) -> Self {
        Self {
            code: value.code(),
            message: value.to_string(),
        }
    }
}
