use anyhow::{Context, Result};
use arboard::Clipboard;
use async_trait::async_trait;
use site_core::ClipboardCapability;

/// OS clipboard. arboard calls block, so they run on the blocking pool.
pub struct SystemClipboard;

#[async_trait]
impl ClipboardCapability for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        let text = text.to_string();
        tokio::task::spawn_blocking(move || {
            let mut clipboard = Clipboard::new()?;
            clipboard.set_text(text)
        })
        .await
        .context("clipboard worker stopped")?
        .context("failed to write system clipboard")
    }
}
