//! Scripted walk through the page: scrolls each section into view, then
//! drives the wallet button against a demo wallet.

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use anyhow::Result;
use shared::{content::SiteContent, domain::{SectionId, TargetId}};
use site_core::{
    ButtonModel, ClipboardCapability, LandingPage, ScriptedViewport, ViewportObserver,
    WalletKit, WalletPhase, WalletSessionView, KIT_INIT_ATTEMPTS, KIT_INIT_RETRY_DELAY,
};
use tracing::warn;
use wallet_integration::{
    ConnectHint, WalletCapability, WalletKitConfig, WalletKitFactory, EIP155_NAMESPACE,
};

use crate::demo_wallet::{DemoBehavior, DemoWalletFactory};

/// Vertical distance scrolled between sections.
const SECTION_HEIGHT: f64 = 600.0;
const SETTLE_POLL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct TourOptions {
    pub behavior: DemoBehavior,
    pub scroll_step: Duration,
    pub connect_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TourReport {
    pub revealed: usize,
    pub targets: usize,
    pub copied: bool,
    pub connected_address: Option<String>,
    pub final_phase: WalletPhase,
    pub final_error: Option<String>,
}

pub fn render_button(button: &ButtonModel) -> String {
    let mut out = format!("[ {} ]", button.label);
    if !button.enabled {
        out.push_str(" (disabled)");
    }
    if let Some(err) = &button.error_text {
        out.push_str(" ! ");
        out.push_str(err);
    }
    out
}

pub async fn run_tour(
    kit_config: WalletKitConfig,
    options: TourOptions,
    clipboard: Arc<dyn ClipboardCapability>,
) -> Result<TourReport> {
    let factory: Arc<dyn WalletKitFactory> = Arc::new(DemoWalletFactory::new(options.behavior));
    let kit = WalletKit::new(kit_config, factory);
    let view = WalletSessionView::mount_with_watchdog(
        Arc::clone(&kit) as Arc<dyn WalletCapability>,
        options.connect_timeout,
    );
    println!("wallet  {}", render_button(&view.button()));
    let _button = view.subscribe(|snapshot| {
        println!("wallet  {}", render_button(&snapshot.button()));
    });

    // Clicked before the kit exists: the view explains instead of connecting.
    view.request_connect(ConnectHint::wallet("metamask", EIP155_NAMESPACE))
        .await;

    if let Err(err) = kit
        .init_with_retry(KIT_INIT_ATTEMPTS, KIT_INIT_RETRY_DELAY)
        .await
    {
        warn!("page: wallet kit unavailable: {err:#}");
    }

    let viewport = ScriptedViewport::new();
    let mut page = LandingPage::mount(
        SiteContent::ftty(),
        Arc::clone(&viewport) as Arc<dyn ViewportObserver>,
        clipboard,
    );

    let revealed = Arc::new(AtomicUsize::new(0));
    let mut layout: Vec<(SectionId, Vec<TargetId>)> = Vec::new();
    let mut reveal_watches = Vec::new();
    for section in page.sections() {
        let id = section.id();
        let mut ids = Vec::new();
        for (index, target) in section.targets().enumerate() {
            ids.push(target.id());
            let revealed = Arc::clone(&revealed);
            reveal_watches.push(target.on_reveal(move |_| {
                revealed.fetch_add(1, Ordering::Relaxed);
                if index == 0 {
                    println!("reveal  {id}");
                } else {
                    println!("reveal  {id} item {index}");
                }
            }));
        }
        layout.push((id, ids));
    }
    let targets = layout.iter().map(|(_, ids)| ids.len()).sum();

    let mut offset = 0.0;
    for (id, ids) in &layout {
        if page.navbar_mut().on_scroll(offset) {
            println!("navbar  compact={}", page.navbar().scrolled());
        }
        println!("scroll  {} y={offset}", page.navbar_mut().follow_link(*id));
        for target in ids {
            viewport.report(*target, 1.0);
        }
        tokio::time::sleep(options.scroll_step).await;
        offset += SECTION_HEIGHT;
    }

    let mut copied = false;
    if let Some(card) = page.chain_cards().iter().find(|card| card.feedback().is_some()) {
        copied = card.copy_address().await;
        println!(
            "copy    {} {}",
            card.listing().name,
            if copied { "Copied!" } else { "failed" }
        );
    }

    view.request_connect(ConnectHint::wallet("metamask", EIP155_NAMESPACE))
        .await;
    wait_while_connecting(&view, options.connect_timeout + Duration::from_secs(1)).await;

    let connected = view.snapshot();
    let connected_address = connected.address.clone();
    if connected.phase == WalletPhase::Connected {
        view.request_disconnect().await;
    }

    let last = view.snapshot();
    page.unmount();
    view.unmount();

    Ok(TourReport {
        revealed: revealed.load(Ordering::Relaxed),
        targets,
        copied,
        connected_address,
        final_phase: last.phase,
        final_error: last.error.map(|err| err.message),
    })
}

async fn wait_while_connecting(view: &WalletSessionView, limit: Duration) {
    let deadline = tokio::time::Instant::now() + limit;
    while view.snapshot().phase == WalletPhase::Connecting
        && tokio::time::Instant::now() < deadline
    {
        tokio::time::sleep(SETTLE_POLL).await;
    }
}
