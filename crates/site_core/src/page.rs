//! Single-page layout: mounted sections with their reveal handles, chain
//! cards with copy feedback, and navbar state.

use std::{sync::Arc, time::Duration};

use shared::{
    content::{ChainListing, SiteContent},
    domain::SectionId,
};
use tracing::info;

use crate::{
    clipboard::{ClipboardCapability, ClipboardFeedback},
    reveal::{
        RevealController, RevealHandle, RevealTarget, ViewportObserver, ASSET_STAGGER_STEP,
        CARD_STAGGER_STEP,
    },
};

/// Scroll offset (px) past which the navbar switches to its compact style.
pub const NAVBAR_SCROLL_OFFSET: f64 = 20.0;
pub const NEWSLETTER_REVEAL_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavbarState {
    scrolled: bool,
    mobile_menu_open: bool,
}

impl NavbarState {
    pub fn scrolled(&self) -> bool {
        self.scrolled
    }

    pub fn mobile_menu_open(&self) -> bool {
        self.mobile_menu_open
    }

    /// Returns true when the compact style toggled.
    pub fn on_scroll(&mut self, offset_y: f64) -> bool {
        let scrolled = offset_y > NAVBAR_SCROLL_OFFSET;
        let changed = scrolled != self.scrolled;
        self.scrolled = scrolled;
        changed
    }

    pub fn toggle_mobile_menu(&mut self) {
        self.mobile_menu_open = !self.mobile_menu_open;
    }

    /// Following a link closes the mobile menu; returns the anchor to jump to.
    pub fn follow_link(&mut self, section: SectionId) -> &'static str {
        self.mobile_menu_open = false;
        section.anchor()
    }
}

pub struct MountedSection {
    id: SectionId,
    root: RevealHandle,
    items: Vec<RevealHandle>,
}

impl MountedSection {
    pub fn id(&self) -> SectionId {
        self.id
    }

    pub fn root(&self) -> &RevealHandle {
        &self.root
    }

    pub fn items(&self) -> &[RevealHandle] {
        &self.items
    }

    pub fn targets(&self) -> impl Iterator<Item = &Arc<RevealTarget>> {
        std::iter::once(self.root.target()).chain(self.items.iter().map(RevealHandle::target))
    }

    pub fn is_fully_revealed(&self) -> bool {
        self.targets().all(|target| target.is_visible())
    }
}

pub struct ChainCard {
    listing: ChainListing,
    feedback: Option<ClipboardFeedback>,
}

impl ChainCard {
    fn new(listing: ChainListing, clipboard: &Arc<dyn ClipboardCapability>) -> Self {
        let feedback = listing
            .copyable_address()
            .map(|_| ClipboardFeedback::new(Arc::clone(clipboard)));
        Self { listing, feedback }
    }

    pub fn listing(&self) -> &ChainListing {
        &self.listing
    }

    pub fn feedback(&self) -> Option<&ClipboardFeedback> {
        self.feedback.as_ref()
    }

    pub fn copied(&self) -> bool {
        self.feedback
            .as_ref()
            .map(ClipboardFeedback::copied)
            .unwrap_or(false)
    }

    /// Copies the contract address; false for cards without one.
    pub async fn copy_address(&self) -> bool {
        match &self.feedback {
            Some(feedback) => feedback.copy(self.listing.copyable_address()).await,
            None => false,
        }
    }
}

pub struct LandingPage {
    content: SiteContent,
    sections: Vec<MountedSection>,
    chain_cards: Vec<ChainCard>,
    navbar: NavbarState,
}

impl LandingPage {
    /// Mounts every section in page order. Must be called inside a tokio
    /// runtime.
    pub fn mount(
        content: SiteContent,
        viewport: Arc<dyn ViewportObserver>,
        clipboard: Arc<dyn ClipboardCapability>,
    ) -> Self {
        let controller = RevealController::new(viewport);
        let sections = SectionId::ALL
            .iter()
            .map(|&id| {
                let delays = item_delays(&content, id);
                let root = controller.mount(RevealTarget::new(Duration::ZERO));
                let items = delays
                    .into_iter()
                    .map(|delay| controller.mount(RevealTarget::new(delay)))
                    .collect();
                MountedSection { id, root, items }
            })
            .collect::<Vec<_>>();

        let chain_cards = content
            .chains
            .iter()
            .cloned()
            .map(|listing| ChainCard::new(listing, &clipboard))
            .collect();

        info!(
            "page: mounted sections={} targets={}",
            sections.len(),
            sections
                .iter()
                .map(|section| 1 + section.items.len())
                .sum::<usize>()
        );

        Self {
            content,
            sections,
            chain_cards,
            navbar: NavbarState::default(),
        }
    }

    pub fn content(&self) -> &SiteContent {
        &self.content
    }

    pub fn sections(&self) -> &[MountedSection] {
        &self.sections
    }

    pub fn section(&self, id: SectionId) -> Option<&MountedSection> {
        self.sections.iter().find(|section| section.id == id)
    }

    pub fn chain_cards(&self) -> &[ChainCard] {
        &self.chain_cards
    }

    pub fn chain_card(&self, name: &str) -> Option<&ChainCard> {
        self.chain_cards
            .iter()
            .find(|card| card.listing.name.eq_ignore_ascii_case(name))
    }

    pub fn navbar(&self) -> &NavbarState {
        &self.navbar
    }

    pub fn navbar_mut(&mut self) -> &mut NavbarState {
        &mut self.navbar
    }

    /// Releases every observation and pending copy reset.
    pub fn unmount(self) {
        for card in &self.chain_cards {
            if let Some(feedback) = &card.feedback {
                feedback.dispose();
            }
        }
        for section in self.sections {
            section.root.unmount();
            for item in section.items {
                item.unmount();
            }
        }
        info!("page: unmounted");
    }
}

/// Reveal delays for the per-item targets inside a section.
fn item_delays(content: &SiteContent, id: SectionId) -> Vec<Duration> {
    match id {
        SectionId::Hero => Vec::new(),
        SectionId::FeaturedAssets => staggered(content.featured_assets.len(), ASSET_STAGGER_STEP),
        SectionId::Chains => staggered(content.chains.len(), CARD_STAGGER_STEP),
        SectionId::Community => vec![NEWSLETTER_REVEAL_DELAY],
        SectionId::Roadmap => staggered(content.roadmap.len(), CARD_STAGGER_STEP),
    }
}

fn staggered(count: usize, step: Duration) -> Vec<Duration> {
    (0..count)
        .map(|index| crate::reveal::stagger_delay(index, step))
        .collect()
}

#[cfg(test)]
#[path = "tests/page_tests.rs"]
mod tests;
