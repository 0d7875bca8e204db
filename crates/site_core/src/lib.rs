//! Client-side behavior of the FTTY landing page: scroll reveals, the wallet
//! button, copy feedback, and the page model that ties them together.

pub mod clipboard;
pub mod kit;
pub mod listeners;
pub mod page;
pub mod reveal;
pub mod wallet_view;

pub use clipboard::{ClipboardCapability, ClipboardFeedback, MissingClipboard, COPIED_RESET};
pub use kit::{UnavailableWalletFactory, WalletKit, KIT_INIT_ATTEMPTS, KIT_INIT_RETRY_DELAY};
pub use listeners::{ListenerSet, Subscription};
pub use page::{ChainCard, LandingPage, MountedSection, NavbarState};
pub use reveal::{
    DetachedViewport, RevealController, RevealHandle, RevealTarget, ScriptedViewport,
    ViewportObserver, REVEAL_THRESHOLD,
};
pub use wallet_view::{
    ButtonAction, ButtonModel, WalletPhase, WalletSessionView, WalletSnapshot, CONNECT_WATCHDOG,
};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
