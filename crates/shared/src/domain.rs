use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(TargetId);

const ADDRESS_HEAD_CHARS: usize = 6;
const ADDRESS_TAIL_CHARS: usize = 4;
const ADDRESS_ELLIPSIS: char = '…';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionId {
    Hero,
    FeaturedAssets,
    Chains,
    Community,
    Roadmap,
}

impl SectionId {
    pub const ALL: [SectionId; 5] = [
        SectionId::Hero,
        SectionId::FeaturedAssets,
        SectionId::Chains,
        SectionId::Community,
        SectionId::Roadmap,
    ];

    /// In-page anchor used by the nav links; the hero is the page top.
    pub fn anchor(self) -> &'static str {
        match self {
            SectionId::Hero => "#",
            SectionId::FeaturedAssets => "#assets",
            SectionId::Chains => "#chains",
            SectionId::Community => "#community",
            SectionId::Roadmap => "#roadmap",
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SectionId::Hero => "hero",
            SectionId::FeaturedAssets => "featured_assets",
            SectionId::Chains => "chains",
            SectionId::Community => "community",
            SectionId::Roadmap => "roadmap",
        };
        f.write_str(name)
    }
}

/// Account identifier optionally prefixed with `namespace:chainId:`
/// (e.g. `eip155:1:0xabc...`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamespacedAddress {
    pub namespace: Option<String>,
    pub chain_id: Option<String>,
    pub account: String,
}

impl NamespacedAddress {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let mut parts = raw.rsplitn(3, ':');
        let account = parts.next().unwrap_or_default().to_string();
        let chain_id = parts.next().map(str::to_string);
        let namespace = parts.next().map(str::to_string);

        // A single prefix segment carries no namespace; treat it as the chain reference.
        Self {
            namespace,
            chain_id,
            account,
        }
    }

    pub fn short(&self) -> String {
        truncate_account(&self.account)
    }
}

impl fmt::Display for NamespacedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(namespace) = &self.namespace {
            write!(f, "{namespace}:")?;
        }
        if let Some(chain_id) = &self.chain_id {
            write!(f, "{chain_id}:")?;
        }
        f.write_str(&self.account)
    }
}

/// Renders `first6…last4` of the account portion of `raw`.
pub fn format_address(raw: &str) -> String {
    NamespacedAddress::parse(raw).short()
}

fn truncate_account(account: &str) -> String {
    let chars: Vec<char> = account.chars().collect();
    if chars.len() <= ADDRESS_HEAD_CHARS + ADDRESS_TAIL_CHARS {
        return account.to_string();
    }

    let head: String = chars[..ADDRESS_HEAD_CHARS].iter().collect();
    let tail: String = chars[chars.len() - ADDRESS_TAIL_CHARS..].iter().collect();
    format!("{head}{ADDRESS_ELLIPSIS}{tail}")
}
