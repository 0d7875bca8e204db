//! Static copy and structured data rendered by the landing page sections.

use serde::{Deserialize, Serialize};

use crate::domain::SectionId;

pub const FTTY_CONTRACT_ADDRESS: &str = "0x68f1e54aedb8F42d2D73AD48E2A56F7914bB79B6";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub label: String,
    pub section: SectionId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroContent {
    pub tagline: String,
    pub headline: String,
    pub highlight: String,
    pub subtitle: String,
    pub whitepaper_path: String,
    pub stats: Vec<Stat>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturedAsset {
    pub id: String,
    pub name: String,
    pub image: String,
    pub floor_price: String,
    pub top_offer: String,
    pub volume: String,
    pub supply: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainListing {
    pub name: String,
    pub is_paired: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
}

impl ChainListing {
    /// Only paired chains expose a copyable contract address.
    pub fn copyable_address(&self) -> Option<&str> {
        if !self.is_paired {
            return None;
        }
        self.contract_address
            .as_deref()
            .filter(|address| !address.is_empty())
    }

    pub fn status_label(&self) -> &'static str {
        if self.is_paired {
            "Paired"
        } else {
            "Coming Soon"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityLink {
    pub name: String,
    pub url: String,
    pub blurb: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityContent {
    pub links: Vec<CommunityLink>,
    pub member_count: String,
    pub newsletter_heading: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapMilestone {
    pub quarter: String,
    pub title: String,
    pub items: Vec<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteContent {
    pub metadata: PageMetadata,
    pub nav_links: Vec<NavLink>,
    pub hero: HeroContent,
    pub featured_assets: Vec<FeaturedAsset>,
    pub chains: Vec<ChainListing>,
    pub community: CommunityContent,
    pub roadmap: Vec<RoadmapMilestone>,
}

impl SiteContent {
    pub fn chain(&self, name: &str) -> Option<&ChainListing> {
        self.chains
            .iter()
            .find(|chain| chain.name.eq_ignore_ascii_case(name))
    }

    pub fn active_milestone(&self) -> Option<&RoadmapMilestone> {
        self.roadmap.iter().find(|milestone| milestone.is_active)
    }

    pub fn ftty() -> Self {
        Self {
            metadata: PageMetadata {
                title: "FTTY - Gaming Assets Crypto Marketplace".into(),
                description: "Purchase gaming assets with FTTY token - the future of gaming economy"
                    .into(),
            },
            nav_links: vec![
                nav("Home", SectionId::Hero),
                nav("Features", SectionId::FeaturedAssets),
                nav("Community", SectionId::Community),
                nav("Roadmap", SectionId::Roadmap),
            ],
            hero: HeroContent {
                tagline: "Gaming Assets Marketplace".into(),
                headline: "Trade Gaming Assets with".into(),
                highlight: "FTTY Token".into(),
                subtitle: "The next-generation platform for buying, selling, and trading in-game \
                           assets using cryptocurrency. Secure, fast, and commission-free."
                    .into(),
                whitepaper_path: "/whitepaper.pdf".into(),
                stats: vec![
                    stat("20+", "Games Supported"),
                    stat("0%", "Commission Fee"),
                    stat("50+", "Beta Users"),
                ],
            },
            featured_assets: vec![
                asset("1", "Legendary Dragon Sword", "/sword.jpeg", "0.45", "0.52", "12.5", "1,000"),
                asset("2", "Epic Space Helmet", "/helmet.jpeg", "0.28", "0.35", "8.2", "2,500"),
                asset("3", "Rare Magic Staff", "/staff.jpeg", "0.75", "0.88", "25.3", "500"),
            ],
            chains: vec![
                chain("Ethereum", false, None),
                chain("Polygon", false, Some(FTTY_CONTRACT_ADDRESS)),
                chain("Binance Smart Chain", true, Some(FTTY_CONTRACT_ADDRESS)),
                chain("Solana", false, None),
            ],
            community: CommunityContent {
                links: vec![
                    CommunityLink {
                        name: "Telegram".into(),
                        url: "https://t.me/FattyPattyCoin".into(),
                        blurb: "Get instant updates".into(),
                    },
                    CommunityLink {
                        name: "Twitter".into(),
                        url: "https://x.com/FattyC35481".into(),
                        blurb: "Follow our journey".into(),
                    },
                ],
                member_count: "10K+".into(),
                newsletter_heading: "Get Early Access Updates".into(),
            },
            roadmap: vec![
                milestone(
                    "Q2 2025",
                    "Platform Launch Phase",
                    true,
                    &[
                        "Launch FattyPatty on Smart Chains",
                        "Launch Phase 1 of the \"Pay to Play\" for gamers crypto payment platform.",
                        "Integrate a \"Quick Pay API with QR Codes\" into the gaming companies website.",
                        "Add a section on the website for \"IWO\".",
                    ],
                ),
                milestone(
                    "Q3 2025",
                    "Development Phase",
                    false,
                    &[
                        "Add categories like e-commerce and payments to enable crypto transactions for gaming businesses.",
                        "Create our own branded wallet.",
                        "Add an NFT section for artists and collectors to sell designs and collectibles.",
                        "Add a Finance section for PC gaming companies to raise capital.",
                    ],
                ),
                milestone(
                    "Q4 2025",
                    "Ecosystem Expansion",
                    false,
                    &[
                        "Register Corporation in the State of Delaware",
                        "Prepare and file for the CEXs",
                        "Wrap $FTTY Cross Platform Integration",
                        "Trezor Integration for $FTTY",
                        "Starting FTTYTRAC Build",
                        "Hire Full-Time Core Team",
                    ],
                ),
                milestone(
                    "Q1 2026",
                    "Marketplace & Token Growth",
                    false,
                    &[
                        "Opensea Site Listing & Integration",
                        "Expand NFT Capabilities & Partnerships",
                        "Secure Chameleon = Mobile $FTTY Integration",
                        "Carbon Credit Platform",
                        "Update $FTTY Wallets",
                        "Major Exchange Listing",
                    ],
                ),
            ],
        }
    }
}

fn nav(label: &str, section: SectionId) -> NavLink {
    NavLink {
        label: label.into(),
        section,
    }
}

fn stat(value: &str, label: &str) -> Stat {
    Stat {
        value: value.into(),
        label: label.into(),
    }
}

fn asset(
    id: &str,
    name: &str,
    image: &str,
    floor_price: &str,
    top_offer: &str,
    volume: &str,
    supply: &str,
) -> FeaturedAsset {
    FeaturedAsset {
        id: id.into(),
        name: name.into(),
        image: image.into(),
        floor_price: floor_price.into(),
        top_offer: top_offer.into(),
        volume: volume.into(),
        supply: supply.into(),
    }
}

fn chain(name: &str, is_paired: bool, contract_address: Option<&str>) -> ChainListing {
    ChainListing {
        name: name.into(),
        is_paired,
        contract_address: contract_address.map(str::to_string),
    }
}

fn milestone(quarter: &str, title: &str, is_active: bool, items: &[&str]) -> RoadmapMilestone {
    RoadmapMilestone {
        quarter: quarter.into(),
        title: title.into(),
        items: items.iter().map(|item| item.to_string()).collect(),
        is_active,
    }
}
