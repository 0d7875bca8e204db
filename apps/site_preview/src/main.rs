use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use shared::content::SiteContent;
use site_core::{ClipboardCapability, ClipboardFeedback, MissingClipboard, COPIED_RESET};
use tracing::info;

mod clipboard;
mod demo_wallet;
mod settings;
mod tour;

use clipboard::SystemClipboard;
use demo_wallet::DemoBehavior;
use settings::load_settings;
use tour::{run_tour, TourOptions};

#[derive(Parser, Debug)]
#[command(about = "Preview the FTTY landing page behavior from a terminal")]
struct Args {
    #[arg(long, default_value = "site.toml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the page content as JSON.
    Content,
    /// Scroll through every section, then run the wallet button flow.
    Tour {
        #[arg(long, value_enum, default_value_t = DemoBehavior::Approve)]
        wallet: DemoBehavior,
        #[arg(long, default_value_t = 700)]
        scroll_step_ms: u64,
        /// Skip the system clipboard (headless hosts).
        #[arg(long)]
        no_clipboard: bool,
    },
    /// Copy a chain's contract address to the system clipboard.
    Copy { chain: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = load_settings(&args.config);
    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.as_str())
        .init();
    info!(
        "page: settings loaded config={} project_id={}",
        args.config.display(),
        settings.project_id
    );

    match args.command {
        Command::Content => {
            println!("{}", serde_json::to_string_pretty(&SiteContent::ftty())?);
        }
        Command::Tour {
            wallet,
            scroll_step_ms,
            no_clipboard,
        } => {
            let clipboard: Arc<dyn ClipboardCapability> = if no_clipboard {
                Arc::new(MissingClipboard)
            } else {
                Arc::new(SystemClipboard)
            };
            let options = TourOptions {
                behavior: wallet,
                scroll_step: Duration::from_millis(scroll_step_ms),
                connect_timeout: settings.connect_timeout(),
            };
            let report = run_tour(settings.wallet_kit_config()?, options, clipboard).await?;
            println!(
                "done    revealed={}/{} phase={:?}",
                report.revealed, report.targets, report.final_phase
            );
        }
        Command::Copy { chain } => copy_chain_address(&chain).await?,
    }

    Ok(())
}

async fn copy_chain_address(chain: &str) -> Result<()> {
    let content = SiteContent::ftty();
    let listing = content
        .chain(chain)
        .with_context(|| format!("unknown chain '{chain}'"))?;
    let Some(address) = listing.copyable_address() else {
        bail!(
            "{} has no contract address to copy ({})",
            listing.name,
            listing.status_label()
        );
    };

    let feedback = ClipboardFeedback::new(Arc::new(SystemClipboard));
    let _watch = feedback.subscribe(|copied| {
        println!("{}", if *copied { "Copied!" } else { "Copy Address" });
    });

    if !feedback.copy(Some(address)).await {
        bail!("could not write to the system clipboard");
    }
    println!("{address}");
    // Keep the process (and the clipboard owner) alive until the label resets.
    tokio::time::sleep(COPIED_RESET + Duration::from_millis(100)).await;
    Ok(())
}
