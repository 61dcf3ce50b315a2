//! NexusKey CLI
//!
//! Command-line front end for the key generator: dashboard listing,
//! the step-gated verification walk, key display, and the webhook form.

mod webhook;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nexus_core::{
    FileSlot, GateEvent, Handoff, KeyCard, KeyCodec, KeyIssuer, KeyStore, SystemClock,
    VerificationGate,
};

#[derive(Parser)]
#[command(name = "nexus")]
#[command(about = "NexusKey - access key generator with step-gated issuance")]
#[command(version)]
struct Cli {
    /// Override the durable key store file
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List stored keys (expired ones are dropped on read)
    List,

    /// Walk the verification steps, then issue a key
    Verify {
        /// Number of verification steps
        #[arg(long, default_value_t = 3)]
        steps: usize,

        /// Skip the per-step delay
        #[arg(long)]
        fast: bool,
    },

    /// Show the freshly issued key (falls back to the dashboard)
    Show,

    /// Forward a username/message pair to a webhook endpoint
    Send {
        /// Username to report
        #[arg(long)]
        username: String,

        /// Message body
        #[arg(long)]
        message: String,

        /// Webhook endpoint URL
        #[arg(long)]
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nexus_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let store = open_store(cli.store.as_deref())?;
    let handoff = open_handoff();

    match cli.command {
        Commands::List => cmd_list(&store)?,
        Commands::Verify { steps, fast } => cmd_verify(store, handoff, steps, fast).await?,
        Commands::Show => cmd_show(&store, &handoff)?,
        Commands::Send {
            username,
            message,
            url,
        } => webhook::send(&url, &username, &message).await?,
    }

    Ok(())
}

fn open_store(path: Option<&std::path::Path>) -> Result<KeyStore> {
    let slot = match path {
        Some(path) => FileSlot::at_path(path),
        None => FileSlot::default_location("keys")?,
    };
    Ok(KeyStore::new(Box::new(slot), Arc::new(SystemClock)))
}

fn open_handoff() -> Handoff {
    // Session-scoped: lives in the temp dir, apart from the durable store
    let path = std::env::temp_dir().join("nexuskey-handoff.json");
    Handoff::new(Box::new(FileSlot::at_path(path)))
}

/// Dashboard: render every valid stored key as a card
fn cmd_list(store: &KeyStore) -> Result<()> {
    let records = store.load_valid()?;
    if records.is_empty() {
        println!("No keys yet. Run `nexus verify` to generate one.");
        return Ok(());
    }

    let now = chrono::Utc::now();
    for (i, record) in records.iter().enumerate() {
        let card = KeyCard::from_record(i + 1, record, now);
        println!("Key #{}", card.index);
        println!("  {}", card.code);
        println!("  Created: {}", card.created);
        if card.expired {
            println!("  {} (copy disabled)", card.remaining);
        } else {
            println!("  {}", card.remaining);
        }
        println!();
    }
    Ok(())
}

/// Walk every gate step in order, then issue and display the key
async fn cmd_verify(store: KeyStore, handoff: Handoff, steps: usize, fast: bool) -> Result<()> {
    let mut gate = VerificationGate::new(steps);

    for step in 1..=steps {
        let scheduled = match gate.activate(step) {
            Some(scheduled) => scheduled,
            // Cannot happen on an in-order walk; skip rather than abort
            None => continue,
        };
        println!("Step {step}: Verifying...");

        if !fast {
            tokio::time::sleep(scheduled.delay).await;
        }

        for event in gate.timer_fired(scheduled.token) {
            match event {
                GateEvent::StepCompleted { step } => println!("Step {step}: Verified"),
                GateEvent::StepUnlocked { step } => println!("Step {step}: Waiting..."),
                GateEvent::ReadyToIssue => {
                    println!("All steps completed! You can now generate your key.")
                }
            }
        }
    }

    let issuer = KeyIssuer::new(KeyCodec::new(Arc::new(SystemClock)), store, handoff);
    match issuer.issue(&gate)? {
        Some(record) => {
            tracing::info!(key = %record.key, "key issued");
            cmd_show(issuer.store(), issuer.handoff())
        }
        None => {
            // Silently ignored by the core; just report and move on
            println!("Verification incomplete; no key issued.");
            Ok(())
        }
    }
}

/// Display flow: take the handed-off record, or redirect to the dashboard
fn cmd_show(store: &KeyStore, handoff: &Handoff) -> Result<()> {
    match handoff.take()? {
        Some(record) => {
            let now = chrono::Utc::now();
            println!("Your key:");
            println!("  {}", record.key);
            println!("  Created: {}", nexus_core::format_date(record.created_at));
            println!(
                "  {}",
                nexus_core::format_time_remaining(record.expires_at, now)
            );
            Ok(())
        }
        None => {
            tracing::debug!("no pending key; redirecting to dashboard");
            cmd_list(store)
        }
    }
}
