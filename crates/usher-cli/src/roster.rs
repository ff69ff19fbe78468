//! # Ticket Roster Files
//!
//! The on-disk form of a venue's ticket inventory: a YAML document with a
//! `tickets` list of full ticket records, scan history included. `usher scan`
//! hydrates an in-memory ledger from a roster and, with `--record`, persists
//! the updated records back.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use usher_core::Ticket;
use usher_ledger::InMemoryScanLedger;

/// A roster document.
///
/// Ticket records validate on load: a malformed code or timestamp anywhere
/// in the file fails the whole roster rather than silently dropping entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    /// Every ticket the venue knows about.
    #[serde(default)]
    pub tickets: Vec<Ticket>,
}

/// Load a roster from a YAML file.
pub fn load(path: &Path) -> Result<Roster> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read roster {}", path.display()))?;
    let roster: Roster = serde_yaml::from_str(&raw)
        .with_context(|| format!("invalid roster {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        tickets = roster.tickets.len(),
        "roster loaded"
    );
    Ok(roster)
}

/// Write a roster to a YAML file, replacing its contents.
pub fn save(path: &Path, tickets: Vec<Ticket>) -> Result<()> {
    let roster = Roster { tickets };
    let raw = serde_yaml::to_string(&roster)
        .with_context(|| format!("failed to render roster {}", path.display()))?;
    std::fs::write(path, raw)
        .with_context(|| format!("failed to write roster {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        tickets = roster.tickets.len(),
        "roster saved"
    );
    Ok(())
}

/// Hydrate a fresh in-memory ledger from a roster.
pub fn into_ledger(roster: Roster) -> InMemoryScanLedger {
    let ledger = InMemoryScanLedger::new();
    for ticket in roster.tickets {
        ledger.insert(ticket);
    }
    ledger
}
