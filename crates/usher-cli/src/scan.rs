//! # Scan Subcommand
//!
//! The gate-side flow: resolve a ticket code (bare argument or decoded
//! payload), hydrate a ledger from the roster, evaluate under the policy at
//! the scan instant, print the outcome, and map it onto the exit-code
//! contract in the crate root.
//!
//! A malformed code never reaches the roster: format rejection happens
//! before lookup, so the exit code distinguishes "unreadable artifact" from
//! "readable but unknown ticket".

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use usher_core::{OperatorId, TicketCode, Timestamp};
use usher_engine::{ValidationPolicy, ValidationResult};
use usher_ledger::{LedgerError, ScanLedger};

use crate::roster;
use crate::{EXIT_CONTENTION, EXIT_DENIED, EXIT_MALFORMED, EXIT_OK, EXIT_UNKNOWN_TICKET};

/// Arguments for the `usher scan` subcommand.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Ticket code as printed on the artifact (PREFIX-YYYY-NNN).
    #[arg(required_unless_present = "payload", conflicts_with = "payload")]
    pub code: Option<String>,

    /// Scan a portable ticket payload instead of a bare code.
    #[arg(long)]
    pub payload: Option<String>,

    /// Roster file with the venue's ticket records.
    #[arg(long)]
    pub tickets: PathBuf,

    /// Admission policy file.
    #[arg(long)]
    pub policy: PathBuf,

    /// Operator recorded on the scan event.
    #[arg(long)]
    pub operator: OperatorId,

    /// Evaluation instant (RFC 3339, any offset). Defaults to the current time.
    #[arg(long, value_parser = parse_instant)]
    pub at: Option<Timestamp>,

    /// Persist the updated roster after an admission.
    #[arg(long)]
    pub record: bool,

    /// Emit the validation result as JSON.
    #[arg(long)]
    pub json: bool,
}

fn parse_instant(raw: &str) -> Result<Timestamp, String> {
    Timestamp::parse_lenient(raw).map_err(|e| e.to_string())
}

/// Execute the scan subcommand.
pub fn run_scan(args: &ScanArgs) -> Result<u8> {
    // Policy problems fail fast, before any scan input is looked at.
    let policy = ValidationPolicy::from_path(&args.policy)
        .with_context(|| format!("invalid admission policy {}", args.policy.display()))?;

    let code = if let Some(raw_payload) = &args.payload {
        match usher_payload::decode(raw_payload) {
            Ok(summary) => {
                if !args.json {
                    println!("Holder: {}", summary.holder_name);
                    println!("Session: {}", summary.session_label);
                }
                summary.code
            }
            Err(err) => {
                eprintln!("REJECT: {err}");
                return Ok(EXIT_MALFORMED);
            }
        }
    } else {
        match TicketCode::new(args.code.as_deref().unwrap_or_default()) {
            Ok(code) => code,
            Err(err) => {
                eprintln!("REJECT: {err}");
                return Ok(EXIT_MALFORMED);
            }
        }
    };

    let ledger = roster::into_ledger(roster::load(&args.tickets)?);
    let now = args.at.unwrap_or_else(Timestamp::now);

    let result = match ledger.evaluate_and_record(&code, &args.operator, &policy, now) {
        Ok(result) => result,
        Err(err @ LedgerError::UnknownTicket(_)) => {
            eprintln!("REJECT: {err}");
            return Ok(EXIT_UNKNOWN_TICKET);
        }
        Err(err @ LedgerError::Contention(_)) => {
            eprintln!("RETRY: {err}");
            return Ok(EXIT_CONTENTION);
        }
        Err(err) => return Err(err.into()),
    };

    if args.record && result.allow_entry {
        roster::save(&args.tickets, ledger.snapshot_all())?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_outcome(&code, &result, now);
    }

    Ok(if result.allow_entry { EXIT_OK } else { EXIT_DENIED })
}

/// Render the human-readable outcome for the gate screen.
fn print_outcome(code: &TicketCode, result: &ValidationResult, now: Timestamp) {
    let verdict = if result.allow_entry { "ADMIT" } else { "DENY" };
    println!("Ticket: {code}");
    println!("  Decision: {verdict} ({})", result.reason_code);
    println!("  Staff: {}", result.reason_code.staff_message());
    println!(
        "  Scans: {} recorded, {} remaining",
        result.scan_count_after, result.remaining_scans
    );
    if let Some(warning) = &result.warning_message {
        println!("  Warning: {warning}");
    }
    tracing::info!(code = %code, at = %now, verdict, reason = %result.reason_code, "scan complete");
}
