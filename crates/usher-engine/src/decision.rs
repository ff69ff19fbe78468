//! # Admission Decision
//!
//! The single decision function of the stack: [`evaluate`] maps a ticket
//! snapshot, a policy, and an evaluation instant to a [`ValidationResult`].
//!
//! ## Rule order
//!
//! Disqualification checks run in fixed priority order and short-circuit
//! at the first match. The order is deliberate — a cancelled ticket
//! reports `STATUS_BLOCKED` even when it is also past its validity date,
//! because the administrative verdict is the one gate staff must act on:
//!
//! 1. **Status gate** — `CANCELLED`/`INVALID` → [`ReasonCode::StatusBlocked`]
//! 2. **Absolute expiry** — `now` past `valid_until` → [`ReasonCode::Expired`]
//! 3. **Count exhaustion** — history at the policy limit →
//!    [`ReasonCode::MaxScansExceeded`]
//! 4. **Reentry window** — `now` past first scan + window →
//!    [`ReasonCode::WindowExpired`]
//! 5. Otherwise admit, with an advisory warning when the window closes
//!    within [`WARNING_THRESHOLD_DAYS`].
//!
//! ## Purity
//!
//! `evaluate` never mutates its inputs, performs no I/O, and takes `now`
//! as an explicit argument rather than reading a clock. Identical inputs
//! produce identical results; any number of callers may run it
//! concurrently. Appending the accepted scan is the ledger's job.

use serde::{Deserialize, Serialize};

use usher_core::{Ticket, Timestamp};

use crate::policy::ValidationPolicy;

/// An admit result warns when the reentry window closes within this many
/// days, so staff can tell holders their remaining reentry time.
pub const WARNING_THRESHOLD_DAYS: i64 = 3;

// ---------------------------------------------------------------------------
// ReasonCode
// ---------------------------------------------------------------------------

/// The closed set of admission outcomes.
///
/// Denial reasons are distinct so staff can act on them: "already used
/// up" (buy a new ticket) calls for a different conversation than "too
/// late to reuse" (the window after first entry has closed). Callers can
/// match exhaustively; localized display strings can hang off the
/// variants without string comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    /// Entry granted.
    Valid,
    /// The ticket is cancelled or administratively invalidated.
    StatusBlocked,
    /// The evaluation instant is past the ticket's absolute validity
    /// deadline.
    Expired,
    /// Every admission on the ticket has been used.
    MaxScansExceeded,
    /// The reentry window anchored on the first scan has closed.
    WindowExpired,
}

impl ReasonCode {
    /// Whether this reason denies entry.
    pub fn is_denial(self) -> bool {
        !matches!(self, Self::Valid)
    }

    /// Short human-readable explanation for gate staff.
    pub fn staff_message(self) -> &'static str {
        match self {
            Self::Valid => "entry approved",
            Self::StatusBlocked => "ticket is cancelled or invalidated",
            Self::Expired => "ticket validity period has ended",
            Self::MaxScansExceeded => "all admissions on this ticket have been used",
            Self::WindowExpired => "reentry window after first entry has closed",
        }
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Valid => "VALID",
            Self::StatusBlocked => "STATUS_BLOCKED",
            Self::Expired => "EXPIRED",
            Self::MaxScansExceeded => "MAX_SCANS_EXCEEDED",
            Self::WindowExpired => "WINDOW_EXPIRED",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// ValidationResult
// ---------------------------------------------------------------------------

/// The outcome of one admission evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// The actionable decision: open the gate or not.
    pub allow_entry: bool,
    /// Why.
    pub reason_code: ReasonCode,
    /// On an admission: the scan count once this admission is recorded.
    /// On a denial: the count already on record (nothing gets recorded).
    pub scan_count_after: u32,
    /// Admissions left after this one. Zero on every denial.
    pub remaining_scans: u32,
    /// Advisory near-closure notice. Present only on an admission with
    /// the reentry window closing within [`WARNING_THRESHOLD_DAYS`];
    /// never affects `allow_entry`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning_message: Option<String>,
}

fn denied(reason_code: ReasonCode, scans_on_record: u32) -> ValidationResult {
    ValidationResult {
        allow_entry: false,
        reason_code,
        scan_count_after: scans_on_record,
        remaining_scans: 0,
        warning_message: None,
    }
}

// ---------------------------------------------------------------------------
// evaluate
// ---------------------------------------------------------------------------

/// Decide admission for `ticket` under `policy` at the instant `now`.
///
/// Pure and deterministic: no mutation, no I/O, no ambient clock. The
/// caller supplies `now` so the decision is reproducible after the fact.
///
/// The returned counts describe the state this admission produces; on a
/// denial they describe the unchanged record. Recording the accepted
/// scan — and holding the per-ticket lock that makes the count reliable
/// under concurrent scans — belongs to the ledger, not here.
pub fn evaluate(ticket: &Ticket, policy: &ValidationPolicy, now: Timestamp) -> ValidationResult {
    let on_record = ticket.scan_count();

    // 1. Status gate. Administrative verdicts outrank every time or
    //    count rule.
    if ticket.status.is_terminal() {
        return denied(ReasonCode::StatusBlocked, on_record);
    }

    // 2. Absolute expiry. Strictly after the deadline; a scan at the
    //    exact deadline instant still admits.
    if now > ticket.valid_until {
        return denied(ReasonCode::Expired, on_record);
    }

    // 3. Count exhaustion.
    if on_record >= policy.max_scan_count() {
        return denied(ReasonCode::MaxScansExceeded, on_record);
    }

    // 4. Reentry window, anchored on the first recorded scan. Not
    //    applicable before any scan exists.
    let mut warning_message = None;
    if let Some(first_scan) = ticket.first_scan_at() {
        let window_end = first_scan.add_days(policy.scan_window_days());
        if now > window_end {
            return denied(ReasonCode::WindowExpired, on_record);
        }
        let time_left = window_end.since(now);
        if time_left <= chrono::Duration::days(WARNING_THRESHOLD_DAYS) {
            warning_message = Some(closing_soon_message(time_left));
        }
    }

    // 5. Admit. Counts account for the scan the ledger is about to
    //    record; rule 3 guarantees on_record < max_scan_count here.
    let scan_count_after = on_record + 1;
    ValidationResult {
        allow_entry: true,
        reason_code: ReasonCode::Valid,
        scan_count_after,
        remaining_scans: policy.max_scan_count() - scan_count_after,
        warning_message,
    }
}

/// Advisory text for an admission close to the end of its reentry
/// window. Whole days, rounded down.
fn closing_soon_message(time_left: chrono::Duration) -> String {
    match time_left.num_days() {
        0 => "reentry window closes today".to_string(),
        1 => "reentry window closes in 1 day".to_string(),
        days => format!("reentry window closes in {days} days"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
