//! # Ticket Records & Status Lifecycle
//!
//! The stored shape of a ticket: administrative status, validity deadline,
//! and the append-only scan history. Disqualification states (expired,
//! used up, reentry window closed) are *computed* by the decision layer,
//! never stored here — the record holds only what actually happened.
//!
//! ## Status
//!
//! ```text
//! ACTIVE ──▶ CANCELLED (terminal)
//!    │
//!    └─────▶ INVALID   (terminal)
//! ```
//!
//! Status changes are administrative actions (refund, fraud flag), not
//! part of the scan flow. Once a ticket is `CANCELLED` or `INVALID` it
//! never returns to `ACTIVE`.
//!
//! ## Wire form
//!
//! Records serialize with camelCase field names (`validUntil`,
//! `scanHistory`, `scannedAt`, `scannedBy`) to match the payload format
//! carried on printed symbols and the roster files the tooling reads.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::code::{OperatorId, TicketCode};
use crate::temporal::Timestamp;

// ─── Ticket Status ───────────────────────────────────────────────────

/// The administrative status of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    /// The ticket is live and may be admitted, subject to the time and
    /// count rules.
    Active,
    /// The ticket was cancelled (e.g., refunded). Terminal.
    Cancelled,
    /// The ticket was administratively invalidated (e.g., fraud). Terminal.
    Invalid,
}

impl TicketStatus {
    /// Whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Invalid)
    }

    /// Whether the ticket is administratively live.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Active => "ACTIVE",
            Self::Cancelled => "CANCELLED",
            Self::Invalid => "INVALID",
        };
        f.write_str(s)
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors from administrative status transitions.
#[derive(Error, Debug)]
pub enum StatusError {
    /// The ticket is already in a terminal status.
    #[error("ticket {code} is {status}: terminal status cannot change")]
    Terminal {
        /// The ticket code.
        code: String,
        /// The current (terminal) status.
        status: String,
    },
}

// ─── Scan Events ─────────────────────────────────────────────────────

/// One recorded admission scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanEvent {
    /// When the scan was accepted.
    pub scanned_at: Timestamp,
    /// The gate terminal or staff login that performed the scan.
    pub scanned_by: OperatorId,
}

impl ScanEvent {
    /// Create a scan event.
    pub fn new(scanned_at: Timestamp, scanned_by: OperatorId) -> Self {
        Self {
            scanned_at,
            scanned_by,
        }
    }
}

// ─── Ticket ──────────────────────────────────────────────────────────

/// A ticket as held by the system of record.
///
/// Issued `ACTIVE` with an empty history; mutated only by appended scan
/// events and administrative status changes. Never deleted — a fully used
/// or out-of-window ticket keeps its record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// The validated ticket code. Immutable once issued.
    pub code: TicketCode,
    /// Administrative status.
    pub status: TicketStatus,
    /// Absolute deadline after which the ticket is unusable regardless of
    /// scan history.
    pub valid_until: Timestamp,
    /// Accepted scans, oldest first. Append-only: entries are never
    /// reordered, rewritten, or truncated.
    #[serde(default)]
    pub scan_history: Vec<ScanEvent>,
}

impl Ticket {
    /// Create a freshly issued ticket: `ACTIVE`, empty scan history.
    pub fn issued(code: TicketCode, valid_until: Timestamp) -> Self {
        Self {
            code,
            status: TicketStatus::Active,
            valid_until,
            scan_history: Vec::new(),
        }
    }

    /// Number of scans on record.
    ///
    /// Saturates at `u32::MAX`; a real history is orders of magnitude
    /// smaller than either bound.
    pub fn scan_count(&self) -> u32 {
        u32::try_from(self.scan_history.len()).unwrap_or(u32::MAX)
    }

    /// The instant of the first accepted scan, if any. Anchors the
    /// reentry window.
    pub fn first_scan_at(&self) -> Option<Timestamp> {
        self.scan_history.first().map(|event| event.scanned_at)
    }

    /// Append an accepted scan to the history.
    ///
    /// Callers are expected to have run the admission decision first;
    /// this method records, it does not judge.
    pub fn append_scan(&mut self, event: ScanEvent) {
        self.scan_history.push(event);
    }

    /// Cancel the ticket (ACTIVE → CANCELLED). Administrative action,
    /// e.g. on refund.
    pub fn cancel(&mut self) -> Result<(), StatusError> {
        self.require_active()?;
        self.status = TicketStatus::Cancelled;
        Ok(())
    }

    /// Invalidate the ticket (ACTIVE → INVALID). Administrative action,
    /// e.g. on a fraud flag.
    pub fn invalidate(&mut self) -> Result<(), StatusError> {
        self.require_active()?;
        self.status = TicketStatus::Invalid;
        Ok(())
    }

    /// Validate that the ticket can still change status. `ACTIVE` is the
    /// only non-terminal status, so this doubles as the terminal guard.
    fn require_active(&self) -> Result<(), StatusError> {
        if self.status.is_terminal() {
            return Err(StatusError::Terminal {
                code: self.code.to_string(),
                status: self.status.to_string(),
            });
        }
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
