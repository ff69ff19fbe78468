//! Scan ledger: the stateful half of admission control.
//!
//! [`usher_engine::evaluate`] is a pure function over a ticket snapshot. The
//! ledger wraps it with the two things a live gate needs and the engine
//! deliberately lacks:
//!
//! 1. **Lookup.** Scanners submit a ticket code; the ledger resolves it to the
//!    current record or reports [`LedgerError::UnknownTicket`].
//! 2. **Atomicity.** Evaluating a ticket and appending the resulting scan
//!    event must happen under one per-ticket critical section. Without it,
//!    two gates racing on the last remaining admission would both observe the
//!    old scan count and both wave the holder through.
//!
//! The trait is deliberately narrow: one operation, [`ScanLedger::evaluate_and_record`].
//! Hydration, snapshots and administrative transitions are concrete methods on
//! the backing store ([`InMemoryScanLedger`]) because they are operational
//! concerns, not part of the gate-side contract.

pub mod memory;

pub use memory::InMemoryScanLedger;

use thiserror::Error;

use usher_core::{OperatorId, StatusError, TicketCode, Timestamp};
use usher_engine::{ValidationPolicy, ValidationResult};

/// Failures surfaced by ledger operations.
///
/// A domain denial (expired, exhausted, blocked) is **not** an error: it comes
/// back as a successful [`ValidationResult`] with `allow_entry = false`. This
/// enum covers the cases where no decision could be produced at all.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The code is well formed but no ticket with it exists in the ledger.
    #[error("unknown ticket {0}")]
    UnknownTicket(String),

    /// The per-ticket lock could not be acquired within the configured
    /// timeout. The scan was neither evaluated nor recorded; the caller
    /// should retry.
    #[error("contention on ticket {0}: scan not recorded, retry")]
    Contention(String),

    /// An administrative status change was rejected by the ticket record.
    #[error(transparent)]
    Status(#[from] StatusError),
}

impl LedgerError {
    /// True when the operation failed transiently and can be retried as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Contention(_))
    }
}

/// Atomic admission check against live ticket state.
pub trait ScanLedger: Send + Sync {
    /// Evaluate the ticket identified by `code` under `policy` at instant
    /// `now`, and if entry is allowed, append a scan event attributed to
    /// `operator` before releasing the ticket.
    ///
    /// The returned [`ValidationResult`] already reflects the recorded scan:
    /// on an admission `scan_count_after` counts the event this call just
    /// appended. A denial leaves the ticket untouched.
    fn evaluate_and_record(
        &self,
        code: &TicketCode,
        operator: &OperatorId,
        policy: &ValidationPolicy,
        now: Timestamp,
    ) -> Result<ValidationResult, LedgerError>;
}
