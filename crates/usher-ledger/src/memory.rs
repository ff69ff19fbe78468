//! In-memory scan ledger backed by a concurrent map.
//!
//! One entry per ticket code. `evaluate_and_record` runs read, evaluation and
//! append under a single entry lock, so concurrent scans of the same code
//! serialize and each one observes the history left by the previous one.
//! Scans of unrelated codes do not wait on each other.
//!
//! The entry lock is only ever held for the duration of a pure evaluation and
//! a vector push. If it still cannot be acquired within the contention
//! timeout, the scan is abandoned with [`LedgerError::Contention`] rather than
//! stalling a gate queue behind a stuck caller.

use std::fmt;
use std::time::{Duration, Instant};

use dashmap::try_result::TryResult;
use dashmap::DashMap;

use usher_core::{OperatorId, ScanEvent, Ticket, TicketCode, Timestamp};
use usher_engine::{evaluate, ValidationPolicy, ValidationResult};

use crate::{LedgerError, ScanLedger};

/// How long `evaluate_and_record` keeps retrying a locked entry before
/// reporting contention. Entry locks are held for microseconds, so anything
/// near this bound means a caller is wedged.
const DEFAULT_CONTENTION_TIMEOUT: Duration = Duration::from_millis(50);

/// Poll interval while an entry is locked by another scanner.
const CONTENTION_RETRY_INTERVAL: Duration = Duration::from_millis(1);

/// Concurrent in-memory ticket store.
pub struct InMemoryScanLedger {
    tickets: DashMap<TicketCode, Ticket>,
    contention_timeout: Duration,
}

impl InMemoryScanLedger {
    /// Empty ledger with the default contention timeout.
    pub fn new() -> Self {
        Self::with_contention_timeout(DEFAULT_CONTENTION_TIMEOUT)
    }

    /// Empty ledger that gives up on a locked entry after `timeout`.
    pub fn with_contention_timeout(timeout: Duration) -> Self {
        Self {
            tickets: DashMap::new(),
            contention_timeout: timeout,
        }
    }

    /// Issue a fresh ACTIVE ticket with an empty scan history and store it.
    ///
    /// Replaces any existing record under the same code, so callers hydrating
    /// from a roster must treat the roster as the source of truth.
    pub fn issue(&self, code: TicketCode, valid_until: Timestamp) -> Ticket {
        let ticket = Ticket::issued(code.clone(), valid_until);
        self.tickets.insert(code, ticket.clone());
        ticket
    }

    /// Store a fully formed ticket record, replacing any existing one with
    /// the same code. Used to hydrate the ledger from persisted rosters.
    pub fn insert(&self, ticket: Ticket) {
        self.tickets.insert(ticket.code.clone(), ticket);
    }

    /// Point-in-time copy of a ticket record, if present.
    pub fn snapshot(&self, code: &TicketCode) -> Option<Ticket> {
        self.tickets.get(code).map(|entry| entry.value().clone())
    }

    /// Point-in-time copy of every ticket record, ordered by code.
    ///
    /// Entries are copied shard by shard, so records mutated mid-iteration
    /// may appear in either state. Used to persist the ledger back to a
    /// roster once scanning has quiesced.
    pub fn snapshot_all(&self) -> Vec<Ticket> {
        let mut tickets: Vec<Ticket> = self
            .tickets
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        tickets.sort_by(|a, b| a.code.as_str().cmp(b.code.as_str()));
        tickets
    }

    /// Number of tickets in the ledger.
    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    /// True when the ledger holds no tickets.
    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    /// Administratively cancel a ticket. Every later scan of it is denied
    /// with a status block.
    pub fn cancel(&self, code: &TicketCode) -> Result<Ticket, LedgerError> {
        let mut entry = self
            .tickets
            .get_mut(code)
            .ok_or_else(|| LedgerError::UnknownTicket(code.to_string()))?;
        let ticket = entry.value_mut();
        ticket.cancel()?;
        tracing::info!(code = %code, "ticket cancelled");
        Ok(ticket.clone())
    }

    /// Administratively mark a ticket invalid. Every later scan of it is
    /// denied with a status block.
    pub fn invalidate(&self, code: &TicketCode) -> Result<Ticket, LedgerError> {
        let mut entry = self
            .tickets
            .get_mut(code)
            .ok_or_else(|| LedgerError::UnknownTicket(code.to_string()))?;
        let ticket = entry.value_mut();
        ticket.invalidate()?;
        tracing::info!(code = %code, "ticket invalidated");
        Ok(ticket.clone())
    }
}

impl ScanLedger for InMemoryScanLedger {
    fn evaluate_and_record(
        &self,
        code: &TicketCode,
        operator: &OperatorId,
        policy: &ValidationPolicy,
        now: Timestamp,
    ) -> Result<ValidationResult, LedgerError> {
        let deadline = Instant::now() + self.contention_timeout;
        loop {
            match self.tickets.try_get_mut(code) {
                TryResult::Present(mut entry) => {
                    let ticket = entry.value_mut();
                    let result = evaluate(ticket, policy, now);
                    if result.allow_entry {
                        ticket.append_scan(ScanEvent::new(now, operator.clone()));
                        tracing::debug!(
                            code = %code,
                            operator = %operator,
                            scans = ticket.scan_count(),
                            remaining = result.remaining_scans,
                            "admission recorded"
                        );
                    } else {
                        tracing::debug!(
                            code = %code,
                            operator = %operator,
                            reason = %result.reason_code,
                            "admission denied"
                        );
                    }
                    return Ok(result);
                }
                TryResult::Absent => {
                    return Err(LedgerError::UnknownTicket(code.to_string()));
                }
                TryResult::Locked => {
                    if Instant::now() >= deadline {
                        tracing::warn!(
                            code = %code,
                            timeout_ms = self.contention_timeout.as_millis() as u64,
                            "ticket entry still locked at deadline, abandoning scan"
                        );
                        return Err(LedgerError::Contention(code.to_string()));
                    }
                    std::thread::sleep(CONTENTION_RETRY_INTERVAL);
                }
            }
        }
    }
}

impl Default for InMemoryScanLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InMemoryScanLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryScanLedger")
            .field("tickets_count", &self.tickets.len())
            .field("contention_timeout", &self.contention_timeout)
            .finish()
    }
}
