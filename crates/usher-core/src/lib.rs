//! # Usher Core
//!
//! Foundational types for the Usher ticket admission stack. Everything the
//! decision layers operate on lives here: validated identifiers, UTC-only
//! timestamps, ticket status, and the append-only scan history.
//!
//! ## Key Design Principles
//!
//! 1. **Validate at the boundary**: string identifiers ([`TicketCode`],
//!    [`OperatorId`]) check their format at construction, and their
//!    `Deserialize` impls route through the same constructors. A value of
//!    one of these types is well-formed by construction.
//! 2. **UTC-only time**: [`Timestamp`] rejects local offsets on its strict
//!    parse path and truncates to whole seconds, so scan ordering and
//!    window arithmetic never depend on a device's timezone.
//! 3. **Computed, not stored, disqualification**: a [`Ticket`] records only
//!    status, validity deadline, and scan history. Expiry and exhaustion
//!    are derived by the decision layer at evaluation time.
//! 4. **Append-only history**: scan events are only ever appended, in
//!    chronological order. Nothing here reorders or truncates.

pub mod code;
pub mod error;
pub mod temporal;
pub mod ticket;

pub use code::{OperatorId, TicketCode};
pub use error::FormatError;
pub use temporal::Timestamp;
pub use ticket::{ScanEvent, StatusError, Ticket, TicketStatus};
