//! # usher-cli — Gate Tool for the Usher Admission Stack
//!
//! Provides the `usher` command-line interface used at venue gates and in
//! box-office tooling.
//!
//! ## Subcommands
//!
//! - `usher scan` — Validate a ticket code or payload against a roster and
//!   policy, optionally recording the admission.
//! - `usher payload` — Encode and decode the portable ticket payload.
//! - `usher policy` — Check and scaffold admission policy files.
//!
//! ## Exit codes
//!
//! The scan loop at a gate branches on the process exit code, so the codes
//! are part of the interface:
//!
//! | Code | Meaning                                             |
//! |------|-----------------------------------------------------|
//! | 0    | Admitted (or non-scan command succeeded)            |
//! | 1    | Operational error (I/O, bad policy file)            |
//! | 2    | Malformed ticket code or payload                    |
//! | 3    | Code is well formed but unknown to the roster       |
//! | 4    | Admission denied by the validation rules            |
//! | 5    | Ledger contention; the scan was dropped, retry      |

pub mod payload;
pub mod policy;
pub mod roster;
pub mod scan;

/// Admitted, or a non-scan command completed.
pub const EXIT_OK: u8 = 0;
/// Operational failure: missing file, unreadable roster, invalid policy.
pub const EXIT_OPERATIONAL: u8 = 1;
/// The scanned code or payload is structurally malformed.
pub const EXIT_MALFORMED: u8 = 2;
/// The code is well formed but the roster has no such ticket.
pub const EXIT_UNKNOWN_TICKET: u8 = 3;
/// The validation rules denied entry.
pub const EXIT_DENIED: u8 = 4;
/// The ticket entry stayed locked past the contention timeout.
pub const EXIT_CONTENTION: u8 = 5;
