//! # Usher Engine
//!
//! The decision layer of the admission stack. Two pieces:
//!
//! - [`ValidationPolicy`] — the process-wide admission tunables (total
//!   admissions per ticket, reentry window length), validated when loaded
//!   and hot-swappable through a [`PolicyHandle`].
//! - [`evaluate`] — the pure decision function. Given a ticket snapshot,
//!   a policy, and an explicit evaluation instant, it applies the
//!   disqualification rules in fixed priority order and returns a
//!   [`ValidationResult`] with a closed [`ReasonCode`].
//!
//! The engine holds no state, performs no I/O, and never reads a clock.
//! Recording accepted scans is the ledger's job, one layer up.

pub mod decision;
pub mod policy;

pub use decision::{evaluate, ReasonCode, ValidationResult};
pub use policy::{PolicyError, PolicyHandle, ValidationPolicy};
