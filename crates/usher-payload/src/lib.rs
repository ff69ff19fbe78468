//! # Portable Ticket Payload
//!
//! The compact JSON document carried by the physical ticket artifact (printed
//! slip or QR symbol). [`encode`] renders a [`TicketSummary`] into that form;
//! [`decode`] parses it back, rejecting any structural mismatch as
//! [`PayloadError::Malformed`].
//!
//! ## Trust model
//!
//! The payload carries **no signature or MAC**. A well-formed payload proves
//! nothing: anyone can fabricate one around a plausible code. Scanning flows
//! therefore use the decoded document only to recover `code` for a ledger
//! lookup. Every other field (`holderName`, `sessionLabel`, `validUntil`) is
//! display material for the gate screen; the admission decision reads the
//! ledger's stored record, never the payload's claims.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use usher_core::{TicketCode, Timestamp};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Failures in payload encoding and decoding.
#[derive(Error, Debug)]
pub enum PayloadError {
    /// The input is not the JSON document a ticket carries: bad JSON, a
    /// missing or unknown field, a mistyped value, or a malformed embedded
    /// ticket code.
    #[error("malformed ticket payload: {0}")]
    Malformed(String),

    /// The summary could not be rendered to JSON.
    #[error("payload serialization error: {0}")]
    Serialization(#[source] serde_json::Error),
}

// ---------------------------------------------------------------------------
// TicketSummary
// ---------------------------------------------------------------------------

/// The document embedded in a ticket artifact.
///
/// Field order and names are part of the wire form. Unknown fields are
/// rejected on decode so a tampered or truncated symbol fails loudly instead
/// of round-tripping with silent loss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TicketSummary {
    /// The ticket code, the only field scanning flows may trust. Validated
    /// against the code format during decode.
    pub code: TicketCode,
    /// Purchase order this ticket was issued under.
    pub order_reference: String,
    /// Holder name as printed on the artifact. Display only.
    pub holder_name: String,
    /// Human-readable session or event label. Display only.
    pub session_label: String,
    /// Validity deadline as claimed at issue time. Display only; the ledger
    /// record is authoritative.
    pub valid_until: Timestamp,
    /// When this payload was generated.
    pub generated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

/// Render a summary as the compact single-line JSON carried by the artifact.
pub fn encode(summary: &TicketSummary) -> Result<String, PayloadError> {
    serde_json::to_string(summary).map_err(PayloadError::Serialization)
}

/// Parse a payload back into a [`TicketSummary`].
///
/// Any structural mismatch comes back as [`PayloadError::Malformed`]: the
/// caller cannot distinguish a truncated symbol from a fabricated one, and
/// does not need to.
pub fn decode(payload: &str) -> Result<TicketSummary, PayloadError> {
    serde_json::from_str(payload).map_err(|err| PayloadError::Malformed(err.to_string()))
}
