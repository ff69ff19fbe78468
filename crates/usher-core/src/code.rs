//! # Ticket Identity Newtypes
//!
//! Validated string newtypes for the identifiers that cross the admission
//! boundary. A [`TicketCode`] in hand is structurally well-formed; the
//! lexical check happens once, at construction, before any ticket lookup
//! or admission logic runs.
//!
//! ## Validation
//!
//! Both types validate at construction time and deserialize through the
//! same constructors. There is no path to an ill-formed value short of
//! `unsafe`.
//!
//! ## Code shape
//!
//! Ticket codes follow `PREFIX-YYYY-NNN`: an uppercase ASCII letter
//! prefix identifying the issuing venue, a 4-digit issue year, and a
//! 3-digit sequence number (e.g., `JGPNR-2024-001`). The shape check is
//! deliberately exact — no trimming, no case folding. A scanner that
//! produces `jgpnr-2024-001` has a device problem worth surfacing, not
//! silently repairing.

use serde::{Deserialize, Serialize};

use crate::error::FormatError;

/// Helper macro to implement `Deserialize` for string newtypes that must
/// validate their contents. Deserializes as a plain `String`, then routes
/// through the type's `new()` constructor so that invalid values are
/// rejected at deserialization time — not silently accepted.
macro_rules! impl_validating_deserialize {
    ($ty:ident) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// TicketCode
// ---------------------------------------------------------------------------

/// A structurally validated ticket code.
///
/// Format: `PREFIX-YYYY-NNN` — one or more uppercase ASCII letters, a
/// 4-digit year group, a 3-digit sequence group, joined by single dashes.
/// No other characters are permitted.
///
/// # Validation
///
/// - Exactly three dash-separated segments
/// - Prefix: non-empty, uppercase ASCII letters only
/// - Year: exactly 4 ASCII digits
/// - Sequence: exactly 3 ASCII digits
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TicketCode(String);

impl_validating_deserialize!(TicketCode);

impl TicketCode {
    /// Create a ticket code from a string, validating the shape.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::InvalidTicketCode`] if the string does not
    /// match `PREFIX-YYYY-NNN`.
    pub fn new(value: impl Into<String>) -> Result<Self, FormatError> {
        let s = value.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    /// Check the code shape without constructing.
    ///
    /// The precondition form of [`TicketCode::new`], for callers that only
    /// need a verdict on a raw scan.
    pub fn is_well_formed(raw: &str) -> bool {
        Self::validate(raw).is_ok()
    }

    /// Validate the code shape without constructing.
    fn validate(s: &str) -> Result<(), FormatError> {
        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() != 3 {
            return Err(FormatError::InvalidTicketCode(s.to_string()));
        }

        let (prefix, year, sequence) = (parts[0], parts[1], parts[2]);

        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(FormatError::InvalidTicketCode(s.to_string()));
        }
        if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
            return Err(FormatError::InvalidTicketCode(s.to_string()));
        }
        if sequence.len() != 3 || !sequence.chars().all(|c| c.is_ascii_digit()) {
            return Err(FormatError::InvalidTicketCode(s.to_string()));
        }

        Ok(())
    }

    /// Access the full code string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    // A valid code always ends in `-YYYY-NNN` (9 chars), so the segments
    // can be sliced from the right.

    /// The venue prefix segment.
    pub fn prefix(&self) -> &str {
        &self.0[..self.0.len() - 9]
    }

    /// The 4-digit issue year segment.
    pub fn year(&self) -> &str {
        &self.0[self.0.len() - 8..self.0.len() - 4]
    }

    /// The 3-digit sequence segment.
    pub fn sequence(&self) -> &str {
        &self.0[self.0.len() - 3..]
    }
}

impl std::fmt::Display for TicketCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TicketCode {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ---------------------------------------------------------------------------
// OperatorId
// ---------------------------------------------------------------------------

/// The identifier of the actor performing a scan: a gate terminal, a
/// handheld scanner, or a staff login (e.g., `GATE-2`, `scanner-07`).
///
/// This is an *identifier*, not an authenticated principal — operator
/// authentication happens outside this stack. The id is carried verbatim
/// into scan history for audit.
///
/// # Validation
///
/// - 1 to 64 characters after trimming surrounding whitespace
/// - Printable ASCII only, no embedded whitespace
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct OperatorId(String);

impl_validating_deserialize!(OperatorId);

impl OperatorId {
    /// Create an operator id, validating format.
    ///
    /// Surrounding whitespace is trimmed before validation.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::InvalidOperatorId`] if the trimmed value is
    /// empty, longer than 64 characters, or contains anything other than
    /// printable ASCII.
    pub fn new(value: impl Into<String>) -> Result<Self, FormatError> {
        let raw = value.into();
        let trimmed = raw.trim();

        if trimmed.is_empty() || trimmed.len() > 64 {
            return Err(FormatError::InvalidOperatorId(raw));
        }
        if !trimmed.chars().all(|c| c.is_ascii_graphic()) {
            return Err(FormatError::InvalidOperatorId(raw));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Access the operator id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OperatorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for OperatorId {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- TicketCode --

    #[test]
    fn code_valid_examples() {
        assert!(TicketCode::new("JGPNR-2024-001").is_ok());
        assert!(TicketCode::new("X-0000-000").is_ok());
        assert!(TicketCode::new("OPENAIR-1999-999").is_ok());
    }

    #[test]
    fn code_is_well_formed_matches_new() {
        assert!(TicketCode::is_well_formed("JGPNR-2024-001"));
        assert!(!TicketCode::is_well_formed("jgpnr-2024-001"));
        assert!(!TicketCode::is_well_formed(""));
    }

    #[test]
    fn code_segment_extraction() {
        let code = TicketCode::new("JGPNR-2024-001").unwrap();
        assert_eq!(code.prefix(), "JGPNR");
        assert_eq!(code.year(), "2024");
        assert_eq!(code.sequence(), "001");
        assert_eq!(code.as_str(), "JGPNR-2024-001");
    }

    #[test]
    fn code_rejects_wrong_segment_count() {
        assert!(TicketCode::new("").is_err());
        assert!(TicketCode::new("JGPNR-2024").is_err());
        assert!(TicketCode::new("JGPNR-2024-001-7").is_err());
        assert!(TicketCode::new("JGPNR-2024-001-").is_err()); // trailing dash
    }

    #[test]
    fn code_rejects_bad_prefix() {
        assert!(TicketCode::new("-2024-001").is_err()); // empty prefix
        assert!(TicketCode::new("jgpnr-2024-001").is_err()); // lowercase
        assert!(TicketCode::new("JGP1R-2024-001").is_err()); // digit in prefix
        assert!(TicketCode::new("JGPÑR-2024-001").is_err()); // non-ASCII
    }

    #[test]
    fn code_rejects_bad_digit_groups() {
        assert!(TicketCode::new("JGPNR-24-001").is_err()); // 2-digit year
        assert!(TicketCode::new("JGPNR-20245-001").is_err()); // 5-digit year
        assert!(TicketCode::new("JGPNR-2024-01").is_err()); // 2-digit sequence
        assert!(TicketCode::new("JGPNR-2024-0001").is_err()); // 4-digit sequence
        assert!(TicketCode::new("JGPNR-2O24-001").is_err()); // letter O, not zero
        assert!(TicketCode::new("JGPNR-2024-0O1").is_err());
    }

    #[test]
    fn code_rejects_surrounding_noise() {
        assert!(TicketCode::new(" JGPNR-2024-001").is_err());
        assert!(TicketCode::new("JGPNR-2024-001 ").is_err());
        assert!(TicketCode::new("JGPNR- 2024-001").is_err());
    }

    #[test]
    fn code_display() {
        let code = TicketCode::new("JGPNR-2024-001").unwrap();
        assert_eq!(format!("{code}"), "JGPNR-2024-001");
    }

    #[test]
    fn code_from_str() {
        let code: TicketCode = "JGPNR-2024-042".parse().unwrap();
        assert_eq!(code.sequence(), "042");
        assert!("nope".parse::<TicketCode>().is_err());
    }

    #[test]
    fn code_serde_roundtrip() {
        let code = TicketCode::new("JGPNR-2024-001").unwrap();
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "\"JGPNR-2024-001\"");
        let parsed: TicketCode = serde_json::from_str(&json).unwrap();
        assert_eq!(code, parsed);
    }

    #[test]
    fn code_deserialize_rejects_malformed() {
        let result: Result<TicketCode, _> = serde_json::from_str("\"JGPNR-24-1\"");
        assert!(result.is_err());
    }

    // -- OperatorId --

    #[test]
    fn operator_valid_examples() {
        assert!(OperatorId::new("GATE-2").is_ok());
        assert!(OperatorId::new("scanner-07").is_ok());
        assert!(OperatorId::new("anna.k").is_ok());
    }

    #[test]
    fn operator_trims_whitespace() {
        let op = OperatorId::new("  GATE-2  ").unwrap();
        assert_eq!(op.as_str(), "GATE-2");
    }

    #[test]
    fn operator_rejects_invalid() {
        assert!(OperatorId::new("").is_err());
        assert!(OperatorId::new("   ").is_err());
        assert!(OperatorId::new("gate 2").is_err()); // embedded space
        assert!(OperatorId::new("tab\there").is_err());
        assert!(OperatorId::new("ünïcode").is_err());
        assert!(OperatorId::new("x".repeat(65)).is_err());
    }

    #[test]
    fn operator_boundary_length() {
        assert!(OperatorId::new("x".repeat(64)).is_ok());
    }

    #[test]
    fn operator_serde_roundtrip() {
        let op = OperatorId::new("GATE-2").unwrap();
        let json = serde_json::to_string(&op).unwrap();
        let parsed: OperatorId = serde_json::from_str(&json).unwrap();
        assert_eq!(op, parsed);
    }
}
