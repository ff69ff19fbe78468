//! # Admission Policy
//!
//! The two process-wide tunables that shape every admission decision:
//! how many times a ticket admits in total, and how many days after the
//! *first* scan reentries stay valid.
//!
//! ## Fail fast
//!
//! Both tunables must be at least 1. A zero value is rejected when the
//! policy is constructed or parsed — before any ticket is evaluated — so
//! the decision function never has to consider a nonsense policy. The
//! `Deserialize` impl routes through the validating constructor; there is
//! no way to smuggle an invalid policy in via a config file.
//!
//! ## Hot reload
//!
//! Venue operations adjust limits between sessions (e.g. festival day
//! passes vs. single-evening events). [`PolicyHandle`] carries the
//! current policy behind a lock; swapping it affects future evaluations
//! only. Recorded scan history is never rewritten to match a new policy.

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating an admission policy.
#[derive(Error, Debug)]
pub enum PolicyError {
    /// `max_scan_count` was zero.
    #[error("max_scan_count must be >= 1, got {0}")]
    InvalidMaxScanCount(u32),

    /// `scan_window_days` was zero.
    #[error("scan_window_days must be >= 1, got {0}")]
    InvalidScanWindowDays(u32),

    /// The policy file could not be read.
    #[error("cannot read policy file {path}: {source}")]
    Io {
        /// Path as given by the caller.
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The policy document could not be parsed, or failed validation
    /// during deserialization.
    #[error("cannot parse policy: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// The admission policy: limits applied to every ticket evaluation.
///
/// Immutable once constructed. Both fields are guaranteed `>= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidationPolicy {
    max_scan_count: u32,
    scan_window_days: u32,
}

impl ValidationPolicy {
    /// Create a policy, validating both tunables.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::InvalidMaxScanCount`] or
    /// [`PolicyError::InvalidScanWindowDays`] if the corresponding value
    /// is zero.
    pub fn new(max_scan_count: u32, scan_window_days: u32) -> Result<Self, PolicyError> {
        if max_scan_count == 0 {
            return Err(PolicyError::InvalidMaxScanCount(max_scan_count));
        }
        if scan_window_days == 0 {
            return Err(PolicyError::InvalidScanWindowDays(scan_window_days));
        }
        Ok(Self {
            max_scan_count,
            scan_window_days,
        })
    }

    /// Parse a policy from a YAML document.
    pub fn from_yaml_str(s: &str) -> Result<Self, PolicyError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Load a policy from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::Io`] if the file cannot be read, or the
    /// parse/validation errors from [`ValidationPolicy::from_yaml_str`].
    pub fn from_path(path: &Path) -> Result<Self, PolicyError> {
        let raw = std::fs::read_to_string(path).map_err(|source| PolicyError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&raw)
    }

    /// Total admissions allowed over the ticket's life. Always `>= 1`.
    pub fn max_scan_count(&self) -> u32 {
        self.max_scan_count
    }

    /// Length of the reentry window in days, anchored on the first scan.
    /// Always `>= 1`.
    pub fn scan_window_days(&self) -> u32 {
        self.scan_window_days
    }
}

/// Unvalidated mirror of the policy document. Deserialization lands here
/// first, then goes through [`ValidationPolicy::new`].
#[derive(Deserialize)]
struct RawPolicy {
    max_scan_count: u32,
    scan_window_days: u32,
}

impl<'de> Deserialize<'de> for ValidationPolicy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawPolicy::deserialize(deserializer)?;
        Self::new(raw.max_scan_count, raw.scan_window_days).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for ValidationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "max_scan_count={} scan_window_days={}",
            self.max_scan_count, self.scan_window_days
        )
    }
}

// ─── PolicyHandle ────────────────────────────────────────────────────

/// Shared handle to the current admission policy.
///
/// Cheap to clone; all clones observe the same policy. Readers take a
/// copy with [`PolicyHandle::current`] — the engine itself only ever sees
/// the copied value, never the lock.
#[derive(Debug, Clone)]
pub struct PolicyHandle {
    inner: Arc<RwLock<ValidationPolicy>>,
}

impl PolicyHandle {
    /// Create a handle holding the given policy.
    pub fn new(policy: ValidationPolicy) -> Self {
        Self {
            inner: Arc::new(RwLock::new(policy)),
        }
    }

    /// Copy out the current policy.
    pub fn current(&self) -> ValidationPolicy {
        *self.inner.read()
    }

    /// Swap in a new policy, returning the previous one.
    ///
    /// Affects future evaluations only; nothing already recorded changes.
    pub fn replace(&self, policy: ValidationPolicy) -> ValidationPolicy {
        let mut guard = self.inner.write();
        let previous = *guard;
        *guard = policy;
        tracing::info!(old = %previous, new = %policy, "admission policy replaced");
        previous
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
