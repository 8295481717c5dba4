// src/redact.rs

//! PII detection and masking for text leaving the canonical boundary.
//!
//! A best-effort screen over three pattern classes: email addresses, loose
//! phone numbers, and card-like digit runs. Not a classifier: false
//! negatives are expected and false positives are tolerated in favor of
//! safety.

use once_cell::sync::Lazy;
use regex::Regex;

/// Marker substituted for every detected PII span.
pub const REDACTION_MARKER: &str = "[REDACTED]";

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());

/// Loose phone shape: optional leading `+`, then 7+ digit/separator characters.
static PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\+?\d[\d\s().-]{5,}\d").unwrap());

/// Card-like runs: 13-16 digits, optionally grouped by spaces or hyphens.
static CARD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d(?:[ -]?\d){12,15}\b").unwrap());

/// Outcome of one redaction pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redaction {
    /// True iff at least one replacement occurred across any pattern.
    pub had_pii: bool,
    /// Input text with every match replaced by [`REDACTION_MARKER`].
    pub redacted: String,
}

/// Apply the three pattern classes in sequence, replacing every match.
/// Pure function with no shared state; safe to call concurrently.
pub fn redact(text: &str) -> Redaction {
    let mut redacted = text.to_string();
    let mut had_pii = false;

    for pattern in [&*EMAIL, &*PHONE, &*CARD] {
        if pattern.is_match(&redacted) {
            redacted = pattern.replace_all(&redacted, REDACTION_MARKER).into_owned();
            had_pii = true;
        }
    }

    Redaction { had_pii, redacted }
}
