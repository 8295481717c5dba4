// src/intent/sanitize.rs

//! Derives the intent pair the orchestrator delivers: full fidelity for the
//! canonical store, scrubbed for everything else.
//!
//! The canonical backend is trusted with raw content because it is the
//! access-controlled system of record. Secondary backends may have broader
//! operational access or forward data to third parties, so they only ever
//! see the redacted variant.

use std::sync::Arc;

use crate::intent::{MemoryIntent, MemoryOp};
use crate::redact::redact;

/// The two intent variants produced for one orchestration call.
#[derive(Debug, Clone)]
pub struct SanitizedIntent {
    /// Untouched original, delivered to the canonical adapter only.
    pub canonical: Arc<MemoryIntent>,
    /// Variant delivered to every non-canonical adapter.
    pub secondary: Arc<MemoryIntent>,
    /// True when the secondary variant had PII masked out of it.
    pub pii_scrubbed: bool,
}

impl SanitizedIntent {
    /// Only `TurnCommitted` carries free text; every other op aliases the
    /// original on both sides. When a committed turn contains no detectable
    /// PII both sides alias the input as well, with no new allocation.
    pub fn build(intent: Arc<MemoryIntent>) -> Self {
        let MemoryOp::TurnCommitted { turn } = &intent.op else {
            return Self::unscrubbed(intent);
        };

        let redaction = redact(&turn.content);
        if !redaction.had_pii {
            return Self::unscrubbed(intent);
        }

        let mut scrubbed_turn = turn.clone();
        scrubbed_turn.content = redaction.redacted;

        let secondary = MemoryIntent {
            session_id: intent.session_id.clone(),
            user_id: intent.user_id.clone(),
            op: MemoryOp::TurnCommitted { turn: scrubbed_turn },
        };

        Self {
            canonical: intent,
            secondary: Arc::new(secondary),
            pii_scrubbed: true,
        }
    }

    fn unscrubbed(intent: Arc<MemoryIntent>) -> Self {
        Self {
            canonical: Arc::clone(&intent),
            secondary: intent,
            pii_scrubbed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::ConversationTurn;
    use crate::redact::REDACTION_MARKER;

    #[test]
    fn test_non_turn_ops_alias_original() {
        let intent = Arc::new(MemoryIntent::sync_session("s1", "u1"));
        let sanitized = SanitizedIntent::build(Arc::clone(&intent));

        assert!(!sanitized.pii_scrubbed);
        assert!(Arc::ptr_eq(&sanitized.canonical, &intent));
        assert!(Arc::ptr_eq(&sanitized.secondary, &intent));
    }

    #[test]
    fn test_clean_turn_aliases_original() {
        let turn = ConversationTurn::new("user", "nothing sensitive here");
        let intent = Arc::new(MemoryIntent::turn_committed("s1", "u1", turn));
        let sanitized = SanitizedIntent::build(Arc::clone(&intent));

        assert!(!sanitized.pii_scrubbed);
        assert!(Arc::ptr_eq(&sanitized.canonical, &sanitized.secondary));
    }

    #[test]
    fn test_pii_turn_scrubs_secondary_only() {
        let turn = ConversationTurn::new("user", "email me at a@b.com");
        let intent = Arc::new(MemoryIntent::turn_committed("s1", "u1", turn));
        let sanitized = SanitizedIntent::build(Arc::clone(&intent));

        assert!(sanitized.pii_scrubbed);
        assert!(Arc::ptr_eq(&sanitized.canonical, &intent));
        assert!(!Arc::ptr_eq(&sanitized.secondary, &intent));

        let MemoryOp::TurnCommitted { turn: canonical_turn } = &sanitized.canonical.op else {
            panic!("canonical op changed shape");
        };
        let MemoryOp::TurnCommitted { turn: secondary_turn } = &sanitized.secondary.op else {
            panic!("secondary op changed shape");
        };

        assert_eq!(canonical_turn.content, "email me at a@b.com");
        assert!(secondary_turn.content.contains(REDACTION_MARKER));
        assert!(!secondary_turn.content.contains("a@b.com"));
    }

    #[test]
    fn test_kind_is_preserved_across_scrub() {
        let turn = ConversationTurn::new("user", "call +1 555 010 2233");
        let intent = Arc::new(MemoryIntent::turn_committed("s1", "u1", turn));
        let sanitized = SanitizedIntent::build(intent);

        assert_eq!(sanitized.canonical.kind(), sanitized.secondary.kind());
    }
}
