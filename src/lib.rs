// src/lib.rs

//! memrelay: memory orchestration layer for conversational agents.
//!
//! One canonical store, any number of best-effort mirrors. Writes are
//! attempted everywhere, reads merge whatever answered, and PII never
//! leaves the canonical boundary unscrubbed.

pub mod adapter;
pub mod config;
pub mod intent;
pub mod orchestrator;
pub mod redact;
pub mod storage;
pub mod telemetry;

// Re-export commonly used items
pub use adapter::{
    AdapterContext, AdapterRole, Clock, ContextItem, ExecutionResult, ExecutionStatus,
    MemoryAdapter, SystemClock,
};
pub use adapter::registry::build_default_adapters;
pub use config::MemoryConfig;
pub use intent::sanitize::SanitizedIntent;
pub use intent::{ConversationTurn, IntentKind, MemoryIntent, MemoryOp};
pub use orchestrator::{
    AdapterRunReport, OrchestrationStatus, OrchestratorOptions, OrchestratorResult, orchestrate,
    orchestrate_with_options,
};
pub use storage::TurnStore;
