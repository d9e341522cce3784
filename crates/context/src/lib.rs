//! Context assembly — the single string handed to inference.
//!
//! Two sources feed the combined context:
//!
//! 1. **Expertise entries** — one per loaded plugin, keyed by plugin name.
//!    Present iff the plugin is currently loaded; no ordering of their own
//!    (rendered in name order for determinism).
//! 2. **Conversation entries** — a bounded stack, most-recent-last, with
//!    FIFO eviction at the bound. Only the most recent `recency_window`
//!    entries make it into the combined string; the stack bound is a
//!    separate, coarser knob.
//!
//! Assembly is deterministic: the same stack and expertise map always
//! produce the same combined string.

pub mod assembler;

pub use assembler::{ContextAssembler, ContextConfig, ConversationEntry, ExpertiseEntry};
