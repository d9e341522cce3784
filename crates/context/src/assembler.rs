//! The context assembler.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use tracing::{debug, info};

/// Context assembly knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Maximum conversation entries held on the stack. Pushing beyond this
    /// evicts the oldest entry first.
    pub max_stack_entries: usize,

    /// How many of the most recent conversation entries are included in the
    /// combined context string.
    pub recency_window: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_stack_entries: 50,
            recency_window: 5,
        }
    }
}

/// One conversation turn on the stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEntry {
    /// The entry text.
    pub text: String,

    /// Monotonic insertion order, unique within one assembler instance.
    pub inserted_at: u64,
}

/// One loaded plugin's contribution to the combined context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpertiseEntry {
    /// The owning plugin.
    pub plugin_name: String,

    /// A one-line summary of what the plugin contributes.
    pub summary: String,
}

/// Builds the combined context string from recent conversation and active
/// expertise. Owns both collections exclusively; not internally
/// synchronized.
pub struct ContextAssembler {
    config: ContextConfig,
    stack: VecDeque<ConversationEntry>,
    expertise: BTreeMap<String, ExpertiseEntry>,
    next_seq: u64,
}

impl ContextAssembler {
    pub fn new(config: ContextConfig) -> Self {
        Self {
            config,
            stack: VecDeque::new(),
            expertise: BTreeMap::new(),
            next_seq: 0,
        }
    }

    /// Push a conversation entry. At the bound, the oldest entry is evicted
    /// first.
    pub fn push_context(&mut self, text: impl Into<String>) {
        while self.stack.len() >= self.config.max_stack_entries {
            let evicted = self.stack.pop_front();
            debug!(
                evicted_seq = evicted.map(|e| e.inserted_at),
                "Evicted oldest conversation entry"
            );
        }
        self.stack.push_back(ConversationEntry {
            text: text.into(),
            inserted_at: self.next_seq,
        });
        self.next_seq += 1;
    }

    /// Pop the most recent conversation entry.
    pub fn pop_context(&mut self) -> Option<ConversationEntry> {
        self.stack.pop_back()
    }

    /// Register (or replace) a plugin's expertise entry.
    pub fn add_expertise_context(&mut self, plugin_name: &str, summary: impl Into<String>) {
        self.expertise.insert(
            plugin_name.to_string(),
            ExpertiseEntry {
                plugin_name: plugin_name.to_string(),
                summary: summary.into(),
            },
        );
        info!(plugin = plugin_name, "Added expertise context");
    }

    /// Remove a plugin's expertise entry. Returns `false` if absent —
    /// non-fatal.
    pub fn remove_expertise_context(&mut self, plugin_name: &str) -> bool {
        let removed = self.expertise.remove(plugin_name).is_some();
        if removed {
            info!(plugin = plugin_name, "Removed expertise context");
        }
        removed
    }

    /// Assemble the combined context string.
    ///
    /// Fixed order: one `[Expertise: ...]` line per active plugin in name
    /// order, then the text of the `recency_window` most recent conversation
    /// entries in insertion order, all joined with newlines.
    pub fn get_combined_context(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        let mut expertise_lines: Vec<String> = Vec::new();

        for entry in self.expertise.values() {
            expertise_lines.push(format!("[Expertise: {}] {}", entry.plugin_name, entry.summary));
        }
        parts.extend(expertise_lines.iter().map(String::as_str));

        let window_start = self.stack.len().saturating_sub(self.config.recency_window);
        for entry in self.stack.iter().skip(window_start) {
            parts.push(&entry.text);
        }

        parts.join("\n")
    }

    /// Empty both the stack and the expertise map. Used on session reset.
    pub fn clear_context(&mut self) {
        self.stack.clear();
        self.expertise.clear();
        info!("Context cleared");
    }

    /// Current conversation stack depth.
    pub fn stack_len(&self) -> usize {
        self.stack.len()
    }

    /// Names of plugins with an active expertise entry, in name order.
    pub fn expertise_plugins(&self) -> Vec<String> {
        self.expertise.keys().cloned().collect()
    }
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self::new(ContextConfig::default())
    }
}
