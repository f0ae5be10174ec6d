//! History Scenario - turning client-sent history into model turns
//!
//! Clients send history as loose JSON records. Normalization never fails:
//! unusable entries are coerced or dropped.

use serde_json::Value;

use super::persona::ComposedInstruction;

pub const DEFAULT_HISTORY_WINDOW: usize = 10;
pub const ANCHOR_PREFIX: &str = "System Instruction: ";
pub const ANCHOR_ACK: &str = "Understood. I am ready.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnRole {
    User,
    Assistant,
}

impl TurnRole {
    /// Absent role means user; any present value other than the two known roles means assistant
    fn resolve(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::User,
            Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
                "user" => Self::User,
                _ => Self::Assistant,
            },
            Some(_) => Self::Assistant,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    role: TurnRole,
    content: String,
}

impl ConversationTurn {
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(TurnRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(TurnRole::Assistant, content)
    }

    pub fn role(&self) -> TurnRole {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    fn from_raw(raw: &Value) -> Option<Self> {
        let role = TurnRole::resolve(raw.get("role"));
        let content = raw.get("content").and_then(Value::as_str).unwrap_or_default();
        if content.trim().is_empty() {
            return None;
        }
        Some(Self::new(role, content))
    }
}

/// Ordered client turns, at most `window` long
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedHistory(Vec<ConversationTurn>);

impl NormalizedHistory {
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Keep the last `window` raw entries, then coerce roles and drop empty content
pub fn normalize(raw: &[Value], window: usize) -> NormalizedHistory {
    let start = raw.len().saturating_sub(window);
    NormalizedHistory(raw[start..].iter().filter_map(ConversationTurn::from_raw).collect())
}

/// Prefix the instruction turn and its acknowledgment ahead of the history
pub fn anchor(instruction: &ComposedInstruction, history: NormalizedHistory) -> Vec<ConversationTurn> {
    let mut turns = Vec::with_capacity(history.len() + 2);
    turns.push(ConversationTurn::user(format!("{}{}", ANCHOR_PREFIX, instruction)));
    turns.push(ConversationTurn::assistant(ANCHOR_ACK));
    turns.extend(history.0);
    turns
}
