//! Message domain types.
//!
//! These are the value objects that flow through the subsystem: a turn is
//! appended to the store as a [`Message`], and context assembly hands back
//! lightweight [`ContextEntry`] pairs ready for prompt injection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The AI assistant
    Assistant,
    /// System instructions (identity, rules)
    System,
    /// Tool execution result
    Tool,
}

impl Role {
    /// The lowercase wire/storage form of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
            Role::Tool => "tool",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored role string is not one of the four known roles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

impl std::str::FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            "system" => Ok(Role::System),
            "tool" => Ok(Role::Tool),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

/// A single persisted conversation turn.
///
/// Messages come out of [`MessageStore::append`](crate::MessageStore::append)
/// and are immutable after that. The store assigns `id` so that it strictly
/// increases in append order, and `timestamp` never decreases as `id` grows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Store-assigned identifier, strictly monotonic in append order
    pub id: i64,

    /// Who sent this message
    pub role: Role,

    /// The text content (may be empty)
    pub content: String,

    /// When the message was persisted
    pub timestamp: DateTime<Utc>,

    /// Embedding computed at append time. Fixed width per store; skipped
    /// during serialization because the store is the source of truth.
    #[serde(skip)]
    pub embedding: Vec<f32>,
}

impl Message {
    /// Strip the message down to the pair that goes into a prompt.
    pub fn to_entry(&self) -> ContextEntry {
        ContextEntry {
            role: self.role.clone(),
            content: self.content.clone(),
        }
    }
}

/// A role/content pair ready for prompt assembly.
///
/// Both the short-term window and assembled context slices use this shape.
/// Ids and embeddings stay behind in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextEntry {
    /// Who sent this entry
    pub role: Role,

    /// The text content
    pub content: String,
}

impl ContextEntry {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

impl From<&Message> for ContextEntry {
    fn from(message: &Message) -> Self {
        message.to_entry()
    }
}
