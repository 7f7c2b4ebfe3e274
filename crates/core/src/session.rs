//! Conversation session — the append-only message log plus identity and
//! display metadata.
//!
//! A session is the unit of persisted state. It is mutated only by appending
//! messages; nothing is reordered or spliced, which is what makes a run
//! resumable after an interruption mid-tool-dispatch.
//!
//! Persistence note: the serde field names (`chatId`, `chatName`,
//! `createdTime`) match the on-disk format the UI layer produces and consumes
//! wholesale.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::message::{Message, Role};

/// Unique identifier for a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An externally attached contextual object (e.g. a scene object the user
/// selected in the host environment). Attachments live next to the log, not
/// in it: their description is inlined into content only at projection time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub description: String,
}

/// A conversation session: identity metadata and the ordered message log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique session ID
    #[serde(rename = "chatId")]
    pub id: SessionId,

    /// Display name
    #[serde(rename = "chatName")]
    pub name: String,

    /// When this session was created
    #[serde(rename = "createdTime")]
    pub created_at: DateTime<Utc>,

    /// Ordered messages. Private: mutation goes through `append` only.
    messages: Vec<Message>,

    /// Attached contextual objects, not part of the persisted log.
    #[serde(skip)]
    attachments: Vec<Attachment>,
}

impl Session {
    /// Create a new empty session.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: SessionId::new(),
            name: name.into(),
            created_at: Utc::now(),
            messages: Vec::new(),
            attachments: Vec::new(),
        }
    }

    /// Append a message to the end of the log.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// The ordered message log.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Attach a contextual object to the session.
    pub fn attach(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
    }

    /// Remove all attached contextual objects.
    pub fn clear_attachments(&mut self) {
        self.attachments.clear();
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Produce the ordered message sequence the codec will encode.
    ///
    /// When attachments are present, their descriptions are inlined into the
    /// content of the latest user message as an `[Attached Objects]` block.
    /// This is a one-way transformation done once per projection — the stored
    /// message is never modified.
    pub fn project_for_wire(&self) -> Vec<Message> {
        let mut projected = self.messages.clone();

        if !self.attachments.is_empty() {
            if let Some(last_user) = projected.iter_mut().rev().find(|m| m.role == Role::User) {
                let mut block = String::from("\n\n[Attached Objects]:");
                for att in &self.attachments {
                    block.push_str(&format!("\n- {}: {}", att.name, att.description));
                }
                let content = last_user.content.take().unwrap_or_default();
                last_user.content = Some(format!("{content}{block}"));
            }
        }

        projected
    }

    /// Advisory display label: name plus message count.
    pub fn display_name(&self) -> String {
        format!("{} ({} messages)", self.name, self.messages.len())
    }
}
