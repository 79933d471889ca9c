use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tag that can be attached to questions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    /// Unique identifier
    pub id: u64,

    /// Tag name, unique case-insensitively
    pub name: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Tag {
    pub fn new(id: u64, name: String) -> Self {
        Self {
            id,
            name,
            created_at: Utc::now(),
        }
    }
}

/// Link between a question and a tag.
///
/// Carries its own timestamp so "recent tag usage" windows can be computed
/// over attachments rather than tag creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagAttachment {
    pub question_id: u64,
    pub tag_id: u64,
    pub attached_at: DateTime<Utc>,
}
