use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A question posted on the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier
    pub id: u64,

    /// Question title
    pub title: String,

    /// Question body (markdown)
    pub body: String,

    /// Author
    pub user_id: u64,

    /// Answer the author accepted, if any
    pub accepted_answer_id: Option<u64>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp ("last active" in search queries)
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a question through the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQuestion {
    pub title: String,
    pub body: String,
    pub user_id: u64,
}

impl Question {
    pub fn new(id: u64, new: NewQuestion) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: new.title,
            body: new.body,
            user_id: new.user_id,
            accepted_answer_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark the question as updated now
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
