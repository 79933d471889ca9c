use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An answer to a question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// Unique identifier
    pub id: u64,

    /// Question this answers
    pub question_id: u64,

    /// Author
    pub user_id: u64,

    /// Answer body (markdown)
    pub body: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Answer {
    pub fn new(id: u64, question_id: u64, user_id: u64, body: String) -> Self {
        Self {
            id,
            question_id,
            user_id,
            body,
            created_at: Utc::now(),
        }
    }
}
