use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A platform user.
///
/// Only the attributes search results denormalize. Credentials, roles and
/// permissions live in the identity collaborator, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: u64,

    /// Display name
    pub username: String,

    /// Registration timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: u64, username: String) -> Self {
        Self {
            id,
            username,
            created_at: Utc::now(),
        }
    }
}
