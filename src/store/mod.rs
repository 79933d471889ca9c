pub mod memory;

pub use memory::InMemoryStore;

use crate::error::Result;
use crate::models::{Answer, NewQuestion, Question, Tag, User, Vote, VoteTarget};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One base-select row consumed by the search core: a question outer-joined
/// with its author, tags, answers and the vote-difference aggregate.
/// Questions without votes or answers still appear, with a difference of 0
/// and an empty answer list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCandidate {
    pub question: Question,
    pub user: User,
    pub tags: Vec<Tag>,
    pub answers: Vec<Answer>,
    pub votes_difference: i64,
}

/// Fields of a question that can change after creation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionUpdate {
    pub title: Option<String>,
    pub body: Option<String>,
    pub accepted_answer_id: Option<u64>,
}

/// Trait for platform storage operations.
///
/// The search core consumes exactly one method, [`search_candidates`]; the
/// rest is the CRUD surface the HTTP layer drives. A SQL-backed deployment
/// implements the same trait with the aggregate pushed into a subquery.
///
/// [`search_candidates`]: PlatformStore::search_candidates
#[async_trait]
pub trait PlatformStore: Send + Sync {
    /// Register a user
    async fn create_user(&self, username: String) -> Result<User>;

    /// Get a user by ID
    async fn get_user(&self, id: u64) -> Result<Option<User>>;

    /// Create a question for an existing user
    async fn create_question(&self, new: NewQuestion) -> Result<Question>;

    /// Get a question by ID
    async fn get_question(&self, id: u64) -> Result<Option<Question>>;

    /// List questions in insertion order
    async fn list_questions(&self, offset: usize, limit: usize) -> Result<Vec<Question>>;

    /// Apply an update to a question, bumping its updated_at
    async fn update_question(&self, id: u64, update: QuestionUpdate) -> Result<Question>;

    /// Delete a question together with its answers, votes and tag links
    async fn delete_question(&self, id: u64) -> Result<()>;

    /// Post an answer to an existing question
    async fn create_answer(&self, question_id: u64, user_id: u64, body: String) -> Result<Answer>;

    /// Answers for one question, oldest first
    async fn answers_for_question(&self, question_id: u64) -> Result<Vec<Answer>>;

    /// Create a tag, or return the existing one with the same
    /// case-insensitive name
    async fn create_tag(&self, name: String) -> Result<Tag>;

    /// Attach a tag to a question (idempotent)
    async fn attach_tag(&self, question_id: u64, tag_id: u64) -> Result<()>;

    /// Tags attached to one question
    async fn tags_for_question(&self, question_id: u64) -> Result<Vec<Tag>>;

    /// Cast a vote, replacing any earlier vote by the same user on the
    /// same target
    async fn cast_vote(&self, user_id: u64, target: VoteTarget, is_upvote: bool) -> Result<Vote>;

    /// Live vote difference (upvotes minus downvotes) for one target
    async fn vote_difference(&self, target: VoteTarget) -> Result<i64>;

    /// The base select for search: every question joined with its author,
    /// tags, answers and vote difference, ordered by question ID. Computed
    /// fresh on every call; the search core never caches it.
    async fn search_candidates(&self) -> Result<Vec<SearchCandidate>>;
}
