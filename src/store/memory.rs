use crate::error::{AppError, Result};
use crate::models::{
    Answer, NewQuestion, Question, Tag, TagAttachment, User, Vote, VoteTarget,
};
use crate::store::{PlatformStore, QuestionUpdate, SearchCandidate};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// In-memory platform store (for development and testing)
#[derive(Clone)]
pub struct InMemoryStore {
    users: Arc<DashMap<u64, User>>,
    questions: Arc<DashMap<u64, Question>>,
    answers: Arc<DashMap<u64, Answer>>,
    tags: Arc<DashMap<u64, Tag>>,
    attachments: Arc<DashMap<u64, Vec<TagAttachment>>>,
    votes: Arc<DashMap<u64, Vote>>,
    // One vote per (user, target); maps to the stored vote id
    vote_index: Arc<DashMap<(u64, VoteTarget), u64>>,
    next_id: Arc<AtomicU64>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(DashMap::new()),
            questions: Arc::new(DashMap::new()),
            answers: Arc::new(DashMap::new()),
            tags: Arc::new(DashMap::new()),
            attachments: Arc::new(DashMap::new()),
            votes: Arc::new(DashMap::new()),
            vote_index: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn require_user(&self, id: u64) -> Result<User> {
        self.users
            .get(&id)
            .map(|entry| entry.clone())
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    fn require_question(&self, id: u64) -> Result<Question> {
        self.questions
            .get(&id)
            .map(|entry| entry.clone())
            .ok_or_else(|| AppError::NotFound(format!("Question {} not found", id)))
    }

    /// Vote difference per question id, over the live vote set
    fn question_vote_differences(&self) -> HashMap<u64, i64> {
        let mut differences = HashMap::new();
        for entry in self.votes.iter() {
            if let VoteTarget::Question(question_id) = entry.value().target {
                *differences.entry(question_id).or_insert(0) += entry.value().weight();
            }
        }
        differences
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlatformStore for InMemoryStore {
    async fn create_user(&self, username: String) -> Result<User> {
        let user = User::new(self.allocate_id(), username);
        self.users.insert(user.id, user.clone());
        tracing::debug!(user_id = user.id, "User created");
        Ok(user)
    }

    async fn get_user(&self, id: u64) -> Result<Option<User>> {
        Ok(self.users.get(&id).map(|entry| entry.clone()))
    }

    async fn create_question(&self, new: NewQuestion) -> Result<Question> {
        self.require_user(new.user_id)?;

        let question = Question::new(self.allocate_id(), new);
        self.questions.insert(question.id, question.clone());
        tracing::debug!(question_id = question.id, "Question created");
        Ok(question)
    }

    async fn get_question(&self, id: u64) -> Result<Option<Question>> {
        Ok(self.questions.get(&id).map(|entry| entry.clone()))
    }

    async fn list_questions(&self, offset: usize, limit: usize) -> Result<Vec<Question>> {
        let mut questions: Vec<Question> = self
            .questions
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        questions.sort_by_key(|question| question.id);

        Ok(questions.into_iter().skip(offset).take(limit).collect())
    }

    async fn update_question(&self, id: u64, update: QuestionUpdate) -> Result<Question> {
        let mut question = self.require_question(id)?;

        if let Some(title) = update.title {
            question.title = title;
        }
        if let Some(body) = update.body {
            question.body = body;
        }
        if let Some(answer_id) = update.accepted_answer_id {
            let answer = self
                .answers
                .get(&answer_id)
                .map(|entry| entry.clone())
                .ok_or_else(|| AppError::NotFound(format!("Answer {} not found", answer_id)))?;
            if answer.question_id != id {
                return Err(AppError::Conflict(format!(
                    "Answer {} does not belong to question {}",
                    answer_id, id
                )));
            }
            question.accepted_answer_id = Some(answer_id);
        }

        question.touch();
        self.questions.insert(id, question.clone());
        tracing::debug!(question_id = id, "Question updated");
        Ok(question)
    }

    async fn delete_question(&self, id: u64) -> Result<()> {
        if self.questions.remove(&id).is_none() {
            return Err(AppError::NotFound(format!("Question {} not found", id)));
        }

        let orphaned: Vec<u64> = self
            .answers
            .iter()
            .filter(|entry| entry.value().question_id == id)
            .map(|entry| entry.value().id)
            .collect();
        for answer_id in &orphaned {
            self.answers.remove(answer_id);
        }

        self.attachments.remove(&id);

        let stale_votes: Vec<u64> = self
            .votes
            .iter()
            .filter(|entry| match entry.value().target {
                VoteTarget::Question(question_id) => question_id == id,
                VoteTarget::Answer(answer_id) => orphaned.contains(&answer_id),
            })
            .map(|entry| entry.value().id)
            .collect();
        for vote_id in stale_votes {
            if let Some((_, vote)) = self.votes.remove(&vote_id) {
                self.vote_index.remove(&(vote.user_id, vote.target));
            }
        }

        tracing::debug!(question_id = id, "Question deleted");
        Ok(())
    }

    async fn create_answer(&self, question_id: u64, user_id: u64, body: String) -> Result<Answer> {
        self.require_question(question_id)?;
        self.require_user(user_id)?;

        let answer = Answer::new(self.allocate_id(), question_id, user_id, body);
        self.answers.insert(answer.id, answer.clone());
        tracing::debug!(answer_id = answer.id, question_id, "Answer created");
        Ok(answer)
    }

    async fn answers_for_question(&self, question_id: u64) -> Result<Vec<Answer>> {
        let mut answers: Vec<Answer> = self
            .answers
            .iter()
            .filter(|entry| entry.value().question_id == question_id)
            .map(|entry| entry.value().clone())
            .collect();
        answers.sort_by_key(|answer| answer.id);
        Ok(answers)
    }

    async fn create_tag(&self, name: String) -> Result<Tag> {
        let lowered = name.to_lowercase();
        if let Some(existing) = self
            .tags
            .iter()
            .find(|entry| entry.value().name.to_lowercase() == lowered)
        {
            return Ok(existing.value().clone());
        }

        let tag = Tag::new(self.allocate_id(), name);
        self.tags.insert(tag.id, tag.clone());
        tracing::debug!(tag_id = tag.id, name = %tag.name, "Tag created");
        Ok(tag)
    }

    async fn attach_tag(&self, question_id: u64, tag_id: u64) -> Result<()> {
        self.require_question(question_id)?;
        if !self.tags.contains_key(&tag_id) {
            return Err(AppError::NotFound(format!("Tag {} not found", tag_id)));
        }

        let mut links = self.attachments.entry(question_id).or_default();
        if links.iter().any(|link| link.tag_id == tag_id) {
            return Ok(());
        }
        links.push(TagAttachment {
            question_id,
            tag_id,
            attached_at: Utc::now(),
        });
        Ok(())
    }

    async fn tags_for_question(&self, question_id: u64) -> Result<Vec<Tag>> {
        let Some(links) = self.attachments.get(&question_id) else {
            return Ok(Vec::new());
        };

        Ok(links
            .iter()
            .filter_map(|link| self.tags.get(&link.tag_id).map(|entry| entry.clone()))
            .collect())
    }

    async fn cast_vote(&self, user_id: u64, target: VoteTarget, is_upvote: bool) -> Result<Vote> {
        self.require_user(user_id)?;
        match target {
            VoteTarget::Question(question_id) => {
                self.require_question(question_id)?;
            }
            VoteTarget::Answer(answer_id) => {
                if !self.answers.contains_key(&answer_id) {
                    return Err(AppError::NotFound(format!("Answer {} not found", answer_id)));
                }
            }
        }

        // Replace an earlier vote by the same user on the same target
        if let Some((_, old_id)) = self.vote_index.remove(&(user_id, target)) {
            self.votes.remove(&old_id);
        }

        let vote = Vote::new(self.allocate_id(), user_id, target, is_upvote);
        self.votes.insert(vote.id, vote.clone());
        self.vote_index.insert((user_id, target), vote.id);
        tracing::debug!(vote_id = vote.id, user_id, is_upvote, "Vote cast");
        Ok(vote)
    }

    async fn vote_difference(&self, target: VoteTarget) -> Result<i64> {
        let difference = self
            .votes
            .iter()
            .filter(|entry| entry.value().target == target)
            .map(|entry| entry.value().weight())
            .sum();
        Ok(difference)
    }

    async fn search_candidates(&self) -> Result<Vec<SearchCandidate>> {
        let differences = self.question_vote_differences();

        let mut questions: Vec<Question> = self
            .questions
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        questions.sort_by_key(|question| question.id);

        let mut candidates = Vec::with_capacity(questions.len());
        for question in questions {
            let user = self.require_user(question.user_id)?;
            let tags = self.tags_for_question(question.id).await?;
            let answers = self.answers_for_question(question.id).await?;
            let votes_difference = differences.get(&question.id).copied().unwrap_or(0);

            candidates.push(SearchCandidate {
                question,
                user,
                tags,
                answers,
                votes_difference,
            });
        }

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded_store() -> (InMemoryStore, User) {
        let store = InMemoryStore::new();
        let user = store.create_user("alice".to_string()).await.unwrap();
        (store, user)
    }

    #[tokio::test]
    async fn test_create_and_get_question() {
        let (store, user) = seeded_store().await;

        let question = store
            .create_question(NewQuestion {
                title: "Borrow checker fight".to_string(),
                body: "Cannot return a reference to a local".to_string(),
                user_id: user.id,
            })
            .await
            .unwrap();

        let fetched = store.get_question(question.id).await.unwrap();
        assert_eq!(fetched.unwrap().title, "Borrow checker fight");
    }

    #[tokio::test]
    async fn test_question_requires_existing_user() {
        let store = InMemoryStore::new();

        let result = store
            .create_question(NewQuestion {
                title: "t".to_string(),
                body: "b".to_string(),
                user_id: 99,
            })
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_revote_replaces_previous_vote() {
        let (store, user) = seeded_store().await;
        let question = store
            .create_question(NewQuestion {
                title: "t".to_string(),
                body: "b".to_string(),
                user_id: user.id,
            })
            .await
            .unwrap();
        let target = VoteTarget::Question(question.id);

        store.cast_vote(user.id, target, true).await.unwrap();
        assert_eq!(store.vote_difference(target).await.unwrap(), 1);

        // Same user flips their vote; the old one must not linger
        store.cast_vote(user.id, target, false).await.unwrap();
        assert_eq!(store.vote_difference(target).await.unwrap(), -1);
    }

    #[tokio::test]
    async fn test_answer_votes_do_not_count_toward_question_difference() {
        let (store, user) = seeded_store().await;
        let question = store
            .create_question(NewQuestion {
                title: "t".to_string(),
                body: "b".to_string(),
                user_id: user.id,
            })
            .await
            .unwrap();
        let answer = store
            .create_answer(question.id, user.id, "answer body".to_string())
            .await
            .unwrap();

        store
            .cast_vote(user.id, VoteTarget::Answer(answer.id), true)
            .await
            .unwrap();

        let candidates = store.search_candidates().await.unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].votes_difference, 0);
    }

    #[tokio::test]
    async fn test_tag_creation_is_case_insensitive_idempotent() {
        let (store, _) = seeded_store().await;

        let first = store.create_tag("Python".to_string()).await.unwrap();
        let second = store.create_tag("python".to_string()).await.unwrap();

        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_accepting_foreign_answer_conflicts() {
        let (store, user) = seeded_store().await;
        let first = store
            .create_question(NewQuestion {
                title: "first".to_string(),
                body: "body".to_string(),
                user_id: user.id,
            })
            .await
            .unwrap();
        let second = store
            .create_question(NewQuestion {
                title: "second".to_string(),
                body: "body".to_string(),
                user_id: user.id,
            })
            .await
            .unwrap();
        let answer = store
            .create_answer(second.id, user.id, "answer".to_string())
            .await
            .unwrap();

        let result = store
            .update_question(
                first.id,
                QuestionUpdate {
                    accepted_answer_id: Some(answer.id),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_delete_question_cascades() {
        let (store, user) = seeded_store().await;
        let question = store
            .create_question(NewQuestion {
                title: "t".to_string(),
                body: "b".to_string(),
                user_id: user.id,
            })
            .await
            .unwrap();
        let answer = store
            .create_answer(question.id, user.id, "a".to_string())
            .await
            .unwrap();
        store
            .cast_vote(user.id, VoteTarget::Answer(answer.id), true)
            .await
            .unwrap();

        store.delete_question(question.id).await.unwrap();

        assert!(store.get_question(question.id).await.unwrap().is_none());
        assert!(store
            .answers_for_question(question.id)
            .await
            .unwrap()
            .is_empty());
        assert_eq!(
            store
                .vote_difference(VoteTarget::Answer(answer.id))
                .await
                .unwrap(),
            0
        );
    }
}
