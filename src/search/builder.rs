//! The chainable search query compiler.
//!
//! Construction performs the one blocking operation of a search: asking the
//! store for its base select (questions outer-joined with author, tags,
//! answers and the vote-difference aggregate). Every `apply_*` call after
//! that is pure; each pushes one conjunctive condition group, so fragment
//! kinds can be applied in any subset and order without changing the result.

use crate::search::conditions::{self, Condition};
use crate::search::error::SearchResult;
use crate::search::tokenizer::{BoolToken, DateToken, ScoreToken, StrictToken, TagToken};
use crate::store::{PlatformStore, SearchCandidate};

/// A finalized search: the candidate rows plus the condition groups to
/// evaluate over them. AND across groups, AND within each group.
#[derive(Debug)]
pub struct CompiledSearch {
    pub candidates: Vec<SearchCandidate>,
    pub groups: Vec<Vec<Condition>>,
}

impl CompiledSearch {
    /// Whether one candidate row satisfies every group
    pub fn matches(&self, candidate: &SearchCandidate) -> bool {
        self.groups
            .iter()
            .all(|group| group.iter().all(|condition| condition.eval(candidate)))
    }
}

/// Stateful compiler owning the in-progress query
pub struct SearchQueryBuilder {
    candidates: Vec<SearchCandidate>,
    groups: Vec<Vec<Condition>>,
}

impl SearchQueryBuilder {
    /// Fetch the base select from the store. The vote-difference aggregate
    /// is computed inside this single call, once per search.
    pub async fn initialize(store: &dyn PlatformStore) -> SearchResult<Self> {
        let candidates = store.search_candidates().await?;
        Ok(Self {
            candidates,
            groups: Vec::new(),
        })
    }

    fn push_group(&mut self, group: Vec<Condition>) {
        if !group.is_empty() {
            self.groups.push(group);
        }
    }

    pub fn apply_tags_conditions(mut self, tokens: &[TagToken]) -> Self {
        self.push_group(conditions::tags_conditions(tokens));
        self
    }

    pub fn apply_strict_conditions(mut self, tokens: &[StrictToken]) -> Self {
        self.push_group(conditions::strict_conditions(tokens));
        self
    }

    pub fn apply_scores_conditions(mut self, tokens: &[ScoreToken]) -> Self {
        self.push_group(conditions::scores_conditions(tokens));
        self
    }

    pub fn apply_users_conditions(mut self, user_ids: &[u64]) -> Self {
        self.push_group(conditions::users_conditions(user_ids));
        self
    }

    /// The one fallible application: a malformed date aborts the search
    pub fn apply_dates_conditions(mut self, tokens: &[DateToken]) -> SearchResult<Self> {
        let group = conditions::dates_conditions(tokens)?;
        self.push_group(group);
        Ok(self)
    }

    pub fn apply_booleans_conditions(mut self, tokens: &[BoolToken]) -> Self {
        self.push_group(conditions::booleans_conditions(tokens));
        self
    }

    pub fn apply_plain_text_condition(mut self, text: &str) -> Self {
        self.push_group(vec![conditions::plain_text_condition(text)]);
        self
    }

    /// Finalize; the builder is consumed
    pub fn get_statement(self) -> CompiledSearch {
        CompiledSearch {
            candidates: self.candidates,
            groups: self.groups,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewQuestion;
    use crate::search::tokenizer::QueryTokenizer;
    use crate::store::InMemoryStore;

    async fn store_with_question() -> InMemoryStore {
        let store = InMemoryStore::new();
        let user = store.create_user("alice".to_string()).await.unwrap();
        store
            .create_question(NewQuestion {
                title: "Lifetimes in async closures".to_string(),
                body: "The borrow checker rejects my spawn call".to_string(),
                user_id: user.id,
            })
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_no_groups_matches_everything() {
        let store = store_with_question().await;
        let compiled = SearchQueryBuilder::initialize(&store)
            .await
            .unwrap()
            .get_statement();

        assert_eq!(compiled.candidates.len(), 1);
        assert!(compiled.matches(&compiled.candidates[0]));
    }

    #[tokio::test]
    async fn test_empty_fragment_lists_add_no_groups() {
        let store = store_with_question().await;
        let tokens = QueryTokenizer::tokenize("plain words only");
        let compiled = SearchQueryBuilder::initialize(&store)
            .await
            .unwrap()
            .apply_tags_conditions(&tokens.tags)
            .apply_scores_conditions(&tokens.scores)
            .apply_booleans_conditions(&tokens.booleans)
            .get_statement();

        assert!(compiled.groups.is_empty());
    }

    #[tokio::test]
    async fn test_groups_compose_conjunctively() {
        let store = store_with_question().await;
        let tokens = QueryTokenizer::tokenize("score:1 user:1");
        let compiled = SearchQueryBuilder::initialize(&store)
            .await
            .unwrap()
            .apply_scores_conditions(&tokens.scores)
            .apply_users_conditions(&tokens.users)
            .get_statement();

        // Zero votes, so score:1 fails even though the author matches
        assert_eq!(compiled.groups.len(), 2);
        assert!(!compiled.matches(&compiled.candidates[0]));
    }

    #[tokio::test]
    async fn test_application_order_is_irrelevant() {
        let store = store_with_question().await;
        let tokens = QueryTokenizer::tokenize("[rust] user:1");

        let forward = SearchQueryBuilder::initialize(&store)
            .await
            .unwrap()
            .apply_tags_conditions(&tokens.tags)
            .apply_users_conditions(&tokens.users)
            .get_statement();
        let reverse = SearchQueryBuilder::initialize(&store)
            .await
            .unwrap()
            .apply_users_conditions(&tokens.users)
            .apply_tags_conditions(&tokens.tags)
            .get_statement();

        let forward_ids: Vec<u64> = forward
            .candidates
            .iter()
            .filter(|c| forward.matches(c))
            .map(|c| c.question.id)
            .collect();
        let reverse_ids: Vec<u64> = reverse
            .candidates
            .iter()
            .filter(|c| reverse.matches(c))
            .map(|c| c.question.id)
            .collect();
        assert_eq!(forward_ids, reverse_ids);
    }

    #[tokio::test]
    async fn test_malformed_date_fails_application() {
        let store = store_with_question().await;
        let tokens = QueryTokenizer::tokenize("created:2023-13");
        let result = SearchQueryBuilder::initialize(&store)
            .await
            .unwrap()
            .apply_dates_conditions(&tokens.dates);

        assert!(result.is_err());
    }
}
