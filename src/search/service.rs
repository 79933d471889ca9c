//! Main search service implementation

use crate::config::SearchConfig;
use crate::search::builder::SearchQueryBuilder;
use crate::search::error::SearchResult;
use crate::search::executor::{SearchExecutor, SearchHit};
use crate::search::tokenizer::QueryTokenizer;
use crate::store::PlatformStore;
use std::sync::Arc;

/// Main search service.
///
/// One sequential pipeline per call: tokenize, build conditions, compile,
/// execute. No state survives between calls; concurrent searches share
/// nothing but the store.
pub struct SearchService {
    store: Arc<dyn PlatformStore>,
    executor: SearchExecutor,
}

impl SearchService {
    /// Create a new search service over a platform store
    pub fn new(store: Arc<dyn PlatformStore>, config: &SearchConfig) -> Self {
        Self {
            store,
            executor: SearchExecutor::new(config),
        }
    }

    /// Search questions with the free-text query language.
    ///
    /// Fragment kinds found in the query each become one conjunctive
    /// condition group; kinds the query does not use add nothing. The only
    /// client error is a date that fits the grammar but no accepted format.
    pub async fn search(&self, raw_query: &str) -> SearchResult<Vec<SearchHit>> {
        let tokens = QueryTokenizer::tokenize(raw_query);

        let mut builder = SearchQueryBuilder::initialize(self.store.as_ref()).await?;
        if !tokens.tags.is_empty() {
            builder = builder.apply_tags_conditions(&tokens.tags);
        }
        if !tokens.strict.is_empty() {
            builder = builder.apply_strict_conditions(&tokens.strict);
        }
        if !tokens.scores.is_empty() {
            builder = builder.apply_scores_conditions(&tokens.scores);
        }
        if !tokens.users.is_empty() {
            builder = builder.apply_users_conditions(&tokens.users);
        }
        if !tokens.dates.is_empty() {
            builder = builder.apply_dates_conditions(&tokens.dates)?;
        }
        if !tokens.booleans.is_empty() {
            builder = builder.apply_booleans_conditions(&tokens.booleans);
        }
        if !tokens.plain_text.is_empty() {
            builder = builder.apply_plain_text_condition(&tokens.plain_text);
        }

        let hits = self.executor.execute(builder.get_statement());

        tracing::debug!(
            query = raw_query,
            hits = hits.len(),
            "Search executed"
        );

        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewQuestion, VoteTarget};
    use crate::store::InMemoryStore;

    async fn seeded_service() -> (SearchService, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        let service = SearchService::new(store.clone(), &SearchConfig::default());

        let alice = store.create_user("alice".to_string()).await.unwrap();
        let bob = store.create_user("bob".to_string()).await.unwrap();

        let q1 = store
            .create_question(NewQuestion {
                title: "How to parse JSON in Python".to_string(),
                body: "I keep getting a decode error from the json module".to_string(),
                user_id: alice.id,
            })
            .await
            .unwrap();
        let q2 = store
            .create_question(NewQuestion {
                title: "Rust lifetime elision rules".to_string(),
                body: "When exactly can I omit lifetime annotations".to_string(),
                user_id: bob.id,
            })
            .await
            .unwrap();

        let python = store.create_tag("python".to_string()).await.unwrap();
        let rust = store.create_tag("rust".to_string()).await.unwrap();
        store.attach_tag(q1.id, python.id).await.unwrap();
        store.attach_tag(q2.id, rust.id).await.unwrap();

        store
            .cast_vote(bob.id, VoteTarget::Question(q1.id), true)
            .await
            .unwrap();

        (service, store)
    }

    #[tokio::test]
    async fn test_plain_text_search() {
        let (service, _) = seeded_service().await;
        let hits = service.search("decode error").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "How to parse JSON in Python");
    }

    #[tokio::test]
    async fn test_tag_search() {
        let (service, _) = seeded_service().await;
        let hits = service.search("[rust]").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].tags, vec!["rust".to_string()]);
    }

    #[tokio::test]
    async fn test_empty_query_returns_everything() {
        let (service, _) = seeded_service().await;
        let hits = service.search("").await.unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn test_combined_fragments_and_across_kinds() {
        let (service, _) = seeded_service().await;
        // q1 is tagged python and has one upvote
        let hits = service.search("[python] score:1").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].votes_difference, 1);

        let none = service.search("[python] score:2").await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_date_aborts_search() {
        let (service, _) = seeded_service().await;
        let result = service.search("created:2023-13").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_search_is_idempotent() {
        let (service, _) = seeded_service().await;
        let first = service.search("[python]").await.unwrap();
        let second = service.search("[python]").await.unwrap();

        let first_ids: Vec<u64> = first.iter().map(|hit| hit.id).collect();
        let second_ids: Vec<u64> = second.iter().map(|hit| hit.id).collect();
        assert_eq!(first_ids, second_ids);
    }
}
