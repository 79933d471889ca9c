//! Executes a compiled search and maps rows to the external result shape.

use crate::config::SearchConfig;
use crate::search::builder::CompiledSearch;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Denormalized author attributes carried on each hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: u64,
    pub username: String,
}

/// One search result record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Question ID
    pub id: u64,

    /// Question title
    pub title: String,

    /// Truncated question body
    pub excerpt: String,

    /// Author summary
    pub user: UserSummary,

    /// Attached tag names
    pub tags: Vec<String>,

    /// Number of answers
    pub answer_count: usize,

    /// Upvotes minus downvotes at query time
    pub votes_difference: i64,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last activity timestamp
    pub updated_at: DateTime<Utc>,
}

/// Runs compiled searches: filter, deduplicate, cap, map
pub struct SearchExecutor {
    max_results: usize,
    excerpt_chars: usize,
}

impl SearchExecutor {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            max_results: config.max_results,
            excerpt_chars: config.excerpt_chars,
        }
    }

    /// Evaluate every condition group over the candidate rows. Rows are kept
    /// in store order (ascending question ID); duplicates from the joined
    /// base select keep their first occurrence. No relevance ranking: this
    /// is a filter language.
    pub fn execute(&self, compiled: CompiledSearch) -> Vec<SearchHit> {
        let mut seen = HashSet::new();
        let mut hits = Vec::new();

        for candidate in &compiled.candidates {
            if hits.len() >= self.max_results {
                break;
            }
            if !compiled.matches(candidate) {
                continue;
            }
            if !seen.insert(candidate.question.id) {
                continue;
            }

            hits.push(SearchHit {
                id: candidate.question.id,
                title: candidate.question.title.clone(),
                excerpt: self.excerpt(&candidate.question.body),
                user: UserSummary {
                    id: candidate.user.id,
                    username: candidate.user.username.clone(),
                },
                tags: candidate.tags.iter().map(|tag| tag.name.clone()).collect(),
                answer_count: candidate.answers.len(),
                votes_difference: candidate.votes_difference,
                created_at: candidate.question.created_at,
                updated_at: candidate.question.updated_at,
            });
        }

        hits
    }

    fn excerpt(&self, body: &str) -> String {
        if body.chars().count() <= self.excerpt_chars {
            return body.to_string();
        }
        let mut excerpt: String = body.chars().take(self.excerpt_chars).collect();
        excerpt.push('…');
        excerpt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewQuestion, Question, User};
    use crate::search::conditions::Condition;
    use crate::store::SearchCandidate;

    fn row(id: u64, body: &str) -> SearchCandidate {
        let question = Question::new(
            id,
            NewQuestion {
                title: format!("question {}", id),
                body: body.to_string(),
                user_id: 1,
            },
        );
        SearchCandidate {
            question,
            user: User::new(1, "alice".to_string()),
            tags: Vec::new(),
            answers: Vec::new(),
            votes_difference: 0,
        }
    }

    fn executor(max_results: usize, excerpt_chars: usize) -> SearchExecutor {
        SearchExecutor::new(&SearchConfig {
            max_results,
            excerpt_chars,
        })
    }

    #[test]
    fn test_duplicate_rows_collapse_to_first() {
        let compiled = CompiledSearch {
            candidates: vec![row(1, "body"), row(1, "body"), row(2, "body")],
            groups: Vec::new(),
        };

        let hits = executor(100, 200).execute(compiled);
        let ids: Vec<u64> = hits.iter().map(|hit| hit.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_result_cap() {
        let compiled = CompiledSearch {
            candidates: (1..=5).map(|id| row(id, "body")).collect(),
            groups: Vec::new(),
        };

        let hits = executor(3, 200).execute(compiled);
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn test_filtering_applies_groups() {
        let compiled = CompiledSearch {
            candidates: vec![row(1, "about tokio"), row(2, "about rayon")],
            groups: vec![vec![Condition::AnyTextContains("tokio".to_string())]],
        };

        let hits = executor(100, 200).execute(compiled);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);
    }

    #[test]
    fn test_excerpt_truncates_on_char_boundary() {
        let compiled = CompiledSearch {
            candidates: vec![row(1, "géométrie différentielle et topologie")],
            groups: Vec::new(),
        };

        let hits = executor(100, 10).execute(compiled);
        assert_eq!(hits[0].excerpt, "géométrie …");
    }
}
