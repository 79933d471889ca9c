//! The condition intermediate representation and the per-fragment builders.
//!
//! Each builder is a pure function from one fragment list to a list of
//! predicates over [`SearchCandidate`] rows. Groups built here are applied
//! conjunctively by the query builder; only the date builder can fail.

use crate::search::error::{SearchError, SearchResult};
use crate::search::tokenizer::{
    BoolField, BoolToken, DateField, DateToken, ScoreToken, StrictField, StrictToken, TagToken,
};
use crate::store::SearchCandidate;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// One predicate against a candidate row
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Some attached tag's name contains this (case-insensitive)
    HasTag(String),
    /// No attached tag's name contains this (case-insensitive)
    LacksTag(String),
    /// Title contains the phrase (case-insensitive)
    TitleContains(String),
    /// Body contains the phrase (case-insensitive)
    BodyContains(String),
    /// Title, body or any answer body contains the phrase (case-insensitive)
    AnyTextContains(String),
    /// Vote difference lower bound (inclusive)
    ScoreAtLeast(i64),
    /// Vote difference upper bound (inclusive)
    ScoreAtMost(i64),
    /// Question author
    AuthoredBy(u64),
    /// created_at at or after midnight of the start date
    CreatedSince(DateTime<Utc>),
    /// created_at between the two midnights, inclusive
    CreatedBetween(DateTime<Utc>, DateTime<Utc>),
    /// updated_at at or after midnight of the start date
    UpdatedSince(DateTime<Utc>),
    /// updated_at between the two midnights, inclusive
    UpdatedBetween(DateTime<Utc>, DateTime<Utc>),
    /// accepted_answer_id present (true) or absent (false)
    HasAcceptedAnswer(bool),
    /// At least one answer (true) or none (false)
    IsAnswered(bool),
}

impl Condition {
    /// Evaluate this predicate against one candidate row
    pub fn eval(&self, candidate: &SearchCandidate) -> bool {
        match self {
            Condition::HasTag(name) => has_tag(candidate, name),
            Condition::LacksTag(name) => !has_tag(candidate, name),
            Condition::TitleContains(phrase) => {
                contains_ci(&candidate.question.title, phrase)
            }
            Condition::BodyContains(phrase) => contains_ci(&candidate.question.body, phrase),
            Condition::AnyTextContains(phrase) => {
                combined_text(candidate).contains(&phrase.to_lowercase())
            }
            Condition::ScoreAtLeast(min) => candidate.votes_difference >= *min,
            Condition::ScoreAtMost(max) => candidate.votes_difference <= *max,
            Condition::AuthoredBy(user_id) => candidate.question.user_id == *user_id,
            Condition::CreatedSince(start) => candidate.question.created_at >= *start,
            Condition::CreatedBetween(start, end) => {
                candidate.question.created_at >= *start && candidate.question.created_at <= *end
            }
            Condition::UpdatedSince(start) => candidate.question.updated_at >= *start,
            Condition::UpdatedBetween(start, end) => {
                candidate.question.updated_at >= *start && candidate.question.updated_at <= *end
            }
            Condition::HasAcceptedAnswer(expected) => {
                candidate.question.accepted_answer_id.is_some() == *expected
            }
            Condition::IsAnswered(expected) => !candidate.answers.is_empty() == *expected,
        }
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn has_tag(candidate: &SearchCandidate, name: &str) -> bool {
    let needle = name.to_lowercase();
    candidate
        .tags
        .iter()
        .any(|tag| tag.name.to_lowercase().contains(&needle))
}

/// Title, body and all answer bodies, lowercased, as one searchable blob
fn combined_text(candidate: &SearchCandidate) -> String {
    let mut text = String::with_capacity(
        candidate.question.title.len() + candidate.question.body.len() + 1,
    );
    text.push_str(&candidate.question.title);
    text.push(' ');
    text.push_str(&candidate.question.body);
    for answer in &candidate.answers {
        text.push(' ');
        text.push_str(&answer.body);
    }
    text.to_lowercase()
}

/// Build predicates for the tag fragments
pub fn tags_conditions(tokens: &[TagToken]) -> Vec<Condition> {
    tokens
        .iter()
        .map(|token| {
            if token.negated {
                Condition::LacksTag(token.name.clone())
            } else {
                Condition::HasTag(token.name.clone())
            }
        })
        .collect()
}

/// Build predicates for the quoted-phrase fragments
pub fn strict_conditions(tokens: &[StrictToken]) -> Vec<Condition> {
    tokens
        .iter()
        .map(|token| match token.field {
            StrictField::Title => Condition::TitleContains(token.phrase.clone()),
            StrictField::Body => Condition::BodyContains(token.phrase.clone()),
            StrictField::Any => Condition::AnyTextContains(token.phrase.clone()),
        })
        .collect()
}

/// Build predicates for the score fragments. Each bound present becomes its
/// own inclusive comparison against the joined vote-difference value.
pub fn scores_conditions(tokens: &[ScoreToken]) -> Vec<Condition> {
    let mut conditions = Vec::new();
    for token in tokens {
        if let Some(min) = token.min {
            conditions.push(Condition::ScoreAtLeast(min));
        }
        if let Some(max) = token.max {
            conditions.push(Condition::ScoreAtMost(max));
        }
    }
    conditions
}

/// Build predicates for the user fragments.
///
/// Multiple ids are ANDed like every other group, so `user:1 user:2` can
/// never match (a question has one author). That mirrors the historical
/// behavior of this query language; OR semantics would be a flagged change.
pub fn users_conditions(user_ids: &[u64]) -> Vec<Condition> {
    user_ids
        .iter()
        .map(|user_id| Condition::AuthoredBy(*user_id))
        .collect()
}

/// Build predicates for the date fragments. The only fallible builder: a
/// date that parses under none of the accepted formats aborts the search.
pub fn dates_conditions(tokens: &[DateToken]) -> SearchResult<Vec<Condition>> {
    let mut conditions = Vec::new();
    for token in tokens {
        let start = midnight_utc(parse_query_date(&token.start)?);
        let end = token
            .end
            .as_deref()
            .map(|raw| parse_query_date(raw).map(midnight_utc))
            .transpose()?;

        let condition = match (token.field, end) {
            (DateField::Created, Some(end)) => Condition::CreatedBetween(start, end),
            (DateField::Created, None) => Condition::CreatedSince(start),
            (DateField::LastActive, Some(end)) => Condition::UpdatedBetween(start, end),
            (DateField::LastActive, None) => Condition::UpdatedSince(start),
        };
        conditions.push(condition);
    }
    Ok(conditions)
}

/// Build predicates for the boolean fragments
pub fn booleans_conditions(tokens: &[BoolToken]) -> Vec<Condition> {
    tokens
        .iter()
        .map(|token| match token.field {
            BoolField::HasAccepted => Condition::HasAcceptedAnswer(token.value),
            BoolField::IsAnswered => Condition::IsAnswered(token.value),
        })
        .collect()
}

/// The unscoped remainder searches the same blob as an unprefixed phrase
pub fn plain_text_condition(text: &str) -> Condition {
    Condition::AnyTextContains(text.to_string())
}

/// Parse a query date trying `YYYY-MM-DD`, then `YYYY-MM` (first of the
/// month), then `YYYY` (January 1st); the first format that parses wins.
pub fn parse_query_date(raw: &str) -> SearchResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d"))
        .or_else(|_| NaiveDate::parse_from_str(&format!("{raw}-01-01"), "%Y-%m-%d"))
        .map_err(|_| SearchError::InvalidDateFormat(raw.to_string()))
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
