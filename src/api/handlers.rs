use crate::api::AppState;
use crate::error::Result;
use crate::models::*;
use crate::search::SearchHit;
use crate::store::QuestionUpdate;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Health check endpoint
pub async fn health_check() -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Search questions with the structured query language
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchHit>>> {
    let hits = state.search.search(&params.query).await?;
    Ok(Json(hits))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
}

/// Register a user
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>)> {
    request.validate()?;

    let user = state.store.create_user(request.username).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
}

/// Post a question, creating and attaching its tags
pub async fn create_question(
    State(state): State<AppState>,
    Json(request): Json<CreateQuestionRequest>,
) -> Result<(StatusCode, Json<QuestionResponse>)> {
    request.validate()?;

    let question = state
        .store
        .create_question(NewQuestion {
            title: request.title,
            body: request.body,
            user_id: request.user_id,
        })
        .await?;

    for name in request.tags {
        let tag = state.store.create_tag(name).await?;
        state.store.attach_tag(question.id, tag.id).await?;
    }

    let tags = state.store.tags_for_question(question.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(QuestionResponse::new(question, tags, Vec::new(), 0)),
    ))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 10, max = 150))]
    pub title: String,
    #[validate(length(min = 30, max = 3500))]
    pub body: String,
    pub user_id: u64,
    #[validate(length(min = 1, max = 5))]
    pub tags: Vec<String>,
}

/// Get a question with its tags, answers and vote difference
pub async fn get_question(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<QuestionResponse>> {
    let question = state
        .store
        .get_question(id)
        .await?
        .ok_or_else(|| crate::error::AppError::NotFound(format!("Question {} not found", id)))?;

    let tags = state.store.tags_for_question(id).await?;
    let answers = state.store.answers_for_question(id).await?;
    let votes_difference = state
        .store
        .vote_difference(VoteTarget::Question(id))
        .await?;

    Ok(Json(QuestionResponse::new(
        question,
        tags,
        answers,
        votes_difference,
    )))
}

/// List questions
pub async fn list_questions(
    State(state): State<AppState>,
    Query(params): Query<ListQuestionsParams>,
) -> Result<Json<Vec<Question>>> {
    let offset = params.offset.unwrap_or(0);
    let limit = params.limit.unwrap_or(20).min(100); // Max 100 per page

    let questions = state.store.list_questions(offset, limit).await?;
    Ok(Json(questions))
}

#[derive(Debug, Deserialize)]
pub struct ListQuestionsParams {
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

/// Update a question (title, body, or accepting an answer)
pub async fn update_question(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(request): Json<UpdateQuestionRequest>,
) -> Result<Json<Question>> {
    request.validate()?;

    let question = state
        .store
        .update_question(
            id,
            QuestionUpdate {
                title: request.title,
                body: request.body,
                accepted_answer_id: request.accepted_answer_id,
            },
        )
        .await?;

    Ok(Json(question))
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateQuestionRequest {
    #[validate(length(min = 10, max = 150))]
    pub title: Option<String>,
    #[validate(length(min = 30, max = 3500))]
    pub body: Option<String>,
    pub accepted_answer_id: Option<u64>,
}

/// Post an answer to a question
pub async fn create_answer(
    State(state): State<AppState>,
    Path(question_id): Path<u64>,
    Json(request): Json<CreateAnswerRequest>,
) -> Result<(StatusCode, Json<Answer>)> {
    request.validate()?;

    let answer = state
        .store
        .create_answer(question_id, request.user_id, request.body)
        .await?;

    Ok((StatusCode::CREATED, Json(answer)))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAnswerRequest {
    pub user_id: u64,
    #[validate(length(min = 1, max = 3500))]
    pub body: String,
}

/// Cast a vote on a question or answer
pub async fn cast_vote(
    State(state): State<AppState>,
    Json(request): Json<CastVoteRequest>,
) -> Result<(StatusCode, Json<Vote>)> {
    let vote = state
        .store
        .cast_vote(request.user_id, request.target, request.is_upvote)
        .await?;

    Ok((StatusCode::CREATED, Json(vote)))
}

#[derive(Debug, Deserialize)]
pub struct CastVoteRequest {
    pub user_id: u64,
    pub target: VoteTarget,
    pub is_upvote: bool,
}

/// Question response DTO
#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub user_id: u64,
    pub accepted_answer_id: Option<u64>,
    pub tags: Vec<Tag>,
    pub answers: Vec<Answer>,
    pub votes_difference: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl QuestionResponse {
    fn new(question: Question, tags: Vec<Tag>, answers: Vec<Answer>, votes_difference: i64) -> Self {
        Self {
            id: question.id,
            title: question.title,
            body: question.body,
            user_id: question.user_id,
            accepted_answer_id: question.accepted_answer_id,
            tags,
            answers,
            votes_difference,
            created_at: question.created_at,
            updated_at: question.updated_at,
        }
    }
}
