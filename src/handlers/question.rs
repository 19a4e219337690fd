// src/handlers/question.rs

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::question::{
        CreateQuestionRequest, DeleteQuestionRequest, ListParams, Pagination, Question,
        QuestionSummary, UpdateQuestionRequest,
    },
    utils::{jwt::Claims, render},
};

/// Parses a textual id, rejecting anything that is not a canonical UUID
/// before storage is touched.
fn parse_uuid(value: &str, field: &str) -> Result<Uuid, AppError> {
    value
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid {} format", field)))
}

async fn ensure_user_exists(pool: &PgPool, user_id: Uuid) -> Result<(), AppError> {
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;
    Ok(())
}

/// Lists the current user's questions, newest first, with page/limit
/// pagination and optional category/difficulty filters.
/// Content and solution are excluded from the list payload.
pub async fn list_questions(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(10).clamp(1, 100);
    let offset = (page - 1) * limit;

    let total_count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM questions
        WHERE user_id = $1
          AND ($2::TEXT IS NULL OR category = $2)
          AND ($3::TEXT IS NULL OR difficulty = $3)
        "#,
    )
    .bind(user_id)
    .bind(&params.category)
    .bind(&params.difficulty)
    .fetch_one(&pool)
    .await?;

    let questions = sqlx::query_as::<_, QuestionSummary>(
        r#"
        SELECT id, title, category, difficulty, tags, source_link, created_at, updated_at
        FROM questions
        WHERE user_id = $1
          AND ($2::TEXT IS NULL OR category = $2)
          AND ($3::TEXT IS NULL OR difficulty = $3)
        ORDER BY created_at DESC
        LIMIT $4 OFFSET $5
        "#,
    )
    .bind(user_id)
    .bind(&params.category)
    .bind(&params.difficulty)
    .bind(limit)
    .bind(offset)
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list questions: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    let total_pages = (total_count + limit - 1) / limit;

    Ok(Json(json!({
        "questions": questions,
        "pagination": Pagination {
            current_page: page,
            total_pages,
            total_count,
            has_next_page: page < total_pages,
            has_previous_page: page > 1,
        }
    })))
}

async fn fetch_owned_question(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
) -> Result<Option<Question>, AppError> {
    let question = sqlx::query_as::<_, Question>(
        r#"
        SELECT id, user_id, title, content, category, solution,
               source_link, difficulty, tags, created_at, updated_at
        FROM questions
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(question)
}

/// Retrieves a single question by ID, scoped to the current user.
pub async fn get_question(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_uuid(&id, "questionId")?;
    let user_id = claims.user_id()?;

    let question = fetch_owned_question(&pool, id, user_id)
        .await?
        .ok_or(AppError::NotFound("Question not found".to_string()))?;

    Ok(Json(question))
}

/// Retrieves a question with its content parsed into display blocks
/// (headings, spacers, paragraphs of plain/bold/code spans).
pub async fn get_question_rendered(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_uuid(&id, "questionId")?;
    let user_id = claims.user_id()?;

    let question = fetch_owned_question(&pool, id, user_id)
        .await?
        .ok_or(AppError::NotFound("Question not found".to_string()))?;

    let blocks = render::render(&question.content);

    Ok(Json(json!({
        "title": question.title,
        "blocks": blocks,
    })))
}

/// Saves a new question. The owner id comes with the payload and must
/// reference an existing user.
pub async fn create_question(
    State(pool): State<PgPool>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user_id = parse_uuid(&payload.user_id, "userId")?;
    ensure_user_exists(&pool, user_id).await?;

    let source_link = payload
        .source_link
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let question = sqlx::query_as::<_, Question>(
        r#"
        INSERT INTO questions (user_id, title, content, category, solution,
                               source_link, difficulty, tags)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, user_id, title, content, category, solution,
                  source_link, difficulty, tags, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(&payload.title)
    .bind(&payload.content)
    .bind(&payload.category)
    .bind(&payload.solution)
    .bind(source_link)
    .bind(&payload.difficulty)
    .bind(&payload.tags)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if e.to_string().contains("foreign key") {
            AppError::BadRequest("Invalid user reference".to_string())
        } else {
            tracing::error!("Failed to save question: {:?}", e);
            AppError::from(e)
        }
    })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Question saved successfully",
            "question": {
                "id": question.id,
                "title": question.title,
                "category": question.category,
                "difficulty": question.difficulty,
                "created_at": question.created_at,
            }
        })),
    ))
}

/// Overwrites a question's editable fields.
///
/// The question must belong to the current user; a foreign or unknown id
/// yields the same 404 so existence is never leaked.
pub async fn update_question(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_uuid(&id, "questionId")?;
    let user_id = claims.user_id()?;

    if payload.title.trim().is_empty() {
        return Err(AppError::BadRequest("Title is required".to_string()));
    }
    if payload.content.trim().is_empty() {
        return Err(AppError::BadRequest("Content is required".to_string()));
    }
    if payload.solution.trim().is_empty() {
        return Err(AppError::BadRequest("Solution is required".to_string()));
    }
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    fetch_owned_question(&pool, id, user_id)
        .await?
        .ok_or(AppError::NotFound(
            "Question not found or access denied".to_string(),
        ))?;

    let source_link = payload
        .source_link
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let question = sqlx::query_as::<_, Question>(
        r#"
        UPDATE questions
        SET title = $1, content = $2, category = $3, difficulty = $4,
            solution = $5, source_link = $6, updated_at = NOW()
        WHERE id = $7
        RETURNING id, user_id, title, content, category, solution,
                  source_link, difficulty, tags, created_at, updated_at
        "#,
    )
    .bind(payload.title.trim())
    .bind(payload.content.trim())
    .bind(&payload.category)
    .bind(&payload.difficulty)
    .bind(payload.solution.trim())
    .bind(source_link)
    .bind(id)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to update question: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(json!({
        "message": "Question updated successfully",
        "question": question,
    })))
}

/// Deletes a question.
///
/// Both ids are format checked before any query; the ownership check
/// distinguishes 404 (no such question) from 403 (someone else's).
pub async fn delete_question(
    State(pool): State<PgPool>,
    Json(payload): Json<DeleteQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let question_id = parse_uuid(&payload.question_id, "questionId")?;
    let user_id = parse_uuid(&payload.user_id, "userId")?;

    ensure_user_exists(&pool, user_id).await?;

    let owner = sqlx::query_scalar::<_, Uuid>("SELECT user_id FROM questions WHERE id = $1")
        .bind(question_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Question not found".to_string()))?;

    if owner != user_id {
        return Err(AppError::Forbidden(
            "Unauthorized: Question does not belong to user".to_string(),
        ));
    }

    sqlx::query("DELETE FROM questions WHERE id = $1")
        .bind(question_id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete question: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    Ok(Json(json!({
        "message": "Question deleted successfully",
    })))
}
