// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use url::Url;
use uuid::Uuid;
use validator::Validate;

/// The fixed category set a saved problem must fall into.
pub const CATEGORIES: &[&str] = &[
    "strings",
    "arrays",
    "sets",
    "hashmaps",
    "two pointer",
    "stacks",
    "linked list",
    "search",
    "sliding window",
    "trees",
    "heap",
    "graphs",
    "dynamic programming",
];

pub const DIFFICULTIES: &[&str] = &["Easy", "Medium", "Hard"];

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,

    /// Owner. Every read and mutation is scoped by this column.
    pub user_id: Uuid,

    pub title: String,

    /// Normalized problem statement (markdown subset).
    pub content: String,

    pub category: String,

    pub solution: String,

    pub source_link: Option<String>,

    /// 'Easy', 'Medium' or 'Hard'. Stays absent when unknown.
    pub difficulty: Option<String>,

    pub tags: Vec<String>,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// List-view row: excludes content and solution to keep the payload small.
#[derive(Debug, Serialize, FromRow)]
pub struct QuestionSummary {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub difficulty: Option<String>,
    pub tags: Vec<String>,
    pub source_link: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for saving a new question. The owner comes with the payload.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 50000))]
    pub content: String,
    #[validate(custom(function = validate_category))]
    pub category: String,
    #[validate(length(min = 1, max = 50000))]
    pub solution: String,
    #[validate(custom(function = validate_source_link))]
    pub source_link: Option<String>,
    #[validate(custom(function = validate_difficulty))]
    pub difficulty: Option<String>,
    #[serde(default)]
    #[validate(custom(function = validate_tags))]
    pub tags: Vec<String>,
    /// Owner id as text; checked against the UUID format before any lookup.
    pub user_id: String,
}

/// DTO for the edit action: full overwrite of the editable fields.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuestionRequest {
    pub title: String,
    pub content: String,
    #[validate(custom(function = validate_category))]
    pub category: String,
    #[validate(custom(function = validate_difficulty))]
    pub difficulty: Option<String>,
    pub solution: String,
    pub source_link: Option<String>,
}

/// DTO for deleting a question. Both ids arrive as text and are format
/// checked before storage is touched.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteQuestionRequest {
    pub question_id: String,
    pub user_id: String,
}

/// Query parameters for listing questions.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
}

/// Page metadata for the list endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_count: i64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

fn validate_category(category: &str) -> Result<(), validator::ValidationError> {
    if !CATEGORIES.contains(&category) {
        return Err(validator::ValidationError::new("unknown_category"));
    }
    Ok(())
}

fn validate_difficulty(difficulty: &str) -> Result<(), validator::ValidationError> {
    if !DIFFICULTIES.contains(&difficulty) {
        return Err(validator::ValidationError::new("unknown_difficulty"));
    }
    Ok(())
}

/// Validates that a source link, when present, is a correctly formatted URL.
fn validate_source_link(link: &str) -> Result<(), validator::ValidationError> {
    if link.len() > 500 || Url::parse(link).is_err() {
        return Err(validator::ValidationError::new("invalid_url"));
    }
    Ok(())
}

fn validate_tags(tags: &[String]) -> Result<(), validator::ValidationError> {
    if tags.len() > 50 {
        return Err(validator::ValidationError::new("too_many_tags"));
    }
    for tag in tags {
        if tag.is_empty() || tag.len() > 100 {
            return Err(validator::ValidationError::new("invalid_tag"));
        }
    }
    Ok(())
}
