// src/handlers/extract.rs

use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;

use crate::{error::AppError, leetcode::LeetCodeClient};

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub url: Option<String>,
}

/// Imports a problem from LeetCode.
///
/// One stateless request/response cycle: validate the URL, fetch the
/// statement, normalize and truncate it, hand the result back. Nothing is
/// stored; saving is a separate action.
pub async fn extract_problem(
    State(client): State<LeetCodeClient>,
    Json(payload): Json<ExtractRequest>,
) -> Result<impl IntoResponse, AppError> {
    let url = payload
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or(AppError::BadRequest("URL is required".to_string()))?;

    let problem = client.fetch_problem(url).await?;

    tracing::info!(title = %problem.title, "Problem extracted");

    Ok(Json(json!({
        "message": "Problem extracted successfully",
        "problem": problem,
    })))
}
