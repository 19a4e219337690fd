// src/leetcode.rs
//
// Problem importer: resolves a problem URL to a slug, asks the LeetCode
// GraphQL API for the statement, and converts the HTML body into the
// markdown subset the rest of the app stores.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

use crate::error::AppError;
use crate::utils::markup;

const GRAPHQL_ENDPOINT: &str = "https://leetcode.com/graphql";

// LeetCode rejects requests without a browser-like User-Agent.
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

static PROBLEM_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"leetcode\.com/problems/([\w-]+)").unwrap());

/// Failure kinds of one import cycle.
#[derive(Debug)]
pub enum ExtractError {
    /// The URL does not point at a LeetCode problem. Raised before any
    /// network traffic.
    InvalidUrl,
    /// The provider was unreachable or answered with a non-success status.
    Upstream(String),
    /// The provider answered but knows no such problem.
    NotFound,
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::InvalidUrl => write!(f, "invalid problem URL"),
            ExtractError::Upstream(msg) => write!(f, "upstream failure: {}", msg),
            ExtractError::NotFound => write!(f, "problem not found"),
        }
    }
}

impl std::error::Error for ExtractError {}

impl From<ExtractError> for AppError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::InvalidUrl => AppError::BadRequest(
                "Invalid LeetCode problem URL. Please use format: https://leetcode.com/problems/problem-name/"
                    .to_string(),
            ),
            ExtractError::Upstream(_) => {
                AppError::Upstream("Failed to fetch problem from LeetCode".to_string())
            }
            ExtractError::NotFound => AppError::NotFound(
                "Problem not found. Please check the URL and try again.".to_string(),
            ),
        }
    }
}

/// What one successful import returns.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedProblem {
    pub title: String,
    /// Normalized statement text, truncated at the constraints section.
    pub content: String,
    pub difficulty: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<QuestionData>,
}

#[derive(Debug, Deserialize)]
struct QuestionData {
    question: Option<RawQuestion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestion {
    title: String,
    // Null for premium-only problems.
    content: Option<String>,
    difficulty: Option<String>,
    #[serde(default)]
    topic_tags: Vec<TopicTag>,
}

#[derive(Debug, Deserialize)]
struct TopicTag {
    name: String,
}

/// Stateless GraphQL client for problem extraction. Cheap to clone; the
/// inner reqwest client is reference counted.
#[derive(Clone)]
pub struct LeetCodeClient {
    http: reqwest::Client,
    endpoint: String,
}

impl Default for LeetCodeClient {
    fn default() -> Self {
        Self::new()
    }
}

impl LeetCodeClient {
    pub fn new() -> Self {
        Self::with_endpoint(GRAPHQL_ENDPOINT)
    }

    /// Overrides the GraphQL endpoint (used by tests).
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Runs one import cycle: URL → slug → fetch → normalize → truncate.
    pub async fn fetch_problem(&self, url: &str) -> Result<ExtractedProblem, ExtractError> {
        let slug = extract_slug(url).ok_or(ExtractError::InvalidUrl)?;

        let query = json!({
            "operationName": "questionData",
            "variables": { "titleSlug": slug },
            "query": "query questionData($titleSlug: String!) { \
                question(titleSlug: $titleSlug) { \
                    title content difficulty topicTags { name } \
                } \
            }",
        });

        let response = self
            .http
            .post(&self.endpoint)
            .header(reqwest::header::USER_AGENT, BROWSER_USER_AGENT)
            .json(&query)
            .send()
            .await
            .map_err(|e| ExtractError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ExtractError::Upstream(format!(
                "unexpected status {}",
                response.status()
            )));
        }

        let body: GraphqlResponse = response
            .json()
            .await
            .map_err(|e| ExtractError::Upstream(e.to_string()))?;

        let question = body
            .data
            .and_then(|d| d.question)
            .ok_or(ExtractError::NotFound)?;

        let raw_content = question.content.unwrap_or_default();
        let content = trim_trailing_sections(&markup::html_to_text(&raw_content));

        Ok(ExtractedProblem {
            title: question.title,
            content,
            difficulty: question.difficulty,
            tags: question.topic_tags.into_iter().map(|t| t.name).collect(),
        })
    }
}

/// Pulls the problem slug out of a LeetCode problem URL.
pub fn extract_slug(url: &str) -> Option<&str> {
    PROBLEM_URL
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Drops the constraints and follow-up sections: keeps normalized lines up
/// to (excluding) the first whose trimmed, lowercased text starts one of
/// those sections.
pub fn trim_trailing_sections(content: &str) -> String {
    let kept: Vec<&str> = content
        .split('\n')
        .take_while(|line| {
            let lower = line.trim().to_lowercase();
            !(lower.starts_with("constraints")
                || lower.starts_with("**constraints")
                || lower.starts_with("**follow-up"))
        })
        .collect();

    kept.join("\n").trim().to_string()
}
