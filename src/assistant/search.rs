//! Search-grounded generation through Gemini's native `generateContent` API.
//!
//! The OpenAI-compatible endpoint cannot attach Google Search, so the
//! forecast sub-query goes through the native API with the `google_search`
//! tool enabled.

use crate::error::{BuddyError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// A model that answers with live web search available.
#[async_trait]
pub trait SearchModel: Send + Sync {
    /// Answer `prompt` on `model`, letting it consult web search.
    async fn search(&self, model: &str, prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
pub struct SearchRequest<'a> {
    contents: Vec<Content<'a>>,
    tools: Vec<SearchTool>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct SearchTool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

/// Request body with the user prompt and the Google Search tool.
pub fn search_request(prompt: &str) -> SearchRequest<'_> {
    SearchRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![RequestPart { text: prompt }],
        }],
        tools: vec![SearchTool {
            google_search: GoogleSearch {},
        }],
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: Option<String>,
}

/// Search-grounded Gemini client.
pub struct GeminiSearch {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl GeminiSearch {
    pub fn new(api_base: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl SearchModel for GeminiSearch {
    #[instrument(skip(self, prompt))]
    async fn search(&self, model: &str, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&search_request(prompt))
            .send()
            .await
            .map_err(|e| BuddyError::Provider(e.without_url().to_string()))?;

        let status = response.status();
        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| BuddyError::Provider(e.without_url().to_string()))?;

        if let Some(error) = body.error {
            return Err(BuddyError::Provider(
                error.message.unwrap_or_else(|| status.to_string()),
            ));
        }
        if !status.is_success() {
            return Err(BuddyError::Provider(format!(
                "search endpoint answered with status {}",
                status
            )));
        }

        debug!("Search returned {} candidate(s)", body.candidates.len());
        candidate_text(body)
    }
}

/// Text of the first candidate, all parts joined.
fn candidate_text(response: GenerateContentResponse) -> Result<String> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    let text = text.trim();
    if text.is_empty() {
        Err(BuddyError::EmptyCandidate)
    } else {
        Ok(text.to_string())
    }
}
