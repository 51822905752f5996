use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

pub mod prompts;

use crate::config::LlmConfig;
use crate::error::{PartFinderError, PartFinderResult};
use crate::query::{ParsedQuery, QueryOutcome};

/// Seam for the language-model collaborator that turns a free-text part
/// request into structured query fields. Tests and offline runs substitute
/// a stub implementation.
#[async_trait]
pub trait QueryExtractor: Send + Sync {
    /// Extract structured fields from a raw request.
    ///
    /// Never fails: any model or parse error is logged and replaced with
    /// the default query, reported as `QueryOutcome::Fallback`.
    async fn extract(&self, user_query: &str) -> QueryOutcome;
}

/// Query extractor backed by a local Ollama chat endpoint.
pub struct OllamaExtractor {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl OllamaExtractor {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        info!("Query extractor initialized against {} (model: {})", config.endpoint, config.model);

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    async fn request_extraction(&self, user_query: &str) -> PartFinderResult<ParsedQuery> {
        let prompt = prompts::build_extraction_prompt(user_query);

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            stream: false,
        };

        let model_err = |e: reqwest::Error| PartFinderError::Model { message: e.to_string() };

        let response: ChatResponse = self
            .client
            .post(format!("{}/api/chat", self.endpoint))
            .json(&request)
            .send()
            .await
            .map_err(model_err)?
            .error_for_status()
            .map_err(model_err)?
            .json()
            .await
            .map_err(model_err)?;

        debug!("Model response: {}", response.message.content);
        parse_model_response(&response.message.content)
    }
}

#[async_trait]
impl QueryExtractor for OllamaExtractor {
    async fn extract(&self, user_query: &str) -> QueryOutcome {
        match self.request_extraction(user_query).await {
            Ok(parsed) => {
                info!("Extracted query fields: part_type={:?}, vehicle_model={:?}", parsed.part_type, parsed.vehicle_model);
                QueryOutcome::Parsed(parsed)
            }
            Err(e) => {
                warn!("Query extraction failed ({}), using default query: {}", e.category(), e);
                QueryOutcome::Fallback {
                    query: ParsedQuery::default(),
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// Pull the first JSON object out of a model response and coerce it into a
/// `ParsedQuery`. Models often wrap the JSON in prose, so the slice between
/// the first `{` and the last `}` is what gets parsed.
fn parse_model_response(content: &str) -> PartFinderResult<ParsedQuery> {
    let start = content
        .find('{')
        .ok_or_else(|| PartFinderError::extraction("no JSON object in model response"))?;
    let end = content
        .rfind('}')
        .ok_or_else(|| PartFinderError::extraction("no closing brace in model response"))?;

    if end < start {
        return Err(PartFinderError::extraction("malformed JSON in model response"));
    }

    let parsed: ParsedQuery = serde_json::from_str(&content[start..=end])
        .map_err(|e| PartFinderError::extraction(e.to_string()))?;
    Ok(parsed)
}

/// Extractor that skips the model entirely and returns a fixed query.
/// Used for the offline CLI path and in tests.
pub struct StaticExtractor {
    query: ParsedQuery,
}

impl StaticExtractor {
    pub fn new(query: ParsedQuery) -> Self {
        Self { query }
    }
}

#[async_trait]
impl QueryExtractor for StaticExtractor {
    async fn extract(&self, _user_query: &str) -> QueryOutcome {
        QueryOutcome::Parsed(self.query.clone())
    }
}
