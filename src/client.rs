// src/client.rs
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::config::{EndpointStyle, ResolvedConfig};
use crate::error::Error;
use crate::types::*;

const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// One HTTP client for the completion service, built once per run from
/// the resolved configuration.
pub struct ChatClient {
    http: Client,
    base_path: String,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
    temperature: f32,
    endpoint: EndpointStyle,
    max_question_length: usize,
    timeout_secs: u64,
}

impl ChatClient {
    pub fn new(config: &ResolvedConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_path: config.base_path.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            endpoint: config.endpoint,
            max_question_length: config.max_question_length,
            timeout_secs: config.timeout_secs,
        })
    }

    /// Ask the service for completion text. The question is capped to
    /// `max_question_length` characters before sending, independently of
    /// any upstream diff truncation.
    pub async fn get_answer(&self, question: &str) -> Result<String, Error> {
        let question = truncate_question(question, self.max_question_length);
        debug!(len = question.len(), "sending prompt");
        debug!(prompt = question);

        let (url, body) = match self.endpoint {
            EndpointStyle::Chat => {
                let request = ChatCompletionRequest {
                    model: self.model.clone(),
                    messages: vec![
                        ChatMessage { role: "system".to_string(), content: SYSTEM_PROMPT.to_string() },
                        ChatMessage { role: "user".to_string(), content: question.to_string() },
                    ],
                    max_tokens: self.max_tokens,
                    temperature: self.temperature,
                };
                (format!("{}/chat/completions", self.base_path), serde_json::to_value(request)?)
            }
            EndpointStyle::Completion => {
                let request = CompletionRequest {
                    model: self.model.clone(),
                    prompt: question.to_string(),
                    max_tokens: self.max_tokens,
                    temperature: self.temperature,
                };
                (format!("{}/completions", self.base_path), serde_json::to_value(request)?)
            }
        };

        let mut req_builder = self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json");

        if let Some(key) = &self.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", key));
        }

        let response = req_builder.json(&body).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout { secs: self.timeout_secs }
            } else {
                Error::Http(e)
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(Error::Http)?;
        debug!(status = %status, body = %text, "received response");

        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::Unauthorized);
        }
        if !status.is_success() {
            let message = serde_json::from_str::<ApiError>(&text)
                .ok()
                .and_then(|e| e.error)
                .and_then(|d| d.message)
                .unwrap_or_else(|| text.chars().take(500).collect());
            return Err(Error::Api { status: status.as_u16(), message });
        }

        let answer = match self.endpoint {
            EndpointStyle::Chat => {
                let resp: ChatCompletionResponse = serde_json::from_str(&text)?;
                resp.choices.into_iter().next().and_then(|c| c.message.content)
            }
            EndpointStyle::Completion => {
                let resp: CompletionResponse = serde_json::from_str(&text)?;
                resp.choices.into_iter().next().and_then(|c| c.text)
            }
        };

        answer
            .map(|s| s.trim().to_string())
            .ok_or(Error::EmptyResponse)
    }

    /// `get_answer` with exactly one automatic retry when the service
    /// answers 401. A second 401 propagates; all other errors propagate
    /// immediately.
    pub async fn get_answer_retry(&self, question: &str) -> Result<String, Error> {
        match self.get_answer(question).await {
            Err(Error::Unauthorized) => self.get_answer(question).await,
            other => other,
        }
    }
}

/// Prefix-preserving character cap on the outgoing question.
pub fn truncate_question(question: &str, max_chars: usize) -> &str {
    match question.char_indices().nth(max_chars) {
        Some((i, _)) => &question[..i],
        None => question,
    }
}
