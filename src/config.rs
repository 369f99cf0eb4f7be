// src/config.rs
use serde::Deserialize;
use std::path::PathBuf;

use crate::prompt::DEFAULT_PROMPT_TEMPLATE;

// =============================================================================
// DEFAULTS
// =============================================================================
pub const CONFIG_FILENAME: &str = ".aicommit.toml";
pub const DEFAULT_BASE_PATH: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_MAX_TOKENS: u32 = 200;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_QUESTION_LENGTH: usize = 80_000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

// =============================================================================
// ENDPOINT STYLE
// =============================================================================
/// Which OpenAI-style endpoint the client talks to. Both paths share one
/// request/response pipeline; only the URL and body shape differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndpointStyle {
    #[default]
    Chat,
    Completion,
}

impl EndpointStyle {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "completion" | "completions" => Self::Completion,
            _ => Self::Chat,
        }
    }
}

// =============================================================================
// CONFIG FILE
// =============================================================================
#[derive(Debug, Default, Clone, Deserialize)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub base_path: Option<String>,
    pub endpoint: Option<String>,
    pub max_question_length: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub diff_cmd: Option<String>,
    pub commit_cmd: Option<String>,
    pub prompt_template: Option<String>,
}

impl Config {
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(CONFIG_FILENAME))
    }

    pub fn load() -> Self {
        Self::path()
            .and_then(|p| std::fs::read_to_string(&p).ok())
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }
}

// =============================================================================
// RESOLVED CONFIG
// =============================================================================
/// All knobs for one run, merged once at startup: CLI > config file >
/// environment > defaults. Immutable afterwards.
pub struct ResolvedConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub base_path: String,
    pub endpoint: EndpointStyle,
    pub max_question_length: usize,
    pub timeout_secs: u64,
    pub diff_cmd: Option<String>,
    pub commit_cmd: Option<String>,
    pub prompt_template: String,
}

impl ResolvedConfig {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        cli_api_key: Option<&String>,
        cli_model: Option<&String>,
        cli_max_tokens: Option<u32>,
        cli_temperature: Option<f32>,
        cli_base_url: Option<&String>,
        cli_endpoint: Option<&String>,
        cli_max_question_length: Option<usize>,
        cli_diff_cmd: Option<&String>,
        cli_commit_cmd: Option<&String>,
        file: &Config,
    ) -> Self {
        let api_key = cli_api_key
            .cloned()
            .or_else(|| file.api_key.clone())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok());

        let base_path = cli_base_url
            .cloned()
            .or_else(|| file.base_path.clone())
            .unwrap_or_else(|| DEFAULT_BASE_PATH.to_string());

        let model = cli_model
            .cloned()
            .or_else(|| file.model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let max_tokens = cli_max_tokens
            .or(file.max_tokens)
            .unwrap_or(DEFAULT_MAX_TOKENS);

        let temperature = cli_temperature
            .or(file.temperature)
            .unwrap_or(DEFAULT_TEMPERATURE);

        let endpoint = cli_endpoint
            .map(|s| EndpointStyle::parse(s))
            .or_else(|| file.endpoint.as_deref().map(EndpointStyle::parse))
            .unwrap_or_default();

        let max_question_length = cli_max_question_length
            .or(file.max_question_length)
            .unwrap_or(DEFAULT_MAX_QUESTION_LENGTH);

        let timeout_secs = file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);

        let diff_cmd = cli_diff_cmd.cloned().or_else(|| file.diff_cmd.clone());
        let commit_cmd = cli_commit_cmd.cloned().or_else(|| file.commit_cmd.clone());

        let prompt_template = file
            .prompt_template
            .clone()
            .unwrap_or_else(|| DEFAULT_PROMPT_TEMPLATE.to_string());

        Self {
            api_key,
            model,
            max_tokens,
            temperature,
            base_path,
            endpoint,
            max_question_length,
            timeout_secs,
            diff_cmd,
            commit_cmd,
            prompt_template,
        }
    }
}
