//! HTTP-backed [`InsightClient`] for the supported LLM providers.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::json;

use super::{InsightClient, SYSTEM_PROMPT};
use crate::config::{LlmConfig, LlmProvider};
use crate::error::{Error, Result};

const MAX_TOKENS: u32 = 600;

/// Sends prompts to Ollama, Claude, OpenAI, or Gemini and extracts the reply text.
pub struct HttpInsightClient {
    model: String,
    provider: LlmProvider,
    endpoint: String,
    api_key: Option<String>,
    runtime: tokio::runtime::Runtime,
    http: reqwest::Client,
}

impl HttpInsightClient {
    /// Build a client from `[llm]` configuration.
    ///
    /// Hosted providers need an API key, either configured or taken from the
    /// provider's environment variable.
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let endpoint = config
            .endpoint
            .clone()
            .unwrap_or_else(|| config.provider.default_endpoint().to_string())
            .trim_end_matches('/')
            .to_string();
        let api_key = config.api_key.clone().or_else(|| {
            config
                .provider
                .api_key_env()
                .and_then(|var| std::env::var(var).ok())
        });

        if config.provider != LlmProvider::Ollama && api_key.is_none() {
            return Err(Error::Config(
                "llm.api_key (or provider env var) is required".to_string(),
            ));
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Llm(format!("failed to build tokio runtime: {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| Error::Llm(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            model: config.model.clone(),
            provider: config.provider,
            endpoint,
            api_key,
            runtime,
            http,
        })
    }

    /// Provider-specific URL, headers, and body for `prompt`.
    fn build_request(&self, prompt: &str) -> Result<(String, HeaderMap, serde_json::Value)> {
        let key = self.api_key.as_deref().unwrap_or_default();
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let request = match self.provider {
            LlmProvider::Ollama => (
                format!("{}/api/generate", self.endpoint),
                headers,
                json!({
                    "model": self.model,
                    "system": SYSTEM_PROMPT,
                    "prompt": prompt,
                    "stream": false,
                }),
            ),
            LlmProvider::Claude => {
                headers.insert(
                    "x-api-key",
                    HeaderValue::from_str(key)
                        .map_err(|e| Error::Llm(format!("invalid claude api key header: {e}")))?,
                );
                headers.insert("anthropic-version", HeaderValue::from_static("2023-06-01"));
                (
                    format!("{}/v1/messages", self.endpoint),
                    headers,
                    json!({
                        "model": self.model,
                        "max_tokens": MAX_TOKENS,
                        "system": SYSTEM_PROMPT,
                        "messages": [{ "role": "user", "content": prompt }],
                    }),
                )
            }
            LlmProvider::OpenAI => {
                headers.insert(
                    AUTHORIZATION,
                    HeaderValue::from_str(&format!("Bearer {}", key))
                        .map_err(|e| Error::Llm(format!("invalid auth header: {e}")))?,
                );
                (
                    format!("{}/v1/chat/completions", self.endpoint),
                    headers,
                    json!({
                        "model": self.model,
                        "messages": [
                            { "role": "system", "content": SYSTEM_PROMPT },
                            { "role": "user", "content": prompt }
                        ]
                    }),
                )
            }
            LlmProvider::Gemini => {
                headers.insert(
                    "x-goog-api-key",
                    HeaderValue::from_str(key)
                        .map_err(|e| Error::Llm(format!("invalid gemini api key header: {e}")))?,
                );
                (
                    format!(
                        "{}/v1beta/models/{}:generateContent",
                        self.endpoint, self.model
                    ),
                    headers,
                    json!({
                        "systemInstruction": { "parts": [{ "text": SYSTEM_PROMPT }] },
                        "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
                    }),
                )
            }
        };

        Ok(request)
    }

    fn provider_name(&self) -> &'static str {
        match self.provider {
            LlmProvider::Ollama => "ollama",
            LlmProvider::Claude => "claude",
            LlmProvider::OpenAI => "openai",
            LlmProvider::Gemini => "gemini",
        }
    }
}

/// Pull the reply text out of a provider's JSON response.
fn extract_text(provider: LlmProvider, json: &serde_json::Value) -> Option<String> {
    let text = match provider {
        LlmProvider::Ollama => json.get("response"),
        LlmProvider::Claude => json
            .get("content")
            .and_then(|v| v.as_array())
            .and_then(|arr| arr.first())
            .and_then(|v| v.get("text")),
        LlmProvider::OpenAI => json
            .get("choices")
            .and_then(|v| v.as_array())
            .and_then(|arr| arr.first())
            .and_then(|v| v.get("message"))
            .and_then(|v| v.get("content")),
        LlmProvider::Gemini => json
            .get("candidates")
            .and_then(|v| v.as_array())
            .and_then(|arr| arr.first())
            .and_then(|v| v.get("content"))
            .and_then(|v| v.get("parts"))
            .and_then(|v| v.as_array())
            .and_then(|arr| arr.first())
            .and_then(|v| v.get("text")),
    };
    text.and_then(|v| v.as_str()).map(ToString::to_string)
}

impl InsightClient for HttpInsightClient {
    fn complete(&self, prompt: &str) -> Result<String> {
        let name = self.provider_name();
        let (url, headers, body) = self.build_request(prompt)?;

        tracing::debug!(provider = name, model = %self.model, "Requesting AI insight");

        self.runtime.block_on(async {
            let resp = self
                .http
                .post(url)
                .headers(headers)
                .json(&body)
                .send()
                .await
                .map_err(|e| Error::Llm(format!("{name} request failed: {e}")))?;
            let status = resp.status();
            let body = resp
                .text()
                .await
                .map_err(|e| Error::Llm(format!("{name} read body failed: {e}")))?;
            if !status.is_success() {
                return Err(Error::Llm(format!(
                    "{name} returned {}: {}",
                    status.as_u16(),
                    body
                )));
            }
            let json: serde_json::Value = serde_json::from_str(&body)?;
            extract_text(self.provider, &json)
                .ok_or_else(|| Error::Llm(format!("{name} response missing reply text")))
        })
    }
}
