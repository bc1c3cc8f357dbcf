//! AI-generated commentary on recent crawler activity.
//!
//! The most recent stats rows are serialized into a prompt and sent to a
//! configured LLM. The reply is treated as opaque text. Failures never reach
//! the caller: [`generate_insight`] degrades to a placeholder message.

mod client;

pub use client::HttpInsightClient;

use crate::config::LlmConfig;
use crate::error::Result;
use crate::types::StatsResult;

/// Number of most recent rows included in the prompt.
pub const PROMPT_ROWS: usize = 10;

/// Shown when the model returns an empty reply.
pub const EMPTY_RESPONSE_MESSAGE: &str = "Unable to generate insights.";

/// Shown when the request fails for any reason.
pub const FAILURE_MESSAGE: &str = "AI analysis failed. Please check your API key configuration.";

const SYSTEM_PROMPT: &str =
    "You are an analyst of web server traffic from AI crawlers. Answer in plain prose.";

/// LLM completion interface for insights.
pub trait InsightClient: Send + Sync {
    fn complete(&self, prompt: &str) -> Result<String>;
}

/// Create the default HTTP-backed insight client.
pub fn create_insight_client(llm: &LlmConfig) -> Result<Box<dyn InsightClient>> {
    Ok(Box::new(HttpInsightClient::new(llm)?))
}

/// Build the analysis prompt from the last [`PROMPT_ROWS`] rows of `rows`.
pub fn build_prompt(rows: &[StatsResult]) -> Result<String> {
    let recent = &rows[rows.len().saturating_sub(PROMPT_ROWS)..];
    let data = serde_json::to_string(recent)?;
    Ok(format!(
        "Analyze this server log summary for AI bot activities.\n\
         Data: {}\n\
         Explain what these trends mean for SEO and server resource management.\n\
         Keep it brief and professional.",
        data
    ))
}

/// Ask `client` for commentary on `rows`.
///
/// Always returns displayable text; errors are logged and replaced by
/// [`FAILURE_MESSAGE`].
pub fn generate_insight(rows: &[StatsResult], client: &dyn InsightClient) -> String {
    let response = build_prompt(rows).and_then(|prompt| client.complete(&prompt));
    match response {
        Ok(text) if text.trim().is_empty() => EMPTY_RESPONSE_MESSAGE.to_string(),
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "AI insight request failed");
            FAILURE_MESSAGE.to_string()
        }
    }
}
