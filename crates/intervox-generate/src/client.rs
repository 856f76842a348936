use crate::fallback;
use crate::prompt;
use crate::rate::RateLimiter;
use intervox_core::{FinalSummary, GenerationConfig, GenerationError, QaPair, QaSummary};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Client for the chat-completions generation API. Every public method
/// degrades to a canned fallback instead of surfacing an error, so a missing
/// key or a flaky network never stalls the interview.
pub struct GenerationClient {
    http: reqwest::Client,
    config: GenerationConfig,
    limiter: RateLimiter,
}

impl GenerationClient {
    pub fn new(config: GenerationConfig) -> Self {
        let limiter = RateLimiter::new(Duration::from_millis(config.min_request_interval_ms));
        Self {
            http: reqwest::Client::new(),
            config,
            limiter,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Short spoken acknowledgement for a partial answer. The only rate
    /// limited operation, since it can fire repeatedly inside one answer.
    pub async fn filler_phrase(&self, question: &str, partial_answer: &str) -> String {
        if !self.is_configured() {
            return fallback::filler(partial_answer);
        }
        self.limiter.acquire().await;
        match self
            .complete(&prompt::filler(question, partial_answer), 0.8, 50, Some(0.9))
            .await
        {
            Ok(text) => sanitize_filler(&text),
            Err(err) => {
                tracing::warn!("filler generation failed, using fallback: {err}");
                fallback::filler(partial_answer)
            }
        }
    }

    pub async fn qa_summary(&self, question: &str, answer: &str) -> QaSummary {
        if !self.is_configured() {
            return fallback::qa_summary(answer);
        }
        let result = self
            .complete(&prompt::qa_summary(question, answer), 0.3, 200, None)
            .await
            .and_then(|text| extract_json::<QaSummary>(&text));
        match result {
            Ok(summary) => summary,
            Err(err) => {
                tracing::warn!("answer assessment failed, using fallback: {err}");
                fallback::qa_summary(answer)
            }
        }
    }

    pub async fn final_summary(
        &self,
        pairs: &[QaPair],
        assessments: &[QaSummary],
        total_questions: usize,
    ) -> FinalSummary {
        if !self.is_configured() {
            return fallback::final_summary(pairs.len(), total_questions);
        }
        let block = prompt::qa_block(pairs, assessments);
        let result = self
            .complete(&prompt::final_summary(&block), 0.3, 500, None)
            .await
            .and_then(|text| extract_json::<FinalSummary>(&text));
        match result {
            Ok(summary) => summary,
            Err(err) => {
                tracing::warn!("final report generation failed, using fallback: {err}");
                fallback::final_summary(pairs.len(), total_questions)
            }
        }
    }

    async fn complete(
        &self,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
        top_p: Option<f32>,
    ) -> Result<String, GenerationError> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt.to_string(),
            }],
            temperature,
            max_tokens,
            top_p,
        };

        tracing::debug!(model = %self.config.model, "sending generation request");
        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;
        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| GenerationError::MalformedResponse("no choices in response".to_string()))
    }
}

/// Pull the first JSON object out of a completion, tolerating prose or code
/// fences around it.
pub(crate) fn extract_json<T: serde::de::DeserializeOwned>(
    text: &str,
) -> Result<T, GenerationError> {
    let pattern = Regex::new(r"\{[\s\S]*\}")
        .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;
    let matched = pattern
        .find(text)
        .ok_or_else(|| GenerationError::MalformedResponse("no JSON object in response".to_string()))?;
    serde_json::from_str(matched.as_str())
        .map_err(|e| GenerationError::MalformedResponse(e.to_string()))
}

/// Reduce a completion to a single clean spoken line: first non-empty line,
/// markdown emphasis and wrapping quotes stripped.
pub(crate) fn sanitize_filler(text: &str) -> String {
    let line = text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("");
    let cleaned: String = line
        .chars()
        .filter(|c| !matches!(c, '*' | '_' | '~' | '`'))
        .collect();
    cleaned
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
        .to_string()
}
